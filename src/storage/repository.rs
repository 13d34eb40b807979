use crate::core::{Agent, AgentId, Ticket, TicketId};
use crate::error::Result;
use crate::filter::PredicateSet;

#[cfg(test)]
use mockall::automock;

/// Keyed ticket storage with a filtered scan
///
/// Implementations use optimistic concurrency: `put` of an already stored
/// ticket only succeeds when `ticket.version` matches the stored version.
#[cfg_attr(test, automock)]
pub trait TicketStore: Send + Sync {
    /// Loads a ticket by ID
    fn get(&self, id: &TicketId) -> Result<Ticket>;

    /// Writes a ticket and returns the stored copy
    ///
    /// A ticket with [`TicketId::UNASSIGNED`] is inserted under the next free
    /// id with version 1. Any other ticket overwrites the stored ticket with
    /// the same id and has its version bumped; a version mismatch fails with
    /// `ConcurrentModification` and an unknown id with `TicketNotFound`.
    fn put(&self, ticket: Ticket) -> Result<Ticket>;

    /// Returns every ticket matching all predicates, ordered by id
    fn scan(&self, predicates: &PredicateSet) -> Result<Vec<Ticket>>;
}

/// Read access to the agents tickets can be assigned to
#[cfg_attr(test, automock)]
pub trait AgentDirectory: Send + Sync {
    fn find_by_id(&self, id: &AgentId) -> Result<Agent>;

    fn find_by_name(&self, name: &str) -> Result<Agent>;
}

/// Agent bookkeeping used by the command line front end
pub trait AgentRegistry: AgentDirectory {
    /// Registers a new agent; names are unique
    fn register(&self, name: &str) -> Result<Agent>;

    /// Lists agents ordered by id
    fn list_agents(&self) -> Result<Vec<Agent>>;
}

/// Combined repository trait
pub trait Repository: TicketStore + AgentRegistry {}

/// Implementation of Repository for types that implement both traits
impl<T> Repository for T where T: TicketStore + AgentRegistry {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Status, TicketFilter};
    use crate::error::DeskError;
    use crate::storage::{FileStorage, MemoryStore};
    use chrono::Utc;
    use tempfile::TempDir;

    fn file_storage(temp_dir: &TempDir) -> FileStorage {
        let storage = FileStorage::new(temp_dir.path().join(".ticket-desk"));
        storage.init("test", false).expect("Failed to init storage");
        storage
    }

    fn create_test_ticket(description: &str) -> Ticket {
        Ticket::new(description, Utc::now())
    }

    /// Runs the same contract checks against every store implementation
    fn check_store_contract(store: &dyn Repository) {
        let first = store.put(create_test_ticket("first")).expect("Failed to insert");
        let second = store.put(create_test_ticket("second")).expect("Failed to insert");
        assert_eq!(first.id, TicketId::new(1));
        assert_eq!(second.id, TicketId::new(2));
        assert_eq!(first.version, 1);

        let loaded = store.get(&first.id).expect("Failed to load ticket");
        assert_eq!(loaded.description, "first");

        let mut edited = loaded.clone();
        edited.description = "first, edited".to_string();
        let saved = store.put(edited).expect("Failed to overwrite");
        assert_eq!(saved.id, first.id);
        assert_eq!(saved.version, 2);

        // The copy read before the overwrite is now stale.
        let err = store.put(loaded).unwrap_err();
        assert!(matches!(err, DeskError::ConcurrentModification { .. }));
        assert_eq!(store.get(&first.id).unwrap().description, "first, edited");

        let mut unknown = create_test_ticket("ghost");
        unknown.id = TicketId::new(99);
        assert!(matches!(
            store.put(unknown).unwrap_err(),
            DeskError::TicketNotFound { .. }
        ));
        assert!(matches!(
            store.get(&TicketId::new(99)).unwrap_err(),
            DeskError::TicketNotFound { .. }
        ));

        let all = store.scan(&PredicateSet::default()).expect("Failed to scan");
        let ids: Vec<_> = all.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        let alice = store.register("alice").expect("Failed to register agent");
        let bob = store.register("bob").expect("Failed to register agent");
        assert_ne!(alice.id, bob.id);
        assert!(matches!(
            store.register("alice").unwrap_err(),
            DeskError::AgentAlreadyExists { .. }
        ));
        assert_eq!(store.find_by_id(&bob.id).unwrap().name, "bob");
        assert_eq!(store.find_by_name("alice").unwrap(), alice);
        assert!(matches!(
            store.find_by_name("carol").unwrap_err(),
            DeskError::AgentNotFound { .. }
        ));
        assert_eq!(store.list_agents().unwrap(), vec![alice, bob]);
    }

    #[test]
    fn test_memory_store_contract() {
        check_store_contract(&MemoryStore::new());
    }

    #[test]
    fn test_file_storage_contract() {
        let temp_dir = TempDir::new().unwrap();
        check_store_contract(&file_storage(&temp_dir));
    }

    #[test]
    fn test_file_storage_scan_filters() {
        let temp_dir = TempDir::new().unwrap();
        let storage = file_storage(&temp_dir);

        let mut resolved = create_test_ticket("resolved");
        resolved.status = Status::Resolved;
        storage.put(create_test_ticket("new")).unwrap();
        storage.put(resolved).unwrap();

        let filter = TicketFilter {
            statuses: Some(vec![Status::Resolved]),
            ..Default::default()
        };
        let predicates = PredicateSet::from_filter(Some(&filter)).unwrap();
        let found = storage.scan(&predicates).expect("Failed to scan");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].description, "resolved");
    }

    #[test]
    fn test_file_storage_survives_reload() {
        let temp_dir = TempDir::new().unwrap();
        let saved = {
            let storage = file_storage(&temp_dir);
            let ticket = storage.put(create_test_ticket("persisted")).unwrap();
            let agent = storage.register("alice").unwrap();
            let mut assigned = ticket;
            assigned.status = Status::InProgress;
            assigned.assigned_agent = Some(agent);
            storage.put(assigned).unwrap()
        };

        let reopened = FileStorage::new(temp_dir.path().join(".ticket-desk"));
        let loaded = reopened.get(&saved.id).expect("Failed to reload ticket");
        assert_eq!(loaded.version, saved.version);
        assert_eq!(loaded.status, Status::InProgress);
        assert_eq!(loaded.assigned_agent_name(), Some("alice"));

        // Ids keep counting from where the previous session stopped.
        let next = reopened.put(create_test_ticket("after reload")).unwrap();
        assert_eq!(next.id, TicketId::new(2));
    }
}
