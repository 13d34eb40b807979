use super::lock::{FileLock, LockOptions};
use super::memory::validate_agent_name;
use super::repository::{AgentDirectory, AgentRegistry, TicketStore};
use crate::core::{Agent, AgentId, Ticket, TicketId};
use crate::error::{DeskError, Result};
use crate::filter::PredicateSet;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const TICKETS_DIR: &str = "tickets";
const STATE_FILE: &str = "state.yaml";
const AGENTS_FILE: &str = "agents.yaml";

/// Project-wide bookkeeping persisted next to the tickets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectState {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub next_ticket_id: u64,
    pub next_agent_id: u64,
}

impl ProjectState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            next_ticket_id: 1,
            next_agent_id: 1,
        }
    }
}

/// YAML-file storage rooted at a `.ticket-desk` directory
///
/// Layout: `state.yaml`, `agents.yaml` and one `tickets/<id>.yaml` per
/// ticket. Writers serialize through lock files next to the data they touch.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_dir: PathBuf,
    lock_options: LockOptions,
}

impl FileStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            lock_options: LockOptions::default(),
        }
    }

    #[must_use]
    pub const fn with_lock_options(mut self, lock_options: LockOptions) -> Self {
        self.lock_options = lock_options;
        self
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.base_dir.join(STATE_FILE).exists()
    }

    /// Creates the directory layout and a fresh project state
    ///
    /// Reinitializing with `force` resets the state file but keeps existing
    /// tickets; the id counter resumes after the highest stored id.
    pub fn init(&self, name: &str, force: bool) -> Result<ProjectState> {
        if self.is_initialized() && !force {
            return Err(DeskError::ProjectAlreadyInitialized {
                path: self.base_dir.display().to_string(),
            });
        }

        self.ensure_directories()?;
        let _lock = self.lock("state")?;

        let mut state = ProjectState::new(name);
        state.next_ticket_id = self.highest_ticket_id()? + 1;
        state.next_agent_id = self
            .load_agents()?
            .iter()
            .map(|a| a.id.value())
            .max()
            .unwrap_or(0)
            + 1;
        self.save_state(&state)?;

        tracing::info!("Initialized project '{}' at {}", name, self.base_dir.display());
        Ok(state)
    }

    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(self.base_dir.join(TICKETS_DIR))?;
        Ok(())
    }

    pub fn load_state(&self) -> Result<ProjectState> {
        if !self.is_initialized() {
            return Err(DeskError::ProjectNotInitialized);
        }
        read_yaml(&self.base_dir.join(STATE_FILE))
    }

    pub fn save_state(&self, state: &ProjectState) -> Result<()> {
        write_yaml(&self.base_dir.join(STATE_FILE), state)
    }

    fn ticket_path(&self, id: &TicketId) -> PathBuf {
        self.base_dir
            .join(TICKETS_DIR)
            .join(format!("{}.yaml", id.value()))
    }

    fn lock(&self, name: &str) -> Result<FileLock> {
        if !self.base_dir.exists() {
            return Err(DeskError::ProjectNotInitialized);
        }
        FileLock::acquire(
            self.base_dir.join(format!("{name}.lock")),
            &self.lock_options,
        )
    }

    fn lock_ticket(&self, id: &TicketId) -> Result<FileLock> {
        FileLock::acquire(
            self.base_dir
                .join(TICKETS_DIR)
                .join(format!("{}.lock", id.value())),
            &self.lock_options,
        )
    }

    fn load_ticket(&self, id: &TicketId) -> Result<Ticket> {
        match fs::read_to_string(self.ticket_path(id)) {
            Ok(content) => Ok(serde_yaml::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(DeskError::TicketNotFound { id: *id })
            },
            Err(e) => Err(e.into()),
        }
    }

    fn load_all_tickets(&self) -> Result<Vec<Ticket>> {
        let dir = self.base_dir.join(TICKETS_DIR);
        if !dir.exists() {
            return Err(DeskError::ProjectNotInitialized);
        }

        let mut tickets = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                tickets.push(read_yaml::<Ticket>(&path)?);
            }
        }
        tickets.sort_by_key(|t| t.id);
        Ok(tickets)
    }

    fn highest_ticket_id(&self) -> Result<u64> {
        Ok(self
            .load_all_tickets()?
            .last()
            .map_or(0, |t| t.id.value()))
    }

    fn load_agents(&self) -> Result<Vec<Agent>> {
        let path = self.base_dir.join(AGENTS_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_yaml(&path)
    }
}

impl TicketStore for FileStorage {
    fn get(&self, id: &TicketId) -> Result<Ticket> {
        tracing::debug!("Loading ticket {}", id);
        self.load_ticket(id)
    }

    fn put(&self, mut ticket: Ticket) -> Result<Ticket> {
        if ticket.id.is_unassigned() {
            let _lock = self.lock("state")?;
            let mut state = self.load_state()?;
            ticket.id = TicketId::new(state.next_ticket_id);
            ticket.version = 1;
            state.next_ticket_id += 1;
            // The counter moves first: a failed ticket write leaves a gap,
            // never an id that a later insert would reuse.
            self.save_state(&state)?;
            write_yaml(&self.ticket_path(&ticket.id), &ticket)?;
            return Ok(ticket);
        }

        let _lock = self.lock_ticket(&ticket.id)?;
        let stored = self.load_ticket(&ticket.id)?;
        if stored.version != ticket.version {
            return Err(DeskError::ConcurrentModification { id: ticket.id });
        }
        ticket.version += 1;
        write_yaml(&self.ticket_path(&ticket.id), &ticket)?;
        Ok(ticket)
    }

    fn scan(&self, predicates: &PredicateSet) -> Result<Vec<Ticket>> {
        let tickets = self.load_all_tickets()?;
        Ok(tickets.into_iter().filter(|t| predicates.matches(t)).collect())
    }
}

impl AgentDirectory for FileStorage {
    fn find_by_id(&self, id: &AgentId) -> Result<Agent> {
        self.load_agents()?
            .into_iter()
            .find(|a| a.id == *id)
            .ok_or_else(|| DeskError::agent_not_found(id))
    }

    fn find_by_name(&self, name: &str) -> Result<Agent> {
        self.load_agents()?
            .into_iter()
            .find(|a| a.name == name)
            .ok_or_else(|| DeskError::agent_name_not_found(name))
    }
}

impl AgentRegistry for FileStorage {
    fn register(&self, name: &str) -> Result<Agent> {
        let name = validate_agent_name(name)?;
        let _lock = self.lock("state")?;

        let mut agents = self.load_agents()?;
        if agents.iter().any(|a| a.name == name) {
            return Err(DeskError::AgentAlreadyExists {
                name: name.to_string(),
            });
        }

        let mut state = self.load_state()?;
        let agent = Agent::new(AgentId::new(state.next_agent_id), name);
        state.next_agent_id += 1;
        agents.push(agent.clone());

        write_yaml(&self.base_dir.join(AGENTS_FILE), &agents)?;
        self.save_state(&state)?;
        tracing::info!("Registered agent '{}' ({})", agent.name, agent.id);
        Ok(agent)
    }

    fn list_agents(&self) -> Result<Vec<Agent>> {
        let mut agents = self.load_agents()?;
        agents.sort_by_key(|a| a.id);
        Ok(agents)
    }
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}

/// Writes through a temporary file so readers never see a partial document
fn write_yaml<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let content = serde_yaml::to_string(value)?;
    let tmp = path.with_extension("yaml.tmp");
    fs::write(&tmp, content)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_twice_requires_force() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join(".ticket-desk"));

        storage.init("desk", false).expect("Failed to init");
        assert!(matches!(
            storage.init("desk", false).unwrap_err(),
            DeskError::ProjectAlreadyInitialized { .. }
        ));
        storage.init("renamed", true).expect("Forced init should succeed");
        assert_eq!(storage.load_state().unwrap().name, "renamed");
    }

    #[test]
    fn test_failed_insert_never_reuses_its_id() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join(".ticket-desk"));
        storage.init("desk", false).unwrap();

        // A directory where the first ticket file should go makes its write fail.
        let blocker = storage.base_dir().join("tickets").join("1.yaml");
        fs::create_dir_all(blocker.join("occupied")).unwrap();
        assert!(storage.put(Ticket::new("lost", Utc::now())).is_err());
        assert_eq!(storage.load_state().unwrap().next_ticket_id, 2);

        fs::remove_dir_all(&blocker).unwrap();
        let next = storage.put(Ticket::new("kept", Utc::now())).unwrap();
        assert_eq!(next.id, TicketId::new(2));
        assert!(matches!(
            storage.get(&TicketId::new(1)).unwrap_err(),
            DeskError::TicketNotFound { .. }
        ));
    }

    #[test]
    fn test_forced_init_keeps_id_sequence() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join(".ticket-desk"));
        storage.init("desk", false).unwrap();
        storage.put(Ticket::new("one", Utc::now())).unwrap();
        storage.put(Ticket::new("two", Utc::now())).unwrap();

        let state = storage.init("desk", true).unwrap();
        assert_eq!(state.next_ticket_id, 3);
    }

    #[test]
    fn test_uninitialized_storage() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join(".ticket-desk"));

        assert!(!storage.is_initialized());
        assert!(matches!(
            storage.put(Ticket::new("orphan", Utc::now())).unwrap_err(),
            DeskError::ProjectNotInitialized
        ));
        assert!(matches!(
            storage.scan(&PredicateSet::default()).unwrap_err(),
            DeskError::ProjectNotInitialized
        ));
    }

    #[test]
    fn test_ticket_file_layout() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::new(temp_dir.path().join(".ticket-desk"));
        storage.init("desk", false).unwrap();

        let ticket = storage.put(Ticket::new("Printer jam", Utc::now())).unwrap();
        let path = storage.base_dir().join("tickets").join("1.yaml");
        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("description: Printer jam"));
        assert!(content.contains("status: NEW"));
        assert_eq!(ticket.id, TicketId::new(1));
    }
}
