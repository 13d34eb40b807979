//! Test utilities for ticket-desk
//!
//! Common fixtures shared by unit tests across the crate.

#![cfg(test)]

use crate::config::PROJECT_DIR_NAME;
use crate::core::{Agent, AgentId, Status, Ticket};
use crate::engine::TicketService;
use crate::storage::{AgentRegistry, FileStorage, TicketStore};
use chrono::{DateTime, Duration, TimeZone, Utc};
use once_cell::sync::Lazy;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Fixed instant test tickets are created at, so date filters are deterministic
pub static BASE_TIME: Lazy<DateTime<Utc>> =
    Lazy::new(|| Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap());

/// Test fixture for a temporary, initialized project
pub struct TestProject {
    pub temp_dir: TempDir,
    pub project_root: PathBuf,
    pub storage: Arc<FileStorage>,
}

impl TestProject {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let project_root = temp_dir.path().to_path_buf();

        let storage = Arc::new(FileStorage::new(project_root.join(PROJECT_DIR_NAME)));
        storage
            .init("test-project", false)
            .expect("Failed to initialize project");

        Self {
            temp_dir,
            project_root,
            storage,
        }
    }

    /// A project holding one ticket in each status
    pub fn with_sample_tickets() -> Self {
        TestDataBuilder::new()
            .with_ticket("Printer on floor 3 is jammed", Status::New)
            .with_ticket("VPN drops every hour", Status::InProgress)
            .with_ticket("Cannot log in to payroll", Status::Resolved)
            .with_ticket("Monitor flickers", Status::Closed)
            .build_in_project()
    }

    pub fn root(&self) -> &Path {
        &self.project_root
    }

    pub fn root_str(&self) -> &str {
        self.project_root.to_str().expect("Invalid path")
    }

    pub fn data_dir(&self) -> PathBuf {
        self.project_root.join(PROJECT_DIR_NAME)
    }

    pub fn service(&self) -> TicketService<FileStorage, FileStorage> {
        TicketService::with_storage(Arc::clone(&self.storage))
    }

    /// Stores a fresh `NEW` ticket
    pub fn create_ticket(&self, description: &str) -> Ticket {
        self.storage
            .put(create_test_ticket(description, Status::New))
            .expect("Failed to save ticket")
    }

    pub fn add_agent(&self, name: &str) -> Agent {
        self.storage.register(name).expect("Failed to register agent")
    }
}

/// Builds an unsaved ticket whose fields are consistent with `status`
///
/// Tickets past `NEW` are assigned to agent 1 "alice"; resolved and closed
/// ones carry a resolution summary.
pub fn create_test_ticket(description: &str, status: Status) -> Ticket {
    let mut ticket = Ticket::new(description, *BASE_TIME);
    ticket.status = status;

    if status != Status::New {
        ticket.assigned_agent = Some(Agent::new(AgentId::new(1), "alice"));
    }
    if matches!(status, Status::Resolved | Status::Closed) {
        ticket.resolution_summary = Some(format!("Fixed: {description}"));
    }
    if status == Status::Closed {
        ticket.closed_at = Some(*BASE_TIME + Duration::hours(4));
    }

    ticket
}

/// Test data builder for multi-ticket scenarios
pub struct TestDataBuilder {
    tickets: Vec<Ticket>,
}

impl TestDataBuilder {
    pub fn new() -> Self {
        Self {
            tickets: Vec::new(),
        }
    }

    pub fn with_ticket(mut self, description: &str, status: Status) -> Self {
        self.tickets.push(create_test_ticket(description, status));
        self
    }

    /// Adds a ticket created `days` days after [`BASE_TIME`]
    pub fn with_ticket_on_day(mut self, description: &str, days: i64) -> Self {
        let mut ticket = create_test_ticket(description, Status::New);
        ticket.created_at = *BASE_TIME + Duration::days(days);
        self.tickets.push(ticket);
        self
    }

    pub fn with_tickets_in_status(mut self, status: Status, count: usize) -> Self {
        for i in 1..=count {
            self.tickets
                .push(create_test_ticket(&format!("{status} ticket {i}"), status));
        }
        self
    }

    pub fn build(self) -> Vec<Ticket> {
        self.tickets
    }

    /// Saves the tickets, in order, to a new test project
    pub fn build_in_project(self) -> TestProject {
        let project = TestProject::new();

        for ticket in self.tickets {
            project.storage.put(ticket).expect("Failed to save ticket");
        }

        project
    }
}

/// Macro for quickly creating test tickets
#[macro_export]
macro_rules! test_ticket {
    ($description:expr) => {
        $crate::test_utils::create_test_ticket($description, $crate::core::Status::New)
    };
    ($description:expr, $status:expr) => {
        $crate::test_utils::create_test_ticket($description, $status)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::PredicateSet;

    #[test]
    fn test_project_creation() {
        let project = TestProject::new();
        assert!(project.data_dir().exists());
        assert!(project.storage.is_initialized());
    }

    #[test]
    fn test_project_with_sample_tickets() {
        let project = TestProject::with_sample_tickets();
        let tickets = project.storage.scan(&PredicateSet::default()).unwrap();

        assert_eq!(tickets.len(), 4);
        assert_eq!(tickets[3].status, Status::Closed);
    }

    #[test]
    fn test_data_builder() {
        let tickets = TestDataBuilder::new()
            .with_ticket("Bug fix", Status::New)
            .with_tickets_in_status(Status::InProgress, 2)
            .build();

        assert_eq!(tickets.len(), 3);
        assert_eq!(tickets[0].description, "Bug fix");
        assert_eq!(tickets[1].status, Status::InProgress);
        assert!(tickets[1].assigned_agent.is_some());
    }

    #[test]
    fn test_ticket_macro() {
        let ticket = test_ticket!("Fan noise", Status::Resolved);
        assert_eq!(ticket.status, Status::Resolved);
        assert!(ticket.resolution_summary.is_some());
    }
}
