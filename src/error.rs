//! Error types for ticket-desk
//!
//! Every failure surfaces as a [`DeskError`]. Callers that only care about the
//! category of a failure (for example a transport layer mapping errors to
//! status codes) should match on [`DeskError::kind`] instead of the variant.

use crate::core::{AgentId, TicketId};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, DeskError>;

pub const TICKET_NOT_FOUND: &str = "Ticket not found!";
pub const AGENT_NOT_FOUND: &str = "Agent not found!";
pub const MISSING_DESCRIPTION: &str = "Description is missing!";
pub const MISSING_RESOLUTION_SUMMARY: &str = "Resolution summary is missing!";
pub const START_DATE_AFTER_END_DATE: &str = "Start date cannot be after end date";
pub const ONLY_NEW_CAN_BE_ASSIGNED: &str = "Only NEW tickets can be assigned to an agent.";
pub const ONLY_IN_PROGRESS_CAN_BE_RESOLVED: &str = "Only IN_PROGRESS tickets can be resolved.";
pub const ONLY_RESOLVED_CAN_BE_CLOSED: &str = "Only RESOLVED tickets can be closed!";
pub const CLOSED_CANNOT_BE_UPDATED: &str = "Closed tickets cannot be updated!";

/// Category of a [`DeskError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFoundTicket,
    NotFoundAgent,
    InvalidStateTransition,
    MissingDescription,
    MissingResolutionSummary,
    InvalidDateRange,
    /// A write lost a version race against another writer
    Conflict,
    /// Malformed caller input outside the lifecycle rules
    InvalidInput,
    /// Project layout, locking and I/O failures
    Storage,
    Configuration,
}

/// Main error type for ticket-desk operations
#[derive(Error, Debug)]
pub enum DeskError {
    #[error("Ticket not found! (id: {id})")]
    TicketNotFound { id: TicketId },

    #[error("Agent not found! ({agent})")]
    AgentNotFound { agent: String },

    #[error("{message}")]
    InvalidStateTransition { message: String },

    #[error("Description is missing!")]
    MissingDescription,

    #[error("Resolution summary is missing!")]
    MissingResolutionSummary,

    #[error("Start date cannot be after end date ({start} > {end})")]
    InvalidDateRange {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("Ticket {id} was modified concurrently")]
    ConcurrentModification { id: TicketId },

    #[error("Agent '{name}' already exists")]
    AgentAlreadyExists { name: String },

    #[error("Timed out waiting for lock on {resource}")]
    LockTimeout { resource: String },

    #[error("Project not initialized. Run 'desk init' first")]
    ProjectNotInitialized,

    #[error("Project already initialized at {path}")]
    ProjectAlreadyInitialized { path: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("{0}")]
    Custom(String),
}

impl DeskError {
    /// Create a custom error with the given message
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidStateTransition {
            message: message.into(),
        }
    }

    pub fn agent_not_found(agent: &AgentId) -> Self {
        Self::AgentNotFound {
            agent: format!("id: {agent}"),
        }
    }

    pub fn agent_name_not_found(name: &str) -> Self {
        Self::AgentNotFound {
            agent: format!("name: {name}"),
        }
    }

    /// Category of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TicketNotFound { .. } => ErrorKind::NotFoundTicket,
            Self::AgentNotFound { .. } => ErrorKind::NotFoundAgent,
            Self::InvalidStateTransition { .. } => ErrorKind::InvalidStateTransition,
            Self::MissingDescription => ErrorKind::MissingDescription,
            Self::MissingResolutionSummary => ErrorKind::MissingResolutionSummary,
            Self::InvalidDateRange { .. } => ErrorKind::InvalidDateRange,
            Self::ConcurrentModification { .. } => ErrorKind::Conflict,
            Self::AgentAlreadyExists { .. } | Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Config(_) => ErrorKind::Configuration,
            Self::LockTimeout { .. }
            | Self::ProjectNotInitialized
            | Self::ProjectAlreadyInitialized { .. }
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Json(_)
            | Self::Custom(_) => ErrorKind::Storage,
        }
    }

    /// Message suitable for showing to a user
    pub fn user_message(&self) -> String {
        match self {
            Self::TicketNotFound { id } => format!("{TICKET_NOT_FOUND} No ticket with id {id}"),
            Self::Io(e) => format!("File operation failed: {e}"),
            _ => self.to_string(),
        }
    }

    /// Hints for correcting the failed call
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TicketNotFound { .. } => {
                vec!["Run 'desk list' to see existing tickets".to_string()]
            },
            Self::AgentNotFound { .. } => vec![
                "Run 'desk agent list' to see registered agents".to_string(),
                "Register the agent with 'desk agent add <name>'".to_string(),
            ],
            Self::MissingResolutionSummary => vec![
                "Add a summary with 'desk edit <ticket> --summary <text>'".to_string(),
                "Or pass '--summary' to 'desk close'".to_string(),
            ],
            Self::InvalidDateRange { .. } => {
                vec!["Swap the --since and --until values".to_string()]
            },
            Self::ProjectNotInitialized => {
                vec!["Run 'desk init' in the project directory".to_string()]
            },
            Self::ProjectAlreadyInitialized { .. } => {
                vec!["Use 'desk init --force' to reinitialize".to_string()]
            },
            Self::LockTimeout { .. } | Self::ConcurrentModification { .. } => {
                vec!["Another process is writing; retry the command".to_string()]
            },
            _ => Vec::new(),
        }
    }

    /// Whether retrying the same call later may succeed
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ConcurrentModification { .. } | Self::LockTimeout { .. }
        )
    }

    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_error_kinds() {
        assert_eq!(
            DeskError::TicketNotFound { id: TicketId::from(3) }.kind(),
            ErrorKind::NotFoundTicket
        );
        assert_eq!(
            DeskError::agent_not_found(&AgentId::from(9)).kind(),
            ErrorKind::NotFoundAgent
        );
        assert_eq!(
            DeskError::invalid_state(CLOSED_CANNOT_BE_UPDATED).kind(),
            ErrorKind::InvalidStateTransition
        );
        assert_eq!(DeskError::MissingDescription.kind(), ErrorKind::MissingDescription);
        assert_eq!(
            DeskError::MissingResolutionSummary.kind(),
            ErrorKind::MissingResolutionSummary
        );
    }

    #[test]
    fn test_messages_carry_reason() {
        let err = DeskError::invalid_state(ONLY_RESOLVED_CAN_BE_CLOSED);
        assert_eq!(err.to_string(), "Only RESOLVED tickets can be closed!");

        let err = DeskError::agent_name_not_found("alice");
        assert_eq!(err.to_string(), "Agent not found! (name: alice)");
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(DeskError::ConcurrentModification { id: TicketId::from(1) }.is_recoverable());
        assert!(!DeskError::MissingDescription.is_recoverable());
        assert!(!DeskError::ProjectNotInitialized.suggestions().is_empty());
    }
}
