use super::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload for creating a ticket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTicket {
    pub description: String,
}

impl NewTicket {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// In-place edit of a ticket; `None` leaves the field as it is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketUpdate {
    pub description: Option<String>,
    pub resolution_summary: Option<String>,
}

impl TicketUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.description.is_none() && self.resolution_summary.is_none()
    }
}

/// Listing criteria; every field is optional and absent fields do not filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketFilter {
    pub statuses: Option<Vec<Status>>,
    /// Inclusive lower bound on the creation timestamp
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the creation timestamp
    pub end_date: Option<DateTime<Utc>>,
    pub assigned_agent_name: Option<String>,
}
