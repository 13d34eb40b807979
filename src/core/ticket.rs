use super::Agent;
use crate::error::{DeskError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Store-assigned ticket identifier
///
/// [`TicketId::UNASSIGNED`] marks a ticket that has not been stored yet; the
/// store replaces it with the next free id on the first `put`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(u64);

impl TicketId {
    pub const UNASSIGNED: Self = Self(0);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn is_unassigned(self) -> bool {
        self.0 == 0
    }

    /// Parse an id as typed by a user, with or without a leading `#`
    pub fn parse_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        match digits.parse::<u64>() {
            Ok(0) | Err(_) => Err(DeskError::InvalidInput(format!(
                "'{s}' is not a ticket id"
            ))),
            Ok(value) => Ok(Self(value)),
        }
    }
}

impl From<u64> for TicketId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lifecycle stage of a ticket
///
/// Stages only ever advance one step at a time along
/// `NEW -> IN_PROGRESS -> RESOLVED -> CLOSED`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    #[default]
    New,
    InProgress,
    Resolved,
    Closed,
}

impl Status {
    pub const ALL: [Self; 4] = [Self::New, Self::InProgress, Self::Resolved, Self::Closed];

    /// The only stage reachable from this one
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::New => Some(Self::InProgress),
            Self::InProgress => Some(Self::Resolved),
            Self::Resolved => Some(Self::Closed),
            Self::Closed => None,
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Closed => "CLOSED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "new" => Ok(Self::New),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            "closed" => Ok(Self::Closed),
            _ => Err(DeskError::InvalidInput(format!(
                "Invalid status: {s}. Must be one of: new, in_progress, resolved, closed"
            ))),
        }
    }
}

/// A support ticket
///
/// Two tickets are the same entity when their ids are equal; the remaining
/// fields are mutable state and take no part in equality or hashing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub description: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    pub resolution_summary: Option<String>,
    pub assigned_agent: Option<Agent>,
    /// Bumped by the store on every successful write
    #[serde(default)]
    pub version: u64,
}

impl Ticket {
    /// Creates an unstored ticket in the `NEW` stage
    #[must_use]
    pub fn new(description: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: TicketId::UNASSIGNED,
            description: description.into(),
            status: Status::New,
            created_at,
            closed_at: None,
            resolution_summary: None,
            assigned_agent: None,
            version: 0,
        }
    }

    #[must_use]
    pub fn assigned_agent_name(&self) -> Option<&str> {
        self.assigned_agent.as_ref().map(|a| a.name.as_str())
    }
}

impl PartialEq for Ticket {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Ticket {}

impl Hash for Ticket {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
