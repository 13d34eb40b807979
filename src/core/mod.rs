//! Core data types: tickets, agents and the option structs used to create,
//! edit and filter tickets.

mod agent;
mod requests;
mod ticket;

pub use agent::{Agent, AgentId, AgentRef};
pub use requests::{NewTicket, TicketFilter, TicketUpdate};
pub use ticket::{Status, Ticket, TicketId};

/// Returns true when the text is missing or only whitespace
pub(crate) fn is_blank(text: Option<&str>) -> bool {
    text.is_none_or(|t| t.trim().is_empty())
}
