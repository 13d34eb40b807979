//! ticket-desk - support ticket lifecycle tracking
//!
//! Tickets walk a strict linear lifecycle, `NEW → IN_PROGRESS → RESOLVED →
//! CLOSED`, driven by [`TicketService`]. Listing goes through a predicate
//! builder that turns an optional [`TicketFilter`](core::TicketFilter) into a
//! conjunction of checks evaluated by the store.

// Allow missing error documentation for internal implementations
#![allow(clippy::missing_errors_doc)]
// Allow some pedantic lints that don't improve code quality
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::map_unwrap_or)]

//! # Concurrent Safety
//!
//! Every write carries the version it was read at. Stores refuse stale
//! writes and the engine re-runs the whole operation on fresh state, so two
//! racing `assign` calls on one `NEW` ticket cannot both succeed. The file
//! store additionally serializes writers through lock files that are cleaned
//! up automatically.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ticket_desk::core::{NewTicket, Status};
//! use ticket_desk::storage::{AgentRegistry, MemoryStore};
//! use ticket_desk::TicketService;
//!
//! # fn main() -> ticket_desk::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let alice = store.register("alice")?;
//! let service = TicketService::with_storage(Arc::clone(&store));
//!
//! let ticket = service.create(NewTicket::new("Printer is jammed"))?;
//! let ticket = service.assign(&ticket.id, &alice.id)?;
//! assert_eq!(ticket.status, Status::InProgress);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod error;
pub mod filter;
pub mod storage;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use engine::TicketService;
pub use error::{DeskError, ErrorKind, Result};
