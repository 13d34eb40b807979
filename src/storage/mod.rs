//! Ticket and agent persistence
//!
//! The lifecycle engine only depends on the [`TicketStore`] and
//! [`AgentDirectory`] traits. Two implementations ship with the crate:
//! [`MemoryStore`] for embedding and tests, and [`FileStorage`], which keeps
//! one YAML file per ticket under a `.ticket-desk` directory.

mod file;
mod lock;
mod memory;
mod repository;

pub use file::{FileStorage, ProjectState};
pub use lock::{FileLock, LockOptions};
pub use memory::MemoryStore;
pub use repository::{AgentDirectory, AgentRegistry, Repository, TicketStore};

#[cfg(test)]
pub use repository::{MockAgentDirectory, MockTicketStore};
