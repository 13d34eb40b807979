//! Command handlers
//!
//! Each handler parses its string arguments, runs one engine operation
//! through a [`HandlerContext`] and reports the result through the
//! [`OutputFormatter`](crate::cli::OutputFormatter).

mod agent;
mod base;
mod create;
mod edit;
mod init;
mod list;
mod show;
mod transition;

pub use agent::{handle_agent_add, handle_agent_list};
pub use base::HandlerContext;
pub use create::handle_new;
pub use edit::handle_edit;
pub use init::handle_init;
pub use list::{ListArgs, handle_list};
pub use show::handle_show;
pub use transition::{handle_assign, handle_close, handle_resolve};
