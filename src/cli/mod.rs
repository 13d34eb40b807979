//! Command line front end for the `desk` binary

pub mod handlers;
pub mod output;
pub mod utils;

pub use output::OutputFormatter;

use clap::{Parser, Subcommand};

/// Track support tickets from NEW to CLOSED
#[derive(Parser, Debug)]
#[command(name = "desk", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project directory (defaults to the current directory)
    #[arg(short = 'C', long, global = true, env = "TICKET_DESK_PROJECT")]
    pub project: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a ticket project in the current directory
    Init {
        /// Project name
        #[arg(short, long)]
        name: Option<String>,

        /// Reinitialize an existing project
        #[arg(short, long)]
        force: bool,
    },

    /// Open a new ticket
    New {
        /// What is wrong
        description: String,
    },

    /// Assign a NEW ticket to an agent
    Assign {
        /// Ticket id
        ticket: String,

        /// Agent id or name
        agent: String,
    },

    /// Mark an IN_PROGRESS ticket as resolved
    Resolve {
        /// Ticket id
        ticket: String,
    },

    /// Close a RESOLVED ticket
    Close {
        /// Ticket id
        ticket: String,

        /// Record a resolution summary before closing
        #[arg(short, long)]
        summary: Option<String>,
    },

    /// Edit the description or resolution summary of an open ticket
    Edit {
        /// Ticket id
        ticket: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Resolution summary
        #[arg(short, long)]
        summary: Option<String>,
    },

    /// Show a ticket
    Show {
        /// Ticket id
        ticket: String,
    },

    /// List tickets
    List {
        /// Comma-separated statuses (new, in_progress, resolved, closed)
        #[arg(short, long)]
        status: Option<String>,

        /// Created on or after (YYYY-MM-DD, RFC 3339, today, yesterday)
        #[arg(long)]
        since: Option<String>,

        /// Created on or before (YYYY-MM-DD, RFC 3339, today, yesterday)
        #[arg(long)]
        until: Option<String>,

        /// Assigned agent name
        #[arg(short, long)]
        agent: Option<String>,
    },

    /// Manage agents
    Agent {
        #[command(subcommand)]
        command: AgentCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AgentCommands {
    /// Register an agent
    Add {
        /// Unique agent name
        name: String,
    },

    /// List registered agents
    List,
}
