//! desk - support ticket tracking from the command line
//!
//! Parses arguments, sets up logging and dispatches to the command handlers.

use clap::Parser;
use std::path::Path;
use std::process;
use ticket_desk::cli::handlers::{
    ListArgs, handle_agent_add, handle_agent_list, handle_assign, handle_close, handle_edit,
    handle_init, handle_list, handle_new, handle_resolve, handle_show,
};
use ticket_desk::cli::{AgentCommands, Cli, Commands, OutputFormatter};
use ticket_desk::config::{Config, UiConfig, find_project_dir};
use ticket_desk::error::{DeskError, Result};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let ui = load_ui_config(cli.project.as_deref());
    let formatter = OutputFormatter::new(cli.json, cli.no_color || !ui.color);

    if let Err(e) = dispatch_command(cli.command, cli.project.as_deref(), &formatter) {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

/// Logs go to stderr so `--json` output stays parseable
///
/// `--verbose` forces debug level; otherwise `RUST_LOG` applies, defaulting
/// to warnings only.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Reads only the display settings; handlers report configuration errors
fn load_ui_config(project: Option<&str>) -> UiConfig {
    let loaded = match project {
        Some(dir) => Config::load(find_project_dir(Path::new(dir)).as_deref()),
        None => Config::load_or_default(),
    };
    loaded.map(|config| config.ui).unwrap_or_default()
}

fn dispatch_command(
    command: Commands,
    project: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    match command {
        Commands::Init { name, force } => handle_init(name.as_deref(), force, project, formatter),
        Commands::New { description } => handle_new(&description, project, formatter),
        Commands::Assign { ticket, agent } => handle_assign(&ticket, &agent, project, formatter),
        Commands::Resolve { ticket } => handle_resolve(&ticket, project, formatter),
        Commands::Close { ticket, summary } => {
            handle_close(&ticket, summary.as_deref(), project, formatter)
        },
        Commands::Edit {
            ticket,
            description,
            summary,
        } => handle_edit(&ticket, description, summary, project, formatter),
        Commands::Show { ticket } => handle_show(&ticket, project, formatter),
        Commands::List {
            status,
            since,
            until,
            agent,
        } => handle_list(
            &ListArgs {
                status,
                since,
                until,
                agent,
            },
            project,
            formatter,
        ),
        Commands::Agent { command } => match command {
            AgentCommands::Add { name } => handle_agent_add(&name, project, formatter),
            AgentCommands::List => handle_agent_list(project, formatter),
        },
    }
}

/// Handle errors with user-friendly messages and suggestions
fn handle_error(error: &DeskError, formatter: &OutputFormatter) {
    // In JSON mode, output error as JSON
    if formatter.is_json() {
        let _ = formatter.json(&serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "kind": format!("{:?}", error.kind()),
            "suggestions": error.suggestions(),
            "recoverable": error.is_recoverable(),
            "is_config_error": error.is_config_error(),
        }));
        return;
    }

    formatter.error(&error.user_message());

    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        eprintln!("\nSuggestions:");
        for suggestion in &suggestions {
            eprintln!("  • {suggestion}");
        }
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        eprintln!("\nDebug information:");
        eprintln!("{error:?}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let _cli = Cli::parse_from(["desk", "init"]);
        let _cli = Cli::parse_from(["desk", "list", "--status", "new,resolved"]);
        let _cli = Cli::parse_from(["desk", "new", "Printer is jammed"]);
        let _cli = Cli::parse_from(["desk", "--json", "agent", "add", "alice"]);
    }

    #[test]
    fn test_close_summary_flag() {
        let cli = Cli::parse_from(["desk", "close", "3", "--summary", "Rebooted"]);
        match cli.command {
            Commands::Close { ticket, summary } => {
                assert_eq!(ticket, "3");
                assert_eq!(summary.as_deref(), Some("Rebooted"));
            },
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
