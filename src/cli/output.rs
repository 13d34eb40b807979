use crate::config::is_valid_date_format;
use crate::core::{Agent, Ticket};
use crate::error::Result;
use colored::Colorize;
use serde_json::Value;

/// Writes command results either as colored text or as JSON
#[derive(Debug, Clone, Default)]
pub struct OutputFormatter {
    json: bool,
    date_format: Option<String>,
}

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

impl OutputFormatter {
    pub fn new(json: bool, no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self {
            json,
            date_format: None,
        }
    }

    /// Uses `date_format` for timestamps; a format chrono cannot render is
    /// ignored and the default kept
    #[must_use]
    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        let date_format = date_format.into();
        if is_valid_date_format(&date_format) {
            self.date_format = Some(date_format);
        } else {
            tracing::warn!("Ignoring invalid date format '{}'", date_format);
        }
        self
    }

    pub const fn is_json(&self) -> bool {
        self.json
    }

    pub fn success(&self, message: &str) {
        if !self.json {
            println!("{} {}", "✓".green().bold(), message);
        }
    }

    pub fn info(&self, message: &str) {
        if !self.json {
            println!("{message}");
        }
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", "warning:".yellow().bold(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "error:".red().bold(), message);
    }

    pub fn print_json(&self, value: &Value) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Prints JSON regardless of the output mode
    pub fn json(&self, value: &Value) -> Result<()> {
        self.print_json(value)
    }

    pub fn print_ticket(&self, ticket: &Ticket) -> Result<()> {
        if self.json {
            return self.print_json(&serde_json::to_value(ticket)?);
        }

        println!("{} {}", ticket.id.to_string().bold(), ticket.description);
        println!("  Status:     {}", self.status_label(ticket));
        println!("  Created:    {}", self.format_date(ticket.created_at));
        if let Some(closed_at) = ticket.closed_at {
            println!("  Closed:     {}", self.format_date(closed_at));
        }
        if let Some(agent) = &ticket.assigned_agent {
            println!("  Agent:      {} ({})", agent.name, agent.id);
        }
        if let Some(summary) = &ticket.resolution_summary {
            println!("  Resolution: {summary}");
        }
        Ok(())
    }

    pub fn print_tickets(&self, tickets: &[Ticket]) -> Result<()> {
        if self.json {
            return self.print_json(&serde_json::json!({
                "tickets": tickets,
                "count": tickets.len(),
            }));
        }

        if tickets.is_empty() {
            self.info("No tickets found");
            return Ok(());
        }

        println!(
            "{:<6} {:<12} {:<17} {:<12} {}",
            "ID".bold(),
            "STATUS".bold(),
            "CREATED".bold(),
            "AGENT".bold(),
            "DESCRIPTION".bold()
        );
        for ticket in tickets {
            println!(
                "{:<6} {:<12} {:<17} {:<12} {}",
                ticket.id.to_string(),
                self.status_label(ticket),
                self.format_date(ticket.created_at),
                ticket.assigned_agent_name().unwrap_or("-"),
                ticket.description
            );
        }
        Ok(())
    }

    pub fn print_agents(&self, agents: &[Agent]) -> Result<()> {
        if self.json {
            return self.print_json(&serde_json::json!({ "agents": agents }));
        }

        if agents.is_empty() {
            self.info("No agents registered");
            return Ok(());
        }
        for agent in agents {
            println!("{:<6} {}", agent.id, agent.name);
        }
        Ok(())
    }

    fn status_label(&self, ticket: &Ticket) -> String {
        use crate::core::Status;

        let label = format!("{:<12}", ticket.status.as_str());
        match ticket.status {
            Status::New => label.cyan().to_string(),
            Status::InProgress => label.yellow().to_string(),
            Status::Resolved => label.green().to_string(),
            Status::Closed => label.dimmed().to_string(),
        }
    }

    fn format_date(&self, at: chrono::DateTime<chrono::Utc>) -> String {
        at.format(self.date_format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT))
            .to_string()
    }
}
