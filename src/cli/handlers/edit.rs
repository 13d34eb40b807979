use super::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::cli::utils::parse_ticket_id;
use crate::core::TicketUpdate;
use crate::error::{DeskError, Result};

/// Handler for the `edit` command
pub fn handle_edit(
    ticket: &str,
    description: Option<String>,
    summary: Option<String>,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let update = TicketUpdate {
        description,
        resolution_summary: summary,
    };
    if update.is_empty() {
        return Err(DeskError::InvalidInput(
            "Nothing to update. Pass --description or --summary".to_string(),
        ));
    }

    let ctx = HandlerContext::new(project_dir)?;
    let ticket = ctx.service.update(&parse_ticket_id(ticket)?, update)?;

    if formatter.is_json() {
        formatter.print_ticket(&ticket)
    } else {
        formatter.success(&format!("Updated ticket {}", ticket.id));
        Ok(())
    }
}
