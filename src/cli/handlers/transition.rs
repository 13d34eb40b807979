//! Handlers that move a ticket along `NEW → IN_PROGRESS → RESOLVED → CLOSED`

use super::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::cli::utils::parse_ticket_id;
use crate::core::{AgentRef, Status, Ticket, TicketUpdate, is_blank};
use crate::error::{DeskError, Result};

/// Handler for the `assign` command; `agent` is an agent id or name
pub fn handle_assign(
    ticket: &str,
    agent: &str,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let ticket_id = parse_ticket_id(ticket)?;
    let Ok(agent_ref) = agent.parse::<AgentRef>();

    let ticket = ctx.service.assign_to(&ticket_id, &agent_ref)?;
    report(&ticket, formatter, |t| {
        format!(
            "Assigned ticket {} to {}",
            t.id,
            t.assigned_agent_name().unwrap_or_default()
        )
    })
}

pub fn handle_resolve(
    ticket: &str,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let ticket = ctx.service.resolve(&parse_ticket_id(ticket)?)?;
    report(&ticket, formatter, |t| format!("Resolved ticket {}", t.id))
}

/// Handler for the `close` command
///
/// With `--summary` the summary is recorded first, but only on a `RESOLVED`
/// ticket; in any other stage the close itself reports the state error. A
/// blank summary is rejected before anything is written.
pub fn handle_close(
    ticket: &str,
    summary: Option<&str>,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let ticket_id = parse_ticket_id(ticket)?;

    if let Some(summary) = summary {
        if ctx.service.get_by_id(&ticket_id)?.status == Status::Resolved {
            if is_blank(Some(summary)) {
                return Err(DeskError::MissingResolutionSummary);
            }
            ctx.service.update(
                &ticket_id,
                TicketUpdate {
                    resolution_summary: Some(summary.to_string()),
                    ..Default::default()
                },
            )?;
        }
    }

    let ticket = ctx.service.close(&ticket_id)?;
    report(&ticket, formatter, |t| format!("Closed ticket {}", t.id))
}

fn report(
    ticket: &Ticket,
    formatter: &OutputFormatter,
    message: impl FnOnce(&Ticket) -> String,
) -> Result<()> {
    if formatter.is_json() {
        formatter.print_ticket(ticket)
    } else {
        formatter.success(&message(ticket));
        Ok(())
    }
}
