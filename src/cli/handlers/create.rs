use super::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::core::NewTicket;
use crate::error::Result;

/// Handler for the `new` command
pub fn handle_new(
    description: &str,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let ticket = ctx.service.create(NewTicket::new(description))?;

    if formatter.is_json() {
        formatter.print_ticket(&ticket)
    } else {
        formatter.success(&format!("Created ticket {}: {}", ticket.id, ticket.description));
        Ok(())
    }
}
