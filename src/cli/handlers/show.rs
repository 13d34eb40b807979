use super::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::cli::utils::parse_ticket_id;
use crate::error::Result;

pub fn handle_show(
    ticket: &str,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let ticket = ctx.service.get_by_id(&parse_ticket_id(ticket)?)?;

    formatter
        .clone()
        .with_date_format(&ctx.config.ui.date_format)
        .print_ticket(&ticket)
}
