use super::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::cli::utils::{DateBound, parse_date_bound, parse_statuses};
use crate::core::TicketFilter;
use crate::error::Result;

/// Raw `list` arguments as typed on the command line
#[derive(Debug, Default)]
pub struct ListArgs {
    pub status: Option<String>,
    pub since: Option<String>,
    pub until: Option<String>,
    pub agent: Option<String>,
}

impl ListArgs {
    /// Parses the arguments into a filter; bare dates cover whole days
    pub fn to_filter(&self) -> Result<TicketFilter> {
        Ok(TicketFilter {
            statuses: self.status.as_deref().map(parse_statuses).transpose()?,
            start_date: self
                .since
                .as_deref()
                .map(|s| parse_date_bound(s, DateBound::Start))
                .transpose()?,
            end_date: self
                .until
                .as_deref()
                .map(|s| parse_date_bound(s, DateBound::End))
                .transpose()?,
            assigned_agent_name: self.agent.clone(),
        })
    }
}

/// Handler for the `list` command
pub fn handle_list(
    args: &ListArgs,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let filter = args.to_filter()?;
    let ctx = HandlerContext::new(project_dir)?;
    let tickets = ctx.service.list(Some(&filter))?;

    formatter
        .clone()
        .with_date_format(&ctx.config.ui.date_format)
        .print_tickets(&tickets)
}
