use super::HandlerContext;
use crate::cli::output::OutputFormatter;
use crate::error::Result;
use crate::storage::AgentRegistry;

pub fn handle_agent_add(
    name: &str,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    let agent = ctx.storage.register(name)?;

    if formatter.is_json() {
        formatter.print_json(&serde_json::to_value(&agent)?)
    } else {
        formatter.success(&format!("Registered agent '{}' with id {}", agent.name, agent.id));
        Ok(())
    }
}

pub fn handle_agent_list(project_dir: Option<&str>, formatter: &OutputFormatter) -> Result<()> {
    let ctx = HandlerContext::new(project_dir)?;
    formatter.print_agents(&ctx.storage.list_agents()?)
}
