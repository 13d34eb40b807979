use crate::cli::output::OutputFormatter;
use crate::config::{CONFIG_FILE_NAME, Config, PROJECT_DIR_NAME};
use crate::error::Result;
use crate::storage::FileStorage;
use std::env;
use std::path::PathBuf;

/// Handler for the `init` command
///
/// Creates `.ticket-desk/` in the target directory with an empty ticket
/// store and a project config. Existing tickets survive `--force`.
pub fn handle_init(
    name: Option<&str>,
    force: bool,
    project_dir: Option<&str>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let root = match project_dir {
        Some(dir) => PathBuf::from(dir),
        None => env::current_dir()?,
    };
    let data_dir = root.join(PROJECT_DIR_NAME);

    let project_name = name.map_or_else(
        || {
            root.file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("ticket-desk")
                .to_string()
        },
        str::to_string,
    );

    let storage = FileStorage::new(&data_dir);
    let reinitializing = storage.is_initialized();
    let state = storage.init(&project_name, force)?;
    if reinitializing {
        formatter.warning("Reinitialized existing project; stored tickets and agents were kept");
    }

    let config_path = data_dir.join(CONFIG_FILE_NAME);
    if force || !config_path.exists() {
        let mut config = Config::default();
        config.project.name.clone_from(&project_name);
        config.save(&config_path)?;
    }

    if formatter.is_json() {
        formatter.print_json(&serde_json::json!({
            "status": "success",
            "project": state.name,
            "path": data_dir,
        }))?;
    } else {
        formatter.success(&format!(
            "Initialized ticket project '{}' in {}",
            project_name,
            data_dir.display()
        ));
        formatter.info("Next: register an agent with 'desk agent add <name>'");
    }

    Ok(())
}
