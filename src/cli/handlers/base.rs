//! Shared setup for command handlers
//!
//! Every handler that touches an existing project goes through
//! [`HandlerContext`], which locates the data directory, layers the
//! configuration and wires the file store into the lifecycle engine.

use crate::config::{Config, find_project_dir};
use crate::engine::TicketService;
use crate::error::{DeskError, Result};
use crate::storage::FileStorage;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Resources needed by handlers operating on an initialized project
pub struct HandlerContext {
    pub data_dir: PathBuf,
    pub config: Config,
    pub storage: Arc<FileStorage>,
    pub service: TicketService<FileStorage, FileStorage>,
}

impl HandlerContext {
    /// Opens the project containing `project_dir`, or the current directory
    pub fn new(project_dir: Option<&str>) -> Result<Self> {
        let start = match project_dir {
            Some(dir) => PathBuf::from(dir),
            None => env::current_dir()?,
        };
        Self::open(&start)
    }

    pub fn open(start: &Path) -> Result<Self> {
        let data_dir = find_project_dir(start).ok_or(DeskError::ProjectNotInitialized)?;
        let config = Config::load(Some(&data_dir))?;

        let storage = Arc::new(
            FileStorage::new(&data_dir).with_lock_options(config.storage.lock_options()),
        );
        if !storage.is_initialized() {
            return Err(DeskError::ProjectNotInitialized);
        }
        tracing::debug!("Opened project at {}", data_dir.display());

        let service = TicketService::with_storage(Arc::clone(&storage))
            .with_write_retries(config.storage.write_retries);

        Ok(Self {
            data_dir,
            config,
            storage,
            service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestProject;
    use tempfile::TempDir;

    #[test]
    fn test_handler_context_initialization() {
        let project = TestProject::new();
        let context = HandlerContext::new(Some(project.root_str()));

        assert!(context.is_ok());
        assert_eq!(context.unwrap().data_dir, project.data_dir());
    }

    #[test]
    fn test_handler_context_from_subdirectory() {
        let project = TestProject::new();
        let nested = project.root().join("src").join("deep");
        std::fs::create_dir_all(&nested).unwrap();

        let context = HandlerContext::open(&nested).unwrap();
        assert_eq!(context.data_dir, project.data_dir());
    }

    #[test]
    fn test_handler_context_requires_project() {
        let temp_dir = TempDir::new().unwrap();
        let result = HandlerContext::open(temp_dir.path());

        assert!(matches!(result, Err(DeskError::ProjectNotInitialized)));
    }
}
