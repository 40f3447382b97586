//! Path management for budget-planner
//!
//! ## Path Resolution Order
//!
//! 1. `BUDGET_PLANNER_DATA_DIR` environment variable (if set)
//! 2. The platform config directory for `budget-planner`
//!    (`~/.config/budget-planner` on Linux, `%APPDATA%` on Windows,
//!    `~/Library/Application Support` on macOS)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::PlannerError;

/// Environment variable overriding the base directory
pub const DATA_DIR_ENV: &str = "BUDGET_PLANNER_DATA_DIR";

/// Manages all paths used by budget-planner
#[derive(Debug, Clone)]
pub struct PlannerPaths {
    /// Base directory for all budget-planner data
    base_dir: PathBuf,
}

impl PlannerPaths {
    /// Create a new PlannerPaths instance
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, PlannerError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create PlannerPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Get the data directory (<base>/data/)
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    /// Get the directory holding one JSON file per draft
    pub fn drafts_dir(&self) -> PathBuf {
        self.data_dir().join("drafts")
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the audit log
    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    /// Get the path to parents.json (parent budgets)
    pub fn parents_file(&self) -> PathBuf {
        self.data_dir().join("parents.json")
    }

    /// Get the path to entities.json (vendors, properties, legal entities)
    pub fn entities_file(&self) -> PathBuf {
        self.data_dir().join("entities.json")
    }

    /// Get the path to budgets.json (the budget list)
    pub fn budgets_file(&self) -> PathBuf {
        self.data_dir().join("budgets.json")
    }

    /// Ensure all required directories exist
    pub fn ensure_directories(&self) -> Result<(), PlannerError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| PlannerError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.drafts_dir())
            .map_err(|e| PlannerError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if budget-planner has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

fn resolve_default_path() -> Result<PathBuf, PlannerError> {
    ProjectDirs::from("", "", "budget-planner")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| PlannerError::Config("Could not determine home directory".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            paths.drafts_dir(),
            temp_dir.path().join("data").join("drafts")
        );
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        let custom_path = temp_dir.path().to_str().unwrap();

        env::set_var(DATA_DIR_ENV, custom_path);
        let paths = PlannerPaths::new().unwrap();
        env::remove_var(DATA_DIR_ENV);

        assert_eq!(paths.base_dir(), temp_dir.path());
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().join("planner"));

        paths.ensure_directories().unwrap();

        assert!(paths.data_dir().exists());
        assert!(paths.drafts_dir().exists());
        assert!(!paths.is_initialized());
    }

    #[test]
    fn test_file_paths() {
        let temp_dir = TempDir::new().unwrap();
        let paths = PlannerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.audit_log(), temp_dir.path().join("audit.log"));
        assert_eq!(
            paths.parents_file(),
            temp_dir.path().join("data").join("parents.json")
        );
        assert_eq!(
            paths.budgets_file(),
            temp_dir.path().join("data").join("budgets.json")
        );
    }
}
