//! User settings for budget-planner
//!
//! Manages defaults applied to new drafts (currency, fiscal period, fiscal
//! year), display preferences and whether changes are written to the audit log.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::paths::PlannerPaths;
use crate::error::PlannerError;
use crate::models::{Currency, FiscalPeriod};

/// User settings for budget-planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency for new drafts
    #[serde(default)]
    pub default_currency: Currency,

    /// Fiscal period for new drafts
    #[serde(default)]
    pub default_period: FiscalPeriod,

    /// Year used to resolve fiscal period date ranges
    #[serde(default = "default_fiscal_year")]
    pub fiscal_year: i32,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Whether draft and budget changes are written to the audit log
    #[serde(default = "default_audit_enabled")]
    pub audit_enabled: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_fiscal_year() -> i32 {
    chrono::Local::now().year()
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_audit_enabled() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            default_currency: Currency::default(),
            default_period: FiscalPeriod::default(),
            fiscal_year: default_fiscal_year(),
            date_format: default_date_format(),
            audit_enabled: default_audit_enabled(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &PlannerPaths) -> Result<Self, PlannerError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                PlannerError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                PlannerError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Not persisted until the caller saves
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &PlannerPaths) -> Result<(), PlannerError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            PlannerError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(paths.settings_file(), contents).map_err(|e| {
            PlannerError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }

    /// Format a date with the configured format
    pub fn format_date(&self, date: chrono::NaiveDate) -> String {
        date.format(&self.date_format).to_string()
    }
}
