//! Storage layer for budget-planner
//!
//! JSON file storage with atomic writes: reference catalogs, the budget list
//! and one file per draft, plus the audit log.

pub mod budgets;
pub mod catalog;
pub mod drafts;
pub mod file_io;
pub mod init;

pub use budgets::BudgetListRepository;
pub use catalog::Catalog;
pub use drafts::DraftRepository;
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::PlannerPaths;
use crate::error::PlannerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: PlannerPaths,
    pub catalog: Catalog,
    pub budgets: BudgetListRepository,
    pub drafts: DraftRepository,
    audit: AuditLogger,
    audit_enabled: bool,
}

impl Storage {
    /// Create a new Storage instance and load the catalogs and budget list
    pub fn new(paths: PlannerPaths) -> Result<Self, PlannerError> {
        paths.ensure_directories()?;

        let storage = Self {
            catalog: Catalog::new(paths.parents_file(), paths.entities_file()),
            budgets: BudgetListRepository::new(paths.budgets_file()),
            drafts: DraftRepository::new(paths.drafts_dir()),
            audit: AuditLogger::new(paths.audit_log()),
            audit_enabled: true,
            paths,
        };
        storage.load_all()?;
        Ok(storage)
    }

    /// Enable or disable audit logging
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    pub fn paths(&self) -> &PlannerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Reload everything from disk
    pub fn load_all(&self) -> Result<(), PlannerError> {
        self.catalog.load()?;
        self.budgets.load()?;
        Ok(())
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }

    fn record(&self, entry: AuditEntry) -> Result<(), PlannerError> {
        if self.audit_enabled {
            self.audit.log(&entry)
        } else {
            Ok(())
        }
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), PlannerError> {
        self.record(AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Log an update; the diff summary is derived from the two states
    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), PlannerError> {
        let diff = match (serde_json::to_value(before), serde_json::to_value(after)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.record(AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), PlannerError> {
        self.record(AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_submit<T: Serialize>(
        &self,
        entity_id: impl Into<String>,
        entity_name: Option<String>,
        result: &T,
        summary: impl Into<String>,
    ) -> Result<(), PlannerError> {
        self.record(AuditEntry::submit(entity_id, entity_name, result, summary))
    }
}
