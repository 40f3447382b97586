//! Budget list repository
//!
//! Manages loading and saving the budget table rows to budgets.json. Row
//! order is the table's natural (unsorted) order; new rows are appended.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PlannerError;
use crate::models::BudgetSummary;

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct BudgetData {
    pub budgets: Vec<BudgetSummary>,
}

/// Repository for the budget list
pub struct BudgetListRepository {
    path: PathBuf,
    data: RwLock<Vec<BudgetSummary>>,
}

impl BudgetListRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Vec::new()),
        }
    }

    pub fn load(&self) -> Result<(), PlannerError> {
        let file_data: BudgetData = read_json(&self.path)?;
        let mut data = self.data.write().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        *data = file_data.budgets;
        Ok(())
    }

    pub fn save(&self) -> Result<(), PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        write_json_atomic(
            &self.path,
            &BudgetData {
                budgets: data.clone(),
            },
        )
    }

    /// All rows in natural order
    pub fn get_all(&self) -> Result<Vec<BudgetSummary>, PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.clone())
    }

    /// Append a row to the end of the list
    pub fn append(&self, budget: BudgetSummary) -> Result<(), PlannerError> {
        let mut data = self.data.write().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        data.push(budget);
        Ok(())
    }

    /// Find a top-level row by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<BudgetSummary>, PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name.trim()))
            .cloned())
    }

    pub fn count(&self) -> Result<usize, PlannerError> {
        let data = self.data.read().map_err(|e| {
            PlannerError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}
