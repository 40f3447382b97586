//! Export module for budget-planner
//!
//! - CSV: the budget list with totals (spreadsheet-compatible)
//! - JSON: a draft with its parent budget and evaluation
//! - YAML: the same draft export in human-readable form

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_budget_list_csv;
pub use json::{export_draft_json, import_draft_json, DraftExport, EXPORT_SCHEMA_VERSION};
pub use yaml::{export_draft_yaml, import_draft_yaml};
