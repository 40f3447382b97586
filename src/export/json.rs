//! JSON export of a draft
//!
//! A draft export bundles the draft, its resolved parent budget and the
//! evaluation at export time. Only the draft is read back on import; the
//! evaluation is always recomputed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{BudgetDraft, ParentBudget};
use crate::services::BudgetEvaluation;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: u32 = 1;

/// A draft with its context, as written to disk
#[derive(Debug, Clone, Serialize)]
pub struct DraftExport {
    pub schema_version: u32,
    pub exported_at: DateTime<Utc>,
    pub app_version: String,
    pub draft: BudgetDraft,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentBudget>,
    pub evaluation: BudgetEvaluation,
}

impl DraftExport {
    pub fn new(draft: &BudgetDraft, parent: Option<&ParentBudget>) -> Self {
        Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            draft: draft.clone(),
            parent: parent.cloned(),
            evaluation: BudgetEvaluation::evaluate(draft, parent),
        }
    }
}

/// The importable part of an export
#[derive(Debug, Deserialize)]
pub(crate) struct DraftImport {
    pub schema_version: u32,
    pub draft: BudgetDraft,
}

impl DraftImport {
    pub(crate) fn into_draft(self) -> PlannerResult<BudgetDraft> {
        if self.schema_version > EXPORT_SCHEMA_VERSION {
            return Err(PlannerError::Validation(format!(
                "Export schema version {} is newer than supported version {}",
                self.schema_version, EXPORT_SCHEMA_VERSION
            )));
        }
        Ok(self.draft)
    }
}

/// Write a draft export as pretty-printed JSON
pub fn export_draft_json<W: Write>(export: &DraftExport, writer: &mut W) -> PlannerResult<()> {
    serde_json::to_writer_pretty(&mut *writer, export)
        .map_err(|e| PlannerError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| PlannerError::Export(e.to_string()))?;
    Ok(())
}

/// Read the draft back from a JSON export
pub fn import_draft_json(json: &str) -> PlannerResult<BudgetDraft> {
    let import: DraftImport = serde_json::from_str(json)?;
    import.into_draft()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineItem, LineItemTree, Money, SizingStrategy};

    fn sample() -> (BudgetDraft, ParentBudget) {
        let parent = ParentBudget::new(
            "Technology Grant",
            Money::from_units(22_000_000),
            Money::from_units(18_000_000),
        );
        let mut draft = BudgetDraft::new("IT infrastructure upgrade");
        draft.parent_budget_id = Some(parent.id);
        draft.sizing_strategy = SizingStrategy::Sum;
        draft.set_line_items(LineItemTree::from_items(vec![
            LineItem::new().named("Servers").with_amount(Money::from_units(100_000)),
        ]));
        (draft, parent)
    }

    #[test]
    fn test_export_contains_evaluation() {
        let (draft, parent) = sample();
        let export = DraftExport::new(&draft, Some(&parent));

        let mut output = Vec::new();
        export_draft_json(&export, &mut output).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();

        assert_eq!(value["schema_version"], 1);
        assert_eq!(value["parent"]["name"], "Technology Grant");
        assert_eq!(value["evaluation"]["total_budget"], 10_000_000);
        assert_eq!(value["evaluation"]["report"]["ceiling_exceeded"], false);
    }

    #[test]
    fn test_import_returns_draft() {
        let (draft, parent) = sample();
        let mut output = Vec::new();
        export_draft_json(&DraftExport::new(&draft, Some(&parent)), &mut output).unwrap();

        let imported = import_draft_json(std::str::from_utf8(&output).unwrap()).unwrap();
        assert_eq!(imported, draft);
    }

    #[test]
    fn test_newer_schema_rejected() {
        let (draft, _) = sample();
        let json = serde_json::json!({"schema_version": 99, "draft": draft}).to_string();
        assert!(import_draft_json(&json).unwrap_err().is_validation());
    }
}
