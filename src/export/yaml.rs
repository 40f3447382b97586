//! YAML export of a draft
//!
//! Same content as the JSON export, with a short comment header.

use std::io::Write;

use crate::error::{PlannerError, PlannerResult};
use crate::export::json::{DraftExport, DraftImport};
use crate::models::BudgetDraft;

/// Write a draft export as YAML
pub fn export_draft_yaml<W: Write>(export: &DraftExport, writer: &mut W) -> PlannerResult<()> {
    let header = format!(
        "# budget-planner draft export\n# Draft: {}\n# Generated: {}\n\n",
        export.draft.name, export.exported_at
    );
    writer
        .write_all(header.as_bytes())
        .map_err(|e| PlannerError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, export).map_err(|e| PlannerError::Export(e.to_string()))?;
    Ok(())
}

/// Read the draft back from a YAML export
pub fn import_draft_yaml(yaml: &str) -> PlannerResult<BudgetDraft> {
    let import: DraftImport = serde_yaml::from_str(yaml)?;
    import.into_draft()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Contingency, ContingencyType, CostType, LineItem, LineItemTree, Money,
    };

    #[test]
    fn test_yaml_export_and_import() {
        let mut draft = BudgetDraft::new("Office renovation project");
        draft.sizing_value = "75000".into();
        draft.soft_contingency = Contingency::enabled(ContingencyType::Fixed, 2_500.0);
        draft.set_line_items(LineItemTree::from_items(vec![
            LineItem::new()
                .named("Design fees")
                .with_amount(Money::from_units(15_000))
                .with_cost_type(Some(CostType::Soft)),
            LineItem::new()
                .named("Construction")
                .with_amount(Money::from_units(50_000))
                .with_cost_type(Some(CostType::Hard)),
        ]));

        let mut output = Vec::new();
        export_draft_yaml(&DraftExport::new(&draft, None), &mut output).unwrap();
        let text = String::from_utf8(output).unwrap();

        assert!(text.starts_with("# budget-planner draft export"));
        assert!(text.contains("Office renovation project"));
        assert!(text.contains("cost_type: soft"));

        let imported = import_draft_yaml(&text).unwrap();
        assert_eq!(imported, draft);
    }

    #[test]
    fn test_invalid_yaml() {
        let err = import_draft_yaml("draft: [unterminated").unwrap_err();
        assert!(matches!(err, PlannerError::Yaml(_)));
    }
}
