//! Draft submission
//!
//! Turns a draft that passes validation into a row of the budget list.
//! Submitting for approval produces a `submitted` row, publishing produces
//! an `active` one.

use std::fmt;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    BudgetDraft, BudgetStatus, BudgetSummary, Entity, EntityId, EntityType, LineItem,
    ParentBudget,
};

use super::sizing::BudgetEvaluation;

/// What to do with a valid draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitAction {
    #[default]
    SubmitForApproval,
    Publish,
}

impl SubmitAction {
    /// Status of the resulting budget row
    pub fn resulting_status(&self) -> BudgetStatus {
        match self {
            Self::SubmitForApproval => BudgetStatus::Submitted,
            Self::Publish => BudgetStatus::Active,
        }
    }
}

impl fmt::Display for SubmitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SubmitForApproval => write!(f, "Submit for approval"),
            Self::Publish => write!(f, "Direct publish"),
        }
    }
}

/// Build the budget row for a draft.
///
/// Fails with `Validation` when the draft settings are inconsistent or it has
/// no name, and with `Submission` when any overflow check fails.
pub fn submit(
    draft: &BudgetDraft,
    parent: Option<&ParentBudget>,
    entities: &[Entity],
    action: SubmitAction,
) -> PlannerResult<BudgetSummary> {
    if draft.name.trim().is_empty() {
        return Err(PlannerError::Validation("Budget name cannot be empty".into()));
    }
    draft
        .validate()
        .map_err(|e| PlannerError::Validation(e.to_string()))?;

    let evaluation = BudgetEvaluation::evaluate(draft, parent);
    if !evaluation.can_submit() {
        return Err(PlannerError::Submission(evaluation.report.to_string()));
    }

    let status = action.resulting_status();
    let mut row = BudgetSummary::new(draft.name.trim(), status, evaluation.total_budget);
    row.period = draft.period;
    row.due_date = draft.end_date;
    fill_entity_columns(&mut row, draft.line_items.items(), entities);

    row.children = draft
        .line_items
        .items()
        .iter()
        .map(|item| {
            let mut child = BudgetSummary::new(item_label(item), status, item.amount);
            child.period = draft.period;
            child.due_date = draft.end_date;
            fill_entity_columns(&mut child, std::slice::from_ref(item), entities);
            child
        })
        .collect();

    Ok(row)
}

fn item_label(item: &LineItem) -> String {
    if item.name.trim().is_empty() {
        "Untitled line item".to_string()
    } else {
        item.name.trim().to_string()
    }
}

/// Fill the vendor/property/legal entity columns from the first linked
/// entity of each type found depth-first under `items`
fn fill_entity_columns(row: &mut BudgetSummary, items: &[LineItem], entities: &[Entity]) {
    let mut linked: Vec<EntityId> = Vec::new();
    collect_links(items, &mut linked);

    for id in linked {
        let Some(entity) = entities.iter().find(|e| e.id == id) else {
            continue;
        };
        let column = match entity.entity_type {
            EntityType::Vendor => &mut row.vendor,
            EntityType::Property => &mut row.property,
            EntityType::LegalEntity => &mut row.legal_entity,
        };
        if column.is_none() {
            *column = Some(entity.name.clone());
        }
    }
}

fn collect_links(items: &[LineItem], out: &mut Vec<EntityId>) {
    for item in items {
        out.extend(item.linked_entity_ids.iter().copied());
        collect_links(&item.children, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineItemTree, Money, SizingStrategy};

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    fn hardware_draft() -> BudgetDraft {
        let mut draft = BudgetDraft::new("Q4 IT infrastructure");
        draft.sizing_value = "300000".into();
        draft.set_line_items(LineItemTree::from_items(vec![
            LineItem::new()
                .named("Hardware Upgrades")
                .with_amount(units(150_000))
                .with_children(vec![LineItem::new().named("Servers").with_amount(units(100_000))]),
            LineItem::new().named("Software Licenses").with_amount(units(80_000)),
        ]));
        draft
    }

    #[test]
    fn test_submit_for_approval() {
        let draft = hardware_draft();
        let row = submit(&draft, None, &[], SubmitAction::SubmitForApproval).unwrap();

        assert_eq!(row.name, "Q4 IT infrastructure");
        assert_eq!(row.status, BudgetStatus::Submitted);
        assert_eq!(row.total_amount, units(300_000));
        assert_eq!(row.uncommitted, units(300_000));
        assert_eq!(row.children.len(), 2);
        assert_eq!(row.children[0].name, "Hardware Upgrades");
        assert_eq!(row.children[0].total_amount, units(150_000));
        assert_eq!(row.children[1].status, BudgetStatus::Submitted);
    }

    #[test]
    fn test_publish_creates_active_row() {
        let row = submit(&hardware_draft(), None, &[], SubmitAction::Publish).unwrap();
        assert_eq!(row.status, BudgetStatus::Active);
    }

    #[test]
    fn test_submit_blocked_by_overflow() {
        let mut draft = hardware_draft();
        draft.sizing_value = "200000".into();
        let err = submit(&draft, None, &[], SubmitAction::Publish).unwrap_err();
        assert!(matches!(err, PlannerError::Submission(_)));
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn test_submit_requires_name() {
        let mut draft = hardware_draft();
        draft.name = "  ".into();
        let err = submit(&draft, None, &[], SubmitAction::SubmitForApproval).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_percentage_without_parent_is_rejected() {
        let mut draft = hardware_draft();
        draft.sizing_strategy = SizingStrategy::Percentage;
        draft.sizing_value = "10".into();
        let err = submit(&draft, None, &[], SubmitAction::SubmitForApproval).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_sum_with_parent_uses_line_item_total() {
        let mut draft = hardware_draft();
        draft.sizing_strategy = SizingStrategy::Sum;
        let parent = ParentBudget::new("Technology Grant", units(22_000_000), units(18_000_000));
        draft.parent_budget_id = Some(parent.id);

        let row = submit(&draft, Some(&parent), &[], SubmitAction::Publish).unwrap();
        assert_eq!(row.total_amount, units(230_000));
    }

    #[test]
    fn test_entity_columns_from_links() {
        let apple = Entity::new("Apple Inc.", EntityType::Vendor);
        let office = Entity::new("Downtown Office", EntityType::Property);
        let google = Entity::new("Google LLC", EntityType::Vendor);

        let mut draft = BudgetDraft::new("Office refit");
        draft.sizing_value = "1000".into();
        let mut first = LineItem::new().named("Laptops").with_amount(units(600));
        first.linked_entity_ids = vec![apple.id, office.id];
        let mut second = LineItem::new().named("Cloud").with_amount(units(400));
        second.linked_entity_ids = vec![google.id];
        draft.set_line_items(LineItemTree::from_items(vec![first, second]));

        let entities = vec![apple, office, google];
        let row = submit(&draft, None, &entities, SubmitAction::SubmitForApproval).unwrap();

        assert_eq!(row.vendor.as_deref(), Some("Apple Inc."));
        assert_eq!(row.property.as_deref(), Some("Downtown Office"));
        assert_eq!(row.legal_entity, None);
        assert_eq!(row.children[1].vendor.as_deref(), Some("Google LLC"));
    }
}
