//! Budget sizing and validation
//!
//! Derives a budget's effective total from its sizing strategy, adds soft and
//! hard contingencies, measures overflow against the parent budget, and
//! decides whether the budget may be submitted. Everything here is a pure
//! function of its inputs; callers own error display and submission gating.

use serde::Serialize;
use std::fmt;

use crate::models::{
    clamp_percent, parse_amount, parse_percent, BudgetDraft, Contingency, ContingencyType, CostSplit,
    LineItemTree, Money, ParentBudget, SizingStrategy,
};

/// Effective total budget for a sizing strategy.
///
/// - `Fixed`: the sizing value as an amount (zero when unparsable)
/// - `Percentage`: the sizing value as a percentage of the parent's total;
///   zero without a parent or with an empty value
/// - `Sum`: the top-level line item total
pub fn compute_total_budget(
    strategy: SizingStrategy,
    sizing_value: &str,
    parent: Option<&ParentBudget>,
    items: &LineItemTree,
) -> Money {
    match strategy {
        SizingStrategy::Fixed => parse_amount(sizing_value),
        SizingStrategy::Percentage => match parent {
            Some(parent) if !sizing_value.trim().is_empty() => {
                parent.amount.percent(parse_percent(sizing_value))
            }
            _ => Money::zero(),
        },
        SizingStrategy::Sum => items.top_level_total(),
    }
}

/// Contingency amount for a value against its cost bucket.
///
/// Percentages scale against `base_costs` (soft costs for the soft
/// contingency, hard costs for the hard one) and are limited to `0..=100`;
/// fixed values are whole units.
pub fn compute_contingency(kind: ContingencyType, value: f64, base_costs: Money) -> Money {
    match kind {
        ContingencyType::Percentage => base_costs.percent(clamp_percent(value)),
        ContingencyType::Fixed => Money::from_units_f64(value),
    }
}

/// Contingency amount, or zero when the contingency is disabled
pub fn contingency_amount(contingency: &Contingency, base_costs: Money) -> Money {
    if contingency.enabled {
        compute_contingency(contingency.kind, contingency.value, base_costs)
    } else {
        Money::zero()
    }
}

/// Headroom left after sizing this budget; negative means overflow.
///
/// With a parent budget the check is against the parent's unallocated
/// capacity:
/// - `Fixed` compares the committed total itself, not the line items
/// - `Percentage` compares the requested share of the parent
/// - `Sum` compares line items plus contingencies
///
/// Without a parent the total budget is compared against line items plus
/// contingencies.
pub fn compute_budget_overflow(
    items: &LineItemTree,
    total_budget: Money,
    strategy: SizingStrategy,
    parent: Option<&ParentBudget>,
    soft: &Contingency,
    hard: &Contingency,
    sizing_value: &str,
) -> Money {
    let split = items.cost_split();
    let total_with_contingencies = items.top_level_total()
        + contingency_amount(soft, split.soft)
        + contingency_amount(hard, split.hard);

    match (strategy, parent) {
        (SizingStrategy::Fixed, Some(parent)) => parent.available - total_budget,
        (SizingStrategy::Percentage, Some(parent)) => {
            parent.available - parent.amount.percent(parse_percent(sizing_value))
        }
        (SizingStrategy::Sum, Some(parent)) => parent.available - total_with_contingencies,
        (_, None) => total_budget - total_with_contingencies,
    }
}

/// The independent checks that gate submission.
///
/// `budget_overflow` and `ceiling_exceeded` overlap for some strategies but
/// trigger under different conditions, so both are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ValidationReport {
    /// Some node's children exceed its own amount
    pub negative_line_item_overflow: bool,
    /// The budget-level overflow is negative (not checked for a parentless sum budget)
    pub budget_overflow: bool,
    /// The line item total exceeds the ceiling implied by the strategy
    pub ceiling_exceeded: bool,
}

impl ValidationReport {
    /// Whether submission must be blocked
    pub fn has_errors(&self) -> bool {
        self.negative_line_item_overflow || self.budget_overflow || self.ceiling_exceeded
    }

    /// Human-readable descriptions of the failing checks
    pub fn problems(&self) -> Vec<&'static str> {
        let mut problems = Vec::new();
        if self.negative_line_item_overflow {
            problems.push("line items exceed their parent item's amount");
        }
        if self.budget_overflow {
            problems.push("budget exceeds the available amount");
        }
        if self.ceiling_exceeded {
            problems.push("line item total exceeds the allocated budget");
        }
        problems
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_errors() {
            write!(f, "{}", self.problems().join("; "))
        } else {
            write!(f, "no validation errors")
        }
    }
}

/// Run the three submission checks
pub fn validate(
    items: &LineItemTree,
    strategy: SizingStrategy,
    overflow: Money,
    parent: Option<&ParentBudget>,
    sizing_value: &str,
) -> ValidationReport {
    let line_items_total = items.top_level_total();
    let budget_overflow_applies = parent.is_some() || strategy != SizingStrategy::Sum;

    let ceiling_exceeded = match (strategy, parent) {
        (SizingStrategy::Fixed, _) => line_items_total > parse_amount(sizing_value),
        (SizingStrategy::Percentage, Some(parent)) => {
            line_items_total > parent.amount.percent(parse_percent(sizing_value))
        }
        (SizingStrategy::Sum, Some(parent)) => line_items_total > parent.available,
        (SizingStrategy::Percentage | SizingStrategy::Sum, None) => false,
    };

    ValidationReport {
        negative_line_item_overflow: items.has_negative_overflow(),
        budget_overflow: budget_overflow_applies && overflow.is_negative(),
        ceiling_exceeded,
    }
}

/// Boolean shorthand for `validate(..).has_errors()`
pub fn has_validation_errors(
    items: &LineItemTree,
    strategy: SizingStrategy,
    overflow: Money,
    parent: Option<&ParentBudget>,
    sizing_value: &str,
) -> bool {
    validate(items, strategy, overflow, parent, sizing_value).has_errors()
}

/// Every derived figure for a draft, recomputed from scratch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetEvaluation {
    pub total_budget: Money,
    pub line_items_total: Money,
    pub cost_split: CostSplit,
    pub soft_contingency: Money,
    pub hard_contingency: Money,
    pub total_with_contingencies: Money,
    pub overflow: Money,
    pub total_negative_overflow: Money,
    pub has_nested_items: bool,
    pub report: ValidationReport,
}

impl BudgetEvaluation {
    /// Evaluate a draft against its (already resolved) parent budget
    pub fn evaluate(draft: &BudgetDraft, parent: Option<&ParentBudget>) -> Self {
        let items = &draft.line_items;
        let strategy = draft.sizing_strategy;
        let value = draft.sizing_value.as_str();

        let total_budget = compute_total_budget(strategy, value, parent, items);
        let cost_split = items.cost_split();
        let soft_contingency = contingency_amount(&draft.soft_contingency, cost_split.soft);
        let hard_contingency = contingency_amount(&draft.hard_contingency, cost_split.hard);
        let line_items_total = items.top_level_total();

        let overflow = compute_budget_overflow(
            items,
            total_budget,
            strategy,
            parent,
            &draft.soft_contingency,
            &draft.hard_contingency,
            value,
        );

        Self {
            total_budget,
            line_items_total,
            cost_split,
            soft_contingency,
            hard_contingency,
            total_with_contingencies: line_items_total + soft_contingency + hard_contingency,
            overflow,
            total_negative_overflow: items.total_negative_overflow(),
            has_nested_items: items.has_any_nested_items(),
            report: validate(items, strategy, overflow, parent, value),
        }
    }

    /// Whether the submit and publish actions are enabled
    pub fn can_submit(&self) -> bool {
        !self.report.has_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CostType, LineItem};

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    fn family_trust() -> ParentBudget {
        ParentBudget::new("Johnson Family Trust", units(50_000_000), units(40_000_000))
    }

    fn philanthropy_fund() -> ParentBudget {
        ParentBudget::new("Philanthropy Fund", units(10_000_000), units(8_000_000))
    }

    fn tree(amounts: &[(i64, Option<CostType>)]) -> LineItemTree {
        LineItemTree::from_items(
            amounts
                .iter()
                .map(|(a, c)| LineItem::new().with_amount(units(*a)).with_cost_type(*c))
                .collect(),
        )
    }

    #[test]
    fn test_fixed_total() {
        let items = LineItemTree::new();
        assert_eq!(
            compute_total_budget(SizingStrategy::Fixed, "45000000", None, &items),
            units(45_000_000)
        );
        assert_eq!(
            compute_total_budget(SizingStrategy::Fixed, "", None, &items),
            Money::zero()
        );
    }

    #[test]
    fn test_percentage_of_parent() {
        let parent = philanthropy_fund();
        let items = LineItemTree::new();
        assert_eq!(
            compute_total_budget(SizingStrategy::Percentage, "20", Some(&parent), &items),
            units(2_000_000)
        );
        assert_eq!(
            compute_total_budget(SizingStrategy::Percentage, "", Some(&parent), &items),
            Money::zero()
        );
        assert_eq!(
            compute_total_budget(SizingStrategy::Percentage, "20", None, &items),
            Money::zero()
        );
    }

    #[test]
    fn test_sum_total() {
        let items = tree(&[(300, None), (700, Some(CostType::Hard))]);
        assert_eq!(
            compute_total_budget(SizingStrategy::Sum, "ignored", None, &items),
            units(1000)
        );
    }

    #[test]
    fn test_contingency_kinds() {
        assert_eq!(
            compute_contingency(ContingencyType::Percentage, 10.0, units(5000)),
            units(500)
        );
        assert_eq!(
            compute_contingency(ContingencyType::Fixed, 2500.0, units(5000)),
            units(2500)
        );
        let disabled = Contingency {
            enabled: false,
            ..Contingency::enabled(ContingencyType::Fixed, 100.0)
        };
        assert_eq!(contingency_amount(&disabled, units(5000)), Money::zero());
    }

    #[test]
    fn test_percentages_limited_to_hundred() {
        let parent = philanthropy_fund();
        let items = LineItemTree::new();
        assert_eq!(
            compute_total_budget(SizingStrategy::Percentage, "150", Some(&parent), &items),
            parent.amount
        );
        assert_eq!(
            compute_total_budget(SizingStrategy::Percentage, "-20", Some(&parent), &items),
            Money::zero()
        );
        assert_eq!(
            compute_contingency(ContingencyType::Percentage, 250.0, units(5000)),
            units(5000)
        );
        assert_eq!(
            compute_contingency(ContingencyType::Percentage, -10.0, units(5000)),
            Money::zero()
        );
    }

    #[test]
    fn test_huge_items_still_exceed_ceiling() {
        let huge = parse_amount("90000000000000000");
        let items = LineItemTree::from_items(vec![
            LineItem::new().with_amount(huge),
            LineItem::new().with_amount(huge),
        ]);
        assert!(items.top_level_total() > huge);

        let report = validate(&items, SizingStrategy::Fixed, Money::zero(), None, "1000");
        assert!(report.ceiling_exceeded);
        assert!(report.has_errors());
    }

    #[test]
    fn test_fixed_with_parent_checks_total_against_available() {
        let parent = family_trust();
        let items = tree(&[(1000, None)]);
        let total = compute_total_budget(SizingStrategy::Fixed, "45000000", Some(&parent), &items);
        let overflow = compute_budget_overflow(
            &items,
            total,
            SizingStrategy::Fixed,
            Some(&parent),
            &Contingency::default(),
            &Contingency::default(),
            "45000000",
        );
        assert_eq!(overflow, units(-5_000_000));
        assert!(has_validation_errors(
            &items,
            SizingStrategy::Fixed,
            overflow,
            Some(&parent),
            "45000000"
        ));
    }

    #[test]
    fn test_fixed_with_parent_ignores_contingencies() {
        let parent = family_trust();
        let items = tree(&[(1000, Some(CostType::Soft))]);
        let soft = Contingency::enabled(ContingencyType::Fixed, 1_000_000_000.0);
        let overflow = compute_budget_overflow(
            &items,
            units(1000),
            SizingStrategy::Fixed,
            Some(&parent),
            &soft,
            &Contingency::default(),
            "1000",
        );
        assert_eq!(overflow, units(40_000_000 - 1000));
    }

    #[test]
    fn test_percentage_with_parent_overflow() {
        let parent = philanthropy_fund();
        let items = tree(&[(500, None)]);
        let overflow = compute_budget_overflow(
            &items,
            units(9_000_000),
            SizingStrategy::Percentage,
            Some(&parent),
            &Contingency::default(),
            &Contingency::default(),
            "90",
        );
        assert_eq!(overflow, units(8_000_000 - 9_000_000));
    }

    #[test]
    fn test_sum_with_parent_includes_contingencies() {
        let parent = ParentBudget::new("Community Outreach", units(12_000), units(10_000));
        let items = tree(&[(6000, Some(CostType::Soft)), (3000, Some(CostType::Hard))]);
        let soft = Contingency::enabled(ContingencyType::Percentage, 10.0);
        let hard = Contingency::enabled(ContingencyType::Fixed, 500.0);
        let overflow = compute_budget_overflow(
            &items,
            units(9000),
            SizingStrategy::Sum,
            Some(&parent),
            &soft,
            &hard,
            "",
        );
        // 10_000 - (9000 + 600 + 500)
        assert_eq!(overflow, units(-100));
    }

    #[test]
    fn test_no_parent_compares_total_to_line_items() {
        let items = tree(&[(800, None)]);
        let overflow = compute_budget_overflow(
            &items,
            units(1000),
            SizingStrategy::Fixed,
            None,
            &Contingency::default(),
            &Contingency::enabled(ContingencyType::Fixed, 50.0),
            "1000",
        );
        assert_eq!(overflow, units(150));
    }

    #[test]
    fn test_parentless_sum_never_checks_budget_overflow() {
        let items = tree(&[(800, Some(CostType::Hard))]);
        let report = validate(&items, SizingStrategy::Sum, units(-500), None, "");
        assert!(!report.budget_overflow);
        assert!(!report.has_errors());
    }

    #[test]
    fn test_negative_line_item_overflow_blocks_submission() {
        let items = LineItemTree::from_items(vec![LineItem::new()
            .with_amount(units(1000))
            .with_children(vec![
                LineItem::new().with_amount(units(600)),
                LineItem::new().with_amount(units(500)),
            ])]);
        let report = validate(&items, SizingStrategy::Sum, Money::zero(), None, "");
        assert!(report.negative_line_item_overflow);
        assert!(report.has_errors());
        assert_eq!(
            report.problems(),
            vec!["line items exceed their parent item's amount"]
        );
    }

    #[test]
    fn test_ceiling_checks_per_strategy() {
        let parent = philanthropy_fund();
        let items = tree(&[(2_500_000, None)]);

        let fixed = validate(&items, SizingStrategy::Fixed, units(1), None, "2000000");
        assert!(fixed.ceiling_exceeded);
        assert!(!fixed.budget_overflow);

        let pct = validate(
            &items,
            SizingStrategy::Percentage,
            units(1),
            Some(&parent),
            "20",
        );
        assert!(pct.ceiling_exceeded);

        let sum_ok = validate(&items, SizingStrategy::Sum, units(1), Some(&parent), "");
        assert!(!sum_ok.ceiling_exceeded);

        let big = tree(&[(9_000_000, None)]);
        let sum_over = validate(&big, SizingStrategy::Sum, units(1), Some(&parent), "");
        assert!(sum_over.ceiling_exceeded);
    }

    #[test]
    fn test_evaluate_draft() {
        let parent = philanthropy_fund();
        let mut draft = BudgetDraft::new("Scholarships");
        draft.parent_budget_id = Some(parent.id);
        draft.sizing_strategy = SizingStrategy::Percentage;
        draft.sizing_value = "20".into();
        draft.line_items = tree(&[
            (1_200_000, Some(CostType::Hard)),
            (500_000, Some(CostType::Soft)),
        ]);
        draft.hard_contingency = Contingency::enabled(ContingencyType::Percentage, 5.0);

        let eval = BudgetEvaluation::evaluate(&draft, Some(&parent));
        assert_eq!(eval.total_budget, units(2_000_000));
        assert_eq!(eval.line_items_total, units(1_700_000));
        assert_eq!(eval.hard_contingency, units(60_000));
        assert_eq!(eval.soft_contingency, Money::zero());
        assert_eq!(eval.total_with_contingencies, units(1_760_000));
        assert_eq!(eval.overflow, units(6_000_000));
        assert!(eval.can_submit());
    }

    #[test]
    fn test_report_display() {
        let report = ValidationReport {
            budget_overflow: true,
            ceiling_exceeded: true,
            ..ValidationReport::default()
        };
        assert_eq!(
            report.to_string(),
            "budget exceeds the available amount; line item total exceeds the allocated budget"
        );
        assert_eq!(ValidationReport::default().to_string(), "no validation errors");
    }
}
