//! Draft and evaluation display
//!
//! Formats a draft's settings and its sizing evaluation for terminal output.

use crate::models::{BudgetDraft, ContingencyType, Currency, Money, ParentBudget, SizingStrategy};
use crate::services::BudgetEvaluation;

/// Format a draft's header: metadata, parent, sizing and contingencies
pub fn format_draft_details(draft: &BudgetDraft, parent: Option<&ParentBudget>) -> String {
    let currency = draft.currency;
    let mut output = String::new();

    let name = if draft.name.is_empty() { "(untitled)" } else { &draft.name };
    output.push_str(&format!("Draft: {}\n", name));
    output.push_str(&format!("  ID:        {}\n", draft.id));
    if !draft.description.is_empty() {
        output.push_str(&format!("  About:     {}\n", draft.description));
    }
    output.push_str(&format!("  Currency:  {}\n", currency));
    output.push_str(&format!("  Period:    {}\n", draft.period));
    match (draft.start_date, draft.end_date) {
        (Some(start), Some(end)) => output.push_str(&format!("  Dates:     {} to {}\n", start, end)),
        (Some(start), None) => output.push_str(&format!("  Starts:    {}\n", start)),
        (None, Some(end)) => output.push_str(&format!("  Ends:      {}\n", end)),
        (None, None) => {}
    }

    match parent {
        Some(parent) => output.push_str(&format!(
            "  Parent:    {} ({} of {} available)\n",
            parent.name,
            currency.format(parent.available),
            currency.format(parent.amount)
        )),
        None => output.push_str("  Parent:    (none)\n"),
    }

    let sizing = match draft.sizing_strategy {
        SizingStrategy::Fixed => format!("{} ({})", draft.sizing_strategy, draft.sizing_value),
        SizingStrategy::Percentage => format!("{} ({}%)", draft.sizing_strategy, draft.sizing_value),
        SizingStrategy::Sum => draft.sizing_strategy.to_string(),
    };
    output.push_str(&format!("  Sizing:    {}\n", sizing));

    for (label, contingency) in [
        ("Soft", &draft.soft_contingency),
        ("Hard", &draft.hard_contingency),
    ] {
        if contingency.enabled {
            let value = match contingency.kind {
                ContingencyType::Fixed => currency.format(Money::from_units_f64(contingency.value)),
                ContingencyType::Percentage => format!("{}%", contingency.value),
            };
            output.push_str(&format!("  {} contingency: {}\n", label, value));
        }
    }

    output
}

/// Format the computed figures and validation result
pub fn format_evaluation(evaluation: &BudgetEvaluation, currency: Currency) -> String {
    let line = |label: &str, amount: Money| format!("  {:<26}{:>22}\n", label, currency.format(amount));

    let mut output = String::new();
    output.push_str("Budget\n");
    output.push_str(&line("Total budget", evaluation.total_budget));
    output.push_str(&line("Line items", evaluation.line_items_total));
    output.push_str(&line("  Soft costs", evaluation.cost_split.soft));
    output.push_str(&line("  Hard costs", evaluation.cost_split.hard));
    output.push_str(&line("  Uncategorized", evaluation.cost_split.uncategorized));
    if !evaluation.soft_contingency.is_zero() {
        output.push_str(&line("Soft contingency", evaluation.soft_contingency));
    }
    if !evaluation.hard_contingency.is_zero() {
        output.push_str(&line("Hard contingency", evaluation.hard_contingency));
    }
    output.push_str(&line("Total with contingencies", evaluation.total_with_contingencies));
    output.push_str(&format!(
        "  {:<26}{:>22}\n",
        "Overflow",
        evaluation.overflow.format_with_sign()
    ));
    if evaluation.has_nested_items && evaluation.total_negative_overflow.is_positive() {
        output.push_str(&line("Nested overflow", evaluation.total_negative_overflow));
    }

    output.push('\n');
    if evaluation.can_submit() {
        output.push_str("Ready to submit.\n");
    } else {
        output.push_str("Cannot submit:\n");
        for problem in evaluation.report.problems() {
            output.push_str(&format!("  - {}\n", problem));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Contingency, LineItem, LineItemTree};

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    #[test]
    fn test_draft_details() {
        let parent = ParentBudget::new("Philanthropy Fund", units(10_000_000), units(8_000_000));
        let mut draft = BudgetDraft::new("Grants");
        draft.parent_budget_id = Some(parent.id);
        draft.sizing_strategy = SizingStrategy::Percentage;
        draft.sizing_value = "20".into();
        draft.hard_contingency = Contingency::enabled(ContingencyType::Percentage, 10.0);

        let output = format_draft_details(&draft, Some(&parent));
        assert!(output.contains("Draft: Grants"));
        assert!(output.contains("Philanthropy Fund ($8,000,000.00 USD of $10,000,000.00 USD available)"));
        assert!(output.contains("Percentage of parent (20%)"));
        assert!(output.contains("Hard contingency: 10%"));
        assert!(!output.contains("Soft contingency"));
    }

    #[test]
    fn test_evaluation_blocked() {
        let mut draft = BudgetDraft::new("Office refit");
        draft.sizing_value = "1000".into();
        draft.set_line_items(LineItemTree::from_items(vec![
            LineItem::new().with_amount(units(1_500))
        ]));

        let evaluation = BudgetEvaluation::evaluate(&draft, None);
        let output = format_evaluation(&evaluation, Currency::Usd);
        assert!(output.contains("Overflow"));
        assert!(output.contains("-500"));
        assert!(output.contains("Cannot submit:"));
        assert!(output.contains("line item total exceeds the allocated budget"));
    }

    #[test]
    fn test_evaluation_ready() {
        let mut draft = BudgetDraft::new("Office refit");
        draft.sizing_value = "2000".into();
        let evaluation = BudgetEvaluation::evaluate(&draft, None);
        let output = format_evaluation(&evaluation, Currency::Gbp);
        assert!(output.contains("£2,000.00 GBP"));
        assert!(output.contains("Ready to submit."));
    }
}
