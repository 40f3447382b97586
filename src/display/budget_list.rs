//! Budget list display
//!
//! Renders the budget table (optionally with nested rows) and its totals
//! row using `tabled`.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use crate::models::{BudgetSummary, Money};
use crate::services::{BudgetTotals, Selection};

const HEADERS: [&str; 12] = [
    "", "Name", "Status", "Period", "Total", "Committed", "Uncommitted", "Spent %", "Spent",
    "Remaining", "Initial", "Due",
];

/// Options for rendering the budget table
#[derive(Debug, Clone, Copy, Default)]
pub struct ListOptions {
    /// Show nested rows under each budget
    pub expand: bool,
}

/// Format the budget table with a totals row.
///
/// Totals cover the checked rows, or every row when nothing is checked.
pub fn format_budget_list(
    budgets: &[BudgetSummary],
    selection: &Selection,
    options: ListOptions,
) -> String {
    if budgets.is_empty() {
        return "No budgets found.\n\nRun 'budget init' to create sample data.".to_string();
    }

    let mut builder = Builder::default();
    builder.push_record(HEADERS.map(String::from));

    for budget in budgets {
        let mark = if selection.is_checked(&budget.name) { "[x]" } else { "[ ]" };
        push_row(&mut builder, budget, mark, 0, options.expand);
    }

    let totals = selection.totals(budgets);
    let label = if selection.is_empty() {
        "TOTAL".to_string()
    } else {
        format!("TOTAL ({} selected)", selection.count())
    };
    builder.push_record(totals_record(&label, &totals));

    let mut table = builder.build();
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(4..11)).with(Alignment::right()));

    table.to_string()
}

fn push_row(builder: &mut Builder, budget: &BudgetSummary, mark: &str, depth: usize, expand: bool) {
    builder.push_record(vec![
        mark.to_string(),
        format!("{}{}", "  ".repeat(depth), budget.name),
        budget.status.to_string(),
        budget.period.to_string(),
        amount(budget.total_amount),
        amount(budget.committed),
        amount(budget.uncommitted),
        format!("{}%", budget.spent_progress_percent()),
        amount(budget.actually_spent),
        amount(budget.remaining),
        amount(budget.effective_initial_amount()),
        budget
            .due_date
            .map(|d| d.format("%b %-d, %Y").to_string())
            .unwrap_or_default(),
    ]);

    if expand {
        for child in &budget.children {
            push_row(builder, child, "", depth + 1, expand);
        }
    }
}

fn totals_record(label: &str, totals: &BudgetTotals) -> Vec<String> {
    vec![
        String::new(),
        label.to_string(),
        String::new(),
        String::new(),
        amount(totals.total_amount),
        amount(totals.committed),
        amount(totals.uncommitted),
        String::new(),
        amount(totals.actually_spent),
        amount(totals.remaining),
        amount(totals.initial_amount),
        String::new(),
    ]
}

fn amount(money: Money) -> String {
    money.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BudgetStatus;
    use chrono::NaiveDate;

    fn rows() -> Vec<BudgetSummary> {
        let mut it = BudgetSummary::new(
            "IT infrastructure upgrade",
            BudgetStatus::Active,
            Money::from_units(300_000),
        );
        it.committed = Money::from_units(275_000);
        it.actually_spent = Money::from_units(250_000);
        it.due_date = NaiveDate::from_ymd_opt(2024, 10, 31);
        it.children = vec![BudgetSummary::new(
            "Hardware Upgrades",
            BudgetStatus::Active,
            Money::from_units(150_000),
        )];

        let tax = BudgetSummary::new(
            "Mid-year tax review",
            BudgetStatus::Active,
            Money::from_units(150_000),
        );
        vec![it, tax]
    }

    #[test]
    fn test_empty_list() {
        let output = format_budget_list(&[], &Selection::new(), ListOptions::default());
        assert!(output.contains("No budgets found"));
    }

    #[test]
    fn test_table_with_totals() {
        let output = format_budget_list(&rows(), &Selection::new(), ListOptions::default());
        assert!(output.contains("IT infrastructure upgrade"));
        assert!(output.contains("91%"));
        assert!(output.contains("Oct 31, 2024"));
        assert!(output.contains("TOTAL"));
        assert!(output.contains("$450,000.00"));
        assert!(!output.contains("Hardware Upgrades"));
    }

    #[test]
    fn test_expanded_and_selected() {
        let budgets = rows();
        let mut selection = Selection::new();
        selection.set("Mid-year tax review", true);

        let output = format_budget_list(&budgets, &selection, ListOptions { expand: true });
        assert!(output.contains("  Hardware Upgrades"));
        assert!(output.contains("[x]"));
        assert!(output.contains("TOTAL (1 selected)"));
    }
}
