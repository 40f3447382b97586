//! CSV export of the budget list
//!
//! One record per budget row (nested rows follow their parent with a higher
//! level), then a totals record. Amounts are written in currency units with
//! two decimals.

use std::io::Write;

use crate::error::{PlannerError, PlannerResult};
use crate::models::{BudgetSummary, Money};
use crate::services::BudgetTotals;

const HEADER: [&str; 17] = [
    "Level",
    "Name",
    "Status",
    "Period",
    "Total Amount",
    "Committed",
    "Uncommitted",
    "Progress",
    "Actually Spent",
    "Remaining",
    "Initial Amount",
    "Due Date",
    "Owner",
    "Vendor",
    "Property",
    "Legal Entity",
    "Spent Progress",
];

/// Write the budget rows and their totals as CSV
pub fn export_budget_list_csv<W: Write>(
    budgets: &[BudgetSummary],
    totals: &BudgetTotals,
    writer: W,
) -> PlannerResult<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER)?;

    for budget in budgets {
        write_row(&mut csv, budget, 0)?;
    }

    csv.write_record([
        String::new(),
        "TOTAL".to_string(),
        String::new(),
        String::new(),
        decimal(totals.total_amount),
        decimal(totals.committed),
        decimal(totals.uncommitted),
        String::new(),
        decimal(totals.actually_spent),
        decimal(totals.remaining),
        decimal(totals.initial_amount),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
        String::new(),
    ])?;

    csv.flush().map_err(|e| PlannerError::Export(e.to_string()))?;
    Ok(())
}

fn write_row<W: Write>(
    csv: &mut csv::Writer<W>,
    budget: &BudgetSummary,
    level: usize,
) -> PlannerResult<()> {
    csv.write_record([
        level.to_string(),
        budget.name.clone(),
        budget.status.to_string(),
        budget.period.to_string(),
        decimal(budget.total_amount),
        decimal(budget.committed),
        decimal(budget.uncommitted),
        budget.progress.to_string(),
        decimal(budget.actually_spent),
        decimal(budget.remaining),
        decimal(budget.effective_initial_amount()),
        budget.due_date.map(|d| d.to_string()).unwrap_or_default(),
        budget.owner.clone(),
        budget.vendor.clone().unwrap_or_default(),
        budget.property.clone().unwrap_or_default(),
        budget.legal_entity.clone().unwrap_or_default(),
        budget.spent_progress_percent().to_string(),
    ])?;

    for child in &budget.children {
        write_row(csv, child, level + 1)?;
    }
    Ok(())
}

fn decimal(amount: Money) -> String {
    let sign = if amount.is_negative() { "-" } else { "" };
    format!("{}{}.{:02}", sign, amount.units().abs(), amount.cents_part())
}
