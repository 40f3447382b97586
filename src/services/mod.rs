//! Service layer for budget-planner
//!
//! The service layer holds the budgeting logic on top of the models: sizing
//! and validation of drafts, aggregation and ordering of the budget list,
//! submission, and the storage-backed draft workflow used by the CLI.

pub mod aggregate;
pub mod draft;
pub mod sizing;
pub mod submission;

pub use aggregate::{compare, sorted, BudgetTotals, Selection, SortDirection, SortKey, SortState};
pub use draft::{resolve_item, ContingencyKind, DraftService};
pub use sizing::{
    compute_budget_overflow, compute_contingency, compute_total_budget, contingency_amount,
    has_validation_errors, validate, BudgetEvaluation, ValidationReport,
};
pub use submission::{submit, SubmitAction};
