//! Budget list CLI commands
//!
//! Implements the budget table (sorting, row selection, totals), its CSV
//! export and listings of the reference catalogs.

use clap::{Subcommand, ValueEnum};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use crate::display::{format_budget_list, ListOptions};
use crate::error::{PlannerError, PlannerResult};
use crate::export::export_budget_list_csv;
use crate::models::{BudgetSummary, EntityType};
use crate::services::{sorted, Selection, SortDirection, SortKey, SortState};
use crate::storage::Storage;

/// Entity kind filter
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EntityKind {
    Vendor,
    Property,
    LegalEntity,
}

impl From<EntityKind> for EntityType {
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Vendor => Self::Vendor,
            EntityKind::Property => Self::Property,
            EntityKind::LegalEntity => Self::LegalEntity,
        }
    }
}

/// Budget subcommands
#[derive(Subcommand)]
pub enum BudgetCommands {
    /// Show the budget table with totals
    List {
        /// Column to sort by (name, status, period, total, committed, ...)
        #[arg(short, long)]
        sort: Option<SortKey>,
        /// Sort descending
        #[arg(short, long, requires = "sort")]
        desc: bool,
        /// Check a row by name; totals cover checked rows only
        #[arg(long = "select", value_name = "NAME")]
        select: Vec<String>,
        /// Check every row
        #[arg(long, conflicts_with = "select")]
        select_all: bool,
        /// Show nested rows
        #[arg(short, long)]
        expand: bool,
    },

    /// Export the budget table to CSV
    Export {
        /// Output file path
        output: PathBuf,
        #[arg(short, long)]
        sort: Option<SortKey>,
        #[arg(short, long, requires = "sort")]
        desc: bool,
        /// Export only these rows (by name)
        #[arg(long = "select", value_name = "NAME")]
        select: Vec<String>,
    },

    /// List parent budgets
    Parents,

    /// List vendors, properties and legal entities
    Entities {
        /// Only show one kind
        #[arg(short = 't', long, value_enum)]
        entity_type: Option<EntityKind>,
    },
}

/// Handle a budget command
pub fn handle_budget_command(storage: &Storage, cmd: BudgetCommands) -> PlannerResult<()> {
    match cmd {
        BudgetCommands::List {
            sort,
            desc,
            select,
            select_all,
            expand,
        } => {
            let budgets = storage.budgets.get_all()?;
            let rows = sorted(&budgets, sort_state(sort, desc));

            let mut selection = selection_of(&rows, &select)?;
            if select_all {
                selection.set_all(&rows, true);
            }

            println!("{}", format_budget_list(&rows, &selection, ListOptions { expand }));
        }

        BudgetCommands::Export {
            output,
            sort,
            desc,
            select,
        } => {
            let budgets = storage.budgets.get_all()?;
            let mut rows = sorted(&budgets, sort_state(sort, desc));

            let selection = selection_of(&rows, &select)?;
            let totals = selection.totals(&rows);
            if !selection.is_empty() {
                rows.retain(|b| selection.is_checked(&b.name));
            }

            let file = File::create(&output).map_err(|e| {
                PlannerError::Export(format!(
                    "Failed to create file {}: {}",
                    output.display(),
                    e
                ))
            })?;
            export_budget_list_csv(&rows, &totals, BufWriter::new(file))?;
            println!("Exported {} budgets to: {}", rows.len(), output.display());
        }

        BudgetCommands::Parents => {
            let parents = storage.catalog.parents()?;
            if parents.is_empty() {
                println!("No parent budgets found.");
                return Ok(());
            }
            println!("{:<12} {:<28} {:>18} {:>18}", "ID", "Name", "Amount", "Available");
            println!("{}", "-".repeat(79));
            for parent in parents {
                println!(
                    "{:<12} {:<28} {:>18} {:>18}",
                    parent.id.to_string(),
                    parent.name,
                    parent.amount.to_string(),
                    parent.available.to_string()
                );
            }
        }

        BudgetCommands::Entities { entity_type } => {
            let entities = storage.catalog.entities(entity_type.map(EntityType::from))?;
            if entities.is_empty() {
                println!("No entities found.");
                return Ok(());
            }
            println!("{:<12} {:<14} Name", "ID", "Type");
            println!("{}", "-".repeat(60));
            for entity in entities {
                println!(
                    "{:<12} {:<14} {}",
                    entity.id.to_string(),
                    entity.entity_type.to_string(),
                    entity.name
                );
            }
        }
    }

    Ok(())
}

fn sort_state(key: Option<SortKey>, desc: bool) -> SortState {
    match key {
        Some(key) if desc => SortState::by(key, SortDirection::Descending),
        Some(key) => SortState::by(key, SortDirection::Ascending),
        None => SortState::new(),
    }
}

/// Build a selection from row names; unknown names are an error
fn selection_of(rows: &[BudgetSummary], names: &[String]) -> PlannerResult<Selection> {
    let mut selection = Selection::new();
    for name in names {
        let row = rows
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| PlannerError::NotFound {
                entity_type: "Budget",
                identifier: name.clone(),
            })?;
        selection.set(row.name.clone(), true);
    }
    Ok(selection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BudgetStatus, Money};

    #[test]
    fn test_sort_state_from_flags() {
        assert!(!sort_state(None, false).is_sorted());
        let state = sort_state(Some(SortKey::TotalAmount), true);
        assert_eq!(state.key, Some(SortKey::TotalAmount));
        assert_eq!(state.direction, Some(SortDirection::Descending));
    }

    #[test]
    fn test_selection_by_name() {
        let rows = vec![
            BudgetSummary::new("Mid-year tax review", BudgetStatus::Active, Money::from_units(1)),
            BudgetSummary::new("Office renovation project", BudgetStatus::Draft, Money::from_units(2)),
        ];

        let selection = selection_of(&rows, &["mid-year tax review".to_string()]).unwrap();
        assert!(selection.is_checked("Mid-year tax review"));
        assert_eq!(selection.count(), 1);

        assert!(selection_of(&rows, &["Unknown".to_string()])
            .unwrap_err()
            .is_not_found());
    }
}
