//! Draft CLI commands
//!
//! Implements CLI commands for creating and editing budget drafts, their
//! line item trees and sizing, and for submitting them.

use chrono::NaiveDate;
use clap::{Subcommand, ValueEnum};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::PathBuf;

use crate::config::settings::Settings;
use crate::display::{format_draft_details, format_evaluation, format_line_item_tree};
use crate::error::{PlannerError, PlannerResult};
use crate::export::{
    export_draft_json, export_draft_yaml, import_draft_json, import_draft_yaml, DraftExport,
};
use crate::models::{
    parse_amount, parse_percent, BudgetDraft, Contingency, ContingencyType, CostType, Currency,
    FiscalPeriod, LineItemUpdate, SizingStrategy,
};
use crate::services::{ContingencyKind, DraftService, SubmitAction};
use crate::storage::Storage;

/// Cost bucket a contingency applies to
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ContingencyArg {
    Soft,
    Hard,
}

impl From<ContingencyArg> for ContingencyKind {
    fn from(arg: ContingencyArg) -> Self {
        match arg {
            ContingencyArg::Soft => Self::Soft,
            ContingencyArg::Hard => Self::Hard,
        }
    }
}

/// Draft file format
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DraftFormat {
    Json,
    Yaml,
}

/// Draft subcommands
#[derive(Subcommand)]
pub enum DraftCommands {
    /// Create a new draft
    New {
        /// Draft name
        name: String,
        /// Currency (USD, EUR, GBP)
        #[arg(short, long)]
        currency: Option<Currency>,
        /// Fiscal period (e.g. "Q3", "Annual", "One-time")
        #[arg(short, long)]
        period: Option<FiscalPeriod>,
    },

    /// List drafts
    List,

    /// Show a draft with its line items and evaluation
    Show {
        /// Draft name or ID
        draft: String,
    },

    /// Add a line item
    AddItem {
        /// Draft name or ID
        draft: String,
        /// Parent line item (path like "1.2", name or ID)
        #[arg(short, long)]
        parent: Option<String>,
        /// Line item name
        #[arg(short, long)]
        name: Option<String>,
        /// Amount (e.g. "1500" or "$1,500.00")
        #[arg(short, long)]
        amount: Option<String>,
        /// Cost type (soft, hard, none)
        #[arg(short = 't', long)]
        cost_type: Option<String>,
    },

    /// Edit a line item
    EditItem {
        /// Draft name or ID
        draft: String,
        /// Line item (path like "1.2", name or ID)
        item: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short = 't', long)]
        cost_type: Option<String>,
    },

    /// Remove a line item and everything under it
    RemoveItem {
        /// Draft name or ID
        draft: String,
        /// Line item (path like "1.2", name or ID)
        item: String,
    },

    /// Link a line item to vendors, properties or legal entities
    Link {
        /// Draft name or ID
        draft: String,
        /// Line item (path like "1.2", name or ID)
        item: String,
        /// Entity names or IDs (none to clear links)
        entities: Vec<String>,
    },

    /// Set how the total budget is computed
    Sizing {
        /// Draft name or ID
        draft: String,
        /// Strategy (fixed, percentage, sum)
        strategy: SizingStrategy,
        /// Amount for fixed sizing, percent for percentage sizing
        value: Option<String>,
    },

    /// Attach the draft to a parent budget
    Parent {
        /// Draft name or ID
        draft: String,
        /// Parent budget name or ID
        parent: Option<String>,
        /// Detach from the current parent budget
        #[arg(long, conflicts_with = "parent")]
        clear: bool,
    },

    /// Configure the soft or hard contingency
    Contingency {
        /// Draft name or ID
        draft: String,
        /// Which contingency
        #[arg(value_enum)]
        kind: ContingencyArg,
        /// Value type (fixed, percentage)
        #[arg(short = 't', long, default_value = "percentage")]
        value_type: ContingencyType,
        /// Amount or percent
        #[arg(short, long, default_value = "0")]
        value: String,
        /// Turn the contingency off
        #[arg(long)]
        disable: bool,
    },

    /// Set the fiscal period (and its date range)
    Period {
        /// Draft name or ID
        draft: String,
        /// Fiscal period (e.g. "Q3", "Annual", "One-time")
        period: FiscalPeriod,
        /// Fiscal year (defaults to the configured fiscal year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Set explicit start and end dates
    Dates {
        /// Draft name or ID
        draft: String,
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: Option<NaiveDate>,
        /// End date (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<NaiveDate>,
    },

    /// Rename a draft or change its description or currency
    Edit {
        /// Draft name or ID
        draft: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        currency: Option<Currency>,
    },

    /// Submit the draft for approval, or publish it directly
    Submit {
        /// Draft name or ID
        draft: String,
        /// Publish as an active budget instead of submitting for approval
        #[arg(long)]
        publish: bool,
    },

    /// Delete a draft
    Delete {
        /// Draft name or ID
        draft: String,
    },

    /// Export a draft with its evaluation
    Export {
        /// Draft name or ID
        draft: String,
        /// Output file path
        output: PathBuf,
        #[arg(short, long, value_enum, default_value = "json")]
        format: DraftFormat,
    },

    /// Import a draft from an export file
    Import {
        /// Input file path (.json, .yaml or .yml)
        input: PathBuf,
    },

    /// Show the change history of a draft
    History {
        /// Draft name or ID
        draft: String,
    },
}

/// Handle a draft command
pub fn handle_draft_command(
    storage: &Storage,
    settings: &Settings,
    cmd: DraftCommands,
) -> PlannerResult<()> {
    let service = DraftService::new(storage);

    match cmd {
        DraftCommands::New {
            name,
            currency,
            period,
        } => {
            let draft = service.create(
                &name,
                currency.unwrap_or(settings.default_currency),
                period.unwrap_or(settings.default_period),
            )?;
            println!("Created draft: {}", draft);
            println!("  ID: {}", draft.id);
        }

        DraftCommands::List => {
            let drafts = service.list()?;
            if drafts.is_empty() {
                println!("No drafts found.");
                println!("Run 'budget draft new <name>' to start one.");
                return Ok(());
            }
            println!("{:<12} {:<32} {:>18} {:>6}  Updated", "ID", "Name", "Total", "Items");
            println!("{}", "-".repeat(84));
            for draft in drafts {
                let evaluation = service.evaluate(&draft)?;
                println!(
                    "{:<12} {:<32} {:>18} {:>6}  {}",
                    draft.id.to_string(),
                    truncate(&draft.name, 32),
                    draft.currency.format(evaluation.total_budget),
                    draft.line_items.len(),
                    settings.format_date(draft.updated_at.date_naive()),
                );
            }
        }

        DraftCommands::Show { draft } => {
            let draft = service.find(&draft)?;
            print_draft(&service, &draft)?;
        }

        DraftCommands::AddItem {
            draft,
            parent,
            name,
            amount,
            cost_type,
        } => {
            let updates = item_updates(name, amount, None, cost_type)?;
            let (updated, id) = service.add_item(&draft, parent.as_deref(), updates)?;
            println!("Added line item {} to '{}'", id, updated.name);
        }

        DraftCommands::EditItem {
            draft,
            item,
            name,
            amount,
            description,
            cost_type,
        } => {
            let updates = item_updates(name, amount, description, cost_type)?;
            if updates.is_empty() {
                println!("Nothing to change.");
                return Ok(());
            }
            let fields: Vec<_> = updates.iter().map(|u| u.field_name()).collect();
            let updated = service.update_item(&draft, &item, updates)?;
            println!("Updated {} of item {} in '{}'", fields.join(", "), item, updated.name);
        }

        DraftCommands::RemoveItem { draft, item } => {
            let updated = service.remove_item(&draft, &item)?;
            println!("Removed item {} from '{}'", item, updated.name);
        }

        DraftCommands::Link {
            draft,
            item,
            entities,
        } => {
            let updated = service.link_entities(&draft, &item, &entities)?;
            if entities.is_empty() {
                println!("Cleared links of item {} in '{}'", item, updated.name);
            } else {
                println!(
                    "Linked item {} in '{}' to: {}",
                    item,
                    updated.name,
                    entities.join(", ")
                );
            }
        }

        DraftCommands::Sizing {
            draft,
            strategy,
            value,
        } => {
            let updated = service.set_sizing(&draft, strategy, value.as_deref().unwrap_or(""))?;
            let evaluation = service.evaluate(&updated)?;
            println!(
                "Sizing of '{}' set to {}: total budget {}",
                updated.name,
                strategy,
                updated.currency.format(evaluation.total_budget)
            );
        }

        DraftCommands::Parent {
            draft,
            parent,
            clear,
        } => {
            if !clear && parent.is_none() {
                return Err(PlannerError::Validation(
                    "Give a parent budget name or use --clear".into(),
                ));
            }
            let updated = service.set_parent(&draft, parent.as_deref())?;
            match service.resolve_parent(&updated)? {
                Some(parent) => println!("'{}' now draws from '{}'", updated.name, parent.name),
                None => println!("'{}' has no parent budget", updated.name),
            }
        }

        DraftCommands::Contingency {
            draft,
            kind,
            value_type,
            value,
            disable,
        } => {
            let contingency = if disable {
                Contingency::default()
            } else {
                Contingency::enabled(value_type, contingency_value(value_type, &value))
            };
            let updated = service.set_contingency(&draft, kind.into(), contingency)?;
            let evaluation = service.evaluate(&updated)?;
            println!(
                "Contingencies of '{}': soft {}, hard {}",
                updated.name,
                updated.currency.format(evaluation.soft_contingency),
                updated.currency.format(evaluation.hard_contingency)
            );
        }

        DraftCommands::Period {
            draft,
            period,
            year,
        } => {
            let today = chrono::Local::now().date_naive();
            let updated = service.set_period(
                &draft,
                period,
                year.unwrap_or(settings.fiscal_year),
                today,
            )?;
            print!("'{}' period set to {}", updated.name, period);
            if let (Some(start), Some(end)) = (updated.start_date, updated.end_date) {
                print!(
                    " ({} to {})",
                    settings.format_date(start),
                    settings.format_date(end)
                );
            }
            println!();
        }

        DraftCommands::Dates { draft, start, end } => {
            let updated = service.set_dates(&draft, start, end)?;
            println!("Dates of '{}' updated", updated.name);
        }

        DraftCommands::Edit {
            draft,
            name,
            description,
            currency,
        } => {
            let updated =
                service.set_details(&draft, name.as_deref(), description.as_deref(), currency)?;
            println!("Updated draft: {}", updated);
        }

        DraftCommands::Submit { draft, publish } => {
            let action = if publish {
                SubmitAction::Publish
            } else {
                SubmitAction::SubmitForApproval
            };
            let row = service.submit(&draft, action)?;
            println!("{}: '{}' ({})", action, row.name, row.status);
            println!("  Total amount: {}", row.total_amount);
        }

        DraftCommands::Delete { draft } => {
            let deleted = service.delete(&draft)?;
            println!("Deleted draft: {}", deleted.name);
        }

        DraftCommands::Export {
            draft,
            output,
            format,
        } => {
            let draft = service.find(&draft)?;
            let parent = service.resolve_parent(&draft)?;
            let export = DraftExport::new(&draft, parent.as_ref());

            let file = File::create(&output).map_err(|e| {
                PlannerError::Export(format!(
                    "Failed to create file {}: {}",
                    output.display(),
                    e
                ))
            })?;
            let mut writer = BufWriter::new(file);
            match format {
                DraftFormat::Json => export_draft_json(&export, &mut writer)?,
                DraftFormat::Yaml => export_draft_yaml(&export, &mut writer)?,
            }
            println!("Draft '{}' exported to: {}", draft.name, output.display());
        }

        DraftCommands::Import { input } => {
            let contents = fs::read_to_string(&input).map_err(|e| {
                PlannerError::Io(format!("Failed to read {}: {}", input.display(), e))
            })?;
            let is_yaml = input
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"))
                .unwrap_or(false);
            let draft = if is_yaml {
                import_draft_yaml(&contents)?
            } else {
                import_draft_json(&contents)?
            };
            let draft = service.import(draft)?;
            println!("Imported draft: {}", draft);
        }

        DraftCommands::History { draft } => {
            let draft = service.find(&draft)?;
            let entries = storage.audit().history_of(&draft.id.to_string())?;
            if entries.is_empty() {
                println!("No history recorded for '{}'.", draft.name);
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
    }

    Ok(())
}

fn print_draft(service: &DraftService<'_>, draft: &BudgetDraft) -> PlannerResult<()> {
    let parent = service.resolve_parent(draft)?;
    let evaluation = service.evaluate(draft)?;

    print!("{}", format_draft_details(draft, parent.as_ref()));
    println!();
    println!("Line items");
    print!("{}", format_line_item_tree(&draft.line_items, draft.currency));
    println!();
    print!("{}", format_evaluation(&evaluation, draft.currency));
    Ok(())
}

fn item_updates(
    name: Option<String>,
    amount: Option<String>,
    description: Option<String>,
    cost_type: Option<String>,
) -> PlannerResult<Vec<LineItemUpdate>> {
    let mut updates = Vec::new();
    if let Some(name) = name {
        updates.push(LineItemUpdate::SetName(name));
    }
    if let Some(amount) = amount {
        updates.push(LineItemUpdate::amount_from_input(&amount));
    }
    if let Some(description) = description {
        updates.push(LineItemUpdate::SetDescription(description));
    }
    if let Some(cost_type) = cost_type {
        let cost_type = CostType::parse_optional(&cost_type).map_err(PlannerError::Validation)?;
        updates.push(LineItemUpdate::SetCostType(cost_type));
    }
    Ok(updates)
}

/// Percentages are limited to `0..=100`; fixed values are whole currency units
fn contingency_value(value_type: ContingencyType, text: &str) -> f64 {
    match value_type {
        ContingencyType::Percentage => parse_percent(text),
        ContingencyType::Fixed => parse_amount(text).cents() as f64 / 100.0,
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
