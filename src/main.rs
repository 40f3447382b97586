use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use budget_planner::cli::{handle_budget_command, handle_draft_command};
use budget_planner::config::paths::{PlannerPaths, DATA_DIR_ENV};
use budget_planner::config::settings::Settings;
use budget_planner::storage::init::needs_initialization;
use budget_planner::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "budget",
    author = "Kaylee Beyene",
    version,
    about = "Hierarchical budget drafting and budget list aggregation",
    long_about = "budget-planner drafts budgets as trees of line items, sizes them \
                  against a parent budget with soft and hard contingencies, flags \
                  over-allocation before submission and keeps a sortable budget \
                  list with running totals."
)]
struct Cli {
    /// Directory holding settings, data and the audit log
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Budget list and reference data commands
    #[command(subcommand)]
    Budget(budget_planner::cli::BudgetCommands),

    /// Draft management commands
    #[command(subcommand)]
    Draft(budget_planner::cli::DraftCommands),

    /// Initialize storage with sample parent budgets, entities and budgets
    Init,

    /// Show current configuration and paths
    Config,

    /// Show recent changes from the audit log
    Log {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        count: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => PlannerPaths::with_base_dir(dir),
        None => PlannerPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing budget-planner at: {}", paths.base_dir().display());
            initialize_storage(&paths)?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Sample data has been created:");
            println!("  - Parent budgets (Johnson Family Trust, Philanthropy Fund, ...)");
            println!("  - Vendors, properties and legal entities to link line items to");
            println!("  - A budget list with six budgets");
            println!();
            println!("Run 'budget budget list' to see the budget table.");
            return Ok(());
        }
        Some(Commands::Config) => {
            println!("budget-planner Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Drafts directory: {}", paths.drafts_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Default currency: {}", settings.default_currency);
            println!("  Default period:   {}", settings.default_period);
            println!("  Fiscal year:      {}", settings.fiscal_year);
            println!("  Date format:      {}", settings.date_format);
            println!("  Audit logging:    {}", settings.audit_enabled);
            return Ok(());
        }
        _ => {}
    }

    if needs_initialization(&paths) {
        eprintln!("No data found. Run 'budget init' to create sample data.");
    }

    // Initialize storage
    let storage = Storage::new(paths)?.with_audit(settings.audit_enabled);

    match cli.command {
        Some(Commands::Budget(cmd)) => {
            handle_budget_command(&storage, cmd)?;
        }
        Some(Commands::Draft(cmd)) => {
            handle_draft_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Log { count }) => {
            let entries = storage.audit().read_recent(count)?;
            if entries.is_empty() {
                println!("No changes recorded yet.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) | Some(Commands::Config) => {}
        None => {
            println!("budget-planner - Hierarchical budget drafting");
            println!();
            println!("Run 'budget --help' for usage information.");
            println!("Run 'budget init' to create sample data.");
        }
    }

    Ok(())
}
