//! Storage initialization
//!
//! Handles first-run setup: seeds the parent budget and entity catalogs and
//! a starter budget list. Existing files are never overwritten.

use chrono::NaiveDate;

use crate::config::paths::PlannerPaths;
use crate::error::PlannerError;
use crate::models::{BudgetStatus, BudgetSummary, Entity, EntityType, FiscalPeriod, Money, ParentBudget};

use super::budgets::BudgetData;
use super::catalog::{EntityData, ParentData};
use super::file_io::write_json_atomic;

/// Initialize storage for a fresh installation
pub fn initialize_storage(paths: &PlannerPaths) -> Result<(), PlannerError> {
    paths.ensure_directories()?;

    if !paths.parents_file().exists() {
        write_json_atomic(
            paths.parents_file(),
            &ParentData {
                parents: default_parents(),
            },
        )?;
    }

    if !paths.entities_file().exists() {
        write_json_atomic(
            paths.entities_file(),
            &EntityData {
                entities: default_entities(),
            },
        )?;
    }

    if !paths.budgets_file().exists() {
        write_json_atomic(
            paths.budgets_file(),
            &BudgetData {
                budgets: default_budgets(),
            },
        )?;
    }

    Ok(())
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &PlannerPaths) -> bool {
    !paths.parents_file().exists()
}

fn default_parents() -> Vec<ParentBudget> {
    [
        ("Johnson Family Trust", 50_000_000, 40_000_000),
        ("Philanthropy Fund", 10_000_000, 8_000_000),
        ("Investment Portfolio", 30_000_000, 25_000_000),
        ("Corporate Reserve", 20_000_000, 15_000_000),
        ("Education Endowment", 15_000_000, 12_000_000),
        ("Healthcare Initiative", 25_000_000, 20_000_000),
        ("Environmental Fund", 18_000_000, 16_000_000),
        ("Technology Grant", 22_000_000, 18_000_000),
        ("Community Outreach", 12_000_000, 10_000_000),
    ]
    .into_iter()
    .map(|(name, amount, available)| {
        ParentBudget::new(name, Money::from_units(amount), Money::from_units(available))
    })
    .collect()
}

fn default_entities() -> Vec<Entity> {
    [
        ("Apple Inc.", EntityType::Vendor),
        ("Microsoft Corporation", EntityType::Vendor),
        ("Downtown Office", EntityType::Property),
        ("Suburban Complex", EntityType::Property),
        ("ABC Holdings Ltd", EntityType::LegalEntity),
        ("Google LLC", EntityType::Vendor),
        ("City Center Plaza", EntityType::Property),
        ("XYZ Enterprises", EntityType::LegalEntity),
        ("Amazon.com Inc", EntityType::Vendor),
        ("Tech Park Office", EntityType::Property),
    ]
    .into_iter()
    .map(|(name, entity_type)| Entity::new(name, entity_type))
    .collect()
}

/// Figures of one seeded row, in whole units
struct Seed {
    name: &'static str,
    status: BudgetStatus,
    period: FiscalPeriod,
    total: i64,
    committed: i64,
    spent: i64,
    remaining: i64,
    progress: u32,
    initial: Option<i64>,
    due: (i32, u32, u32),
    owner: &'static str,
}

impl Seed {
    fn build(self) -> BudgetSummary {
        let mut row = BudgetSummary::new(self.name, self.status, Money::from_units(self.total));
        row.period = self.period;
        row.committed = Money::from_units(self.committed);
        row.uncommitted = Money::from_units(self.total - self.committed);
        row.actually_spent = Money::from_units(self.spent);
        row.remaining = Money::from_units(self.remaining);
        row.progress = self.progress;
        row.initial_amount = self.initial.map(Money::from_units);
        row.due_date = NaiveDate::from_ymd_opt(self.due.0, self.due.1, self.due.2);
        row.owner = self.owner.to_string();
        row
    }
}

fn with_columns(mut row: BudgetSummary, vendor: &str, property: &str, legal: &str) -> BudgetSummary {
    row.vendor = Some(vendor.to_string());
    row.property = Some(property.to_string());
    row.legal_entity = Some(legal.to_string());
    row
}

fn default_budgets() -> Vec<BudgetSummary> {
    let q4 = FiscalPeriod::Q4;
    let owner = "Dianne Russell";

    let mut it_upgrade = with_columns(
        Seed {
            name: "IT infrastructure upgrade",
            status: BudgetStatus::Active,
            period: q4,
            total: 300_000,
            committed: 275_000,
            spent: 250_000,
            remaining: 25_000,
            progress: 95,
            initial: Some(250_000),
            due: (2024, 10, 31),
            owner,
        }
        .build(),
        "Tech Solutions Inc.",
        "HQ Building",
        "Global Corp LLC",
    );
    let mut hardware = Seed {
        name: "Hardware Upgrades",
        status: BudgetStatus::Active,
        period: q4,
        total: 150_000,
        committed: 140_000,
        spent: 130_000,
        remaining: 20_000,
        progress: 93,
        initial: Some(130_000),
        due: (2024, 10, 31),
        owner,
    }
    .build();
    hardware.children = vec![
        Seed {
            name: "Servers",
            status: BudgetStatus::Active,
            period: q4,
            total: 100_000,
            committed: 95_000,
            spent: 90_000,
            remaining: 10_000,
            progress: 95,
            initial: Some(90_000),
            due: (2024, 10, 31),
            owner,
        }
        .build(),
        Seed {
            name: "Workstations",
            status: BudgetStatus::Active,
            period: q4,
            total: 50_000,
            committed: 45_000,
            spent: 40_000,
            remaining: 10_000,
            progress: 90,
            initial: Some(40_000),
            due: (2024, 10, 31),
            owner,
        }
        .build(),
    ];
    let licenses = Seed {
        name: "Software Licenses",
        status: BudgetStatus::Active,
        period: q4,
        total: 150_000,
        committed: 135_000,
        spent: 120_000,
        remaining: 30_000,
        progress: 90,
        initial: Some(120_000),
        due: (2024, 10, 31),
        owner,
    }
    .build();
    it_upgrade.children = vec![hardware, licenses];

    vec![
        it_upgrade,
        with_columns(
            Seed {
                name: "Q3 2024 marketing campaign",
                status: BudgetStatus::Active,
                period: FiscalPeriod::Q3,
                total: 500_000,
                committed: 550_000,
                spent: 560_000,
                remaining: -10_000,
                progress: 107,
                initial: Some(400_000),
                due: (2024, 9, 15),
                owner: "Floyd Miles",
            }
            .build(),
            "AdMedia Group",
            "Marketing Office",
            "Marketing Division LLC",
        ),
        Seed {
            name: "Mid-year tax review",
            status: BudgetStatus::Active,
            period: FiscalPeriod::H1,
            total: 150_000,
            committed: 120_000,
            spent: 100_000,
            remaining: 20_000,
            progress: 80,
            initial: Some(200_000),
            due: (2024, 6, 30),
            owner: "Robert Smith",
        }
        .build(),
        Seed {
            name: "Office renovation project",
            status: BudgetStatus::Draft,
            period: FiscalPeriod::OneTime,
            total: 75_000,
            committed: 0,
            spent: 0,
            remaining: 75_000,
            progress: 0,
            initial: Some(75_000),
            due: (2024, 12, 1),
            owner: "Jane Cooper",
        }
        .build(),
        Seed {
            name: "Employee training program",
            status: BudgetStatus::Submitted,
            period: FiscalPeriod::Q2,
            total: 25_000,
            committed: 20_000,
            spent: 0,
            remaining: 0,
            progress: 60,
            initial: Some(20_000),
            due: (2024, 8, 20),
            owner: "Leslie Alexander",
        }
        .build(),
        Seed {
            name: "Customer research initiative",
            status: BudgetStatus::Closed,
            period: FiscalPeriod::Monthly,
            total: 45_000,
            committed: 45_000,
            spent: 45_000,
            remaining: 0,
            progress: 100,
            initial: None,
            due: (2024, 5, 15),
            owner: "Jenny Wilson",
        }
        .build(),
    ]
}
