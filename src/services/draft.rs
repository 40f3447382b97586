//! Draft service
//!
//! Storage-backed editing of budget drafts: creating drafts, editing the
//! line item tree and sizing settings, evaluating and submitting. Every
//! change is persisted and written to the audit log.

use chrono::NaiveDate;

use crate::audit::EntityType;
use crate::error::{PlannerError, PlannerResult};
use crate::models::{
    BudgetDraft, BudgetSummary, Contingency, CostType, Currency, FiscalPeriod, LineItemId,
    LineItemTree, LineItemUpdate, ParentBudget, SizingStrategy,
};
use crate::storage::Storage;

use super::sizing::BudgetEvaluation;
use super::submission::{self, SubmitAction};

/// Which contingency a setting applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContingencyKind {
    Soft,
    Hard,
}

impl From<CostType> for ContingencyKind {
    fn from(cost_type: CostType) -> Self {
        match cost_type {
            CostType::Soft => Self::Soft,
            CostType::Hard => Self::Hard,
        }
    }
}

/// Service for draft management
pub struct DraftService<'a> {
    storage: &'a Storage,
}

impl<'a> DraftService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create and persist a new draft with a single blank line item
    pub fn create(
        &self,
        name: &str,
        currency: Currency,
        period: FiscalPeriod,
    ) -> PlannerResult<BudgetDraft> {
        let mut draft = BudgetDraft::new(name.trim());
        draft.currency = currency;
        draft.period = period;

        self.storage.drafts.save(&draft)?;
        self.storage.log_create(
            EntityType::Draft,
            draft.id.to_string(),
            Some(draft.name.clone()),
            &draft,
        )?;

        Ok(draft)
    }

    /// Find a draft by name or id
    pub fn find(&self, query: &str) -> PlannerResult<BudgetDraft> {
        self.storage
            .drafts
            .find(query)?
            .ok_or_else(|| PlannerError::draft_not_found(query))
    }

    /// All drafts, most recently updated first
    pub fn list(&self) -> PlannerResult<Vec<BudgetDraft>> {
        self.storage.drafts.list()
    }

    /// Look up the draft's parent budget in the catalog
    pub fn resolve_parent(&self, draft: &BudgetDraft) -> PlannerResult<Option<ParentBudget>> {
        match draft.parent_budget_id {
            None => Ok(None),
            Some(id) => self
                .storage
                .catalog
                .get_parent(id)?
                .map(Some)
                .ok_or_else(|| PlannerError::parent_budget_not_found(id.to_string())),
        }
    }

    /// Evaluate a draft against its parent budget
    pub fn evaluate(&self, draft: &BudgetDraft) -> PlannerResult<BudgetEvaluation> {
        let parent = self.resolve_parent(draft)?;
        Ok(BudgetEvaluation::evaluate(draft, parent.as_ref()))
    }

    /// Apply `change` to the stored draft, persist it and log the difference
    pub fn modify<F>(&self, query: &str, change: F) -> PlannerResult<BudgetDraft>
    where
        F: FnOnce(&mut BudgetDraft) -> PlannerResult<()>,
    {
        let before = self.find(query)?;
        let mut draft = before.clone();
        change(&mut draft)?;
        draft.touch();

        self.storage.drafts.save(&draft)?;
        self.storage.log_update(
            EntityType::Draft,
            draft.id.to_string(),
            Some(draft.name.clone()),
            &before,
            &draft,
        )?;

        Ok(draft)
    }

    /// Add a line item at the top level or under `parent_item`, then apply
    /// `updates` to it as part of the same change
    pub fn add_item(
        &self,
        query: &str,
        parent_item: Option<&str>,
        updates: Vec<LineItemUpdate>,
    ) -> PlannerResult<(BudgetDraft, LineItemId)> {
        let mut added = None;
        let draft = self.modify(query, |draft| {
            let parent_id = parent_item
                .map(|item| resolve_item(&draft.line_items, item))
                .transpose()?;
            let (mut tree, id) = draft.line_items.add(parent_id);
            if let Some(id) = id {
                for update in updates {
                    tree = tree.update(id, update);
                }
            }
            draft.line_items = tree;
            added = id;
            Ok(())
        })?;

        let id = added.ok_or_else(|| {
            PlannerError::line_item_not_found(parent_item.unwrap_or_default())
        })?;
        Ok((draft, id))
    }

    /// Remove a line item and its subtree
    pub fn remove_item(&self, query: &str, item: &str) -> PlannerResult<BudgetDraft> {
        self.modify(query, |draft| {
            let id = resolve_item(&draft.line_items, item)?;
            draft.line_items = draft.line_items.remove(id);
            Ok(())
        })
    }

    /// Apply field updates to one line item
    pub fn update_item(
        &self,
        query: &str,
        item: &str,
        updates: Vec<LineItemUpdate>,
    ) -> PlannerResult<BudgetDraft> {
        self.modify(query, |draft| {
            let id = resolve_item(&draft.line_items, item)?;
            for update in updates {
                draft.line_items = draft.line_items.update(id, update);
            }
            Ok(())
        })
    }

    /// Link a line item to catalog entities given by name or id
    pub fn link_entities(
        &self,
        query: &str,
        item: &str,
        entities: &[String],
    ) -> PlannerResult<BudgetDraft> {
        let ids = entities
            .iter()
            .map(|name| {
                self.storage
                    .catalog
                    .find_entity(name)?
                    .map(|entity| entity.id)
                    .ok_or_else(|| PlannerError::entity_not_found(name.as_str()))
            })
            .collect::<PlannerResult<Vec<_>>>()?;

        self.update_item(query, item, vec![LineItemUpdate::SetLinkedEntities(ids)])
    }

    /// Change the sizing strategy and its raw value
    pub fn set_sizing(
        &self,
        query: &str,
        strategy: SizingStrategy,
        value: &str,
    ) -> PlannerResult<BudgetDraft> {
        self.modify(query, |draft| {
            draft.sizing_strategy = strategy;
            draft.sizing_value = value.trim().to_string();
            Ok(())
        })
    }

    /// Attach the draft to a parent budget (by name or id), or detach it
    pub fn set_parent(&self, query: &str, parent: Option<&str>) -> PlannerResult<BudgetDraft> {
        let parent_id = match parent {
            Some(name) => Some(
                self.storage
                    .catalog
                    .find_parent(name)?
                    .ok_or_else(|| PlannerError::parent_budget_not_found(name))?
                    .id,
            ),
            None => None,
        };

        self.modify(query, |draft| {
            draft.parent_budget_id = parent_id;
            Ok(())
        })
    }

    pub fn set_contingency(
        &self,
        query: &str,
        kind: ContingencyKind,
        contingency: Contingency,
    ) -> PlannerResult<BudgetDraft> {
        self.modify(query, |draft| {
            match kind {
                ContingencyKind::Soft => draft.soft_contingency = contingency,
                ContingencyKind::Hard => draft.hard_contingency = contingency,
            }
            Ok(())
        })
    }

    /// Set explicit start and end dates
    pub fn set_dates(
        &self,
        query: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> PlannerResult<BudgetDraft> {
        self.modify(query, |draft| {
            draft.start_date = start;
            draft.end_date = end;
            draft
                .validate()
                .map_err(|e| PlannerError::Validation(e.to_string()))
        })
    }

    /// Change the fiscal period and take its date range within `year`
    pub fn set_period(
        &self,
        query: &str,
        period: FiscalPeriod,
        year: i32,
        today: NaiveDate,
    ) -> PlannerResult<BudgetDraft> {
        self.modify(query, |draft| {
            draft.period = period;
            if let Some((start, end)) = period.date_range(year, today) {
                draft.start_date = Some(start);
                draft.end_date = Some(end);
            }
            Ok(())
        })
    }

    /// Rename, re-describe or change currency
    pub fn set_details(
        &self,
        query: &str,
        name: Option<&str>,
        description: Option<&str>,
        currency: Option<Currency>,
    ) -> PlannerResult<BudgetDraft> {
        self.modify(query, |draft| {
            if let Some(name) = name {
                draft.name = name.trim().to_string();
            }
            if let Some(description) = description {
                draft.description = description.to_string();
            }
            if let Some(currency) = currency {
                draft.currency = currency;
            }
            Ok(())
        })
    }

    /// Submit or publish a draft.
    ///
    /// On success the budget row is appended to the budget list and the
    /// draft is removed.
    pub fn submit(&self, query: &str, action: SubmitAction) -> PlannerResult<BudgetSummary> {
        let draft = self.find(query)?;
        let parent = self.resolve_parent(&draft)?;
        let entities = self.storage.catalog.entities(None)?;

        let row = submission::submit(&draft, parent.as_ref(), &entities, action)?;

        self.storage.budgets.append(row.clone())?;
        self.storage.budgets.save()?;
        self.storage.drafts.delete(draft.id)?;
        self.storage.log_submit(
            draft.id.to_string(),
            Some(draft.name.clone()),
            &row,
            action.to_string(),
        )?;
        self.storage.log_create(
            EntityType::Budget,
            row.id.to_string(),
            Some(row.name.clone()),
            &row,
        )?;

        Ok(row)
    }

    /// Store a draft read from an export file, replacing any draft with the same id
    pub fn import(&self, draft: BudgetDraft) -> PlannerResult<BudgetDraft> {
        draft
            .validate()
            .map_err(|e| PlannerError::Validation(e.to_string()))?;

        self.storage.drafts.save(&draft)?;
        self.storage.log_create(
            EntityType::Draft,
            draft.id.to_string(),
            Some(draft.name.clone()),
            &draft,
        )?;
        Ok(draft)
    }

    /// Delete a draft
    pub fn delete(&self, query: &str) -> PlannerResult<BudgetDraft> {
        let draft = self.find(query)?;
        self.storage.drafts.delete(draft.id)?;
        self.storage.log_delete(
            EntityType::Draft,
            draft.id.to_string(),
            Some(draft.name.clone()),
            &draft,
        )?;
        Ok(draft)
    }
}

/// Resolve a user reference to a line item.
///
/// Accepts a 1-based position path (`2`, `1.3`), a name (case-insensitive,
/// first match depth-first) or an id.
pub fn resolve_item(tree: &LineItemTree, query: &str) -> PlannerResult<LineItemId> {
    let query = query.trim();

    if !query.is_empty() && query.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return resolve_path(tree, query).ok_or_else(|| PlannerError::line_item_not_found(query));
    }

    tree.iter()
        .map(|(_, item)| item)
        .find(|item| !item.name.is_empty() && item.name.eq_ignore_ascii_case(query))
        .or_else(|| tree.iter().map(|(_, item)| item).find(|item| item.id.matches(query)))
        .map(|item| item.id)
        .ok_or_else(|| PlannerError::line_item_not_found(query))
}

fn resolve_path(tree: &LineItemTree, query: &str) -> Option<LineItemId> {
    let positions = query
        .split('.')
        .map(|part| part.parse::<usize>().ok().filter(|&n| n > 0))
        .collect::<Option<Vec<_>>>()?;

    let (first, rest) = positions.split_first()?;
    let mut item = tree.items().get(first - 1)?;
    for position in rest {
        item = item.children.get(position - 1)?;
    }
    Some(item.id)
}
