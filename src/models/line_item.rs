//! Line item model
//!
//! A line item is one node of a budget's allocation tree. Its own `amount` is
//! the allocation for that node; the children split that allocation further.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EntityId, LineItemId};
use super::money::{parse_amount, Money};

/// Cost category of a line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CostType {
    /// Soft costs (fees, design, permits, ...)
    Soft,
    /// Hard costs (construction, materials, ...)
    Hard,
}

impl CostType {
    /// Parse a cost type from user input; "none", "" and "uncategorized" clear it
    pub fn parse_optional(s: &str) -> Result<Option<Self>, String> {
        match s.trim().to_lowercase().as_str() {
            "soft" => Ok(Some(Self::Soft)),
            "hard" => Ok(Some(Self::Hard)),
            "" | "none" | "uncategorized" => Ok(None),
            other => Err(format!("Unknown cost type: {}", other)),
        }
    }
}

impl fmt::Display for CostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Soft => write!(f, "Soft"),
            Self::Hard => write!(f, "Hard"),
        }
    }
}

/// A node in the budget allocation tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    /// Unique identifier, never reused
    pub id: LineItemId,

    /// Display label, may be empty
    #[serde(default)]
    pub name: String,

    /// This node's own allocation
    #[serde(default)]
    pub amount: Money,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Soft/hard cost category; `None` means uncategorized
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_type: Option<CostType>,

    /// Linked vendors, properties or legal entities
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub linked_entity_ids: Vec<EntityId>,

    /// Sub-items in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LineItem>,
}

impl LineItem {
    /// Create an empty line item with a fresh id
    pub fn new() -> Self {
        Self::with_id(LineItemId::new())
    }

    /// Create an empty line item keeping an existing id
    pub fn with_id(id: LineItemId) -> Self {
        Self {
            id,
            name: String::new(),
            amount: Money::zero(),
            description: String::new(),
            cost_type: None,
            linked_entity_ids: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Create an empty child that inherits this item's cost type and links
    pub fn child_template(&self) -> Self {
        Self {
            cost_type: self.cost_type,
            linked_entity_ids: self.linked_entity_ids.clone(),
            ..Self::new()
        }
    }

    /// Builder-style name setter
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Builder-style amount setter
    pub fn with_amount(mut self, amount: Money) -> Self {
        self.amount = amount;
        self
    }

    /// Builder-style cost type setter
    pub fn with_cost_type(mut self, cost_type: Option<CostType>) -> Self {
        self.cost_type = cost_type;
        self
    }

    /// Builder-style children setter
    pub fn with_children(mut self, children: Vec<LineItem>) -> Self {
        self.children = children;
        self
    }

    /// Whether this item has sub-items
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Sum of the direct children's amounts
    pub fn children_total(&self) -> Money {
        self.children.iter().map(|c| c.amount).sum()
    }

    /// Own amount minus the children's amounts; zero for leaves
    pub fn overflow(&self) -> Money {
        if self.children.is_empty() {
            Money::zero()
        } else {
            self.amount - self.children_total()
        }
    }

    /// Apply a single typed field update in place
    pub fn apply(&mut self, update: LineItemUpdate) {
        match update {
            LineItemUpdate::SetName(name) => self.name = name,
            LineItemUpdate::SetAmount(amount) => self.amount = amount,
            LineItemUpdate::SetDescription(description) => self.description = description,
            LineItemUpdate::SetCostType(cost_type) => self.cost_type = cost_type,
            LineItemUpdate::SetLinkedEntities(ids) => {
                let mut unique = Vec::with_capacity(ids.len());
                for id in ids {
                    if !unique.contains(&id) {
                        unique.push(id);
                    }
                }
                self.linked_entity_ids = unique;
            }
        }
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.is_empty() {
            "(unnamed)"
        } else {
            &self.name
        };
        write!(f, "{} {}", name, self.amount)
    }
}

/// A field-level update to a line item
#[derive(Debug, Clone, PartialEq)]
pub enum LineItemUpdate {
    SetName(String),
    SetAmount(Money),
    SetDescription(String),
    SetCostType(Option<CostType>),
    SetLinkedEntities(Vec<EntityId>),
}

impl LineItemUpdate {
    /// Build an amount update from raw user input
    pub fn amount_from_input(text: &str) -> Self {
        Self::SetAmount(parse_amount(text))
    }

    /// The field this update touches, for change summaries
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::SetName(_) => "name",
            Self::SetAmount(_) => "amount",
            Self::SetDescription(_) => "description",
            Self::SetCostType(_) => "cost_type",
            Self::SetLinkedEntities(_) => "linked_entity_ids",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn units(n: i64) -> Money {
        Money::from_units(n)
    }

    #[test]
    fn test_new_item_is_empty() {
        let item = LineItem::new();
        assert!(item.name.is_empty());
        assert!(item.amount.is_zero());
        assert!(item.cost_type.is_none());
        assert!(item.linked_entity_ids.is_empty());
        assert!(!item.has_children());
    }

    #[test]
    fn test_overflow_with_headroom() {
        let item = LineItem::new().with_amount(units(1000)).with_children(vec![
            LineItem::new().with_amount(units(600)),
            LineItem::new().with_amount(units(300)),
        ]);
        assert_eq!(item.overflow(), units(100));
    }

    #[test]
    fn test_overflow_over_allocated() {
        let item = LineItem::new().with_amount(units(1000)).with_children(vec![
            LineItem::new().with_amount(units(600)),
            LineItem::new().with_amount(units(500)),
        ]);
        assert_eq!(item.overflow(), units(-100));
    }

    #[test]
    fn test_leaf_overflow_is_zero() {
        let item = LineItem::new().with_amount(units(1000));
        assert_eq!(item.overflow(), Money::zero());
    }

    #[test]
    fn test_child_template_inherits_category_and_links() {
        let entity = EntityId::new();
        let mut parent = LineItem::new()
            .named("Construction")
            .with_amount(units(500))
            .with_cost_type(Some(CostType::Hard));
        parent.linked_entity_ids.push(entity);

        let child = parent.child_template();
        assert_ne!(child.id, parent.id);
        assert_eq!(child.cost_type, Some(CostType::Hard));
        assert_eq!(child.linked_entity_ids, vec![entity]);
        assert!(child.name.is_empty());
        assert!(child.amount.is_zero());
    }

    #[test]
    fn test_apply_updates() {
        let mut item = LineItem::new();
        item.apply(LineItemUpdate::SetName("Design".into()));
        item.apply(LineItemUpdate::amount_from_input("12,500"));
        item.apply(LineItemUpdate::SetCostType(Some(CostType::Soft)));
        assert_eq!(item.name, "Design");
        assert_eq!(item.amount, units(12_500));
        assert_eq!(item.cost_type, Some(CostType::Soft));
    }

    #[test]
    fn test_linked_entities_are_deduplicated() {
        let a = EntityId::new();
        let b = EntityId::new();
        let mut item = LineItem::new();
        item.apply(LineItemUpdate::SetLinkedEntities(vec![a, b, a]));
        assert_eq!(item.linked_entity_ids, vec![a, b]);
    }

    #[test]
    fn test_parse_cost_type() {
        assert_eq!(CostType::parse_optional("Soft"), Ok(Some(CostType::Soft)));
        assert_eq!(CostType::parse_optional("hard"), Ok(Some(CostType::Hard)));
        assert_eq!(CostType::parse_optional("none"), Ok(None));
        assert!(CostType::parse_optional("medium").is_err());
    }

    #[test]
    fn test_serialization_skips_empty_fields() {
        let item = LineItem::new().named("Permits");
        let json = serde_json::to_string(&item).unwrap();
        assert!(!json.contains("children"));
        assert!(!json.contains("cost_type"));

        let back: LineItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
