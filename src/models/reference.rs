//! Read-only reference data supplied by the host
//!
//! Parent budgets constrain how large a new budget may be; entities are the
//! vendors, properties and legal entities a line item can be linked to.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{EntityId, ParentBudgetId};
use super::money::Money;

/// A higher-level budget whose unallocated capacity bounds child budgets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentBudget {
    pub id: ParentBudgetId,
    pub name: String,
    /// Total size of the parent budget
    pub amount: Money,
    /// Unallocated capacity left in the parent budget
    pub available: Money,
}

impl ParentBudget {
    /// Create a new parent budget
    pub fn new(name: impl Into<String>, amount: Money, available: Money) -> Self {
        Self {
            id: ParentBudgetId::new(),
            name: name.into(),
            amount,
            available,
        }
    }

    /// Portion of the parent already allocated elsewhere
    pub fn allocated(&self) -> Money {
        self.amount - self.available
    }
}

impl fmt::Display for ParentBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} available)", self.name, self.available)
    }
}

/// Kind of entity a line item can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Vendor,
    Property,
    LegalEntity,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vendor => write!(f, "Vendor"),
            Self::Property => write!(f, "Property"),
            Self::LegalEntity => write!(f, "Legal entity"),
        }
    }
}

/// An external vendor, property or legal entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: EntityType,
}

impl Entity {
    /// Create a new entity
    pub fn new(name: impl Into<String>, entity_type: EntityType) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            entity_type,
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.name, self.entity_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_allocated() {
        let parent = ParentBudget::new(
            "Johnson Family Trust",
            Money::from_units(50_000_000),
            Money::from_units(40_000_000),
        );
        assert_eq!(parent.allocated(), Money::from_units(10_000_000));
    }

    #[test]
    fn test_entity_type_serialization() {
        let json = serde_json::to_string(&EntityType::LegalEntity).unwrap();
        assert_eq!(json, "\"legal-entity\"");
    }

    #[test]
    fn test_entity_uses_type_key() {
        let entity = Entity::new("Downtown Office", EntityType::Property);
        let json = serde_json::to_value(&entity).unwrap();
        assert_eq!(json["type"], "property");
        assert_eq!(entity.to_string(), "Downtown Office [Property]");
    }
}
