//! Reference data repository
//!
//! Parent budgets (parents.json) and linkable entities (entities.json). The
//! planner only reads these; `upsert_*` exists for seeding and import.

use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::PlannerError;
use crate::models::{Entity, EntityId, EntityType, ParentBudget, ParentBudgetId};

use super::file_io::{read_json, write_json_atomic};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct ParentData {
    pub parents: Vec<ParentBudget>,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct EntityData {
    pub entities: Vec<Entity>,
}

/// Repository for parent budgets and entities
pub struct Catalog {
    parents_path: PathBuf,
    entities_path: PathBuf,
    parents: RwLock<Vec<ParentBudget>>,
    entities: RwLock<Vec<Entity>>,
}

fn lock_error(e: impl std::fmt::Display) -> PlannerError {
    PlannerError::Storage(format!("Failed to acquire lock: {}", e))
}

impl Catalog {
    pub fn new(parents_path: PathBuf, entities_path: PathBuf) -> Self {
        Self {
            parents_path,
            entities_path,
            parents: RwLock::new(Vec::new()),
            entities: RwLock::new(Vec::new()),
        }
    }

    /// Load both catalogs from disk
    pub fn load(&self) -> Result<(), PlannerError> {
        let parent_data: ParentData = read_json(&self.parents_path)?;
        let entity_data: EntityData = read_json(&self.entities_path)?;

        *self.parents.write().map_err(lock_error)? = parent_data.parents;
        *self.entities.write().map_err(lock_error)? = entity_data.entities;
        Ok(())
    }

    /// Save both catalogs to disk
    pub fn save(&self) -> Result<(), PlannerError> {
        let parents = self.parents.read().map_err(lock_error)?.clone();
        write_json_atomic(&self.parents_path, &ParentData { parents })?;

        let entities = self.entities.read().map_err(lock_error)?.clone();
        write_json_atomic(&self.entities_path, &EntityData { entities })
    }

    /// All parent budgets in catalog order
    pub fn parents(&self) -> Result<Vec<ParentBudget>, PlannerError> {
        Ok(self.parents.read().map_err(lock_error)?.clone())
    }

    pub fn get_parent(&self, id: ParentBudgetId) -> Result<Option<ParentBudget>, PlannerError> {
        let parents = self.parents.read().map_err(lock_error)?;
        Ok(parents.iter().find(|p| p.id == id).cloned())
    }

    /// Find a parent budget by name (case-insensitive) or id
    pub fn find_parent(&self, query: &str) -> Result<Option<ParentBudget>, PlannerError> {
        let parents = self.parents.read().map_err(lock_error)?;
        let query = query.trim();
        Ok(parents
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(query))
            .or_else(|| parents.iter().find(|p| p.id.matches(query)))
            .cloned())
    }

    /// Insert or replace a parent budget (matched by id)
    pub fn upsert_parent(&self, parent: ParentBudget) -> Result<(), PlannerError> {
        let mut parents = self.parents.write().map_err(lock_error)?;
        match parents.iter_mut().find(|p| p.id == parent.id) {
            Some(existing) => *existing = parent,
            None => parents.push(parent),
        }
        Ok(())
    }

    /// All entities, optionally restricted to one type
    pub fn entities(&self, entity_type: Option<EntityType>) -> Result<Vec<Entity>, PlannerError> {
        let entities = self.entities.read().map_err(lock_error)?;
        Ok(entities
            .iter()
            .filter(|e| entity_type.map_or(true, |t| e.entity_type == t))
            .cloned()
            .collect())
    }

    pub fn get_entity(&self, id: EntityId) -> Result<Option<Entity>, PlannerError> {
        let entities = self.entities.read().map_err(lock_error)?;
        Ok(entities.iter().find(|e| e.id == id).cloned())
    }

    /// Find an entity by name (case-insensitive) or id
    pub fn find_entity(&self, query: &str) -> Result<Option<Entity>, PlannerError> {
        let entities = self.entities.read().map_err(lock_error)?;
        let query = query.trim();
        Ok(entities
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(query))
            .or_else(|| entities.iter().find(|e| e.id.matches(query)))
            .cloned())
    }

    /// Insert or replace an entity (matched by id)
    pub fn upsert_entity(&self, entity: Entity) -> Result<(), PlannerError> {
        let mut entities = self.entities.write().map_err(lock_error)?;
        match entities.iter_mut().find(|e| e.id == entity.id) {
            Some(existing) => *existing = entity,
            None => entities.push(entity),
        }
        Ok(())
    }
}
