//! Draft repository
//!
//! Each draft lives in its own file, `<drafts_dir>/<uuid>.json`, so editing
//! one draft never rewrites another.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PlannerError;
use crate::models::{BudgetDraft, DraftId};

use super::file_io::{read_json_required, remove_file_if_exists, write_json_atomic};

/// Repository for budget drafts
pub struct DraftRepository {
    dir: PathBuf,
}

impl DraftRepository {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: DraftId) -> PathBuf {
        self.dir.join(format!("{}.json", id.as_uuid()))
    }

    /// Persist a draft, replacing any previous version
    pub fn save(&self, draft: &BudgetDraft) -> Result<(), PlannerError> {
        write_json_atomic(self.path_for(draft.id), draft)
    }

    pub fn get(&self, id: DraftId) -> Result<Option<BudgetDraft>, PlannerError> {
        let path = self.path_for(id);
        if !path.exists() {
            return Ok(None);
        }
        read_json_required(path).map(Some)
    }

    /// All drafts, most recently updated first
    pub fn list(&self) -> Result<Vec<BudgetDraft>, PlannerError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.dir).map_err(|e| {
            PlannerError::Storage(format!("Failed to read {}: {}", self.dir.display(), e))
        })?;

        let mut drafts = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| PlannerError::Storage(format!("Failed to read draft entry: {}", e)))?
                .path();
            if path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                drafts.push(read_json_required::<BudgetDraft, _>(&path)?);
            }
        }

        drafts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(drafts)
    }

    /// Find a draft by id (full or short form) or by name (case-insensitive)
    pub fn find(&self, query: &str) -> Result<Option<BudgetDraft>, PlannerError> {
        if let Ok(id) = query.trim().parse::<DraftId>() {
            if let Some(draft) = self.get(id)? {
                return Ok(Some(draft));
            }
        }

        let query = query.trim();
        let drafts = self.list()?;
        let by_name = drafts
            .iter()
            .position(|d| d.name.eq_ignore_ascii_case(query));
        let index = by_name.or_else(|| drafts.iter().position(|d| d.id.matches(query)));
        Ok(index.map(|i| drafts[i].clone()))
    }

    /// Delete a draft; returns whether it existed
    pub fn delete(&self, id: DraftId) -> Result<bool, PlannerError> {
        remove_file_if_exists(self.path_for(id))
    }
}
