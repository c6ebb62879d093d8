//! Routine repository.
//!
//! Holds every routine by id plus the currently selected id. The selected
//! id always names an existing routine: deleting it reselects another one,
//! and deleting the last one restores the built-in set.

use indexmap::IndexMap;
use serde::Serialize;

use super::defaults::{builtin_routines, DEFAULT_ROUTINE_ID, EL_CAMBIO_ID, PDF_IMPORTED_ID};
use super::Routine;
use crate::error::RoutineError;

/// Outcome of [`RoutineRepository::delete`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deletion {
    pub removed: Routine,
    /// New selection, when the removed routine was the selected one.
    pub reselected: Option<String>,
    pub restored_defaults: bool,
}

#[derive(Debug, Clone)]
pub struct RoutineRepository {
    routines: IndexMap<String, Routine>,
    selected: String,
}

impl Default for RoutineRepository {
    fn default() -> Self {
        Self {
            routines: builtin_routines(),
            selected: DEFAULT_ROUTINE_ID.to_string(),
        }
    }
}

impl RoutineRepository {
    /// Build from persisted data, layering it over the built-in set.
    ///
    /// The imported agenda and "El Cambio" routines are re-added whenever
    /// the persisted map lacks them. An unknown persisted selection falls
    /// back to the default routine.
    pub fn hydrate(persisted: Option<IndexMap<String, Routine>>, selected: Option<String>) -> Self {
        let mut routines = builtin_routines();
        if let Some(saved) = persisted {
            let builtin = builtin_routines();
            for (id, routine) in saved {
                routines.insert(id, routine);
            }
            for required in [PDF_IMPORTED_ID, EL_CAMBIO_ID] {
                if let Some(routine) = builtin.get(required) {
                    routines
                        .entry(required.to_string())
                        .or_insert_with(|| routine.clone());
                }
            }
        }

        let mut repo = Self {
            routines,
            selected: DEFAULT_ROUTINE_ID.to_string(),
        };
        match selected {
            Some(id) if repo.routines.contains_key(&id) => repo.selected = id,
            _ => repo.ensure_selection(),
        }
        repo
    }

    pub fn get(&self, id: &str) -> Option<&Routine> {
        self.routines.get(id)
    }

    pub fn list(&self) -> impl Iterator<Item = &Routine> {
        self.routines.values()
    }

    pub fn len(&self) -> usize {
        self.routines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routines.is_empty()
    }

    pub fn routines(&self) -> &IndexMap<String, Routine> {
        &self.routines
    }

    pub fn selected_id(&self) -> &str {
        &self.selected
    }

    pub fn selected(&self) -> Option<&Routine> {
        self.routines.get(&self.selected)
    }

    /// Insert or wholesale-replace a routine, keyed by its id.
    /// Returns the previous version if one existed.
    pub fn upsert(&mut self, routine: Routine) -> Option<Routine> {
        self.routines.insert(routine.id.clone(), routine)
    }

    pub fn select(&mut self, id: &str) -> Result<(), RoutineError> {
        if !self.routines.contains_key(id) {
            return Err(RoutineError::NotFound(id.to_string()));
        }
        self.selected = id.to_string();
        Ok(())
    }

    pub fn delete(&mut self, id: &str) -> Result<Deletion, RoutineError> {
        let removed = self
            .routines
            .shift_remove(id)
            .ok_or_else(|| RoutineError::NotFound(id.to_string()))?;

        if self.selected != id {
            return Ok(Deletion {
                removed,
                reselected: None,
                restored_defaults: false,
            });
        }

        let restored_defaults = self.routines.is_empty();
        self.ensure_selection();
        Ok(Deletion {
            removed,
            reselected: Some(self.selected.clone()),
            restored_defaults,
        })
    }

    fn ensure_selection(&mut self) {
        if self.routines.contains_key(&self.selected) {
            return;
        }
        match self.routines.keys().next() {
            Some(first) => self.selected = first.clone(),
            None => {
                self.routines = builtin_routines();
                self.selected = DEFAULT_ROUTINE_ID.to_string();
            }
        }
    }
}
