//! Hydration of engine state from a [`StateStore`].
//!
//! There is no schema version. A missing key, a store error or a document
//! that fails to parse all read as "absent" and fall back to defaults;
//! corruption is logged, never surfaced.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use super::StateStore;
use crate::error::Result;
use crate::goals::GoalList;
use crate::routine::{Routine, RoutineRepository};
use crate::settings::AppSettings;

pub const ROUTINES_KEY: &str = "equilibrio_routines";
pub const GOALS_KEY: &str = "equilibrio_goals";
pub const SETTINGS_KEY: &str = "equilibrio_settings";
pub const SELECTED_ROUTINE_KEY: &str = "equilibrio_selected_routine";

/// Read and decode `key`, treating every failure as absent.
pub fn load_json<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Option<T> {
    let raw = match store.load(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "failed to read persisted state");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "ignoring corrupt persisted state");
            None
        }
    }
}

/// Field-level `deserialize_with` that turns a null or mistyped value into
/// `T::default()` instead of rejecting the enclosing document.
pub(crate) fn or_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

pub fn save_json<T: Serialize + ?Sized>(store: &dyn StateStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.save(key, &raw)?;
    Ok(())
}

/// Everything the engine hydrates at startup.
#[derive(Debug, Clone)]
pub struct PersistedState {
    pub routines: RoutineRepository,
    pub goals: GoalList,
    pub settings: AppSettings,
}

impl PersistedState {
    pub fn load(store: &dyn StateStore) -> Self {
        let routines: Option<IndexMap<String, Routine>> = load_json(store, ROUTINES_KEY);
        let selected: Option<String> = load_json(store, SELECTED_ROUTINE_KEY);
        Self {
            routines: RoutineRepository::hydrate(routines, selected),
            goals: load_json(store, GOALS_KEY).unwrap_or_default(),
            settings: load_json(store, SETTINGS_KEY).unwrap_or_default(),
        }
    }
}
