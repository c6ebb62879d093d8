//! Routine data model.
//!
//! A [`Routine`] is a named, ordered list of [`TimeBlock`]s. Stored order is
//! significant: the block locator scans blocks in the order they were saved,
//! and each block's window ends where its stored successor starts.

mod defaults;
mod repository;

pub use defaults::{builtin_routines, DEFAULT_ROUTINE_ID, EL_CAMBIO_ID, PDF_IMPORTED_ID};
pub use repository::{Deletion, RoutineRepository};

use serde::{Deserialize, Serialize};

use crate::clock::ClockTime;
use crate::storage::state::or_default;

/// Kind of time block. `Sacred` blocks are protected time and drive the lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Work,
    Sacred,
    Personal,
    Break,
    /// Any stored type this build does not know. Never sacred, never work.
    #[default]
    #[serde(other)]
    Other,
}

/// A checklist item attached to a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// A scheduled activity with a start time and an inferred duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBlock {
    #[serde(default, deserialize_with = "or_default")]
    pub id: String,
    /// `HH:MM`. Kept as the raw string so a bad value never poisons the
    /// whole routine; see [`TimeBlock::start`]. Missing reads as empty.
    #[serde(default, deserialize_with = "or_default")]
    pub time: String,
    #[serde(default, deserialize_with = "or_default")]
    pub activity: String,
    #[serde(rename = "type", default, deserialize_with = "or_default")]
    pub block_type: BlockType,
    /// `None` means enabled.
    #[serde(default, deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
    pub alarm_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtasks: Option<Vec<Subtask>>,
}

impl TimeBlock {
    pub fn new(
        id: impl Into<String>,
        time: impl Into<String>,
        activity: impl Into<String>,
        block_type: BlockType,
    ) -> Self {
        Self {
            id: id.into(),
            time: time.into(),
            activity: activity.into(),
            block_type,
            alarm_enabled: None,
            custom_color: None,
            location: None,
            audio_url: None,
            ai_suggestion: None,
            subtasks: None,
        }
    }

    pub fn with_alarm(mut self, enabled: bool) -> Self {
        self.alarm_enabled = Some(enabled);
        self
    }

    /// Parsed start time, or `None` when `time` is not a valid `HH:MM`.
    pub fn start(&self) -> Option<ClockTime> {
        self.time.parse().ok()
    }

    /// Alarms are on unless explicitly switched off.
    pub fn alarm_enabled(&self) -> bool {
        self.alarm_enabled != Some(false)
    }

    pub fn is_sacred(&self) -> bool {
        self.block_type == BlockType::Sacred
    }
}

/// A named daily routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: String,
    #[serde(default, deserialize_with = "or_default")]
    pub name: String,
    #[serde(default, deserialize_with = "or_default")]
    pub description: String,
    #[serde(default)]
    pub blocks: Vec<TimeBlock>,
}

impl Routine {
    pub fn new(id: impl Into<String>, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            blocks: Vec::new(),
        }
    }

    pub fn with_blocks(mut self, blocks: Vec<TimeBlock>) -> Self {
        self.blocks = blocks;
        self
    }
}
