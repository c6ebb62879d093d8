use chrono::NaiveDateTime;
use serde::Serialize;

use crate::dispatch::NoticeKind;
use crate::lock::ReleaseReason;

/// Every state change the engine makes produces an Event.
/// Hosts render them; the CLI prints them as JSON lines.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    LockEngaged {
        routine_id: String,
        block_id: String,
        label: String,
        at: NaiveDateTime,
    },
    LockReleased {
        reason: ReleaseReason,
        at: NaiveDateTime,
    },
    NoticeFired {
        kind: NoticeKind,
        key: String,
        message: String,
        at: NaiveDateTime,
    },
    RoutineSelected {
        routine_id: String,
        at: NaiveDateTime,
    },
    RoutineUpdated {
        routine_id: String,
        created: bool,
        at: NaiveDateTime,
    },
    RoutineDeleted {
        routine_id: String,
        reselected: Option<String>,
        restored_defaults: bool,
        at: NaiveDateTime,
    },
    MuteChanged {
        muted: bool,
        at: NaiveDateTime,
    },
    SettingsUpdated {
        at: NaiveDateTime,
    },
}
