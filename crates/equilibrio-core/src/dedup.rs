//! At-most-once-per-day notification ledger.
//!
//! Every trigger is identified by `<day>-<discriminator>`, so the same
//! trigger on a new calendar day gets a fresh key. Keys are never expired
//! mid-day; old days' keys just stop being asked about.

use std::collections::HashSet;

use crate::clock::DayKey;

/// Key for a block-start alarm. Keyed by the block's stored time string,
/// so two blocks saved with the same start share one alarm.
pub fn block_alarm_key(day: &DayKey, time: &str) -> String {
    format!("{day}-{time}-ALARM")
}

/// Key for the 15-minute warning ahead of a sacred block.
pub fn sacred_warning_key(day: &DayKey, time: &str, routine_id: &str) -> String {
    format!("{day}-{time}-{routine_id}")
}

/// Key for the daily vitamin-D reminder.
pub fn wellness_key(day: &DayKey) -> String {
    format!("{day}-VITAMIND")
}

#[derive(Debug, Clone, Default)]
pub struct NotificationLedger {
    fired: HashSet<String>,
}

impl NotificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_fire(&self, key: &str) -> bool {
        !self.fired.contains(key)
    }

    pub fn mark_fired(&mut self, key: impl Into<String>) {
        self.fired.insert(key.into());
    }

    /// Check and mark in one step. Returns `true` only the first time.
    pub fn try_fire(&mut self, key: impl Into<String>) -> bool {
        self.fired.insert(key.into())
    }

    pub fn len(&self) -> usize {
        self.fired.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }

    /// Drop every recorded key. The engine never calls this; hosts may.
    pub fn clear(&mut self) {
        self.fired.clear();
    }
}
