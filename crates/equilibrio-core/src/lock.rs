//! Sacred-block lock.
//!
//! ```text
//! Unlocked --(sacred block active)--> Locked
//! Locked --(sacred block active)--> Locked   (label refreshed)
//! Locked --(no sacred block | emergency unlock)--> Unlocked
//! ```
//!
//! An emergency unlock does not suppress the block: the next tick that
//! still sees a sacred block locks again.

use serde::{Deserialize, Serialize};

use crate::routine::TimeBlock;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LockState {
    pub locked: bool,
    /// Activity of the sacred block holding the lock. Kept after release
    /// so hosts can fade the overlay out with the last label.
    pub active_sacred_activity_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseReason {
    Natural,
    Emergency,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockTransition {
    Engaged { label: String },
    Released { reason: ReleaseReason },
}

#[derive(Debug, Clone, Default)]
pub struct SacredLock {
    state: LockState,
}

impl SacredLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LockState {
        &self.state
    }

    pub fn is_locked(&self) -> bool {
        self.state.locked
    }

    /// Feed the tick's active block. Returns a transition when the lock
    /// flag changed.
    pub fn observe(&mut self, active: Option<&TimeBlock>) -> Option<LockTransition> {
        match active.filter(|b| b.is_sacred()) {
            Some(block) => {
                self.state.active_sacred_activity_label = block.activity.clone();
                if self.state.locked {
                    return None;
                }
                self.state.locked = true;
                Some(LockTransition::Engaged {
                    label: block.activity.clone(),
                })
            }
            None if self.state.locked => {
                self.state.locked = false;
                Some(LockTransition::Released {
                    reason: ReleaseReason::Natural,
                })
            }
            None => None,
        }
    }

    /// User override. Returns `None` when the lock was not engaged.
    pub fn emergency_unlock(&mut self) -> Option<LockTransition> {
        if !self.state.locked {
            return None;
        }
        self.state.locked = false;
        Some(LockTransition::Released {
            reason: ReleaseReason::Emergency,
        })
    }
}
