//! Block locator.
//!
//! Given a routine and a minute of the day, find the block whose window
//! contains that minute. Block `i` covers `[start_i, end_i)` where `end_i`
//! is the start of the block stored right after it, or `start_i + 60` for
//! the last stored block.
//!
//! Blocks are scanned in stored order, not time order, and a later match
//! overwrites an earlier one. With unsorted or overlapping blocks the last
//! stored match is the active block.
//!
//! Windows do not wrap past midnight. A last block at 23:45 covers
//! `[1425, 1485)` in linear minutes, and since a sample never exceeds 1439
//! it simply stops matching at midnight.

use serde::Serialize;

use crate::clock::ClockTime;
use crate::routine::{Routine, TimeBlock};

/// Duration given to the last stored block, which has no successor.
pub const IMPLICIT_LAST_BLOCK_MINUTES: u32 = 60;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveBlock {
    pub index: usize,
    pub block: TimeBlock,
    pub start: ClockTime,
    /// Exclusive end in minutes since midnight; may exceed 1439.
    pub end_minute: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub active: Option<ActiveBlock>,
    pub is_last_block_of_day: bool,
    /// Earliest block start strictly after the sampled minute.
    pub next_start: Option<ClockTime>,
}

impl Location {
    pub fn active_block(&self) -> Option<&TimeBlock> {
        self.active.as_ref().map(|a| &a.block)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.index)
    }

    pub fn is_sacred(&self) -> bool {
        self.active_block().is_some_and(TimeBlock::is_sacred)
    }
}

/// Window `[start, end)` of the block at `index`, or `None` when either its
/// own time or its successor's time does not parse.
pub fn window(blocks: &[TimeBlock], index: usize) -> Option<(ClockTime, u32)> {
    let start = blocks.get(index)?.start()?;
    let end = match blocks.get(index + 1) {
        Some(next) => next.start()?.minutes(),
        None => start.minutes() + IMPLICIT_LAST_BLOCK_MINUTES,
    };
    Some((start, end))
}

pub fn locate(routine: &Routine, now_minutes: u32) -> Location {
    let blocks = &routine.blocks;
    let mut active = None;

    for index in 0..blocks.len() {
        let Some((start, end)) = window(blocks, index) else {
            continue;
        };
        if start.minutes() <= now_minutes && now_minutes < end {
            active = Some(ActiveBlock {
                index,
                block: blocks[index].clone(),
                start,
                end_minute: end,
            });
        }
    }

    let next_start = blocks
        .iter()
        .filter_map(TimeBlock::start)
        .filter(|s| s.minutes() > now_minutes)
        .min();

    let is_last_block_of_day = active
        .as_ref()
        .is_some_and(|a| a.index + 1 == blocks.len());

    Location {
        active,
        is_last_block_of_day,
        next_start,
    }
}
