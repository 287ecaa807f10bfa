//! Channel number assignment strategies, grounded on
//! `teamarr/database/channel_numbers.py` and spec.md §5's three numbering
//! modes.
//!
//! All three modes operate over the same inputs — a global range and the
//! set of numbers already in use — and differ only in how they carve a
//! group's numbers out of that range.

use std::collections::BTreeSet;

use crate::errors::{LifecycleError, LifecycleResult};
use crate::models::group::ChannelNumberingMode;

/// Gap left between consecutive rational-block assignments so a later
/// insertion can slot in without renumbering its neighbors.
const RATIONAL_BLOCK_GAP: u32 = 10;

pub struct NumberingPlan {
    pub range_start: u32,
    pub range_end: u32,
}

/// Rounds `n` (never below 1) up to the next multiple of
/// [`RATIONAL_BLOCK_GAP`] — the block-reservation sizing rule spec.md §3/§5
/// applies to both `strict_block` (sized from a group's potential stream
/// count) and `rational_block` (sized from its actual current channel
/// count).
pub fn round_up_to_block_size(n: u32) -> u32 {
    let n = n.max(1);
    let gap = RATIONAL_BLOCK_GAP;
    n.div_ceil(gap) * gap
}

impl NumberingPlan {
    pub fn new(range_start: u32, range_end: u32) -> Self {
        Self { range_start, range_end }
    }

    /// Assigns the next available number for a channel in `group`, given
    /// numbers already assigned anywhere in the global range.
    pub fn assign(
        &self,
        mode: ChannelNumberingMode,
        group_start: Option<u32>,
        block_size: u32,
        index_in_group: u32,
        used: &BTreeSet<u32>,
    ) -> LifecycleResult<u32> {
        match mode {
            ChannelNumberingMode::StrictBlock => self.strict_block(group_start, block_size, index_in_group, used),
            ChannelNumberingMode::RationalBlock => self.rational_block(group_start, block_size, index_in_group, used),
            ChannelNumberingMode::StrictCompact => self.strict_compact(used),
        }
    }

    /// Reserves `[group_start, group_start + block_size)` for the group and
    /// fills it in order; a taken slot inside the block means the block is
    /// undersized for the group's current stream count.
    fn strict_block(
        &self,
        group_start: Option<u32>,
        block_size: u32,
        index_in_group: u32,
        used: &BTreeSet<u32>,
    ) -> LifecycleResult<u32> {
        let start = group_start.unwrap_or(self.range_start);
        let block_end = start.saturating_add(block_size);
        let mut candidate = start.saturating_add(index_in_group);

        while candidate < block_end {
            if !used.contains(&candidate) {
                return Ok(candidate);
            }
            candidate += 1;
        }

        Err(LifecycleError::NumberingExhausted {
            start,
            end: block_end,
        })
    }

    /// Same shape as [`Self::strict_block`] — reserves a contiguous range
    /// and fills it in order — but the caller sizes `block_size` from the
    /// group's *actual current* channel count rounded up to
    /// [`RATIONAL_BLOCK_GAP`] (via [`round_up_to_block_size`]), not its
    /// potential stream count, so a group that never reaches its full
    /// stream count doesn't reserve numbers it will never use.
    fn rational_block(
        &self,
        group_start: Option<u32>,
        block_size: u32,
        index_in_group: u32,
        used: &BTreeSet<u32>,
    ) -> LifecycleResult<u32> {
        self.strict_block(group_start, block_size, index_in_group, used)
    }

    /// Ignores group boundaries entirely: takes the lowest free number in
    /// the whole range, so deletions never leave permanent gaps.
    fn strict_compact(&self, used: &BTreeSet<u32>) -> LifecycleResult<u32> {
        (self.range_start..=self.range_end)
            .find(|n| !used.contains(n))
            .ok_or(LifecycleError::NumberingExhausted {
                start: self.range_start,
                end: self.range_end,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_block_fills_in_order() {
        let plan = NumberingPlan::new(100, 200);
        let used = BTreeSet::new();
        let n = plan
            .assign(ChannelNumberingMode::StrictBlock, Some(100), 10, 3, &used)
            .unwrap();
        assert_eq!(n, 103);
    }

    #[test]
    fn strict_block_exhausted_errors() {
        let plan = NumberingPlan::new(100, 200);
        let used: BTreeSet<u32> = (100..110).collect();
        let err = plan.assign(ChannelNumberingMode::StrictBlock, Some(100), 10, 0, &used);
        assert!(err.is_err());
    }

    #[test]
    fn rational_block_sizes_from_rounded_current_count() {
        let plan = NumberingPlan::new(100, 500);
        let used = BTreeSet::new();
        let block_size = round_up_to_block_size(3);
        let n = plan
            .assign(ChannelNumberingMode::RationalBlock, Some(100), block_size, 2, &used)
            .unwrap();
        assert_eq!(block_size, 10);
        assert_eq!(n, 102);
    }

    #[test]
    fn round_up_to_block_size_rounds_to_next_gap() {
        assert_eq!(round_up_to_block_size(1), 10);
        assert_eq!(round_up_to_block_size(10), 10);
        assert_eq!(round_up_to_block_size(11), 20);
    }

    #[test]
    fn strict_compact_finds_lowest_free() {
        let plan = NumberingPlan::new(100, 200);
        let mut used = BTreeSet::new();
        used.insert(100);
        used.insert(101);
        let n = plan.assign(ChannelNumberingMode::StrictCompact, None, 0, 0, &used).unwrap();
        assert_eq!(n, 102);
    }
}
