//! Combined allocation + detection result.

use serde::{Deserialize, Serialize};

use crate::detection::detect_double_bookings;
use crate::models::{Conflict, DoubleBooking, UnmetDemand, WeeklyGrid};

use super::{Allocation, Statistics};

/// Grid, every conflict and the statistics, as consumed by a display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleReport {
    pub grid: WeeklyGrid,
    /// Unmet demand first (allocation order), then double bookings (scan order).
    pub conflicts: Vec<Conflict>,
    pub statistics: Statistics,
}

impl ScheduleReport {
    /// Runs double-booking detection over an allocation's grid and merges
    /// the results.
    pub fn analyze(allocation: Allocation) -> Self {
        let Allocation {
            grid,
            unmet,
            mut statistics,
        } = allocation;
        let bookings = detect_double_bookings(&grid);
        statistics.record_conflicts(bookings.len());
        Self {
            conflicts: merge_conflicts(unmet, bookings),
            grid,
            statistics,
        }
    }

    /// Re-analyzes an edited grid against the unmet demand of the last
    /// allocation. Required/allocated totals carry over unchanged.
    pub fn reanalyze(grid: WeeklyGrid, unmet: Vec<UnmetDemand>, base: Statistics) -> Self {
        let conflicts = merge_conflicts(unmet, detect_double_bookings(&grid));
        let statistics = Statistics::calculate(
            base.required_total,
            base.allocated_total,
            conflicts.len(),
        );
        Self {
            grid,
            conflicts,
            statistics,
        }
    }

    /// Unmet-demand conflicts only.
    pub fn unmet(&self) -> impl Iterator<Item = &UnmetDemand> {
        self.conflicts.iter().filter_map(|c| match c {
            Conflict::UnmetDemand(u) => Some(u),
            Conflict::DoubleBooking(_) => None,
        })
    }

    /// Whether the report carries no conflict.
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }
}

fn merge_conflicts(unmet: Vec<UnmetDemand>, bookings: Vec<DoubleBooking>) -> Vec<Conflict> {
    unmet
        .into_iter()
        .map(Conflict::from)
        .chain(bookings.into_iter().map(Conflict::from))
        .collect()
}
