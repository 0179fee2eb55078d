//! Allocation quality metrics.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Required total | Sum of every demand requirement |
//! | Allocated total | Sessions the allocator placed |
//! | Efficiency | round(100 × allocated / required), 0 when nothing is required |
//! | Conflict count | Unmet-demand plus double-booking conflicts |

use serde::{Deserialize, Serialize};

/// Efficiency at or above which a schedule is considered healthy.
pub const HEALTHY_EFFICIENCY: u32 = 80;

/// Aggregate allocation statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    /// Sum of all required sessions.
    pub required_total: u32,
    /// Sum of all sessions placed.
    pub allocated_total: u32,
    /// Rounded allocated/required percentage.
    pub efficiency_percent: u32,
    /// Conflicts of both kinds.
    pub conflict_count: usize,
}

impl Statistics {
    /// Computes statistics from totals.
    pub fn calculate(required_total: u32, allocated_total: u32, conflict_count: usize) -> Self {
        Self {
            required_total,
            allocated_total,
            efficiency_percent: efficiency_percent(required_total, allocated_total),
            conflict_count,
        }
    }

    /// Adds conflicts found after allocation (double bookings).
    pub fn record_conflicts(&mut self, count: usize) {
        self.conflict_count += count;
    }

    /// Whether efficiency strictly exceeds `threshold` percent.
    pub fn exceeds(&self, threshold: u32) -> bool {
        self.efficiency_percent > threshold
    }

    /// Whether the schedule is conflict-free with healthy efficiency.
    pub fn is_healthy(&self) -> bool {
        self.conflict_count == 0 && self.exceeds(HEALTHY_EFFICIENCY)
    }
}

/// `round(100 * allocated / required)`, rounding halves up.
///
/// Returns 0 when `required` is 0: with nothing demanded there is no
/// ratio to report.
pub fn efficiency_percent(required: u32, allocated: u32) -> u32 {
    if required == 0 {
        return 0;
    }
    let (required, allocated) = (u64::from(required), u64::from(allocated));
    ((200 * allocated + required) / (2 * required)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_efficiency_basic() {
        assert_eq!(efficiency_percent(10, 7), 70);
        assert_eq!(efficiency_percent(32, 32), 100);
    }

    #[test]
    fn test_efficiency_rounding() {
        // 2/3 = 66.67 → 67, 1/3 = 33.33 → 33, 1/8 = 12.5 → 13
        assert_eq!(efficiency_percent(3, 2), 67);
        assert_eq!(efficiency_percent(3, 1), 33);
        assert_eq!(efficiency_percent(8, 1), 13);
    }

    #[test]
    fn test_efficiency_zero_required() {
        assert_eq!(efficiency_percent(0, 0), 0);
        let stats = Statistics::calculate(0, 0, 0);
        assert_eq!(stats.efficiency_percent, 0);
    }

    #[test]
    fn test_record_conflicts() {
        let mut stats = Statistics::calculate(10, 7, 1);
        stats.record_conflicts(2);
        assert_eq!(stats.conflict_count, 3);
    }

    #[test]
    fn test_health() {
        assert!(Statistics::calculate(10, 9, 0).is_healthy());
        assert!(!Statistics::calculate(10, 8, 0).is_healthy()); // 80 is not above 80
        assert!(!Statistics::calculate(10, 10, 1).is_healthy());
    }
}
