//! Greedy allocation and KPI evaluation.
//!
//! Provides the first-fit weekly allocator, its statistics, and the
//! combined report that adds double-booking detection on top.
//!
//! # Algorithm
//!
//! `AllocationEngine` walks requirements in table order and fills each
//! professional's availability in week order, at most
//! [`SLOT_CAPACITY`](crate::models::SLOT_CAPACITY) sessions per patient per
//! slot. It is not optimal and does not search for a minimum-conflict
//! assignment; it reproduces one deterministic fill.
//!
//! # KPI
//!
//! `Statistics` reports required and allocated totals, rounded efficiency
//! and the conflict count across both conflict kinds.

mod allocation;
mod kpi;
mod report;

pub use allocation::{Allocation, AllocationEngine, AllocationRequest};
pub use kpi::{efficiency_percent, Statistics, HEALTHY_EFFICIENCY};
pub use report::ScheduleReport;
