//! Aggregate views for dashboards.
//!
//! Counts over a grid or a demand table. Every bucket is present, so
//! callers can chart the maps directly.

use std::collections::BTreeMap;

use crate::models::{Day, DemandTable, Patient, ServiceType, WeeklyGrid};

/// Sessions per weekday, Monday to Friday.
pub fn sessions_per_day(grid: &WeeklyGrid) -> BTreeMap<Day, usize> {
    let mut counts: BTreeMap<Day, usize> = Day::ALL.into_iter().map(|d| (d, 0)).collect();
    for (day, _, _, _) in grid.assignments() {
        *counts.entry(day).or_default() += 1;
    }
    counts
}

/// Sessions per service across the whole week.
pub fn sessions_per_service(grid: &WeeklyGrid) -> BTreeMap<ServiceType, usize> {
    let mut counts: BTreeMap<ServiceType, usize> =
        ServiceType::ALL.into_iter().map(|s| (s, 0)).collect();
    for (_, _, _, assignment) in grid.assignments() {
        *counts.entry(assignment.service).or_default() += 1;
    }
    counts
}

/// Required weekly sessions per patient.
pub fn required_per_patient(demand: &DemandTable) -> BTreeMap<Patient, u32> {
    demand
        .patients()
        .map(|p| (p.clone(), demand.total_for(p)))
        .collect()
}
