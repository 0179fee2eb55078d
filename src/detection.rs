//! Double-booking detection.
//!
//! Scans a grid slot by slot and reports every professional that appears
//! more than once in the same `(day, time)`. Pure: the grid is only read.
//!
//! # Scan order
//! Days in week order, hours in template order, then patients by id
//! (the grid's roster order), then each cell's list in order. The first
//! sighting of a name claims it; every later sighting in the same slot is
//! reported. Order decides which occurrence is flagged, never how many.
//!
//! A professional listed twice in one patient's own cell is reported too.
//! The kind follows the claimant, not the scan position: a repeat inside
//! the claiming patient's cell is `AlreadyBusy` even when that patient is
//! not first on the roster, and a repeat in any other patient's cell is
//! `CannotServeBoth`.

use std::collections::HashMap;

use crate::models::{Day, DoubleBooking, DoubleBookingKind, Patient, TimeSlot, WeeklyGrid};

/// Finds every double-booked professional in the grid.
///
/// # Returns
/// One [`DoubleBooking`] per repeated sighting, in scan order.
pub fn detect_double_bookings(grid: &WeeklyGrid) -> Vec<DoubleBooking> {
    let mut found = Vec::new();
    for day in Day::ALL {
        for time in TimeSlot::ALL {
            detect_in_slot(grid, day, time, &mut found);
        }
    }
    found
}

fn detect_in_slot(grid: &WeeklyGrid, day: Day, time: TimeSlot, found: &mut Vec<DoubleBooking>) {
    // professional name → patient whose cell first listed it
    let mut seen: HashMap<&str, &Patient> = HashMap::new();

    for (patient, cell) in grid.slot(day, time) {
        for assignment in cell {
            let name = assignment.professional.as_str();
            match seen.get(name) {
                None => {
                    seen.insert(name, patient);
                }
                Some(&first) => {
                    let kind = if first == patient {
                        DoubleBookingKind::AlreadyBusy
                    } else {
                        DoubleBookingKind::CannotServeBoth {
                            first: first.clone(),
                            second: patient.clone(),
                        }
                    };
                    found.push(DoubleBooking::new(day, time, name, kind));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Assignment, ServiceType};

    fn session(name: &str) -> Assignment {
        Assignment::new(ServiceType::Psychology, name, "#EF4444")
    }

    fn grid() -> WeeklyGrid {
        WeeklyGrid::new(["henrique", "thiago"])
    }

    #[test]
    fn test_empty_grid() {
        assert!(detect_double_bookings(&grid()).is_empty());
    }

    #[test]
    fn test_cross_patient_booking() {
        let mut g = grid();
        g.add(Day::Tuesday, TimeSlot::H09, &"henrique".into(), session("P")).unwrap();
        g.add(Day::Tuesday, TimeSlot::H09, &"thiago".into(), session("P")).unwrap();

        let found = detect_double_bookings(&g);
        assert_eq!(found.len(), 1);
        let d = &found[0];
        assert_eq!((d.day, d.time, d.professional.as_str()), (Day::Tuesday, TimeSlot::H09, "P"));
        assert_eq!(
            d.kind,
            DoubleBookingKind::CannotServeBoth {
                first: "henrique".into(),
                second: "thiago".into(),
            }
        );
    }

    #[test]
    fn test_same_patient_twice_counts() {
        let mut g = grid();
        let h = Patient::new("henrique");
        g.add(Day::Monday, TimeSlot::H08, &h, session("P")).unwrap();
        g.add(Day::Monday, TimeSlot::H08, &h, session("P")).unwrap();

        let found = detect_double_bookings(&g);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DoubleBookingKind::AlreadyBusy);
    }

    #[test]
    fn test_repeat_in_later_patient_cell_is_already_busy() {
        let mut g = grid();
        let t = Patient::new("thiago");
        g.add(Day::Wednesday, TimeSlot::H10, &t, session("P")).unwrap();
        g.add(Day::Wednesday, TimeSlot::H10, &t, session("P")).unwrap();

        let found = detect_double_bookings(&g);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, DoubleBookingKind::AlreadyBusy);
        assert_eq!(found[0].description, "P is already busy in this slot");
    }

    #[test]
    fn test_three_sightings_two_conflicts() {
        let mut g = grid();
        let h = Patient::new("henrique");
        let t = Patient::new("thiago");
        g.add(Day::Monday, TimeSlot::H08, &h, session("P")).unwrap();
        g.add(Day::Monday, TimeSlot::H08, &t, session("P")).unwrap();
        g.add(Day::Monday, TimeSlot::H08, &t, session("P")).unwrap();

        assert_eq!(detect_double_bookings(&g).len(), 2);
    }

    #[test]
    fn test_scope_is_per_slot() {
        let mut g = grid();
        g.add(Day::Monday, TimeSlot::H08, &"henrique".into(), session("P")).unwrap();
        g.add(Day::Monday, TimeSlot::H09, &"thiago".into(), session("P")).unwrap();
        g.add(Day::Tuesday, TimeSlot::H08, &"thiago".into(), session("P")).unwrap();

        assert!(detect_double_bookings(&g).is_empty());
    }

    #[test]
    fn test_distinct_professionals_share_slot() {
        let mut g = grid();
        g.add(Day::Friday, TimeSlot::H10, &"henrique".into(), session("A")).unwrap();
        g.add(Day::Friday, TimeSlot::H10, &"henrique".into(), session("B")).unwrap();
        g.add(Day::Friday, TimeSlot::H10, &"thiago".into(), session("C")).unwrap();

        assert!(detect_double_bookings(&g).is_empty());
    }

    #[test]
    fn test_scan_order() {
        let mut g = grid();
        g.add(Day::Thursday, TimeSlot::H11, &"henrique".into(), session("Q")).unwrap();
        g.add(Day::Thursday, TimeSlot::H11, &"thiago".into(), session("Q")).unwrap();
        g.add(Day::Monday, TimeSlot::H10, &"henrique".into(), session("P")).unwrap();
        g.add(Day::Monday, TimeSlot::H10, &"thiago".into(), session("P")).unwrap();

        let names: Vec<_> = detect_double_bookings(&g)
            .into_iter()
            .map(|d| d.professional)
            .collect();
        assert_eq!(names, vec!["P", "Q"]);
    }
}
