//! Built-in reference dataset.
//!
//! Used whenever persisted configuration is missing or unreadable: five
//! professionals, two patients, and the role table linking each service
//! to one professional.

use crate::models::{
    AvailabilityCatalog, Day, DemandTable, Professional, RoleAssignment, ServiceType, TimeSlot,
    WeeklyAvailability,
};
use crate::scheduler::AllocationRequest;

use Day::*;
use TimeSlot::*;

/// Patients of the reference configuration.
pub const PATIENTS: [&str; 2] = ["henrique", "thiago"];

fn days(days: &[Day], hours: &[TimeSlot]) -> WeeklyAvailability {
    Day::ALL.into_iter().fold(WeeklyAvailability::new(), |acc, day| {
        let listed = if days.contains(&day) { hours.to_vec() } else { Vec::new() };
        acc.with_day(day, listed)
    })
}

/// Reference professionals and their availability.
pub fn catalog() -> AvailabilityCatalog {
    let mornings = [H08, H09, H10, H11];
    AvailabilityCatalog::new()
        .with_professional(
            Professional::new("occupational-therapist", "Vany")
                .with_color("#8B5CF6")
                .with_availability(WeeklyAvailability::full_week()),
        )
        .with_professional(
            Professional::new("psychopedagogue", "Tatiana")
                .with_color("#06B6D4")
                .with_availability(WeeklyAvailability::full_week()),
        )
        .with_professional(
            Professional::new("physiotherapist", "Mylena")
                .with_color("#10B981")
                .with_availability(days(&[Monday, Thursday, Friday], &mornings)),
        )
        .with_professional(
            Professional::new("attendant", "Vitória")
                .with_color("#F59E0B")
                .with_availability(days(&[Monday, Thursday, Friday], &mornings)),
        )
        .with_professional(
            Professional::new("psychologist", "Ana Luiza")
                .with_color("#EF4444")
                .with_availability(
                    days(&[Monday, Wednesday], &[H09, H10, H11])
                        .with_day(Thursday, vec![H09, H11]),
                ),
        )
}

/// Reference weekly demand, identical for both patients.
pub fn demand() -> DemandTable {
    PATIENTS.into_iter().fold(DemandTable::new(), |table, patient| {
        table
            .with_requirement(patient, ServiceType::Physiotherapy, 1)
            .with_requirement(patient, ServiceType::OccupationalTherapy, 2)
            .with_requirement(patient, ServiceType::Psychopedagogy, 2)
            .with_requirement(patient, ServiceType::Psychology, 2)
            .with_requirement(patient, ServiceType::AttendantTherapy, 9)
    })
}

/// Reference service → professional table.
pub fn roles() -> RoleAssignment {
    RoleAssignment::new()
        .with_role(ServiceType::OccupationalTherapy, "occupational-therapist")
        .with_role(ServiceType::Psychopedagogy, "psychopedagogue")
        .with_role(ServiceType::Physiotherapy, "physiotherapist")
        .with_role(ServiceType::Psychology, "psychologist")
        .with_role(ServiceType::AttendantTherapy, "attendant")
}

/// The three reference inputs bundled together.
pub fn allocation_request() -> AllocationRequest {
    AllocationRequest::new(demand(), catalog(), roles())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::{AllocationEngine, ScheduleReport};

    #[test]
    fn test_reference_shape() {
        assert_eq!(catalog().len(), 5);
        assert_eq!(demand().total_required(), 32);
        for service in ServiceType::ALL {
            let id = roles().professional_for(service).unwrap().to_string();
            assert!(catalog().get(&id).is_some(), "{id} missing");
        }
        assert_eq!(catalog().get("psychologist").unwrap().availability.slot_count(), 8);
    }

    #[test]
    fn test_reference_allocation() {
        let report = ScheduleReport::analyze(AllocationEngine::new().allocate_request(&allocation_request()));
        let stats = report.statistics;

        // Every requirement fits its professional's availability.
        assert!(report.unmet().next().is_none());
        assert_eq!(stats.required_total, 32);
        assert_eq!(stats.allocated_total, 32);
        assert_eq!(stats.efficiency_percent, 100);
        // Both patients are filled from the same first slots, so shared
        // professionals collide: one booking per session of the second patient.
        assert_eq!(stats.conflict_count, 16);
    }
}
