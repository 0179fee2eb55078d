//! Greedy first-fit allocation engine.
//!
//! # Algorithm
//!
//! 1. Create an empty grid for the demand table's patients.
//! 2. For each patient, each service (table order) with a positive count:
//!    resolve the service's professional through the role table; skip the
//!    requirement silently if there is no role or no such professional.
//! 3. Walk the professional's availability (days in week order, hours as
//!    listed) and place a session in every cell with room until the count
//!    is met.
//! 4. If availability runs out first, record an [`UnmetDemand`].
//!
//! No backtracking and no search: the result depends only on table order
//! and catalog order, not on any notion of optimality.
//!
//! # Complexity
//! O(r * s) where r = requirements, s = slots per professional (≤ 20).

use tracing::debug;

use crate::models::{
    Assignment, AvailabilityCatalog, DemandTable, Patient, Professional, RoleAssignment,
    UnmetDemand, WeeklyGrid,
};

use super::Statistics;

/// Input container for allocation.
#[derive(Debug, Clone, Default)]
pub struct AllocationRequest {
    /// Required sessions per patient and service.
    pub demand: DemandTable,
    /// Professionals and their weekly availability.
    pub catalog: AvailabilityCatalog,
    /// Service → professional table.
    pub roles: RoleAssignment,
}

impl AllocationRequest {
    /// Creates a new allocation request.
    pub fn new(demand: DemandTable, catalog: AvailabilityCatalog, roles: RoleAssignment) -> Self {
        Self {
            demand,
            catalog,
            roles,
        }
    }
}

/// Output of one allocation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    /// Freshly built grid.
    pub grid: WeeklyGrid,
    /// Requirements that could not be fully placed.
    pub unmet: Vec<UnmetDemand>,
    /// Totals; `conflict_count` covers unmet demand only at this stage.
    pub statistics: Statistics,
}

/// Greedy first-fit allocator.
///
/// # Example
///
/// ```
/// use therapy_grid::models::{
///     AvailabilityCatalog, Day, DemandTable, Professional, RoleAssignment, ServiceType,
///     TimeSlot, WeeklyAvailability,
/// };
/// use therapy_grid::scheduler::AllocationEngine;
///
/// let catalog = AvailabilityCatalog::new().with_professional(
///     Professional::new("physio", "Mylena").with_availability(
///         WeeklyAvailability::new().with_day(Day::Monday, vec![TimeSlot::H08, TimeSlot::H09]),
///     ),
/// );
/// let roles = RoleAssignment::new().with_role(ServiceType::Physiotherapy, "physio");
/// let demand = DemandTable::new().with_requirement("henrique", ServiceType::Physiotherapy, 1);
///
/// let allocation = AllocationEngine::new().allocate(&demand, &catalog, &roles);
/// assert_eq!(allocation.statistics.allocated_total, 1);
/// assert!(allocation.unmet.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationEngine;

impl AllocationEngine {
    /// Creates a new engine.
    pub fn new() -> Self {
        Self
    }

    /// Builds a grid from scratch for the given inputs.
    ///
    /// Never fails: an infeasible requirement becomes an [`UnmetDemand`].
    pub fn allocate(
        &self,
        demand: &DemandTable,
        catalog: &AvailabilityCatalog,
        roles: &RoleAssignment,
    ) -> Allocation {
        let mut grid = WeeklyGrid::new(demand.patients().cloned());
        let mut unmet = Vec::new();
        let mut allocated_total: u32 = 0;

        for (patient, service, required) in demand.entries() {
            if required == 0 {
                continue;
            }

            let Some(professional_id) = roles.professional_for(service) else {
                debug!(%patient, ?service, "no professional mapped to service, skipping");
                continue;
            };
            let Some(professional) = catalog.get(professional_id) else {
                debug!(%patient, ?service, professional_id, "mapped professional not in catalog, skipping");
                continue;
            };

            let template = Assignment::new(service, &professional.name, &professional.color);
            let allocated = fill(&mut grid, patient, professional, &template, required);
            allocated_total += allocated;

            if allocated < required {
                unmet.push(UnmetDemand {
                    service,
                    professional: professional.name.clone(),
                    patient: patient.clone(),
                    required,
                    allocated,
                    missing: required - allocated,
                });
            }
        }

        let statistics =
            Statistics::calculate(demand.total_required(), allocated_total, unmet.len());

        Allocation {
            grid,
            unmet,
            statistics,
        }
    }

    /// Allocates from a request.
    pub fn allocate_request(&self, request: &AllocationRequest) -> Allocation {
        self.allocate(&request.demand, &request.catalog, &request.roles)
    }
}

/// Places up to `required` copies of `template` for `patient`.
///
/// The count is re-checked before every candidate slot, so the walk stops
/// as soon as the requirement is met.
fn fill(
    grid: &mut WeeklyGrid,
    patient: &Patient,
    professional: &Professional,
    template: &Assignment,
    required: u32,
) -> u32 {
    let mut allocated = 0;
    for (day, time) in professional.availability.slots() {
        if allocated >= required {
            break;
        }
        if grid.has_room(day, time, patient)
            && grid.add(day, time, patient, template.clone()).is_ok()
        {
            allocated += 1;
        }
    }
    allocated
}
