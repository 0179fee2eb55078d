//! Single-writer planning coordinator.
//!
//! Owns the store, the configuration documents and the edit session, and
//! serializes everything that mutates the grid behind one mutex:
//! a recompute can never interleave with an edit sequence run through
//! [`Planner::edit`]. Between operations the later writer wins, both in
//! memory and on the persisted grid.
//!
//! # Lifecycle
//! 1. [`Planner::open`] loads catalog and demand (falling back to the
//!    reference dataset), allocates, and resumes the persisted grid if one
//!    exists, otherwise adopts the allocation.
//! 2. Manual edits go through [`Planner::edit`].
//! 3. Configuration edits persist the changed document and recompute from
//!    scratch, discarding manual edits, unless the grid is locked.

use std::sync::{Mutex, MutexGuard, PoisonError};

use thiserror::Error;
use tracing::info;

use crate::config::PlannerConfig;
use crate::defaults;
use crate::editor::{EditSession, GridEditor};
use crate::models::{
    Assignment, AvailabilityCatalog, CellRef, ConfigError, DemandTable, GridError, Patient,
    RoleAssignment, ServiceType, UnmetDemand, WeeklyAvailability, WeeklyGrid,
};
use crate::scheduler::{AllocationEngine, ScheduleReport, Statistics};
use crate::store::{self, KeyValueStore};

/// Rejected planner operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The grid is locked against recompute.
    #[error("grid is locked; unlock it or force the recompute")]
    GridLocked,
}

struct PlannerState {
    store: Box<dyn KeyValueStore>,
    config: PlannerConfig,
    demand: DemandTable,
    catalog: AvailabilityCatalog,
    roles: RoleAssignment,
    session: EditSession,
    unmet: Vec<UnmetDemand>,
    statistics: Statistics,
}

/// Coordinates allocation, manual editing and persistence.
///
/// # Example
///
/// ```
/// use therapy_grid::config::PlannerConfig;
/// use therapy_grid::models::{CellRef, Day, TimeSlot};
/// use therapy_grid::planner::Planner;
/// use therapy_grid::store::MemoryStore;
///
/// let planner = Planner::open(MemoryStore::new(), PlannerConfig::default());
/// assert_eq!(planner.statistics().allocated_total, 32);
///
/// let from = CellRef::new(Day::Monday, TimeSlot::H08, "henrique");
/// let to = CellRef::new(Day::Tuesday, TimeSlot::H08, "henrique");
/// planner.edit(|editor| editor.move_assignment(&from, 0, &to)).unwrap();
/// assert!(planner.is_dirty());
/// ```
pub struct Planner {
    engine: AllocationEngine,
    state: Mutex<PlannerState>,
}

impl Planner {
    /// Opens a planner with the reference role table.
    pub fn open(store: impl KeyValueStore + 'static, config: PlannerConfig) -> Self {
        Self::open_with_roles(store, config, defaults::roles())
    }

    /// Opens a planner with a custom role table.
    pub fn open_with_roles(
        store: impl KeyValueStore + 'static,
        config: PlannerConfig,
        roles: RoleAssignment,
    ) -> Self {
        let mut store: Box<dyn KeyValueStore> = Box::new(store);
        let catalog = store::load_or_default(&*store, &config.keys.professionals, defaults::catalog);
        let demand = store::load_or_default(&*store, &config.keys.demand, defaults::demand);

        let engine = AllocationEngine::new();
        let allocation = engine.allocate(&demand, &catalog, &roles);
        let session = EditSession::open(
            &*store,
            config.keys.weekly_grid.clone(),
            config.persist_mode,
            allocation.grid,
        );
        if session.grid() == session.baseline() {
            store::save(&mut *store, session.key(), session.grid());
        }
        info!(
            resumed_edits = session.is_dirty(),
            required = allocation.statistics.required_total,
            allocated = allocation.statistics.allocated_total,
            "planner opened"
        );

        Self {
            engine,
            state: Mutex::new(PlannerState {
                store,
                config,
                demand,
                catalog,
                roles,
                session,
                unmet: allocation.unmet,
                statistics: allocation.statistics,
            }),
        }
    }

    /// Current grid with all conflicts and statistics.
    ///
    /// Unmet demand and totals come from the last allocation; double
    /// bookings are detected on the grid as it is now.
    pub fn report(&self) -> ScheduleReport {
        let state = self.lock();
        ScheduleReport::reanalyze(
            state.session.grid().clone(),
            state.unmet.clone(),
            state.statistics,
        )
    }

    /// Statistics of the current grid.
    pub fn statistics(&self) -> Statistics {
        self.report().statistics
    }

    /// Snapshot of the current grid.
    pub fn grid(&self) -> WeeklyGrid {
        self.lock().session.grid().clone()
    }

    /// Snapshot of the catalog.
    pub fn catalog(&self) -> AvailabilityCatalog {
        self.lock().catalog.clone()
    }

    /// Snapshot of the demand table.
    pub fn demand(&self) -> DemandTable {
        self.lock().demand.clone()
    }

    /// Whether the grid carries manual edits a recompute would discard.
    pub fn is_dirty(&self) -> bool {
        self.lock().session.is_dirty()
    }

    /// Whether the grid is locked against recompute.
    pub fn is_locked(&self) -> bool {
        self.lock().session.is_locked()
    }

    /// Locks or unlocks the grid against recompute.
    pub fn set_locked(&self, locked: bool) {
        self.lock().session.set_locked(locked);
    }

    /// Rebuilds the grid from scratch and persists it.
    ///
    /// Manual edits are discarded. Refused with
    /// [`PlannerError::GridLocked`] while the grid is locked.
    pub fn recompute(&self) -> Result<ScheduleReport, PlannerError> {
        let mut state = self.lock();
        if state.session.is_locked() {
            return Err(PlannerError::GridLocked);
        }
        Ok(self.recompute_locked(&mut state))
    }

    /// Rebuilds the grid even when it is locked.
    pub fn force_recompute(&self) -> ScheduleReport {
        let mut state = self.lock();
        self.recompute_locked(&mut state)
    }

    /// Runs an edit sequence while holding the planner lock.
    ///
    /// No recompute can start until `f` returns. The lock is not
    /// reentrant: calling any `Planner` method from inside `f` deadlocks.
    pub fn edit<R>(&self, f: impl FnOnce(&mut GridEditor<'_>) -> R) -> R {
        let mut guard = self.lock();
        let state = &mut *guard;
        let mut editor = state.session.editor(state.store.as_mut());
        f(&mut editor)
    }

    /// Adds a session for a professional named by display name.
    ///
    /// The color comes from the catalog, or the service default when the
    /// name is unknown.
    pub fn add_session(
        &self,
        cell: &CellRef,
        service: ServiceType,
        professional: &str,
    ) -> Result<(), PlannerError> {
        let mut guard = self.lock();
        let state = &mut *guard;
        let assignment = Assignment::for_professional(service, professional, &state.catalog);
        state
            .session
            .editor(state.store.as_mut())
            .add(cell, assignment)?;
        Ok(())
    }

    /// Renames a professional.
    pub fn rename_professional(&self, id: &str, name: &str) -> Result<(), PlannerError> {
        self.reconfigure(|s| s.catalog.rename(id, name).map(|_| ConfigDoc::Catalog))
    }

    /// Changes a professional's color.
    pub fn recolor_professional(&self, id: &str, color: &str) -> Result<(), PlannerError> {
        self.reconfigure(|s| s.catalog.recolor(id, color).map(|_| ConfigDoc::Catalog))
    }

    /// Replaces a professional's weekly availability.
    pub fn set_availability(
        &self,
        id: &str,
        availability: WeeklyAvailability,
    ) -> Result<(), PlannerError> {
        self.reconfigure(|s| {
            s.catalog
                .set_availability(id, availability)
                .map(|_| ConfigDoc::Catalog)
        })
    }

    /// Removes a professional. Services mapped to them stop being scheduled.
    pub fn remove_professional(&self, id: &str) -> Result<(), PlannerError> {
        self.reconfigure(|s| s.catalog.remove(id).map(|_| ConfigDoc::Catalog))
    }

    /// Registers a professional available every weekday hour.
    ///
    /// # Returns
    /// The generated id. Map it with [`assign_role`](Self::assign_role) to
    /// have allocation use it.
    pub fn add_professional(
        &self,
        name: &str,
        specialty: &str,
        color: &str,
    ) -> Result<String, PlannerError> {
        let mut id = String::new();
        self.reconfigure(|s| {
            id = s.catalog.add_professional(name, specialty, color)?;
            Ok(ConfigDoc::Catalog)
        })?;
        Ok(id)
    }

    /// Maps a service to a professional id.
    ///
    /// The role table is not persisted; it lives as long as the planner.
    pub fn assign_role(
        &self,
        service: ServiceType,
        professional_id: &str,
    ) -> Result<(), PlannerError> {
        self.reconfigure(|s| {
            s.roles.assign(service, professional_id);
            Ok(ConfigDoc::Roles)
        })
    }

    /// Sets a required session count.
    pub fn set_demand(
        &self,
        patient: impl Into<Patient>,
        service: ServiceType,
        sessions: u32,
    ) -> Result<(), PlannerError> {
        let patient = patient.into();
        self.reconfigure(|s| {
            s.demand.set_required(patient, service, sessions);
            Ok(ConfigDoc::Demand)
        })
    }

    /// Sets a required session count from raw form input (invalid → 0).
    ///
    /// # Returns
    /// The stored count.
    pub fn set_demand_from_input(
        &self,
        patient: impl Into<Patient>,
        service: ServiceType,
        raw: &str,
    ) -> Result<u32, PlannerError> {
        let patient = patient.into();
        let mut stored = 0;
        self.reconfigure(|s| {
            stored = s.demand.set_from_input(patient, service, raw);
            Ok(ConfigDoc::Demand)
        })?;
        Ok(stored)
    }

    fn reconfigure(
        &self,
        f: impl FnOnce(&mut PlannerState) -> Result<ConfigDoc, ConfigError>,
    ) -> Result<(), PlannerError> {
        let mut state = self.lock();
        let doc = f(&mut *state)?;

        let s = &mut *state;
        match doc {
            ConfigDoc::Catalog => {
                store::save(s.store.as_mut(), &s.config.keys.professionals, &s.catalog);
            }
            ConfigDoc::Demand => {
                store::save(s.store.as_mut(), &s.config.keys.demand, &s.demand);
            }
            ConfigDoc::Roles => {}
        }

        if s.session.is_locked() {
            info!("configuration changed while grid is locked, recompute skipped");
        } else {
            self.recompute_locked(s);
        }
        Ok(())
    }

    fn recompute_locked(&self, state: &mut PlannerState) -> ScheduleReport {
        let allocation = self
            .engine
            .allocate(&state.demand, &state.catalog, &state.roles);
        state.unmet = allocation.unmet.clone();
        state.statistics = allocation.statistics;
        state.session.replace(allocation.grid.clone());
        store::save(state.store.as_mut(), &state.config.keys.weekly_grid, state.session.grid());

        let report = ScheduleReport::analyze(allocation);
        info!(
            required = report.statistics.required_total,
            allocated = report.statistics.allocated_total,
            efficiency = report.statistics.efficiency_percent,
            conflicts = report.statistics.conflict_count,
            "grid recomputed"
        );
        report
    }

    fn lock(&self) -> MutexGuard<'_, PlannerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Which configuration document an edit touched.
enum ConfigDoc {
    Catalog,
    Demand,
    Roles,
}
