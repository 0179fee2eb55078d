//! Manual grid editing.
//!
//! An [`EditSession`] owns the grid a user is editing together with the
//! flags a host needs: `dirty` (manual edits since the last allocation),
//! `unsaved` (edits not yet written) and `locked` (recompute must not
//! overwrite). A [`GridEditor`] borrows the session and a store for one
//! sequence of operations.
//!
//! Each operation commits on its own; there is no multi-operation
//! transaction. A rejected operation leaves the grid untouched.
//!
//! # Persistence
//! With [`PersistMode::Immediate`] every successful mutation is written at
//! once; with [`PersistMode::OnSave`] edits wait for [`GridEditor::save`].
//! [`GridEditor::cancel`] drops unsaved edits by reloading the last
//! persisted grid.

use tracing::{debug, info};

use crate::config::PersistMode;
use crate::models::{Assignment, CellRef, GridError, WeeklyGrid};
use crate::store::{self, KeyValueStore};

/// Editable grid plus session flags.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    grid: WeeklyGrid,
    baseline: WeeklyGrid,
    key: String,
    mode: PersistMode,
    dirty: bool,
    unsaved: bool,
    locked: bool,
}

impl EditSession {
    /// Opens a session.
    ///
    /// A grid persisted under `key` takes priority over `baseline` (the
    /// allocator's fresh output); `baseline` is used only when nothing
    /// valid is stored.
    pub fn open(
        store: &dyn KeyValueStore,
        key: impl Into<String>,
        mode: PersistMode,
        baseline: WeeklyGrid,
    ) -> Self {
        let key = key.into();
        let grid = load_covering(store, &key, &baseline);
        let dirty = grid != baseline;
        Self {
            grid,
            baseline,
            key,
            mode,
            dirty,
            unsaved: false,
            locked: false,
        }
    }

    /// Replaces the grid with a fresh allocation, discarding manual edits.
    pub fn replace(&mut self, grid: WeeklyGrid) {
        self.baseline = grid.clone();
        self.grid = grid;
        self.dirty = false;
        self.unsaved = false;
    }

    /// Borrows an editor writing through `store`.
    pub fn editor<'a>(&'a mut self, store: &'a mut dyn KeyValueStore) -> GridEditor<'a> {
        GridEditor {
            session: self,
            store,
        }
    }

    /// Current grid.
    pub fn grid(&self) -> &WeeklyGrid {
        &self.grid
    }

    /// Grid produced by the last allocation.
    pub fn baseline(&self) -> &WeeklyGrid {
        &self.baseline
    }

    /// Store key of the grid.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the grid carries manual edits since the last allocation.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether some edits have not been written yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    /// Whether recompute must leave the grid alone.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Sets or clears the lock.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn persist_mode(&self) -> PersistMode {
        self.mode
    }
}

/// Add/remove/move operations over an [`EditSession`].
pub struct GridEditor<'a> {
    session: &'a mut EditSession,
    store: &'a mut dyn KeyValueStore,
}

impl GridEditor<'_> {
    /// Current grid.
    pub fn grid(&self) -> &WeeklyGrid {
        &self.session.grid
    }

    /// Assignments of a cell.
    pub fn get(&self, cell: &CellRef) -> &[Assignment] {
        self.session.grid.get(cell.day, cell.time, &cell.patient)
    }

    /// Appends an assignment to a cell.
    pub fn add(&mut self, cell: &CellRef, assignment: Assignment) -> Result<(), GridError> {
        debug!(day = %cell.day, time = %cell.time, patient = %cell.patient, professional = %assignment.professional, "adding session");
        self.session
            .grid
            .add(cell.day, cell.time, &cell.patient, assignment)?;
        self.committed();
        Ok(())
    }

    /// Removes the assignment at `index` and returns it.
    pub fn remove(&mut self, cell: &CellRef, index: usize) -> Result<Assignment, GridError> {
        let removed = self
            .session
            .grid
            .remove(cell.day, cell.time, &cell.patient, index)?;
        debug!(day = %cell.day, time = %cell.time, patient = %cell.patient, index, "removed session");
        self.committed();
        Ok(removed)
    }

    /// Moves an assignment between cells atomically.
    ///
    /// See [`WeeklyGrid::move_assignment`].
    pub fn move_assignment(
        &mut self,
        from: &CellRef,
        index: usize,
        to: &CellRef,
    ) -> Result<(), GridError> {
        self.session.grid.move_assignment(from, index, to)?;
        debug!(
            from_day = %from.day, from_time = %from.time, from_patient = %from.patient,
            to_day = %to.day, to_time = %to.time, to_patient = %to.patient,
            "moved session"
        );
        self.committed();
        Ok(())
    }

    /// Empties every cell.
    pub fn clear(&mut self) {
        self.session.grid.clear();
        info!("grid cleared");
        self.committed();
    }

    /// Writes the current grid.
    ///
    /// # Returns
    /// `true` if the store accepted it. On failure the edits stay marked
    /// unsaved.
    pub fn save(&mut self) -> bool {
        let ok = store::save(&mut *self.store, &self.session.key, &self.session.grid);
        if ok {
            self.session.unsaved = false;
            info!(sessions = self.session.grid.assignment_count(), "grid saved");
        }
        ok
    }

    /// Discards unsaved edits and reloads the last persisted grid, or the
    /// last allocation when nothing is stored.
    pub fn cancel(&mut self) {
        let session = &mut *self.session;
        session.grid = load_covering(&*self.store, &session.key, &session.baseline);
        session.dirty = session.grid != session.baseline;
        session.unsaved = false;
        info!("edits cancelled, grid reloaded");
    }

    fn committed(&mut self) {
        self.session.dirty = true;
        self.session.unsaved = true;
        if self.session.mode == PersistMode::Immediate {
            self.save();
        }
    }
}

/// Loads the persisted grid, extending its roster to every patient of
/// `baseline`, or returns `baseline` when nothing valid is stored.
fn load_covering(store: &dyn KeyValueStore, key: &str, baseline: &WeeklyGrid) -> WeeklyGrid {
    match store::load_existing::<WeeklyGrid>(store, key) {
        Some(mut grid) => {
            grid.ensure_patients(baseline.patients().cloned());
            grid
        }
        None => baseline.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Day, ServiceType, TimeSlot, SLOT_CAPACITY};
    use crate::store::tests::BrokenStore;
    use crate::store::MemoryStore;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const KEY: &str = "weekly-grid";

    fn session(name: &str) -> Assignment {
        Assignment::new(ServiceType::Psychology, name, "#EF4444")
    }

    fn cell(day: Day, time: TimeSlot, patient: &str) -> CellRef {
        CellRef::new(day, time, patient)
    }

    fn baseline() -> WeeklyGrid {
        let mut g = WeeklyGrid::new(["henrique", "thiago"]);
        g.add(Day::Monday, TimeSlot::H08, &"henrique".into(), session("Base"))
            .unwrap();
        g
    }

    fn persisted(store: &MemoryStore) -> Option<WeeklyGrid> {
        store::load_existing(store, KEY)
    }

    #[test]
    fn test_open_prefers_persisted_grid() {
        let mut stored = WeeklyGrid::new(["henrique", "thiago"]);
        stored
            .add(Day::Friday, TimeSlot::H11, &"thiago".into(), session("Saved"))
            .unwrap();
        let mut store = MemoryStore::new();
        store::save(&mut store, KEY, &stored);

        let s = EditSession::open(&store, KEY, PersistMode::Immediate, baseline());
        assert_eq!(s.grid(), &stored);
        assert!(s.is_dirty());
    }

    #[test]
    fn test_open_restores_missing_patients() {
        let mut store = MemoryStore::new().with_entry(KEY, "{}");
        let mut s = EditSession::open(&store, KEY, PersistMode::OnSave, baseline());
        assert_eq!(s.grid().cells().count(), 40);
        assert!(s.grid().is_empty());

        s.editor(&mut store)
            .add(&cell(Day::Monday, TimeSlot::H09, "thiago"), session("P"))
            .unwrap();
    }

    #[test]
    fn test_open_falls_back_to_baseline() {
        let store = MemoryStore::new().with_entry(KEY, "garbage");
        let s = EditSession::open(&store, KEY, PersistMode::Immediate, baseline());
        assert_eq!(s.grid(), &baseline());
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_immediate_mode_persists_each_edit() {
        let mut store = MemoryStore::new();
        let mut s = EditSession::open(&store, KEY, PersistMode::Immediate, baseline());

        s.editor(&mut store)
            .add(&cell(Day::Tuesday, TimeSlot::H09, "thiago"), session("P"))
            .unwrap();

        assert!(s.is_dirty());
        assert!(!s.has_unsaved_changes());
        assert_eq!(persisted(&store).as_ref(), Some(s.grid()));
    }

    #[test]
    fn test_rejected_edit_changes_nothing() {
        let mut store = MemoryStore::new();
        let mut s = EditSession::open(&store, KEY, PersistMode::Immediate, baseline());
        let target = cell(Day::Monday, TimeSlot::H08, "henrique");

        let mut editor = s.editor(&mut store);
        editor.add(&target, session("Second")).unwrap();
        let before = editor.grid().clone();
        let err = editor.add(&target, session("Third")).unwrap_err();
        assert!(matches!(err, GridError::CapacityExceeded { .. }));
        assert_eq!(editor.grid(), &before);

        let err = editor.remove(&cell(Day::Friday, TimeSlot::H10, "thiago"), 0).unwrap_err();
        assert!(matches!(err, GridError::IndexOutOfRange { .. }));
        assert_eq!(editor.grid(), &before);
    }

    #[test]
    fn test_move_into_full_cell_leaves_both_cells() {
        let mut store = MemoryStore::new();
        let mut s = EditSession::open(&store, KEY, PersistMode::OnSave, baseline());
        let full = cell(Day::Wednesday, TimeSlot::H10, "thiago");
        let source = cell(Day::Monday, TimeSlot::H08, "henrique");

        let mut editor = s.editor(&mut store);
        editor.add(&full, session("X")).unwrap();
        editor.add(&full, session("Y")).unwrap();
        let src_before = editor.get(&source).to_vec();
        let dst_before = editor.get(&full).to_vec();

        let err = editor.move_assignment(&source, 0, &full).unwrap_err();
        assert!(matches!(err, GridError::CapacityExceeded { .. }));
        assert_eq!(editor.get(&source), src_before.as_slice());
        assert_eq!(editor.get(&full), dst_before.as_slice());
    }

    #[test]
    fn test_on_save_mode_and_cancel() {
        let mut store = MemoryStore::new();
        let mut s = EditSession::open(&store, KEY, PersistMode::OnSave, baseline());
        let target = cell(Day::Thursday, TimeSlot::H11, "thiago");

        {
            let mut editor = s.editor(&mut store);
            editor.add(&target, session("Kept")).unwrap();
            assert!(editor.save());
            editor.add(&target, session("Dropped")).unwrap();
        }
        assert!(s.has_unsaved_changes());
        assert_eq!(persisted(&store).unwrap().get(target.day, target.time, &target.patient).len(), 1);

        s.editor(&mut store).cancel();
        assert!(!s.has_unsaved_changes());
        let names: Vec<_> = s
            .grid()
            .get(target.day, target.time, &target.patient)
            .iter()
            .map(|a| a.professional.clone())
            .collect();
        assert_eq!(names, vec!["Kept"]);
        assert!(s.is_dirty());
    }

    #[test]
    fn test_cancel_without_persisted_grid_restores_baseline() {
        let mut store = MemoryStore::new();
        let mut s = EditSession::open(&store, KEY, PersistMode::OnSave, baseline());
        s.editor(&mut store).clear();
        assert!(s.grid().is_empty());

        s.editor(&mut store).cancel();
        assert_eq!(s.grid(), &baseline());
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_failed_save_keeps_unsaved() {
        let mut store = BrokenStore;
        let mut s = EditSession::open(&store, KEY, PersistMode::Immediate, baseline());
        s.editor(&mut store)
            .add(&cell(Day::Monday, TimeSlot::H09, "henrique"), session("P"))
            .unwrap();
        assert!(s.has_unsaved_changes());
        assert_eq!(s.grid().assignment_count(), 2);
    }

    #[test]
    fn test_replace_discards_edits() {
        let mut store = MemoryStore::new();
        let mut s = EditSession::open(&store, KEY, PersistMode::Immediate, baseline());
        s.editor(&mut store).clear();
        assert!(s.is_dirty());

        let fresh = WeeklyGrid::new(["henrique", "thiago"]);
        s.replace(fresh.clone());
        assert_eq!(s.grid(), &fresh);
        assert!(!s.is_dirty());
    }

    #[test]
    fn test_random_edits_keep_capacity() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut store = MemoryStore::new();
        let mut s = EditSession::open(&store, KEY, PersistMode::OnSave, baseline());
        let patients = ["henrique", "thiago"];
        let random_cell = |rng: &mut StdRng| {
            cell(
                Day::ALL[rng.random_range(0..Day::ALL.len())],
                TimeSlot::ALL[rng.random_range(0..TimeSlot::ALL.len())],
                patients[rng.random_range(0..patients.len())],
            )
        };

        let mut editor = s.editor(&mut store);
        for step in 0..2_000 {
            let a = random_cell(&mut rng);
            let b = random_cell(&mut rng);
            let index = rng.random_range(0..3);
            let before = editor.grid().clone();
            let result = match rng.random_range(0..3) {
                0 => editor.add(&a, session(&format!("P{}", step % 4))),
                1 => editor.remove(&a, index).map(|_| ()),
                _ => editor.move_assignment(&a, index, &b),
            };
            if result.is_err() {
                assert_eq!(editor.grid(), &before);
            }
            for (_, list) in editor.grid().cells() {
                assert!(list.len() <= SLOT_CAPACITY);
            }
        }
    }
}
