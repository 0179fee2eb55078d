//! Weekly grid (solution) model.
//!
//! The grid maps every `(day, time, patient)` cell to an ordered list of
//! at most [`SLOT_CAPACITY`] assignments. It is produced by allocation and
//! then edited by hand through [`GridEditor`](crate::editor::GridEditor).
//!
//! # Invariants
//! - Every cell of the roster exists (empty list by default).
//! - No cell holds more than [`SLOT_CAPACITY`] assignments. Every mutating
//!   primitive checks capacity before touching the grid, and a failed
//!   call leaves the grid unchanged.
//! - A professional appearing twice in one slot is allowed here; that is
//!   reported by [`detect_double_bookings`](crate::detection::detect_double_bookings).
//!
//! # Persisted form
//! Nested `day → "HH:MM" → patient → [assignment]`. Loading fills missing
//! cells and rejects documents that break the capacity invariant.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error;

use super::{Assignment, Day, Patient, TimeSlot};

/// Maximum assignments per patient per slot.
pub const SLOT_CAPACITY: usize = 2;

/// Address of one grid cell.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellRef {
    pub day: Day,
    pub time: TimeSlot,
    pub patient: Patient,
}

impl CellRef {
    pub fn new(day: Day, time: TimeSlot, patient: impl Into<Patient>) -> Self {
        Self {
            day,
            time,
            patient: patient.into(),
        }
    }
}

/// Rejected grid mutation. The grid is unchanged when one is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Target cell already holds [`SLOT_CAPACITY`] assignments.
    #[error("{patient} already has {SLOT_CAPACITY} sessions on {day} at {time}")]
    CapacityExceeded {
        day: Day,
        time: TimeSlot,
        patient: Patient,
    },
    /// No assignment at `index` in the cell.
    #[error("no session #{index} for {patient} on {day} at {time} (cell holds {len})")]
    IndexOutOfRange {
        day: Day,
        time: TimeSlot,
        patient: Patient,
        index: usize,
        len: usize,
    },
    /// Patient is not part of the grid's roster.
    #[error("patient '{0}' is not on this grid")]
    UnknownPatient(Patient),
}

type GridDocument = BTreeMap<Day, BTreeMap<TimeSlot, BTreeMap<Patient, Vec<Assignment>>>>;

/// The weekly schedule: `(day, time, patient) → [assignment]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GridDocument", into = "GridDocument")]
pub struct WeeklyGrid {
    patients: BTreeSet<Patient>,
    cells: BTreeMap<(Day, TimeSlot, Patient), Vec<Assignment>>,
}

impl WeeklyGrid {
    /// Creates a fully initialized empty grid for the given roster.
    pub fn new<I, P>(patients: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Patient>,
    {
        let mut grid = Self {
            patients: patients.into_iter().map(Into::into).collect(),
            cells: BTreeMap::new(),
        };
        grid.clear();
        grid
    }

    /// Patients in the fixed scan order (by id).
    pub fn patients(&self) -> impl Iterator<Item = &Patient> {
        self.patients.iter()
    }

    /// Whether `patient` is on the roster.
    pub fn has_patient(&self, patient: &Patient) -> bool {
        self.patients.contains(patient)
    }

    /// Assignments in a cell, in order. Empty for an unknown patient.
    pub fn get(&self, day: Day, time: TimeSlot, patient: &Patient) -> &[Assignment] {
        self.cells
            .get(&(day, time, patient.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether a cell can take another assignment.
    pub fn has_room(&self, day: Day, time: TimeSlot, patient: &Patient) -> bool {
        self.get(day, time, patient).len() < SLOT_CAPACITY
    }

    /// Appends an assignment to a cell.
    pub fn add(
        &mut self,
        day: Day,
        time: TimeSlot,
        patient: &Patient,
        assignment: Assignment,
    ) -> Result<(), GridError> {
        let cell = self.cell_mut(day, time, patient)?;
        if cell.len() >= SLOT_CAPACITY {
            return Err(GridError::CapacityExceeded {
                day,
                time,
                patient: patient.clone(),
            });
        }
        cell.push(assignment);
        Ok(())
    }

    /// Removes the assignment at `index` and returns it.
    pub fn remove(
        &mut self,
        day: Day,
        time: TimeSlot,
        patient: &Patient,
        index: usize,
    ) -> Result<Assignment, GridError> {
        let cell = self.cell_mut(day, time, patient)?;
        if index >= cell.len() {
            return Err(GridError::IndexOutOfRange {
                day,
                time,
                patient: patient.clone(),
                index,
                len: cell.len(),
            });
        }
        Ok(cell.remove(index))
    }

    /// Moves an assignment from one cell to the end of another.
    ///
    /// Both the source index and the destination capacity are checked
    /// before anything is detached, so a rejected move changes nothing.
    /// Moving within a single cell re-appends the entry (a reorder), which
    /// never exceeds capacity.
    pub fn move_assignment(
        &mut self,
        from: &CellRef,
        index: usize,
        to: &CellRef,
    ) -> Result<(), GridError> {
        let src_len = self.checked_len(from)?;
        let dst_len = self.checked_len(to)?;

        if index >= src_len {
            return Err(GridError::IndexOutOfRange {
                day: from.day,
                time: from.time,
                patient: from.patient.clone(),
                index,
                len: src_len,
            });
        }
        if from != to && dst_len >= SLOT_CAPACITY {
            return Err(GridError::CapacityExceeded {
                day: to.day,
                time: to.time,
                patient: to.patient.clone(),
            });
        }

        let assignment = self.remove(from.day, from.time, &from.patient, index)?;
        self.add(to.day, to.time, &to.patient, assignment)
    }

    /// Adds patients to the roster, giving each new one an empty cell in
    /// every slot. Patients already present keep their cells.
    pub fn ensure_patients<I, P>(&mut self, patients: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<Patient>,
    {
        for patient in patients.into_iter().map(Into::into) {
            if !self.patients.insert(patient.clone()) {
                continue;
            }
            for day in Day::ALL {
                for time in TimeSlot::ALL {
                    self.cells.insert((day, time, patient.clone()), Vec::new());
                }
            }
        }
    }

    /// Resets every cell of the roster to an empty list.
    pub fn clear(&mut self) {
        self.cells.clear();
        for day in Day::ALL {
            for time in TimeSlot::ALL {
                for patient in &self.patients {
                    self.cells.insert((day, time, patient.clone()), Vec::new());
                }
            }
        }
    }

    /// Cells of one slot, in patient order.
    pub fn slot(&self, day: Day, time: TimeSlot) -> impl Iterator<Item = (&Patient, &[Assignment])> {
        self.patients
            .iter()
            .map(move |p| (p, self.get(day, time, p)))
    }

    /// All cells in `(day, time, patient)` order.
    pub fn cells(&self) -> impl Iterator<Item = (CellRef, &[Assignment])> {
        self.cells.iter().map(|((day, time, patient), list)| {
            (CellRef::new(*day, *time, patient.clone()), list.as_slice())
        })
    }

    /// Every assignment with its cell, in `(day, time, patient)` order.
    pub fn assignments(&self) -> impl Iterator<Item = (Day, TimeSlot, &Patient, &Assignment)> {
        self.cells
            .iter()
            .flat_map(|((day, time, patient), list)| list.iter().map(move |a| (*day, *time, patient, a)))
    }

    /// Total number of assignments.
    pub fn assignment_count(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Whether no cell holds an assignment.
    pub fn is_empty(&self) -> bool {
        self.assignment_count() == 0
    }

    fn checked_len(&self, cell: &CellRef) -> Result<usize, GridError> {
        if !self.has_patient(&cell.patient) {
            return Err(GridError::UnknownPatient(cell.patient.clone()));
        }
        Ok(self.get(cell.day, cell.time, &cell.patient).len())
    }

    fn cell_mut(
        &mut self,
        day: Day,
        time: TimeSlot,
        patient: &Patient,
    ) -> Result<&mut Vec<Assignment>, GridError> {
        if !self.patients.contains(patient) {
            return Err(GridError::UnknownPatient(patient.clone()));
        }
        Ok(self.cells.entry((day, time, patient.clone())).or_default())
    }
}

impl TryFrom<GridDocument> for WeeklyGrid {
    type Error = GridError;

    fn try_from(doc: GridDocument) -> Result<Self, Self::Error> {
        let patients: BTreeSet<Patient> = doc
            .values()
            .flat_map(|times| times.values())
            .flat_map(|cells| cells.keys().cloned())
            .collect();
        let mut grid = WeeklyGrid::new(patients);

        for (day, times) in doc {
            for (time, cells) in times {
                for (patient, list) in cells {
                    if list.len() > SLOT_CAPACITY {
                        return Err(GridError::CapacityExceeded { day, time, patient });
                    }
                    grid.cells.insert((day, time, patient), list);
                }
            }
        }
        Ok(grid)
    }
}

impl From<WeeklyGrid> for GridDocument {
    fn from(grid: WeeklyGrid) -> Self {
        let mut doc = GridDocument::new();
        for ((day, time, patient), list) in grid.cells {
            doc.entry(day)
                .or_default()
                .entry(time)
                .or_default()
                .insert(patient, list);
        }
        doc
    }
}
