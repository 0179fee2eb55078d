//! Weekly calendar model.
//!
//! Defines the fixed repeating week the grid is built on: five weekdays
//! and four morning hours. A professional's availability is a per-day
//! ordered list of hours taken from that template.
//!
//! # Time Model
//! There are no dates. A slot is a `(Day, TimeSlot)` pair that repeats
//! every week; no weekend, no multi-week horizon.
//!
//! # Ordering
//! Both enums derive `Ord` in declaration order, which is the fixed walk
//! order used by allocation and conflict detection.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A working day of the week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

/// A one-hour session start time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    #[serde(rename = "08:00")]
    H08,
    #[serde(rename = "09:00")]
    H09,
    #[serde(rename = "10:00")]
    H10,
    #[serde(rename = "11:00")]
    H11,
}

impl Day {
    /// All days in walk order.
    pub const ALL: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    /// Lowercase name, as used in persisted documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Monday => "monday",
            Day::Tuesday => "tuesday",
            Day::Wednesday => "wednesday",
            Day::Thursday => "thursday",
            Day::Friday => "friday",
        }
    }
}

impl TimeSlot {
    /// All hours in walk order.
    pub const ALL: [TimeSlot; 4] = [TimeSlot::H08, TimeSlot::H09, TimeSlot::H10, TimeSlot::H11];

    /// `HH:MM` label.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::H08 => "08:00",
            TimeSlot::H09 => "09:00",
            TimeSlot::H10 => "10:00",
            TimeSlot::H11 => "11:00",
        }
    }

    /// Parses an `HH:MM` label. Returns `None` outside the template.
    pub fn parse(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == label.trim())
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Weekly availability template of one professional.
///
/// Each day maps to the hours the professional works that day, in the
/// order they should be tried. A day with no entry (or an empty list)
/// means the professional is off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyAvailability {
    days: BTreeMap<Day, Vec<TimeSlot>>,
}

impl WeeklyAvailability {
    /// Creates an empty template (never available).
    pub fn new() -> Self {
        Self::default()
    }

    /// Every hour of every weekday.
    pub fn full_week() -> Self {
        Day::ALL
            .into_iter()
            .fold(Self::new(), |acc, day| acc.with_day(day, TimeSlot::ALL.to_vec()))
    }

    /// Sets the hours of a day, replacing any previous entry.
    pub fn with_day(mut self, day: Day, hours: Vec<TimeSlot>) -> Self {
        self.days.insert(day, hours);
        self
    }

    /// Hours worked on `day`, in listed order.
    pub fn hours(&self, day: Day) -> &[TimeSlot] {
        self.days.get(&day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether the professional works at `(day, time)`.
    pub fn is_available(&self, day: Day, time: TimeSlot) -> bool {
        self.hours(day).contains(&time)
    }

    /// Candidate slots in walk order: days in week order, hours as listed.
    pub fn slots(&self) -> impl Iterator<Item = (Day, TimeSlot)> + '_ {
        Day::ALL
            .into_iter()
            .flat_map(move |day| self.hours(day).iter().map(move |&time| (day, time)))
    }

    /// Number of weekly slots offered.
    pub fn slot_count(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }
}
