//! Scheduled session and conflict models.
//!
//! An assignment is one session placed in a grid cell. A conflict is
//! either a requirement the allocator could not fully place or a
//! professional booked twice in one slot. Conflicts are data: they are
//! collected and reported, never raised.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{AvailabilityCatalog, Day, Patient, ServiceType, TimeSlot};

/// A scheduled session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Service delivered.
    pub service: ServiceType,
    /// Professional display name.
    pub professional: String,
    /// Display color (`#RRGGBB`).
    pub color: String,
}

impl Assignment {
    /// Creates an assignment.
    pub fn new(
        service: ServiceType,
        professional: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            service,
            professional: professional.into(),
            color: color.into(),
        }
    }

    /// Builds a manually entered assignment.
    ///
    /// Takes the professional's color when the name is in the catalog,
    /// otherwise the service's default color.
    pub fn for_professional(
        service: ServiceType,
        professional: &str,
        catalog: &AvailabilityCatalog,
    ) -> Self {
        let color = catalog
            .find_by_name(professional)
            .map(|p| p.color.clone())
            .unwrap_or_else(|| service.default_color().to_string());
        Self::new(service, professional, color)
    }
}

/// A requirement the allocator could not fully place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnmetDemand {
    pub service: ServiceType,
    /// Professional display name.
    pub professional: String,
    pub patient: Patient,
    pub required: u32,
    pub allocated: u32,
    pub missing: u32,
}

/// How a double booking arose.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DoubleBookingKind {
    /// Professional already holds a session for the same patient in this slot.
    AlreadyBusy,
    /// Professional is booked for two different patients in this slot.
    CannotServeBoth { first: Patient, second: Patient },
}

/// A professional appearing more than once in one `(day, time)` slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoubleBooking {
    pub day: Day,
    pub time: TimeSlot,
    /// Professional display name.
    pub professional: String,
    pub kind: DoubleBookingKind,
    /// Human-readable description.
    pub description: String,
}

impl DoubleBooking {
    /// Creates a double booking with a description derived from `kind`.
    pub fn new(
        day: Day,
        time: TimeSlot,
        professional: impl Into<String>,
        kind: DoubleBookingKind,
    ) -> Self {
        let professional = professional.into();
        let description = match &kind {
            DoubleBookingKind::AlreadyBusy => {
                format!("{professional} is already busy in this slot")
            }
            DoubleBookingKind::CannotServeBoth { first, second } => {
                format!("{professional} cannot serve {first} and {second} at the same time")
            }
        };
        Self {
            day,
            time,
            professional,
            kind,
            description,
        }
    }
}

/// A scheduling conflict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Conflict {
    UnmetDemand(UnmetDemand),
    DoubleBooking(DoubleBooking),
}

impl Conflict {
    /// Short category label.
    pub fn label(&self) -> &'static str {
        match self {
            Conflict::UnmetDemand(_) => "Missing slots",
            Conflict::DoubleBooking(_) => "Professional conflict",
        }
    }
}

impl From<UnmetDemand> for Conflict {
    fn from(u: UnmetDemand) -> Self {
        Conflict::UnmetDemand(u)
    }
}

impl From<DoubleBooking> for Conflict {
    fn from(d: DoubleBooking) -> Self {
        Conflict::DoubleBooking(d)
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Conflict::UnmetDemand(u) => write!(
                f,
                "{}: {} - {}: required {}, allocated {}, missing {}",
                self.label(),
                u.professional,
                u.patient,
                u.required,
                u.allocated,
                u.missing
            ),
            Conflict::DoubleBooking(d) => write!(
                f,
                "{}: {} ({} at {})",
                self.label(),
                d.description,
                d.day,
                d.time
            ),
        }
    }
}
