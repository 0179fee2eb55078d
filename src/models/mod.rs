//! Scheduling domain models.
//!
//! Provides the data types for the weekly allocation problem and its
//! solution: who needs what, who can deliver it when, and the grid that
//! results.
//!
//! # Domain Mappings
//!
//! | therapy-grid | Generic scheduling |
//! |--------------|--------------------|
//! | DemandTable | Job list with quantities |
//! | Professional | Resource with a calendar |
//! | RoleAssignment | Job → resource eligibility |
//! | WeeklyGrid | Schedule |
//! | Conflict | Constraint violation |

mod calendar;
mod demand;
mod grid;
mod professional;
mod roles;
mod schedule;
mod service;

pub use calendar::{Day, TimeSlot, WeeklyAvailability};
pub use demand::{DemandRequirement, DemandTable, Patient, PatientDemand};
pub use grid::{CellRef, GridError, WeeklyGrid, SLOT_CAPACITY};
pub use professional::{AvailabilityCatalog, ConfigError, Professional};
pub use roles::RoleAssignment;
pub use schedule::{Assignment, Conflict, DoubleBooking, DoubleBookingKind, UnmetDemand};
pub use service::{ServiceType, COLOR_PALETTE, FALLBACK_COLOR};
