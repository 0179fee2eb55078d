//! Service (therapy type) model.
//!
//! A service type is the kind of session a patient needs. Each type has
//! a display name and a default color used when no professional color
//! is known.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A therapy service offered by the practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceType {
    Physiotherapy,
    OccupationalTherapy,
    Psychopedagogy,
    Psychology,
    /// Attendant therapy (AT).
    #[serde(rename = "at")]
    AttendantTherapy,
}

/// Colors offered when picking a professional's color.
pub const COLOR_PALETTE: [&str; 10] = [
    "#8B5CF6", "#06B6D4", "#10B981", "#F59E0B", "#EF4444", "#EC4899", "#8B5A2B", "#6366F1",
    "#84CC16", "#F97316",
];

/// Fallback color when neither professional nor service supplies one.
pub const FALLBACK_COLOR: &str = "#8B5CF6";

impl ServiceType {
    /// All service types in table order.
    pub const ALL: [ServiceType; 5] = [
        ServiceType::Physiotherapy,
        ServiceType::OccupationalTherapy,
        ServiceType::Psychopedagogy,
        ServiceType::Psychology,
        ServiceType::AttendantTherapy,
    ];

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            ServiceType::Physiotherapy => "Physiotherapy",
            ServiceType::OccupationalTherapy => "Occupational Therapy",
            ServiceType::Psychopedagogy => "Psychopedagogy",
            ServiceType::Psychology => "Psychology",
            ServiceType::AttendantTherapy => "AT",
        }
    }

    /// Default color (`#RRGGBB`).
    pub fn default_color(&self) -> &'static str {
        match self {
            ServiceType::Physiotherapy => "#10B981",
            ServiceType::OccupationalTherapy => "#8B5CF6",
            ServiceType::Psychopedagogy => "#06B6D4",
            ServiceType::Psychology => "#EF4444",
            ServiceType::AttendantTherapy => "#F59E0B",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
