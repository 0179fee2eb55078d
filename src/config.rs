//! Planner configuration.

use serde::Deserialize;

/// Top-level planner configuration.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Store keys for the three persisted documents.
    pub keys: StoreKeys,

    /// When manual edits reach the store.
    pub persist_mode: PersistMode,
}

/// Keys under which documents are persisted.
///
/// The engine's output and the editor's grid share `weekly_grid`: whichever
/// wrote last is what the next session resumes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    pub weekly_grid: String,
    pub professionals: String,
    pub demand: String,
}

/// Persistence policy for manual edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistMode {
    /// Write after every successful mutation.
    #[default]
    Immediate,
    /// Keep edits in memory until an explicit save.
    OnSave,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            weekly_grid: "weekly-grid".to_string(),
            professionals: "professionals-config".to_string(),
            demand: "demand-config".to_string(),
        }
    }
}

impl PlannerConfig {
    /// Parses a JSON config document; absent fields keep their defaults.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Sets the persistence mode.
    pub fn with_persist_mode(mut self, mode: PersistMode) -> Self {
        self.persist_mode = mode;
        self
    }
}
