//! Weekly therapy session planning for a small clinic.
//!
//! Allocates each patient's required sessions per service into a
//! Monday–Friday, 08:00–11:00 grid according to professional availability,
//! detects conflicts, lets a user edit the grid by hand, and persists the
//! grid and its configuration through a key-value store.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `ServiceType`, `Professional`, `DemandTable`,
//!   `RoleAssignment`, `WeeklyGrid`, `Assignment`, `Conflict`
//! - **`scheduler`**: Greedy first-fit `AllocationEngine`, `Statistics`,
//!   `ScheduleReport`
//! - **`detection`**: Double-booking detection over any grid
//! - **`editor`**: Manual add/remove/move with capacity enforcement
//! - **`planner`**: Single-writer coordinator tying store, engine and editor
//! - **`store`**: Whole-document persistence (`MemoryStore`, `FileStore`)
//! - **`config`**: Store keys and persistence mode
//! - **`analytics`**: Per-day, per-service and per-patient counts
//! - **`defaults`**: Reference dataset used when nothing is configured
//!
//! # Architecture
//!
//! Allocation and detection are pure functions of their inputs. State lives
//! only in [`planner::Planner`], which serializes recompute and edits behind
//! one lock; the store is best effort and never blocks scheduling.

pub mod analytics;
pub mod config;
pub mod defaults;
pub mod detection;
pub mod editor;
pub mod models;
pub mod planner;
pub mod scheduler;
pub mod store;
