//! # Beauty Tracker Core Library
//!
//! Core logic for the Beauty Tracker self-care program: a catalog of
//! multi-day program templates and a per-user engine that walks each user
//! through the days of the program they enrolled in. The `beauty-tracker`
//! CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Catalog**: program templates, habits and the habits assigned to each
//!   template day, with trilingual (en/ru/ky) text
//! - **Tracker**: the day state machine (unlock, complete, skip), habit marks
//!   and progress/streak statistics
//! - **Storage**: SQLite persistence with versioned migrations and TOML-based
//!   configuration
//!
//! ## Key Components
//!
//! - [`TrackerEngine`]: enrollment and day sequencing for one user at a time
//! - [`Catalog`]: template, habit and template-day administration
//! - [`TrackerDb`]: the SQLite database shared by both
//! - [`Config`]: application configuration management

pub mod catalog;
pub mod error;
pub mod locale;
pub mod storage;
pub mod tracker;

pub use catalog::{seed_default_catalog, Catalog, CatalogVersion, Habit, HabitCategory, ProgramDay, ProgramTemplate};
pub use error::{ConfigError, CoreError, DatabaseError, TrackerError, ValidationError};
pub use locale::{Locale, LocalizedText};
pub use storage::{Config, TrackerDb};
pub use tracker::{DayStatus, DayView, ProgramStatus, ProgressSummary, TrackerEngine, UserProgram};
