//! Program catalog: habits, templates and the habits assigned to each day.
//!
//! The engine only reads the catalog. Everything here that writes is admin
//! tooling, plus the guest-facing program list and demo day.

mod seed;
mod store;
mod types;

pub use seed::{seed_default_catalog, SeedSummary};
pub use store::Catalog;
pub(crate) use store::{day_has_habit, find_template, template_day};
pub use types::{
    CatalogVersion, DemoDay, Habit, HabitCategory, HabitUpdate, NewHabit, NewProgramDay,
    NewTemplate, ProgramDay, ProgramDayUpdate, ProgramTemplate, PublicProgram, TemplateUpdate,
};
