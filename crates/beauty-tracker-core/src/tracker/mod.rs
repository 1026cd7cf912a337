//! Per-user program engine.
//!
//! A user enrolls on a template and gets one day record per template day.
//! Days move `LOCKED -> OPEN -> COMPLETED | SKIPPED`, one at a time, and a
//! skipped day can still be completed later. Completing the last day
//! finishes the program.

mod engine;
mod model;
mod progress;
mod repo;
mod transitions;

pub use engine::{TrackerEngine, DEFAULT_ALLOWED_SKIPS};
pub use model::{
    CompleteDayOutcome, DayStatus, DayView, HabitView, ProgramStatus, ProgressSummary,
    SkipDayOutcome, ToggleOutcome, UserDay, UserDayLog, UserProgram,
};
pub use progress::{completion_percentage, current_streak};
