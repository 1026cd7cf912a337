use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::catalog::HabitCategory;
use crate::locale::LocalizedText;

/// Lifecycle of a user day: `LOCKED -> OPEN -> (COMPLETED | SKIPPED)`.
///
/// A SKIPPED day may still be completed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayStatus {
    Locked,
    Open,
    Completed,
    Skipped,
}

impl DayStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayStatus::Locked => "LOCKED",
            DayStatus::Open => "OPEN",
            DayStatus::Completed => "COMPLETED",
            DayStatus::Skipped => "SKIPPED",
        }
    }

    /// Completed or skipped: the door to the next day is open.
    pub fn is_resolved(&self) -> bool {
        matches!(self, DayStatus::Completed | DayStatus::Skipped)
    }
}

impl FromStr for DayStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOCKED" => Ok(DayStatus::Locked),
            "OPEN" => Ok(DayStatus::Open),
            "COMPLETED" => Ok(DayStatus::Completed),
            "SKIPPED" => Ok(DayStatus::Skipped),
            other => Err(format!("unknown day status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProgramStatus {
    Active,
    Finished,
    Cancelled,
}

impl ProgramStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProgramStatus::Active => "ACTIVE",
            ProgramStatus::Finished => "FINISHED",
            ProgramStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for ProgramStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(ProgramStatus::Active),
            "FINISHED" => Ok(ProgramStatus::Finished),
            "CANCELLED" => Ok(ProgramStatus::Cancelled),
            other => Err(format!("unknown program status: {other}")),
        }
    }
}

/// One user's enrollment on a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgram {
    pub id: i64,
    pub user_id: i64,
    pub template_id: i64,
    pub status: ProgramStatus,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub allowed_skips: u32,
    pub used_skips: u32,
    /// Number of user days created at enrollment (N).
    pub total_days: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDay {
    pub id: i64,
    pub user_program_id: i64,
    pub day_number: u32,
    pub status: DayStatus,
    pub opened_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDayLog {
    pub id: i64,
    pub user_day_id: i64,
    pub habit_id: i64,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A habit of the day together with the user's mark.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitView {
    pub id: i64,
    pub category: HabitCategory,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub completed: bool,
    pub log_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayView {
    pub id: i64,
    pub day_number: u32,
    pub status: DayStatus,
    pub opened_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub focus_text: LocalizedText,
    pub habits: Vec<HabitView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub total_days: u32,
    pub completed_days: u32,
    pub skipped_days: u32,
    pub current_streak: u32,
    pub completion_percentage: f64,
    pub current_day: Option<u32>,
    pub used_skips: u32,
    pub allowed_skips: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompleteDayOutcome {
    pub day_number: u32,
    pub program_finished: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkipDayOutcome {
    pub day_number: u32,
    pub used_skips: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleOutcome {
    pub completed: bool,
}
