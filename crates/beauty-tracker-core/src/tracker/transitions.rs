//! Pure day-lifecycle rules.
//!
//! Every guard here looks only at statuses and counters, never at storage.
//! The engine loads rows, asks these functions what is allowed, and then
//! applies the change with a conditional UPDATE.

use super::model::{DayStatus, UserDay};
use crate::error::TrackerError;

/// Status a user day is created with at enrollment.
pub fn initial_status(day_number: u32) -> DayStatus {
    if day_number == 1 {
        DayStatus::Open
    } else {
        DayStatus::Locked
    }
}

/// A LOCKED day may open only once the day before it is resolved.
///
/// Day 1 has no predecessor and is never reopened from LOCKED.
pub fn check_unlockable(day_number: u32, previous: Option<DayStatus>) -> Result<(), TrackerError> {
    match previous {
        Some(status) if status.is_resolved() => Ok(()),
        _ => Err(TrackerError::DayLocked { day_number }),
    }
}

pub fn check_completable(day_number: u32, status: DayStatus) -> Result<(), TrackerError> {
    match status {
        DayStatus::Open | DayStatus::Skipped => Ok(()),
        _ => Err(TrackerError::DayNotOpen { day_number }),
    }
}

/// Budget is checked before the day status.
pub fn check_skippable(
    day_number: u32,
    status: DayStatus,
    used_skips: u32,
    allowed_skips: u32,
) -> Result<(), TrackerError> {
    if used_skips >= allowed_skips {
        return Err(TrackerError::SkipBudgetExhausted { allowed_skips });
    }
    if status != DayStatus::Open {
        return Err(TrackerError::DayNotOpen { day_number });
    }
    Ok(())
}

pub fn check_togglable(day_number: u32, status: DayStatus) -> Result<(), TrackerError> {
    if status == DayStatus::Open {
        Ok(())
    } else {
        Err(TrackerError::DayNotOpen { day_number })
    }
}

/// What completing a day does to the rest of the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterComplete {
    FinishProgram,
    Unlock(u32),
}

pub fn after_complete(day_number: u32, total_days: u32) -> AfterComplete {
    if day_number >= total_days {
        AfterComplete::FinishProgram
    } else {
        AfterComplete::Unlock(day_number + 1)
    }
}

/// Day to unlock after a skip. Skipping the last day unlocks nothing and
/// does not finish the program.
pub fn after_skip(day_number: u32, total_days: u32) -> Option<u32> {
    (day_number < total_days).then_some(day_number + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentDay {
    /// This day is already OPEN.
    Open(u32),
    /// Nothing is OPEN; this day follows the highest resolved one.
    Unlock(u32),
    /// No day can be current.
    None,
}

/// Pick the day a user should be looking at right now.
pub fn resolve_current(days: &[UserDay], total_days: u32) -> CurrentDay {
    if let Some(open) = days.iter().find(|d| d.status == DayStatus::Open) {
        return CurrentDay::Open(open.day_number);
    }
    let last_resolved = days
        .iter()
        .filter(|d| d.status.is_resolved())
        .map(|d| d.day_number)
        .max();
    match last_resolved {
        Some(k) if k < total_days => CurrentDay::Unlock(k + 1),
        _ => CurrentDay::None,
    }
}
