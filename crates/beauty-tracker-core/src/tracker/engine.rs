//! Program engine: enrollment, day sequencing, skips, habit marks, progress.

use chrono::Utc;
use rusqlite::Connection;

use super::model::{
    CompleteDayOutcome, DayStatus, DayView, HabitView, ProgramStatus, ProgressSummary,
    SkipDayOutcome, ToggleOutcome, UserDay, UserProgram,
};
use super::progress::summarize;
use super::repo;
use super::transitions::{
    after_complete, after_skip, check_completable, check_skippable, check_togglable,
    check_unlockable, resolve_current, AfterComplete, CurrentDay,
};
use crate::catalog::{day_has_habit, find_template, template_day, CatalogVersion};
use crate::error::{CoreError, TrackerError};
use crate::locale::LocalizedText;
use crate::storage::{Config, TrackerDb};

/// Skips granted to a new enrollment unless configured otherwise.
pub const DEFAULT_ALLOWED_SKIPS: u32 = 3;

/// Day numbers below 1 are rejected before any lookup.
fn requested_day(day_number: i64) -> Result<u32, TrackerError> {
    u32::try_from(day_number)
        .ok()
        .filter(|n| *n >= 1)
        .ok_or(TrackerError::InvalidDayNumber(day_number))
}

fn require_active(conn: &Connection, user_id: i64) -> Result<UserProgram, CoreError> {
    repo::find_active_program(conn, user_id)?.ok_or_else(|| TrackerError::NoActiveProgram.into())
}

/// Load day `day_number` of `program`, checking it against N.
fn program_day(conn: &Connection, program: &UserProgram, day_number: u32) -> Result<UserDay, CoreError> {
    if day_number > program.total_days {
        return Err(TrackerError::InvalidDayNumber(i64::from(day_number)).into());
    }
    repo::find_day(conn, program.id, day_number)?
        .ok_or_else(|| TrackerError::InvalidDayNumber(i64::from(day_number)).into())
}

/// Open day `day_number` if it is LOCKED and its predecessor is resolved.
///
/// Days that are already OPEN or resolved are returned unchanged. This is
/// the only place a day leaves LOCKED.
fn unlock_day(conn: &Connection, program: &UserProgram, day_number: u32) -> Result<UserDay, CoreError> {
    let day = program_day(conn, program, day_number)?;
    if day.status != DayStatus::Locked {
        return Ok(day);
    }

    let previous = match day_number {
        1 => None,
        n => repo::find_day(conn, program.id, n - 1)?.map(|d| d.status),
    };
    check_unlockable(day_number, previous)?;

    let now = Utc::now();
    if !repo::open_day(conn, day.id, now)? {
        // Someone else moved it; report whatever it is now.
        return program_day(conn, program, day_number);
    }
    tracing::debug!(program_id = program.id, day_number, "unlocked day");
    Ok(UserDay {
        status: DayStatus::Open,
        opened_at: Some(now),
        ..day
    })
}

fn build_day_view(conn: &Connection, program: &UserProgram, day: UserDay) -> Result<DayView, CoreError> {
    let logs = repo::logs_for_day(conn, day.id)?;
    let (focus_text, habits) = match template_day(conn, program.template_id, day.day_number)? {
        Some(template) => (template.focus_text, template.habits),
        None => {
            tracing::warn!(
                template_id = program.template_id,
                day_number = day.day_number,
                "template has no content for this day"
            );
            (LocalizedText::default(), Vec::new())
        }
    };

    let habits = habits
        .into_iter()
        .map(|habit| {
            let log = logs.iter().find(|l| l.habit_id == habit.id);
            HabitView {
                id: habit.id,
                category: habit.category,
                title: habit.title,
                description: habit.description,
                completed: log.is_some_and(|l| l.completed),
                log_id: log.map(|l| l.id),
            }
        })
        .collect();

    Ok(DayView {
        id: day.id,
        day_number: day.day_number,
        status: day.status,
        opened_at: day.opened_at,
        closed_at: day.closed_at,
        focus_text,
        habits,
    })
}

/// Per-user program state machine over a [`TrackerDb`].
///
/// Every mutating call runs in one IMMEDIATE transaction; a returned error
/// means nothing was written.
pub struct TrackerEngine<'a> {
    db: &'a TrackerDb,
    allowed_skips: u32,
}

impl<'a> TrackerEngine<'a> {
    pub fn new(db: &'a TrackerDb) -> Self {
        Self {
            db,
            allowed_skips: DEFAULT_ALLOWED_SKIPS,
        }
    }

    /// Skip budget for programs started from now on.
    pub fn with_allowed_skips(mut self, allowed_skips: u32) -> Self {
        self.allowed_skips = allowed_skips;
        self
    }

    pub fn from_config(db: &'a TrackerDb, config: &Config) -> Self {
        Self::new(db).with_allowed_skips(config.program.allowed_skips)
    }

    /// Enroll `user_id` on the template named by `version`.
    ///
    /// # Errors
    /// `AlreadyEnrolled` if the user has an ACTIVE program,
    /// `NoTemplateAvailable` if the template no longer exists.
    pub fn start_program(&self, user_id: i64, version: &CatalogVersion) -> Result<UserProgram, CoreError> {
        let tx = self.db.write_tx()?;
        if repo::find_active_program(&tx, user_id)?.is_some() {
            return Err(TrackerError::AlreadyEnrolled.into());
        }
        let template = find_template(&tx, version.template_id)?.ok_or(TrackerError::NoTemplateAvailable)?;
        if template.version != version.version || template.days_count != version.days_count {
            tracing::warn!(
                template_id = template.id,
                requested_version = version.version,
                stored_version = template.version,
                "template changed since the catalog version was resolved"
            );
        }

        let now = Utc::now();
        let program_id = repo::insert_program(&tx, user_id, template.id, self.allowed_skips, now)?;
        repo::insert_days(&tx, program_id, template.days_count, now)?;
        let program = repo::find_program(&tx, program_id)?.ok_or(TrackerError::NoActiveProgram)?;
        tx.commit()?;

        tracing::info!(
            user_id,
            program_id,
            template_id = template.id,
            total_days = program.total_days,
            "started program"
        );
        Ok(program)
    }

    /// The user's ACTIVE program, if any.
    pub fn current_program(&self, user_id: i64) -> Result<Option<UserProgram>, CoreError> {
        Ok(repo::find_active_program(self.db.conn(), user_id)?)
    }

    /// Abandon the ACTIVE program so the user can enroll again.
    pub fn cancel_program(&self, user_id: i64) -> Result<UserProgram, CoreError> {
        let tx = self.db.write_tx()?;
        let program = require_active(&tx, user_id)?;
        if !repo::set_program_status(&tx, program.id, ProgramStatus::Cancelled, Utc::now())? {
            return Err(TrackerError::NoActiveProgram.into());
        }
        let cancelled = repo::find_program(&tx, program.id)?.ok_or(TrackerError::NoActiveProgram)?;
        tx.commit()?;
        tracing::info!(user_id, program_id = program.id, "cancelled program");
        Ok(cancelled)
    }

    /// The OPEN day, or the day after the last resolved one (opened on the way).
    pub fn get_current_day(&self, user_id: i64) -> Result<DayView, CoreError> {
        let tx = self.db.write_tx()?;
        let program = require_active(&tx, user_id)?;
        let days = repo::list_days(&tx, program.id)?;
        let day = match resolve_current(&days, program.total_days) {
            CurrentDay::Open(n) => program_day(&tx, &program, n)?,
            CurrentDay::Unlock(n) => unlock_day(&tx, &program, n)?,
            CurrentDay::None => return Err(TrackerError::NoCurrentDay.into()),
        };
        let view = build_day_view(&tx, &program, day)?;
        tx.commit()?;
        Ok(view)
    }

    /// Day `day_number`, opening it first if the previous day is resolved.
    pub fn get_day(&self, user_id: i64, day_number: i64) -> Result<DayView, CoreError> {
        let n = requested_day(day_number)?;
        let tx = self.db.write_tx()?;
        let program = require_active(&tx, user_id)?;
        let day = unlock_day(&tx, &program, n)?;
        let view = build_day_view(&tx, &program, day)?;
        tx.commit()?;
        Ok(view)
    }

    /// Mark an OPEN or SKIPPED day completed.
    ///
    /// Completing the last day finishes the program; otherwise the next day
    /// is unlocked.
    pub fn complete_day(&self, user_id: i64, day_number: i64) -> Result<CompleteDayOutcome, CoreError> {
        let n = requested_day(day_number)?;
        let tx = self.db.write_tx()?;
        let program = require_active(&tx, user_id)?;
        let day = program_day(&tx, &program, n)?;
        check_completable(n, day.status)?;

        let now = Utc::now();
        if !repo::close_day(&tx, day.id, &[DayStatus::Open, DayStatus::Skipped], DayStatus::Completed, now)? {
            return Err(TrackerError::DayNotOpen { day_number: n }.into());
        }

        let program_finished = match after_complete(n, program.total_days) {
            AfterComplete::FinishProgram => {
                if !repo::set_program_status(&tx, program.id, ProgramStatus::Finished, now)? {
                    return Err(TrackerError::NoActiveProgram.into());
                }
                true
            }
            AfterComplete::Unlock(next) => {
                unlock_day(&tx, &program, next)?;
                false
            }
        };
        tx.commit()?;

        tracing::info!(user_id, program_id = program.id, day_number = n, program_finished, "completed day");
        Ok(CompleteDayOutcome {
            day_number: n,
            program_finished,
        })
    }

    /// Spend a skip on an OPEN day and unlock the next one.
    pub fn skip_day(&self, user_id: i64, day_number: i64) -> Result<SkipDayOutcome, CoreError> {
        let n = requested_day(day_number)?;
        let tx = self.db.write_tx()?;
        let program = require_active(&tx, user_id)?;
        let day = program_day(&tx, &program, n)?;
        check_skippable(n, day.status, program.used_skips, program.allowed_skips)?;

        let now = Utc::now();
        if !repo::close_day(&tx, day.id, &[DayStatus::Open], DayStatus::Skipped, now)? {
            return Err(TrackerError::DayNotOpen { day_number: n }.into());
        }
        if !repo::increment_used_skips(&tx, program.id)? {
            return Err(TrackerError::SkipBudgetExhausted {
                allowed_skips: program.allowed_skips,
            }
            .into());
        }
        if let Some(next) = after_skip(n, program.total_days) {
            unlock_day(&tx, &program, next)?;
        }
        tx.commit()?;

        let used_skips = program.used_skips + 1;
        tracing::info!(user_id, program_id = program.id, day_number = n, used_skips, "skipped day");
        Ok(SkipDayOutcome {
            day_number: n,
            used_skips,
        })
    }

    /// Flip the user's mark for a habit on an OPEN day.
    pub fn toggle_habit(&self, user_id: i64, day_number: i64, habit_id: i64) -> Result<ToggleOutcome, CoreError> {
        let n = requested_day(day_number)?;
        let tx = self.db.write_tx()?;
        let program = require_active(&tx, user_id)?;
        let day = program_day(&tx, &program, n)?;
        check_togglable(n, day.status)?;
        if !day_has_habit(&tx, program.template_id, n, habit_id)? {
            return Err(TrackerError::HabitNotInDay {
                day_number: n,
                habit_id,
            }
            .into());
        }

        let now = Utc::now();
        let completed = match repo::find_log(&tx, day.id, habit_id)? {
            Some(log) => {
                repo::set_log_completed(&tx, log.id, !log.completed, now)?;
                !log.completed
            }
            None => {
                repo::insert_log(&tx, day.id, habit_id, now)?;
                true
            }
        };
        tx.commit()?;

        tracing::debug!(user_id, day_number = n, habit_id, completed, "toggled habit");
        Ok(ToggleOutcome { completed })
    }

    pub fn get_progress(&self, user_id: i64) -> Result<ProgressSummary, CoreError> {
        let conn = self.db.conn();
        let program = require_active(conn, user_id)?;
        let days = repo::list_days(conn, program.id)?;
        Ok(summarize(&program, &days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, HabitCategory, NewHabit, NewProgramDay, NewTemplate};

    /// Active template of `days` days, each with one habit.
    fn catalog(db: &TrackerDb, days: u32) -> (CatalogVersion, i64) {
        let catalog = Catalog::new(db);
        let habit = catalog
            .create_habit(&NewHabit {
                category: HabitCategory::Face,
                title: LocalizedText::new("Cleanse"),
                description: LocalizedText::default(),
            })
            .unwrap();
        let mut new = NewTemplate::named("Test");
        new.days_count = days;
        let template = catalog.create_template(&new).unwrap();
        for day_number in 1..=days {
            catalog
                .add_template_day(
                    template.id,
                    &NewProgramDay {
                        day_number,
                        focus_text: LocalizedText::new(format!("Day {day_number}")),
                        habit_ids: vec![habit.id],
                    },
                )
                .unwrap();
        }
        catalog.activate_template(template.id).unwrap();
        (catalog.current_version().unwrap(), habit.id)
    }

    fn status_of(db: &TrackerDb, program: &UserProgram, n: u32) -> DayStatus {
        repo::find_day(db.conn(), program.id, n).unwrap().unwrap().status
    }

    #[test]
    fn unlock_is_idempotent_on_open_and_resolved_days() {
        let db = TrackerDb::open_memory().unwrap();
        let (version, _) = catalog(&db, 3);
        let program = TrackerEngine::new(&db).start_program(1, &version).unwrap();

        let first = unlock_day(db.conn(), &program, 1).unwrap();
        assert_eq!(first.status, DayStatus::Open);

        repo::close_day(db.conn(), first.id, &[DayStatus::Open], DayStatus::Completed, Utc::now()).unwrap();
        let again = unlock_day(db.conn(), &program, 1).unwrap();
        assert_eq!(again.status, DayStatus::Completed);

        let second = unlock_day(db.conn(), &program, 2).unwrap();
        assert_eq!(second.status, DayStatus::Open);
        assert!(second.opened_at.is_some());
        assert_eq!(status_of(&db, &program, 3), DayStatus::Locked);
    }

    #[test]
    fn unlock_refuses_without_resolved_predecessor() {
        let db = TrackerDb::open_memory().unwrap();
        let (version, _) = catalog(&db, 3);
        let program = TrackerEngine::new(&db).start_program(1, &version).unwrap();

        let err = unlock_day(db.conn(), &program, 3).unwrap_err();
        assert_eq!(err.tracker(), Some(&TrackerError::DayLocked { day_number: 3 }));
        assert_eq!(status_of(&db, &program, 3), DayStatus::Locked);
    }

    #[test]
    fn day_number_validation_precedes_program_lookup() {
        let db = TrackerDb::open_memory().unwrap();
        let engine = TrackerEngine::new(&db);
        assert_eq!(
            engine.get_day(1, 0).unwrap_err().tracker(),
            Some(&TrackerError::InvalidDayNumber(0))
        );
        assert_eq!(
            engine.get_day(1, 2).unwrap_err().tracker(),
            Some(&TrackerError::NoActiveProgram)
        );

        let (version, _) = catalog(&db, 3);
        engine.start_program(1, &version).unwrap();
        assert_eq!(
            engine.complete_day(1, 4).unwrap_err().tracker(),
            Some(&TrackerError::InvalidDayNumber(4))
        );
    }

    #[test]
    fn configured_skip_budget_applies_to_new_programs() {
        let db = TrackerDb::open_memory().unwrap();
        let (version, _) = catalog(&db, 5);
        let engine = TrackerEngine::new(&db).with_allowed_skips(1);
        let program = engine.start_program(7, &version).unwrap();
        assert_eq!(program.allowed_skips, 1);

        engine.skip_day(7, 1).unwrap();
        let err = engine.skip_day(7, 2).unwrap_err();
        assert_eq!(
            err.tracker(),
            Some(&TrackerError::SkipBudgetExhausted { allowed_skips: 1 })
        );
    }

    #[test]
    fn day_view_carries_habit_marks() {
        let db = TrackerDb::open_memory().unwrap();
        let (version, habit_id) = catalog(&db, 2);
        let engine = TrackerEngine::new(&db);
        engine.start_program(1, &version).unwrap();

        let before = engine.get_day(1, 1).unwrap();
        assert_eq!(before.focus_text.en.as_deref(), Some("Day 1"));
        assert_eq!(before.habits.len(), 1);
        assert!(!before.habits[0].completed);
        assert_eq!(before.habits[0].log_id, None);

        engine.toggle_habit(1, 1, habit_id).unwrap();
        let after = engine.get_day(1, 1).unwrap();
        assert!(after.habits[0].completed);
        assert!(after.habits[0].log_id.is_some());
    }

    #[test]
    fn from_config_reads_allowed_skips() {
        let db = TrackerDb::open_memory().unwrap();
        let mut config = Config::default();
        config.program.allowed_skips = 5;
        let (version, _) = catalog(&db, 2);
        let program = TrackerEngine::from_config(&db, &config).start_program(1, &version).unwrap();
        assert_eq!(program.allowed_skips, 5);
    }
}
