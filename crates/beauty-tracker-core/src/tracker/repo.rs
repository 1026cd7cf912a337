//! SQL for user programs, user days and habit logs.
//!
//! Status changes are compare-and-swap updates: each returns whether a row
//! actually moved so the engine can turn a lost race into the matching
//! precondition error.

use chrono::{DateTime, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::model::{DayStatus, ProgramStatus, UserDay, UserDayLog, UserProgram};
use super::transitions::initial_status;
use crate::storage::rows::{format_ts, get_u32, parse_enum, parse_opt_ts, parse_ts};

const PROGRAM_COLUMNS: &str = "p.id, p.user_id, p.program_template_id, p.status, p.started_at, \
     p.finished_at, p.allowed_skips, p.used_skips, \
     (SELECT COUNT(*) FROM tracker_user_days d WHERE d.user_program_id = p.id)";

const DAY_COLUMNS: &str = "id, user_program_id, day_number, status, opened_at, closed_at";

const LOG_COLUMNS: &str = "id, user_day_id, habit_id, completed, completed_at";

fn row_to_program(row: &Row) -> rusqlite::Result<UserProgram> {
    Ok(UserProgram {
        id: row.get(0)?,
        user_id: row.get(1)?,
        template_id: row.get(2)?,
        status: parse_enum(row, 3, "status")?,
        started_at: parse_ts(row, 4, "started_at")?,
        finished_at: parse_opt_ts(row, 5, "finished_at")?,
        allowed_skips: get_u32(row, 6)?,
        used_skips: get_u32(row, 7)?,
        total_days: get_u32(row, 8)?,
    })
}

fn row_to_day(row: &Row) -> rusqlite::Result<UserDay> {
    Ok(UserDay {
        id: row.get(0)?,
        user_program_id: row.get(1)?,
        day_number: get_u32(row, 2)?,
        status: parse_enum(row, 3, "status")?,
        opened_at: parse_opt_ts(row, 4, "opened_at")?,
        closed_at: parse_opt_ts(row, 5, "closed_at")?,
    })
}

fn row_to_log(row: &Row) -> rusqlite::Result<UserDayLog> {
    Ok(UserDayLog {
        id: row.get(0)?,
        user_day_id: row.get(1)?,
        habit_id: row.get(2)?,
        completed: row.get(3)?,
        completed_at: parse_opt_ts(row, 4, "completed_at")?,
    })
}

// === Programs ===

pub fn find_active_program(conn: &Connection, user_id: i64) -> rusqlite::Result<Option<UserProgram>> {
    conn.query_row(
        &format!(
            "SELECT {PROGRAM_COLUMNS} FROM tracker_user_programs p
             WHERE p.user_id = ?1 AND p.status = 'ACTIVE'"
        ),
        params![user_id],
        row_to_program,
    )
    .optional()
}

pub fn find_program(conn: &Connection, id: i64) -> rusqlite::Result<Option<UserProgram>> {
    conn.query_row(
        &format!("SELECT {PROGRAM_COLUMNS} FROM tracker_user_programs p WHERE p.id = ?1"),
        params![id],
        row_to_program,
    )
    .optional()
}

pub fn insert_program(
    conn: &Connection,
    user_id: i64,
    template_id: i64,
    allowed_skips: u32,
    now: DateTime<Utc>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO tracker_user_programs
            (user_id, program_template_id, status, started_at, allowed_skips, used_skips)
         VALUES (?1, ?2, 'ACTIVE', ?3, ?4, 0)",
        params![user_id, template_id, format_ts(&now), allowed_skips],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Create days `1..=total_days`: the first OPEN, the rest LOCKED.
pub fn insert_days(
    conn: &Connection,
    user_program_id: i64,
    total_days: u32,
    now: DateTime<Utc>,
) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO tracker_user_days (user_program_id, day_number, status, opened_at)
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    let opened_at = format_ts(&now);
    for day_number in 1..=total_days {
        let status = initial_status(day_number);
        let opened = (status == DayStatus::Open).then_some(opened_at.as_str());
        stmt.execute(params![user_program_id, day_number, status.as_str(), opened])?;
    }
    Ok(())
}

/// Move an ACTIVE program to `to`, stamping `finished_at`.
pub fn set_program_status(
    conn: &Connection,
    program_id: i64,
    to: ProgramStatus,
    now: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE tracker_user_programs SET status = ?2, finished_at = ?3
         WHERE id = ?1 AND status = 'ACTIVE'",
        params![program_id, to.as_str(), format_ts(&now)],
    )?;
    Ok(changed == 1)
}

/// Spend one skip if the budget allows it.
pub fn increment_used_skips(conn: &Connection, program_id: i64) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE tracker_user_programs SET used_skips = used_skips + 1
         WHERE id = ?1 AND used_skips < allowed_skips",
        params![program_id],
    )?;
    Ok(changed == 1)
}

// === Days ===

pub fn list_days(conn: &Connection, user_program_id: i64) -> rusqlite::Result<Vec<UserDay>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DAY_COLUMNS} FROM tracker_user_days
         WHERE user_program_id = ?1 ORDER BY day_number"
    ))?;
    let rows = stmt.query_map(params![user_program_id], row_to_day)?;
    rows.collect()
}

pub fn find_day(conn: &Connection, user_program_id: i64, day_number: u32) -> rusqlite::Result<Option<UserDay>> {
    conn.query_row(
        &format!(
            "SELECT {DAY_COLUMNS} FROM tracker_user_days
             WHERE user_program_id = ?1 AND day_number = ?2"
        ),
        params![user_program_id, day_number],
        row_to_day,
    )
    .optional()
}

/// LOCKED -> OPEN. False if the day was no longer LOCKED.
pub fn open_day(conn: &Connection, day_id: i64, now: DateTime<Utc>) -> rusqlite::Result<bool> {
    let changed = conn.execute(
        "UPDATE tracker_user_days SET status = 'OPEN', opened_at = ?2
         WHERE id = ?1 AND status = 'LOCKED'",
        params![day_id, format_ts(&now)],
    )?;
    Ok(changed == 1)
}

/// Resolve a day to `to` if it is currently in one of `from`.
pub fn close_day(
    conn: &Connection,
    day_id: i64,
    from: &[DayStatus],
    to: DayStatus,
    now: DateTime<Utc>,
) -> rusqlite::Result<bool> {
    let placeholders = (0..from.len())
        .map(|i| format!("?{}", i + 4))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "UPDATE tracker_user_days SET status = ?2, closed_at = ?3
         WHERE id = ?1 AND status IN ({placeholders})"
    );
    let mut values = vec![
        Value::Integer(day_id),
        Value::Text(to.as_str().to_string()),
        Value::Text(format_ts(&now)),
    ];
    values.extend(from.iter().map(|s| Value::Text(s.as_str().to_string())));
    let changed = conn.execute(&sql, params_from_iter(values))?;
    Ok(changed == 1)
}

// === Habit logs ===

pub fn find_log(conn: &Connection, user_day_id: i64, habit_id: i64) -> rusqlite::Result<Option<UserDayLog>> {
    conn.query_row(
        &format!(
            "SELECT {LOG_COLUMNS} FROM tracker_user_day_logs
             WHERE user_day_id = ?1 AND habit_id = ?2"
        ),
        params![user_day_id, habit_id],
        row_to_log,
    )
    .optional()
}

pub fn logs_for_day(conn: &Connection, user_day_id: i64) -> rusqlite::Result<Vec<UserDayLog>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {LOG_COLUMNS} FROM tracker_user_day_logs WHERE user_day_id = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![user_day_id], row_to_log)?;
    rows.collect()
}

pub fn insert_log(
    conn: &Connection,
    user_day_id: i64,
    habit_id: i64,
    now: DateTime<Utc>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO tracker_user_day_logs (user_day_id, habit_id, completed, completed_at)
         VALUES (?1, ?2, 1, ?3)",
        params![user_day_id, habit_id, format_ts(&now)],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Set a log's mark; `completed_at` is cleared when unmarking.
pub fn set_log_completed(
    conn: &Connection,
    log_id: i64,
    completed: bool,
    now: DateTime<Utc>,
) -> rusqlite::Result<()> {
    let completed_at = completed.then(|| format_ts(&now));
    conn.execute(
        "UPDATE tracker_user_day_logs SET completed = ?2, completed_at = ?3 WHERE id = ?1",
        params![log_id, completed, completed_at],
    )?;
    Ok(())
}
