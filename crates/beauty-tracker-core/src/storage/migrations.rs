//! Database schema migrations for beauty-tracker.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
///
/// Increment this when adding new migrations.
pub const SCHEMA_VERSION: i32 = 3;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }
    if current_version < 3 {
        migrate_v3(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

fn has_column(conn: &Connection, table: &str, column: &str) -> SqliteResult<bool> {
    let count: i32 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        [table, column],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Migration v1: catalog and per-user progress tables.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS tracker_program_templates (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            name        TEXT NOT NULL,
            version     INTEGER NOT NULL DEFAULT 1,
            is_active   INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tracker_habits (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            category        TEXT NOT NULL,
            title           TEXT NOT NULL,
            title_ru        TEXT,
            title_ky        TEXT,
            description     TEXT,
            description_ru  TEXT,
            description_ky  TEXT,
            is_active       INTEGER NOT NULL DEFAULT 1,
            created_at      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tracker_program_days (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            program_template_id INTEGER NOT NULL
                REFERENCES tracker_program_templates(id) ON DELETE CASCADE,
            day_number          INTEGER NOT NULL,
            focus_text          TEXT,
            focus_text_ru       TEXT,
            focus_text_ky       TEXT,
            created_at          TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS tracker_program_day_habits (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            program_day_id  INTEGER NOT NULL
                REFERENCES tracker_program_days(id) ON DELETE CASCADE,
            habit_id        INTEGER NOT NULL REFERENCES tracker_habits(id),
            sort_order      INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS tracker_user_programs (
            id                  INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id             INTEGER NOT NULL,
            program_template_id INTEGER NOT NULL,
            status              TEXT NOT NULL DEFAULT 'ACTIVE',
            started_at          TEXT NOT NULL,
            finished_at         TEXT,
            allowed_skips       INTEGER NOT NULL DEFAULT 3,
            used_skips          INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS tracker_user_days (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            user_program_id INTEGER NOT NULL
                REFERENCES tracker_user_programs(id) ON DELETE CASCADE,
            day_number      INTEGER NOT NULL,
            status          TEXT NOT NULL DEFAULT 'LOCKED',
            opened_at       TEXT,
            closed_at       TEXT
        );

        CREATE TABLE IF NOT EXISTS tracker_user_day_logs (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            user_day_id  INTEGER NOT NULL
                REFERENCES tracker_user_days(id) ON DELETE CASCADE,
            habit_id     INTEGER NOT NULL,
            completed    INTEGER NOT NULL DEFAULT 0,
            completed_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_user_programs_user_status
            ON tracker_user_programs(user_id, status);",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: template descriptions and day count.
///
/// Adds `description`, `description_ru`, `description_ky` and `days_count`
/// to `tracker_program_templates`; existing templates get 30 days.
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    for column in ["description", "description_ru", "description_ky"] {
        if !has_column(&tx, "tracker_program_templates", column)? {
            tx.execute_batch(&format!(
                "ALTER TABLE tracker_program_templates ADD COLUMN {column} TEXT;"
            ))?;
        }
    }
    if !has_column(&tx, "tracker_program_templates", "days_count")? {
        tx.execute_batch(
            "ALTER TABLE tracker_program_templates ADD COLUMN days_count INTEGER DEFAULT 30;",
        )?;
    }
    tx.execute(
        "UPDATE tracker_program_templates SET days_count = 30 WHERE days_count IS NULL",
        [],
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()
}

/// Migration v3: uniqueness guarantees.
///
/// - one template day per day number
/// - one user day per day number
/// - one log per (user day, habit)
/// - at most one ACTIVE program per user
fn migrate_v3(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE UNIQUE INDEX IF NOT EXISTS uq_program_days_template_day
            ON tracker_program_days(program_template_id, day_number);
        CREATE INDEX IF NOT EXISTS idx_program_day_habits_day
            ON tracker_program_day_habits(program_day_id, sort_order);
        CREATE UNIQUE INDEX IF NOT EXISTS uq_user_days_program_day
            ON tracker_user_days(user_program_id, day_number);
        CREATE UNIQUE INDEX IF NOT EXISTS uq_user_day_logs_day_habit
            ON tracker_user_day_logs(user_day_id, habit_id);
        CREATE UNIQUE INDEX IF NOT EXISTS uq_user_programs_one_active
            ON tracker_user_programs(user_id) WHERE status = 'ACTIVE';",
    )?;

    set_schema_version(&tx, 3)?;
    tx.commit()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrate_from_scratch() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
        assert!(has_column(&conn, "tracker_program_templates", "days_count").unwrap());
        assert!(has_column(&conn, "tracker_program_templates", "description_ky").unwrap());
    }

    #[test]
    fn test_migrate_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        migrate(&conn).unwrap();
        assert_eq!(get_schema_version(&conn), SCHEMA_VERSION);
    }

    /// A v1 database with templates but no day count picks up 30 days.
    #[test]
    fn test_incremental_migration_backfills_days_count() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema_version_table(&conn).unwrap();
        migrate_v1(&conn).unwrap();
        conn.execute(
            "INSERT INTO tracker_program_templates (name, version, is_active, created_at)
             VALUES ('Legacy', 1, 1, '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();
        assert_eq!(get_schema_version(&conn), 1);

        migrate(&conn).unwrap();

        let days_count: i64 = conn
            .query_row(
                "SELECT days_count FROM tracker_program_templates WHERE name = 'Legacy'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(days_count, 30);
        assert_eq!(get_schema_version(&conn), 3);
    }

    #[test]
    fn test_second_active_program_rejected_by_index() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        let insert = "INSERT INTO tracker_user_programs (user_id, program_template_id, status, started_at)
                      VALUES (7, 1, ?1, '2024-01-01T00:00:00Z')";
        conn.execute(insert, ["FINISHED"]).unwrap();
        conn.execute(insert, ["ACTIVE"]).unwrap();
        assert!(conn.execute(insert, ["ACTIVE"]).is_err());
    }
}
