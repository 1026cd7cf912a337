//! SQLite-backed catalog: templates, habits and template days.
//!
//! Query helpers take a plain `&Connection` so the program engine can read
//! the catalog inside its own transaction. [`Catalog`] wraps them for admin
//! and public callers.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::types::{
    CatalogVersion, DemoDay, Habit, HabitCategory, HabitUpdate, NewHabit, NewProgramDay,
    NewTemplate, ProgramDay, ProgramDayUpdate, ProgramTemplate, PublicProgram, TemplateUpdate,
};
use crate::error::{CoreError, TrackerError, ValidationError};
use crate::locale::LocalizedText;
use crate::storage::rows::{format_ts, get_u32, parse_enum, parse_ts};
use crate::storage::TrackerDb;

const TEMPLATE_COLUMNS: &str =
    "id, name, description, description_ru, description_ky, days_count, version, is_active, created_at";

const HABIT_COLUMNS: &str = "h.id, h.category, h.title, h.title_ru, h.title_ky, \
     h.description, h.description_ru, h.description_ky, h.is_active, h.created_at";

fn localized(row: &Row, first: usize) -> rusqlite::Result<LocalizedText> {
    Ok(LocalizedText {
        en: row.get(first)?,
        ru: row.get(first + 1)?,
        ky: row.get(first + 2)?,
    })
}

fn row_to_template(row: &Row) -> rusqlite::Result<ProgramTemplate> {
    Ok(ProgramTemplate {
        id: row.get(0)?,
        name: row.get(1)?,
        description: localized(row, 2)?,
        days_count: get_u32(row, 5)?,
        version: get_u32(row, 6)?,
        is_active: row.get(7)?,
        created_at: parse_ts(row, 8, "created_at")?,
    })
}

fn row_to_habit(row: &Row) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: row.get(0)?,
        category: parse_enum(row, 1, "category")?,
        title: localized(row, 2)?,
        description: localized(row, 5)?,
        is_active: row.get(8)?,
        created_at: parse_ts(row, 9, "created_at")?,
    })
}

fn validate_template_fields(name: Option<&str>, days_count: Option<u32>) -> Result<(), ValidationError> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(ValidationError::EmptyField("name"));
    }
    if days_count == Some(0) {
        return Err(ValidationError::InvalidValue {
            field: "days_count".into(),
            message: "a program needs at least one day".into(),
        });
    }
    Ok(())
}

fn validate_title(title: &LocalizedText) -> Result<(), ValidationError> {
    match title.en.as_deref() {
        Some(en) if !en.trim().is_empty() => Ok(()),
        _ => Err(ValidationError::EmptyField("title")),
    }
}

// === Templates ===

pub(crate) fn find_template(conn: &Connection, id: i64) -> rusqlite::Result<Option<ProgramTemplate>> {
    conn.query_row(
        &format!("SELECT {TEMPLATE_COLUMNS} FROM tracker_program_templates WHERE id = ?1"),
        params![id],
        row_to_template,
    )
    .optional()
}

pub(crate) fn active_template(conn: &Connection) -> rusqlite::Result<Option<ProgramTemplate>> {
    conn.query_row(
        &format!(
            "SELECT {TEMPLATE_COLUMNS} FROM tracker_program_templates
             WHERE is_active = 1 ORDER BY id LIMIT 1"
        ),
        [],
        row_to_template,
    )
    .optional()
}

fn list_templates_where(conn: &Connection, only_active: bool) -> rusqlite::Result<Vec<ProgramTemplate>> {
    let filter = if only_active { "WHERE is_active = 1" } else { "" };
    let mut stmt = conn.prepare(&format!(
        "SELECT {TEMPLATE_COLUMNS} FROM tracker_program_templates {filter} ORDER BY id"
    ))?;
    let rows = stmt.query_map([], row_to_template)?;
    rows.collect()
}

fn count_active_programs(conn: &Connection, template_id: i64) -> rusqlite::Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM tracker_user_programs
         WHERE program_template_id = ?1 AND status = 'ACTIVE'",
        params![template_id],
        |row| row.get(0),
    )
}

fn count_day_rows(conn: &Connection, template_id: i64) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COUNT(*) FROM tracker_program_days WHERE program_template_id = ?1",
        params![template_id],
        |row| get_u32(row, 0),
    )
}

pub(crate) fn insert_template(
    conn: &Connection,
    template: &NewTemplate,
    is_active: bool,
    now: DateTime<Utc>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO tracker_program_templates
            (name, description, description_ru, description_ky, days_count, version, is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            template.name.trim(),
            template.description.en,
            template.description.ru,
            template.description.ky,
            template.days_count,
            template.version,
            is_active,
            format_ts(&now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// === Habits ===

pub(crate) fn find_habit(conn: &Connection, id: i64) -> rusqlite::Result<Option<Habit>> {
    conn.query_row(
        &format!("SELECT {HABIT_COLUMNS} FROM tracker_habits h WHERE h.id = ?1"),
        params![id],
        row_to_habit,
    )
    .optional()
}

pub(crate) fn insert_habit(conn: &Connection, habit: &NewHabit, now: DateTime<Utc>) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO tracker_habits
            (category, title, title_ru, title_ky, description, description_ru, description_ky,
             is_active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
        params![
            habit.category.as_str(),
            habit.title.en.as_deref().map(str::trim),
            habit.title.ru,
            habit.title.ky,
            habit.description.en,
            habit.description.ru,
            habit.description.ky,
            format_ts(&now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

// === Template days ===

/// Habits of a template day, in display order.
fn day_habits(conn: &Connection, program_day_id: i64) -> rusqlite::Result<Vec<Habit>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {HABIT_COLUMNS}
         FROM tracker_program_day_habits dh
         JOIN tracker_habits h ON h.id = dh.habit_id
         WHERE dh.program_day_id = ?1
         ORDER BY dh.sort_order, dh.id"
    ))?;
    let rows = stmt.query_map(params![program_day_id], row_to_habit)?;
    rows.collect()
}

fn row_to_day_header(row: &Row) -> rusqlite::Result<ProgramDay> {
    Ok(ProgramDay {
        id: row.get(0)?,
        template_id: row.get(1)?,
        day_number: get_u32(row, 2)?,
        focus_text: localized(row, 3)?,
        habits: Vec::new(),
        created_at: parse_ts(row, 6, "created_at")?,
    })
}

const DAY_COLUMNS: &str =
    "id, program_template_id, day_number, focus_text, focus_text_ru, focus_text_ky, created_at";

fn with_habits(conn: &Connection, mut day: ProgramDay) -> rusqlite::Result<ProgramDay> {
    day.habits = day_habits(conn, day.id)?;
    Ok(day)
}

/// Template day `day_number` with its habits, if authored.
pub(crate) fn template_day(
    conn: &Connection,
    template_id: i64,
    day_number: u32,
) -> rusqlite::Result<Option<ProgramDay>> {
    let day = conn
        .query_row(
            &format!(
                "SELECT {DAY_COLUMNS} FROM tracker_program_days
                 WHERE program_template_id = ?1 AND day_number = ?2"
            ),
            params![template_id, day_number],
            row_to_day_header,
        )
        .optional()?;
    day.map(|d| with_habits(conn, d)).transpose()
}

fn find_template_day_by_id(conn: &Connection, day_id: i64) -> rusqlite::Result<Option<ProgramDay>> {
    let day = conn
        .query_row(
            &format!("SELECT {DAY_COLUMNS} FROM tracker_program_days WHERE id = ?1"),
            params![day_id],
            row_to_day_header,
        )
        .optional()?;
    day.map(|d| with_habits(conn, d)).transpose()
}

/// Whether `habit_id` is linked to day `day_number` of the template.
pub(crate) fn day_has_habit(
    conn: &Connection,
    template_id: i64,
    day_number: u32,
    habit_id: i64,
) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*)
         FROM tracker_program_day_habits dh
         JOIN tracker_program_days d ON d.id = dh.program_day_id
         WHERE d.program_template_id = ?1 AND d.day_number = ?2 AND dh.habit_id = ?3",
        params![template_id, day_number, habit_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Replace the habit links of a day, keeping the given order and skipping
/// ids that do not exist.
fn replace_day_habits(conn: &Connection, program_day_id: i64, habit_ids: &[i64]) -> rusqlite::Result<usize> {
    conn.execute(
        "DELETE FROM tracker_program_day_habits WHERE program_day_id = ?1",
        params![program_day_id],
    )?;
    let mut linked = 0;
    for habit_id in habit_ids {
        if find_habit(conn, *habit_id)?.is_none() {
            tracing::debug!(habit_id, "skipping unknown habit");
            continue;
        }
        conn.execute(
            "INSERT INTO tracker_program_day_habits (program_day_id, habit_id, sort_order)
             VALUES (?1, ?2, ?3)",
            params![program_day_id, habit_id, linked as i64],
        )?;
        linked += 1;
    }
    Ok(linked)
}

pub(crate) fn insert_template_day(
    conn: &Connection,
    template_id: i64,
    day: &NewProgramDay,
    now: DateTime<Utc>,
) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT INTO tracker_program_days
            (program_template_id, day_number, focus_text, focus_text_ru, focus_text_ky, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            template_id,
            day.day_number,
            day.focus_text.en,
            day.focus_text.ru,
            day.focus_text.ky,
            format_ts(&now),
        ],
    )?;
    let day_id = conn.last_insert_rowid();
    replace_day_habits(conn, day_id, &day.habit_ids)?;
    Ok(day_id)
}

/// Admin and public access to the program catalog.
pub struct Catalog<'a> {
    db: &'a TrackerDb,
}

impl<'a> Catalog<'a> {
    pub fn new(db: &'a TrackerDb) -> Self {
        Self { db }
    }

    // ── Templates ────────────────────────────────────────────────────

    pub fn list_templates(&self) -> Result<Vec<ProgramTemplate>, CoreError> {
        Ok(list_templates_where(self.db.conn(), false)?)
    }

    pub fn get_template(&self, id: i64) -> Result<ProgramTemplate, CoreError> {
        find_template(self.db.conn(), id)?.ok_or_else(|| TrackerError::TemplateNotFound(id).into())
    }

    /// Create an inactive template.
    pub fn create_template(&self, template: &NewTemplate) -> Result<ProgramTemplate, CoreError> {
        validate_template_fields(Some(template.name.as_str()), Some(template.days_count))?;
        let tx = self.db.write_tx()?;
        let id = insert_template(&tx, template, false, Utc::now())?;
        let created = find_template(&tx, id)?.ok_or(TrackerError::TemplateNotFound(id))?;
        tx.commit()?;
        tracing::info!(template_id = id, name = %created.name, "created program template");
        Ok(created)
    }

    pub fn update_template(&self, id: i64, update: &TemplateUpdate) -> Result<ProgramTemplate, CoreError> {
        validate_template_fields(update.name.as_deref(), update.days_count)?;
        let tx = self.db.write_tx()?;
        let mut template = find_template(&tx, id)?.ok_or(TrackerError::TemplateNotFound(id))?;
        if let Some(name) = &update.name {
            template.name = name.trim().to_string();
        }
        if let Some(description) = &update.description {
            template.description = description.clone();
        }
        if let Some(days_count) = update.days_count {
            template.days_count = days_count;
        }
        if let Some(version) = update.version {
            template.version = version;
        }
        tx.execute(
            "UPDATE tracker_program_templates
             SET name = ?2, description = ?3, description_ru = ?4, description_ky = ?5,
                 days_count = ?6, version = ?7
             WHERE id = ?1",
            params![
                id,
                template.name,
                template.description.en,
                template.description.ru,
                template.description.ky,
                template.days_count,
                template.version,
            ],
        )?;
        tx.commit()?;
        Ok(template)
    }

    /// Make `id` the only active template.
    pub fn activate_template(&self, id: i64) -> Result<ProgramTemplate, CoreError> {
        let tx = self.db.write_tx()?;
        let mut template = find_template(&tx, id)?.ok_or(TrackerError::TemplateNotFound(id))?;
        tx.execute("UPDATE tracker_program_templates SET is_active = 0", [])?;
        tx.execute(
            "UPDATE tracker_program_templates SET is_active = 1 WHERE id = ?1",
            params![id],
        )?;
        tx.commit()?;
        template.is_active = true;
        tracing::info!(template_id = id, version = template.version, "activated program template");
        Ok(template)
    }

    /// Delete a template together with its days and habit links.
    ///
    /// Refused while an ACTIVE user program is enrolled on it.
    pub fn delete_template(&self, id: i64) -> Result<(), CoreError> {
        let tx = self.db.write_tx()?;
        if find_template(&tx, id)?.is_none() {
            return Err(TrackerError::TemplateNotFound(id).into());
        }
        if count_active_programs(&tx, id)? > 0 {
            return Err(TrackerError::TemplateInUse(id).into());
        }
        tx.execute("DELETE FROM tracker_program_templates WHERE id = ?1", params![id])?;
        tx.commit()?;
        tracing::info!(template_id = id, "deleted program template");
        Ok(())
    }

    /// The template new enrollments should use.
    pub fn current_version(&self) -> Result<CatalogVersion, CoreError> {
        active_template(self.db.conn())?
            .map(|t| CatalogVersion::from(&t))
            .ok_or_else(|| TrackerError::NoTemplateAvailable.into())
    }

    // ── Habits ───────────────────────────────────────────────────────

    pub fn list_habits(&self, category: Option<HabitCategory>) -> Result<Vec<Habit>, CoreError> {
        let conn = self.db.conn();
        let habits = match category {
            Some(category) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {HABIT_COLUMNS} FROM tracker_habits h WHERE h.category = ?1 ORDER BY h.id"
                ))?;
                let rows = stmt.query_map(params![category.as_str()], row_to_habit)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
            None => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {HABIT_COLUMNS} FROM tracker_habits h ORDER BY h.id"
                ))?;
                let rows = stmt.query_map([], row_to_habit)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(habits)
    }

    pub fn get_habit(&self, id: i64) -> Result<Habit, CoreError> {
        find_habit(self.db.conn(), id)?.ok_or_else(|| TrackerError::HabitNotFound(id).into())
    }

    pub fn create_habit(&self, habit: &NewHabit) -> Result<Habit, CoreError> {
        validate_title(&habit.title)?;
        let tx = self.db.write_tx()?;
        let id = insert_habit(&tx, habit, Utc::now())?;
        let created = find_habit(&tx, id)?.ok_or(TrackerError::HabitNotFound(id))?;
        tx.commit()?;
        Ok(created)
    }

    pub fn update_habit(&self, id: i64, update: &HabitUpdate) -> Result<Habit, CoreError> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        let tx = self.db.write_tx()?;
        let mut habit = find_habit(&tx, id)?.ok_or(TrackerError::HabitNotFound(id))?;
        if let Some(category) = update.category {
            habit.category = category;
        }
        if let Some(title) = &update.title {
            habit.title = title.clone();
        }
        if let Some(description) = &update.description {
            habit.description = description.clone();
        }
        if let Some(is_active) = update.is_active {
            habit.is_active = is_active;
        }
        tx.execute(
            "UPDATE tracker_habits
             SET category = ?2, title = ?3, title_ru = ?4, title_ky = ?5,
                 description = ?6, description_ru = ?7, description_ky = ?8, is_active = ?9
             WHERE id = ?1",
            params![
                id,
                habit.category.as_str(),
                habit.title.en,
                habit.title.ru,
                habit.title.ky,
                habit.description.en,
                habit.description.ru,
                habit.description.ky,
                habit.is_active,
            ],
        )?;
        tx.commit()?;
        Ok(habit)
    }

    /// Soft delete: the habit stays linked to existing days.
    pub fn deactivate_habit(&self, id: i64) -> Result<Habit, CoreError> {
        self.update_habit(
            id,
            &HabitUpdate {
                is_active: Some(false),
                ..HabitUpdate::default()
            },
        )
    }

    // ── Template days ────────────────────────────────────────────────

    pub fn list_template_days(&self, template_id: i64) -> Result<Vec<ProgramDay>, CoreError> {
        let conn = self.db.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {DAY_COLUMNS} FROM tracker_program_days
             WHERE program_template_id = ?1 ORDER BY day_number"
        ))?;
        let headers = stmt
            .query_map(params![template_id], row_to_day_header)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        let days = headers
            .into_iter()
            .map(|d| with_habits(conn, d))
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(days)
    }

    pub fn add_template_day(&self, template_id: i64, day: &NewProgramDay) -> Result<ProgramDay, CoreError> {
        let tx = self.db.write_tx()?;
        let template = find_template(&tx, template_id)?.ok_or(TrackerError::TemplateNotFound(template_id))?;
        if day.day_number < 1 || day.day_number > template.days_count {
            return Err(TrackerError::InvalidDayNumber(i64::from(day.day_number)).into());
        }
        if template_day(&tx, template_id, day.day_number)?.is_some() {
            return Err(TrackerError::DuplicateDay {
                template_id,
                day_number: day.day_number,
            }
            .into());
        }
        let day_id = insert_template_day(&tx, template_id, day, Utc::now())?;
        let created = find_template_day_by_id(&tx, day_id)?
            .ok_or_else(|| TrackerError::DayNotFound(format!("id {day_id}")))?;
        tx.commit()?;
        Ok(created)
    }

    pub fn update_template_day(&self, day_id: i64, update: &ProgramDayUpdate) -> Result<ProgramDay, CoreError> {
        let tx = self.db.write_tx()?;
        let day = find_template_day_by_id(&tx, day_id)?
            .ok_or_else(|| TrackerError::DayNotFound(format!("id {day_id}")))?;
        if let Some(focus) = &update.focus_text {
            tx.execute(
                "UPDATE tracker_program_days
                 SET focus_text = ?2, focus_text_ru = ?3, focus_text_ky = ?4
                 WHERE id = ?1",
                params![day.id, focus.en, focus.ru, focus.ky],
            )?;
        }
        if let Some(habit_ids) = &update.habit_ids {
            replace_day_habits(&tx, day.id, habit_ids)?;
        }
        let updated = find_template_day_by_id(&tx, day_id)?
            .ok_or_else(|| TrackerError::DayNotFound(format!("id {day_id}")))?;
        tx.commit()?;
        Ok(updated)
    }

    pub fn delete_template_day(&self, day_id: i64) -> Result<(), CoreError> {
        let tx = self.db.write_tx()?;
        let deleted = tx.execute("DELETE FROM tracker_program_days WHERE id = ?1", params![day_id])?;
        if deleted == 0 {
            return Err(TrackerError::DayNotFound(format!("id {day_id}")).into());
        }
        tx.commit()?;
        Ok(())
    }

    // ── Public views ─────────────────────────────────────────────────

    /// Active templates as shown on the landing page.
    pub fn public_programs(&self) -> Result<Vec<PublicProgram>, CoreError> {
        let conn = self.db.conn();
        list_templates_where(conn, true)?
            .into_iter()
            .map(|t| -> Result<PublicProgram, CoreError> {
                Ok(PublicProgram {
                    days_count: count_day_rows(conn, t.id)?,
                    id: t.id,
                    name: t.name,
                    description: t.description,
                    version: t.version,
                })
            })
            .collect()
    }

    /// Day 1 of an active template with its active habits only.
    pub fn demo_day(&self, template_id: i64) -> Result<DemoDay, CoreError> {
        let conn = self.db.conn();
        let template = find_template(conn, template_id)?
            .filter(|t| t.is_active)
            .ok_or(TrackerError::TemplateNotFound(template_id))?;
        let day = template_day(conn, template_id, 1)?
            .ok_or_else(|| TrackerError::DayNotFound(format!("template {template_id} day 1")))?;
        Ok(DemoDay {
            program_id: template.id,
            program_name: template.name,
            day_number: day.day_number,
            focus_text: day.focus_text,
            habits: day.habits.into_iter().filter(|h| h.is_active).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn habit(db: &TrackerDb, title: &str, category: HabitCategory) -> Habit {
        Catalog::new(db)
            .create_habit(&NewHabit {
                category,
                title: LocalizedText::new(title),
                description: LocalizedText::default(),
            })
            .unwrap()
    }

    #[test]
    fn activation_leaves_one_active_template() {
        let db = TrackerDb::open_memory().unwrap();
        let catalog = Catalog::new(&db);
        let a = catalog.create_template(&NewTemplate::named("A")).unwrap();
        let b = catalog.create_template(&NewTemplate::named("B")).unwrap();
        assert!(matches!(
            catalog.current_version().unwrap_err().tracker(),
            Some(TrackerError::NoTemplateAvailable)
        ));

        catalog.activate_template(a.id).unwrap();
        catalog.activate_template(b.id).unwrap();

        let active: Vec<_> = catalog
            .list_templates()
            .unwrap()
            .into_iter()
            .filter(|t| t.is_active)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b.id);
        assert_eq!(catalog.current_version().unwrap().template_id, b.id);
    }

    #[test]
    fn create_template_validates_input() {
        let db = TrackerDb::open_memory().unwrap();
        let catalog = Catalog::new(&db);
        assert!(catalog.create_template(&NewTemplate::named("  ")).is_err());
        let mut zero_days = NewTemplate::named("Zero");
        zero_days.days_count = 0;
        assert!(catalog.create_template(&zero_days).is_err());
    }

    #[test]
    fn template_day_keeps_habit_order_and_skips_unknown_ids() {
        let db = TrackerDb::open_memory().unwrap();
        let catalog = Catalog::new(&db);
        let template = catalog.create_template(&NewTemplate::named("T")).unwrap();
        let water = habit(&db, "Water", HabitCategory::Lifestyle);
        let cleanse = habit(&db, "Cleanse", HabitCategory::Face);

        let day = catalog
            .add_template_day(
                template.id,
                &NewProgramDay {
                    day_number: 1,
                    focus_text: LocalizedText::new("Start"),
                    habit_ids: vec![water.id, 999, cleanse.id],
                },
            )
            .unwrap();
        let titles: Vec<_> = day.habits.iter().map(|h| h.title.en.clone().unwrap()).collect();
        assert_eq!(titles, vec!["Water", "Cleanse"]);
        assert!(day_has_habit(db.conn(), template.id, 1, cleanse.id).unwrap());
        assert!(!day_has_habit(db.conn(), template.id, 2, cleanse.id).unwrap());
    }

    #[test]
    fn duplicate_and_out_of_range_days_rejected() {
        let db = TrackerDb::open_memory().unwrap();
        let catalog = Catalog::new(&db);
        let mut new = NewTemplate::named("Short");
        new.days_count = 3;
        let template = catalog.create_template(&new).unwrap();
        let day = |n| NewProgramDay {
            day_number: n,
            focus_text: LocalizedText::default(),
            habit_ids: vec![],
        };

        catalog.add_template_day(template.id, &day(1)).unwrap();
        let dup = catalog.add_template_day(template.id, &day(1)).unwrap_err();
        assert!(matches!(dup.tracker(), Some(TrackerError::DuplicateDay { .. })));
        let out = catalog.add_template_day(template.id, &day(4)).unwrap_err();
        assert_eq!(out.tracker(), Some(&TrackerError::InvalidDayNumber(4)));
    }

    #[test]
    fn update_day_replaces_habits() {
        let db = TrackerDb::open_memory().unwrap();
        let catalog = Catalog::new(&db);
        let template = catalog.create_template(&NewTemplate::named("T")).unwrap();
        let a = habit(&db, "A", HabitCategory::Body);
        let b = habit(&db, "B", HabitCategory::Body);
        let day = catalog
            .add_template_day(
                template.id,
                &NewProgramDay {
                    day_number: 2,
                    focus_text: LocalizedText::default(),
                    habit_ids: vec![a.id],
                },
            )
            .unwrap();

        let updated = catalog
            .update_template_day(
                day.id,
                &ProgramDayUpdate {
                    focus_text: Some(LocalizedText::new("Glow").with_ru("Сияние")),
                    habit_ids: Some(vec![b.id, a.id]),
                },
            )
            .unwrap();
        assert_eq!(updated.focus_text.ru.as_deref(), Some("Сияние"));
        let ids: Vec<_> = updated.habits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
    }

    #[test]
    fn delete_template_cascades_days() {
        let db = TrackerDb::open_memory().unwrap();
        let catalog = Catalog::new(&db);
        let template = catalog.create_template(&NewTemplate::named("T")).unwrap();
        let h = habit(&db, "A", HabitCategory::Face);
        catalog
            .add_template_day(
                template.id,
                &NewProgramDay {
                    day_number: 1,
                    focus_text: LocalizedText::default(),
                    habit_ids: vec![h.id],
                },
            )
            .unwrap();

        catalog.delete_template(template.id).unwrap();

        let links: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM tracker_program_day_habits", [], |r| r.get(0))
            .unwrap();
        assert_eq!(links, 0);
        assert!(catalog.list_template_days(template.id).unwrap().is_empty());
        // Habits themselves survive.
        assert!(catalog.get_habit(h.id).is_ok());
    }

    #[test]
    fn habits_filter_by_category_and_deactivate() {
        let db = TrackerDb::open_memory().unwrap();
        let catalog = Catalog::new(&db);
        let face = habit(&db, "Mask", HabitCategory::Face);
        habit(&db, "Walk", HabitCategory::Lifestyle);

        let faces = catalog.list_habits(Some(HabitCategory::Face)).unwrap();
        assert_eq!(faces.len(), 1);
        assert_eq!(catalog.list_habits(None).unwrap().len(), 2);

        let deactivated = catalog.deactivate_habit(face.id).unwrap();
        assert!(!deactivated.is_active);
        assert!(!catalog.get_habit(face.id).unwrap().is_active);
        assert!(matches!(
            catalog.deactivate_habit(404).unwrap_err().tracker(),
            Some(TrackerError::HabitNotFound(404))
        ));
    }

    #[test]
    fn demo_day_hides_inactive_habits() {
        let db = TrackerDb::open_memory().unwrap();
        let catalog = Catalog::new(&db);
        let template = catalog.create_template(&NewTemplate::named("T")).unwrap();
        let keep = habit(&db, "Keep", HabitCategory::Face);
        let hide = habit(&db, "Hide", HabitCategory::Face);
        catalog
            .add_template_day(
                template.id,
                &NewProgramDay {
                    day_number: 1,
                    focus_text: LocalizedText::new("Start"),
                    habit_ids: vec![keep.id, hide.id],
                },
            )
            .unwrap();
        catalog.deactivate_habit(hide.id).unwrap();

        // Inactive templates are not public.
        assert!(catalog.demo_day(template.id).is_err());
        catalog.activate_template(template.id).unwrap();

        let demo = catalog.demo_day(template.id).unwrap();
        assert_eq!(demo.habits.len(), 1);
        assert_eq!(demo.habits[0].id, keep.id);

        let public = catalog.public_programs().unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].days_count, 1);
    }
}
