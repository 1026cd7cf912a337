//! Default "30 Days Beauty" catalog.

use chrono::Utc;
use rusqlite::Connection;

use super::store::{insert_habit, insert_template, insert_template_day};
use super::types::{HabitCategory, NewHabit, NewProgramDay, NewTemplate};
use crate::error::CoreError;
use crate::locale::LocalizedText;
use crate::storage::TrackerDb;

/// What [`seed_default_catalog`] created.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct SeedSummary {
    pub template_id: Option<i64>,
    pub habits: usize,
    pub days: usize,
}

// (category, en, ru, ky)
const DEFAULT_HABITS: [(HabitCategory, &str, &str, &str); 14] = [
    (HabitCategory::Face, "Cleanse face", "Очистить лицо", "Бетти тазалоо"),
    (HabitCategory::Face, "Apply moisturizer", "Нанести увлажняющий крем", "Нымдатуучу крем сүртүү"),
    (HabitCategory::Face, "Apply sunscreen", "Нанести солнцезащитный крем", "Күн коргоочу крем сүртүү"),
    (HabitCategory::Face, "Face mask", "Маска для лица", "Бет маскасы"),
    (HabitCategory::Face, "Eye cream", "Крем для глаз", "Көз крем"),
    (HabitCategory::Body, "Body moisturizer", "Увлажняющий крем для тела", "Денеге нымдатуучу крем"),
    (HabitCategory::Body, "Exfoliate", "Скрабирование", "Скраб кылуу"),
    (HabitCategory::Body, "Body oil", "Масло для тела", "Дене майы"),
    (HabitCategory::Body, "Dry brushing", "Сухая чистка", "Кургак тазалоо"),
    (HabitCategory::Lifestyle, "Drink 8 glasses of water", "Выпить 8 стаканов воды", "8 стакан суу ичүү"),
    (HabitCategory::Lifestyle, "30 min walk", "30 минут прогулки", "30 мүнөт сейилдөө"),
    (HabitCategory::Lifestyle, "Healthy meal", "Здоровый прием пищи", "Ден соолуктуу тамак"),
    (HabitCategory::Lifestyle, "8 hours sleep", "8 часов сна", "8 саат уйку"),
    (HabitCategory::Lifestyle, "Meditation", "Медитация", "Медитация"),
];

const DEFAULT_DAYS: u32 = 30;

// Indexes into DEFAULT_HABITS.
const CLEANSE: usize = 0;
const MOISTURIZER: usize = 1;
const FACE_MASK: usize = 3;
const EXFOLIATE: usize = 6;
const WATER: usize = 9;
const HEALTHY_MEAL: usize = 11;

/// Habit indexes for a day: the daily basics plus periodic extras.
fn habits_for_day(day_number: u32) -> Vec<usize> {
    let mut habits = vec![CLEANSE, MOISTURIZER, WATER];
    if day_number % 3 == 0 {
        habits.push(FACE_MASK);
    }
    if day_number % 5 == 0 {
        habits.push(EXFOLIATE);
    }
    if day_number % 7 == 0 {
        habits.push(HEALTHY_MEAL);
    }
    habits
}

fn catalog_is_empty(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 =
        conn.query_row("SELECT COUNT(*) FROM tracker_program_templates", [], |row| row.get(0))?;
    Ok(count == 0)
}

/// Create the default active template, its habits and all 30 days.
///
/// Does nothing if any template already exists.
pub fn seed_default_catalog(db: &TrackerDb) -> Result<SeedSummary, CoreError> {
    let tx = db.write_tx()?;
    if !catalog_is_empty(&tx)? {
        tracing::info!("catalog already seeded, skipping");
        return Ok(SeedSummary {
            template_id: None,
            habits: 0,
            days: 0,
        });
    }

    let now = Utc::now();
    let template = NewTemplate {
        name: "30 Days Beauty".into(),
        description: LocalizedText::new(
            "A gentle 30-day program of daily beauty and self-care habits.",
        )
        .with_ru("Мягкая 30-дневная программа ежедневных привычек красоты и заботы о себе."),
        days_count: DEFAULT_DAYS,
        version: 1,
    };
    let template_id = insert_template(&tx, &template, true, now)?;

    let habit_ids = DEFAULT_HABITS
        .iter()
        .map(|(category, en, ru, ky)| {
            let habit = NewHabit {
                category: *category,
                title: LocalizedText::new(*en).with_ru(*ru).with_ky(*ky),
                description: LocalizedText::default(),
            };
            insert_habit(&tx, &habit, now)
        })
        .collect::<rusqlite::Result<Vec<i64>>>()?;

    for day_number in 1..=DEFAULT_DAYS {
        let day = NewProgramDay {
            day_number,
            focus_text: LocalizedText::new(format!("Day {day_number} focus"))
                .with_ru(format!("Фокус дня {day_number}"))
                .with_ky(format!("{day_number} күн фокусу")),
            habit_ids: habits_for_day(day_number)
                .into_iter()
                .map(|idx| habit_ids[idx])
                .collect(),
        };
        insert_template_day(&tx, template_id, &day, now)?;
    }

    tx.commit()?;
    tracing::info!(template_id, habits = habit_ids.len(), days = DEFAULT_DAYS, "seeded default catalog");
    Ok(SeedSummary {
        template_id: Some(template_id),
        habits: habit_ids.len(),
        days: DEFAULT_DAYS as usize,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    #[test]
    fn seeds_once() {
        let db = TrackerDb::open_memory().unwrap();
        let first = seed_default_catalog(&db).unwrap();
        assert_eq!(first.habits, 14);
        assert_eq!(first.days, 30);

        let second = seed_default_catalog(&db).unwrap();
        assert_eq!(second.template_id, None);
        assert_eq!(Catalog::new(&db).list_templates().unwrap().len(), 1);
    }

    #[test]
    fn seeded_template_is_current() {
        let db = TrackerDb::open_memory().unwrap();
        let summary = seed_default_catalog(&db).unwrap();
        let version = Catalog::new(&db).current_version().unwrap();
        assert_eq!(Some(version.template_id), summary.template_id);
        assert_eq!(version.days_count, 30);
    }

    #[test]
    fn periodic_habits_follow_day_number() {
        assert_eq!(habits_for_day(1).len(), 3);
        assert!(habits_for_day(3).contains(&FACE_MASK));
        assert!(habits_for_day(10).contains(&EXFOLIATE));
        assert_eq!(habits_for_day(21), vec![CLEANSE, MOISTURIZER, WATER, FACE_MASK, HEALTHY_MEAL]);

        let db = TrackerDb::open_memory().unwrap();
        let template_id = seed_default_catalog(&db).unwrap().template_id.unwrap();
        let days = Catalog::new(&db).list_template_days(template_id).unwrap();
        assert_eq!(days.len(), 30);
        assert_eq!(days[14].habits.len(), 5); // day 15: mask + exfoliate
    }
}
