//! Habit administration.

use beauty_tracker_core::catalog::{HabitUpdate, NewHabit};
use beauty_tracker_core::{Catalog, HabitCategory};
use clap::Subcommand;

use super::{localized, open_db, print_json, CmdResult};

#[derive(Subcommand)]
pub enum HabitAdminAction {
    /// List habits, optionally by category (face, body, lifestyle)
    List {
        #[arg(long)]
        category: Option<HabitCategory>,
    },
    /// Create a habit
    Create {
        #[arg(long)]
        category: HabitCategory,
        /// English title
        #[arg(long)]
        title: String,
        #[arg(long)]
        title_ru: Option<String>,
        #[arg(long)]
        title_ky: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        description_ru: Option<String>,
        #[arg(long)]
        description_ky: Option<String>,
    },
    /// Update fields from a JSON object, e.g. '{"is_active": true}'
    Update { id: i64, json: String },
    /// Hide a habit from new views without unlinking it
    Deactivate { id: i64 },
}

pub fn run(action: HabitAdminAction) -> CmdResult {
    let (_, db) = open_db()?;
    let catalog = Catalog::new(&db);

    match action {
        HabitAdminAction::List { category } => print_json(&catalog.list_habits(category)?),
        HabitAdminAction::Create {
            category,
            title,
            title_ru,
            title_ky,
            description,
            description_ru,
            description_ky,
        } => {
            let habit = NewHabit {
                category,
                title: localized(Some(title), title_ru, title_ky).unwrap_or_default(),
                description: localized(description, description_ru, description_ky).unwrap_or_default(),
            };
            print_json(&catalog.create_habit(&habit)?)
        }
        HabitAdminAction::Update { id, json } => {
            let update: HabitUpdate = serde_json::from_str(&json)?;
            print_json(&catalog.update_habit(id, &update)?)
        }
        HabitAdminAction::Deactivate { id } => print_json(&catalog.deactivate_habit(id)?),
    }
}
