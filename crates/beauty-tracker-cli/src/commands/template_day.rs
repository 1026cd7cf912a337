//! Template day administration.

use beauty_tracker_core::catalog::{NewProgramDay, ProgramDayUpdate};
use beauty_tracker_core::Catalog;
use clap::Subcommand;

use super::{localized, open_db, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TemplateDayAction {
    /// List the days of a template with their habits
    List { template: i64 },
    /// Add a day to a template
    Add {
        template: i64,
        /// Day number (1..=days_count)
        day: u32,
        #[arg(long)]
        focus: Option<String>,
        #[arg(long)]
        focus_ru: Option<String>,
        #[arg(long)]
        focus_ky: Option<String>,
        /// Habit ids in display order, comma separated
        #[arg(long, value_delimiter = ',')]
        habits: Vec<i64>,
    },
    /// Update a day from a JSON object, e.g. '{"habit_ids": [3, 1]}'
    Update { id: i64, json: String },
    /// Delete a day by id
    Delete { id: i64 },
}

pub fn run(action: TemplateDayAction) -> CmdResult {
    let (_, db) = open_db()?;
    let catalog = Catalog::new(&db);

    match action {
        TemplateDayAction::List { template } => print_json(&catalog.list_template_days(template)?),
        TemplateDayAction::Add {
            template,
            day,
            focus,
            focus_ru,
            focus_ky,
            habits,
        } => {
            let day = NewProgramDay {
                day_number: day,
                focus_text: localized(focus, focus_ru, focus_ky).unwrap_or_default(),
                habit_ids: habits,
            };
            print_json(&catalog.add_template_day(template, &day)?)
        }
        TemplateDayAction::Update { id, json } => {
            let update: ProgramDayUpdate = serde_json::from_str(&json)?;
            print_json(&catalog.update_template_day(id, &update)?)
        }
        TemplateDayAction::Delete { id } => {
            catalog.delete_template_day(id)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
    }
}
