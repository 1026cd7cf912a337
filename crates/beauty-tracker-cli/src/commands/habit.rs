use beauty_tracker_core::TrackerEngine;
use clap::Subcommand;

use super::{open_db, print_json, CmdResult};

#[derive(Subcommand)]
pub enum HabitAction {
    /// Toggle a habit on an open day
    Toggle {
        /// Day number
        day: i64,
        /// Habit id
        habit: i64,
        #[arg(long)]
        user: i64,
    },
}

pub fn run(action: HabitAction) -> CmdResult {
    let (config, db) = open_db()?;
    let engine = TrackerEngine::from_config(&db, &config);

    match action {
        HabitAction::Toggle { day, habit, user } => {
            print_json(&engine.toggle_habit(user, day, habit)?)
        }
    }
}
