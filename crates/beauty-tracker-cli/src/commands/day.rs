//! Day sequencing commands.

use beauty_tracker_core::TrackerEngine;
use clap::Subcommand;

use super::{open_db, print_json, CmdResult};

#[derive(Subcommand)]
pub enum DayAction {
    /// Show the current day, opening the next one if needed
    Current {
        #[arg(long)]
        user: i64,
    },
    /// Show a day by number
    Get {
        /// Day number (1-based)
        #[arg(allow_negative_numbers = true)]
        day: i64,
        #[arg(long)]
        user: i64,
    },
    /// Complete an open or skipped day
    Complete {
        #[arg(allow_negative_numbers = true)]
        day: i64,
        #[arg(long)]
        user: i64,
    },
    /// Skip an open day (uses one skip)
    Skip {
        #[arg(allow_negative_numbers = true)]
        day: i64,
        #[arg(long)]
        user: i64,
    },
}

pub fn run(action: DayAction) -> CmdResult {
    let (config, db) = open_db()?;
    let engine = TrackerEngine::from_config(&db, &config);

    match action {
        DayAction::Current { user } => print_json(&engine.get_current_day(user)?),
        DayAction::Get { day, user } => print_json(&engine.get_day(user, day)?),
        DayAction::Complete { day, user } => print_json(&engine.complete_day(user, day)?),
        DayAction::Skip { day, user } => print_json(&engine.skip_day(user, day)?),
    }
}
