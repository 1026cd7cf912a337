use beauty_tracker_core::TrackerEngine;

use super::{open_db, print_json, CmdResult};

pub fn run(user: i64) -> CmdResult {
    let (config, db) = open_db()?;
    let progress = TrackerEngine::from_config(&db, &config).get_progress(user)?;
    print_json(&progress)
}
