//! Enrollment commands.

use beauty_tracker_core::{Catalog, TrackerEngine};
use clap::Subcommand;

use super::{open_db, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ProgramAction {
    /// Enroll on the currently active template
    Start {
        /// User id
        #[arg(long)]
        user: i64,
    },
    /// Show the active program (null if none)
    Current {
        /// User id
        #[arg(long)]
        user: i64,
    },
    /// Cancel the active program
    Cancel {
        /// User id
        #[arg(long)]
        user: i64,
    },
}

pub fn run(action: ProgramAction) -> CmdResult {
    let (config, db) = open_db()?;
    let engine = TrackerEngine::from_config(&db, &config);

    match action {
        ProgramAction::Start { user } => {
            let version = Catalog::new(&db).current_version()?;
            let program = engine.start_program(user, &version)?;
            print_json(&program)?;
        }
        ProgramAction::Current { user } => {
            print_json(&engine.current_program(user)?)?;
        }
        ProgramAction::Cancel { user } => {
            print_json(&engine.cancel_program(user)?)?;
        }
    }
    Ok(())
}
