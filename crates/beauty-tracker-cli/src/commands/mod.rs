//! Subcommand implementations. Every command prints JSON on stdout.

pub mod catalog;
pub mod config;
pub mod day;
pub mod habit;
pub mod habit_admin;
pub mod program;
pub mod progress;
pub mod template;
pub mod template_day;

use beauty_tracker_core::{Config, CoreError, LocalizedText, TrackerDb};
use serde::Serialize;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Load the config and open the database it points at.
pub fn open_db() -> Result<(Config, TrackerDb), CoreError> {
    let config = Config::load()?;
    let db = TrackerDb::open(&config)?;
    Ok((config, db))
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Build localized text from per-language flags. `None` if all are absent.
pub fn localized(en: Option<String>, ru: Option<String>, ky: Option<String>) -> Option<LocalizedText> {
    let text = LocalizedText { en, ru, ky };
    (!text.is_empty()).then_some(text)
}
