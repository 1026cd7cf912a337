//! Catalog seeding and guest-facing views.

use beauty_tracker_core::{seed_default_catalog, Catalog, Locale};
use clap::Subcommand;
use serde_json::json;

use super::{open_db, print_json, CmdResult};

#[derive(Subcommand)]
pub enum CatalogAction {
    /// Create the default 30-day template if the catalog is empty
    Seed,
    /// List active programs
    Public,
    /// Show day 1 of an active program
    DemoDay {
        /// Template id
        id: i64,
        /// Render texts in one locale (en, ru, ky) instead of all three
        #[arg(long)]
        locale: Option<Locale>,
    },
}

pub fn run(action: CatalogAction) -> CmdResult {
    let (_, db) = open_db()?;
    let catalog = Catalog::new(&db);

    match action {
        CatalogAction::Seed => print_json(&seed_default_catalog(&db)?),
        CatalogAction::Public => print_json(&catalog.public_programs()?),
        CatalogAction::DemoDay { id, locale: None } => print_json(&catalog.demo_day(id)?),
        CatalogAction::DemoDay {
            id,
            locale: Some(locale),
        } => {
            let demo = catalog.demo_day(id)?;
            let habits: Vec<_> = demo
                .habits
                .iter()
                .map(|h| {
                    json!({
                        "id": h.id,
                        "category": h.category,
                        "title": h.title.get(locale),
                        "description": h.description.get(locale),
                    })
                })
                .collect();
            print_json(&json!({
                "program_id": demo.program_id,
                "program_name": demo.program_name,
                "day_number": demo.day_number,
                "focus_text": demo.focus_text.get(locale),
                "habits": habits,
            }))
        }
    }
}
