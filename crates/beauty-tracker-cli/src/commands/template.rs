//! Program template administration.

use beauty_tracker_core::catalog::{NewTemplate, TemplateUpdate};
use beauty_tracker_core::Catalog;
use clap::Subcommand;

use super::{localized, open_db, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TemplateAction {
    /// List all templates
    List,
    /// Show one template
    Get { id: i64 },
    /// Create an inactive template
    Create {
        /// Template name
        name: String,
        /// Number of days
        #[arg(long, default_value_t = 30)]
        days: u32,
        #[arg(long, default_value_t = 1)]
        version: u32,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        description_ru: Option<String>,
        #[arg(long)]
        description_ky: Option<String>,
    },
    /// Update fields from a JSON object, e.g. '{"days_count": 21}'
    Update { id: i64, json: String },
    /// Make this the only active template
    Activate { id: i64 },
    /// Delete a template and its days
    Delete { id: i64 },
}

pub fn run(action: TemplateAction) -> CmdResult {
    let (_, db) = open_db()?;
    let catalog = Catalog::new(&db);

    match action {
        TemplateAction::List => print_json(&catalog.list_templates()?),
        TemplateAction::Get { id } => print_json(&catalog.get_template(id)?),
        TemplateAction::Create {
            name,
            days,
            version,
            description,
            description_ru,
            description_ky,
        } => {
            let template = NewTemplate {
                name,
                description: localized(description, description_ru, description_ky).unwrap_or_default(),
                days_count: days,
                version,
            };
            print_json(&catalog.create_template(&template)?)
        }
        TemplateAction::Update { id, json } => {
            let update: TemplateUpdate = serde_json::from_str(&json)?;
            print_json(&catalog.update_template(id, &update)?)
        }
        TemplateAction::Activate { id } => print_json(&catalog.activate_template(id)?),
        TemplateAction::Delete { id } => {
            catalog.delete_template(id)?;
            print_json(&serde_json::json!({ "deleted": id }))
        }
    }
}
