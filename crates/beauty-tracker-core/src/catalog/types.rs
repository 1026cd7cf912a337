//! Catalog data types: habits, program templates and template days.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::locale::LocalizedText;

/// Tag grouping habits in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HabitCategory {
    Face,
    Body,
    Lifestyle,
}

impl HabitCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitCategory::Face => "face",
            HabitCategory::Body => "body",
            HabitCategory::Lifestyle => "lifestyle",
        }
    }
}

impl FromStr for HabitCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "face" => Ok(HabitCategory::Face),
            "body" => Ok(HabitCategory::Body),
            "lifestyle" => Ok(HabitCategory::Lifestyle),
            other => Err(format!("unknown habit category: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: i64,
    pub category: HabitCategory,
    pub title: LocalizedText,
    pub description: LocalizedText,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewHabit {
    pub category: HabitCategory,
    pub title: LocalizedText,
    #[serde(default)]
    pub description: LocalizedText,
}

/// Partial habit update; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HabitUpdate {
    #[serde(default)]
    pub category: Option<HabitCategory>,
    #[serde(default)]
    pub title: Option<LocalizedText>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramTemplate {
    pub id: i64,
    pub name: String,
    pub description: LocalizedText,
    /// Number of days a user enrolled on this template goes through.
    pub days_count: u32,
    pub version: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTemplate {
    pub name: String,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default = "default_days_count")]
    pub days_count: u32,
    #[serde(default = "default_version")]
    pub version: u32,
}

fn default_days_count() -> u32 {
    30
}
fn default_version() -> u32 {
    1
}

impl NewTemplate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: LocalizedText::default(),
            days_count: default_days_count(),
            version: default_version(),
        }
    }
}

/// Partial template update. Activation goes through `Catalog::activate_template`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<LocalizedText>,
    #[serde(default)]
    pub days_count: Option<u32>,
    #[serde(default)]
    pub version: Option<u32>,
}

/// A day of a template with its habits in display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramDay {
    pub id: i64,
    pub template_id: i64,
    pub day_number: u32,
    pub focus_text: LocalizedText,
    pub habits: Vec<Habit>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProgramDay {
    pub day_number: u32,
    #[serde(default)]
    pub focus_text: LocalizedText,
    /// Habit ids in display order. Unknown ids are ignored.
    #[serde(default)]
    pub habit_ids: Vec<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramDayUpdate {
    #[serde(default)]
    pub focus_text: Option<LocalizedText>,
    /// Replaces the day's habit list when present.
    #[serde(default)]
    pub habit_ids: Option<Vec<i64>>,
}

/// Explicit reference to the template a user enrolls against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogVersion {
    pub template_id: i64,
    pub version: u32,
    pub days_count: u32,
}

impl From<&ProgramTemplate> for CatalogVersion {
    fn from(template: &ProgramTemplate) -> Self {
        Self {
            template_id: template.id,
            version: template.version,
            days_count: template.days_count,
        }
    }
}

/// Active program as listed to guests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProgram {
    pub id: i64,
    pub name: String,
    pub description: LocalizedText,
    /// Number of day rows authored for the template.
    pub days_count: u32,
    pub version: u32,
}

/// Day 1 of a program, shown to guests without personal data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoDay {
    pub program_id: i64,
    pub program_name: String,
    pub day_number: u32,
    pub focus_text: LocalizedText,
    pub habits: Vec<Habit>,
}
