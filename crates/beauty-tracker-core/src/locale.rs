//! Localized catalog text.
//!
//! Catalog content is authored in English with optional Russian and Kyrgyz
//! translations. Lookups fall back to English when a translation is missing.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
    Ky,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ru" => Ok(Locale::Ru),
            "ky" => Ok(Locale::Ky),
            other => Err(format!("unsupported locale: {other}")),
        }
    }
}

/// A text in every supported locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LocalizedText {
    #[serde(default)]
    pub en: Option<String>,
    #[serde(default)]
    pub ru: Option<String>,
    #[serde(default)]
    pub ky: Option<String>,
}

impl LocalizedText {
    pub fn new(en: impl Into<String>) -> Self {
        Self {
            en: Some(en.into()),
            ru: None,
            ky: None,
        }
    }

    pub fn with_ru(mut self, ru: impl Into<String>) -> Self {
        self.ru = Some(ru.into());
        self
    }

    pub fn with_ky(mut self, ky: impl Into<String>) -> Self {
        self.ky = Some(ky.into());
        self
    }

    /// Text for `locale`, falling back to English.
    pub fn get(&self, locale: Locale) -> Option<&str> {
        let translated = match locale {
            Locale::En => None,
            Locale::Ru => self.ru.as_deref(),
            Locale::Ky => self.ky.as_deref(),
        };
        translated.or(self.en.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.en.is_none() && self.ru.is_none() && self.ky.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_english() {
        let text = LocalizedText::new("Cleanse face").with_ru("Очистить лицо");
        assert_eq!(text.get(Locale::Ru), Some("Очистить лицо"));
        assert_eq!(text.get(Locale::Ky), Some("Cleanse face"));
        assert_eq!(text.get(Locale::En), Some("Cleanse face"));
    }

    #[test]
    fn parses_locale_codes() {
        assert_eq!("RU".parse::<Locale>().unwrap(), Locale::Ru);
        assert!("de".parse::<Locale>().is_err());
    }
}
