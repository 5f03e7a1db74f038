//! Localization lookup for transaction descriptions.
//!
//! The transaction factory resolves a human-readable description from the
//! drink name at creation time. Untranslated keys fall back to the raw key
//! so a missing catalog entry never breaks a purchase.

use std::collections::HashMap;

/// Resolves a localized string for a key.
pub trait Translate {
    /// Returns the translation for `key`, or the raw key if none exists.
    fn translate(&self, key: &str) -> String;
}

/// Map-backed translator, loaded from the application settings.
#[derive(Clone, Debug, Default)]
pub struct Translations {
    entries: HashMap<String, String>,
}

impl Translations {
    #[must_use]
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }
}

impl FromIterator<(String, String)> for Translations {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Translate for Translations {
    fn translate(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(value) => value.clone(),
            None => key.to_string(),
        }
    }
}
