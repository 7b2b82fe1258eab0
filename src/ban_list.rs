//! Session-scoped list of banned countries

use serde::{Deserialize, Serialize};

/// A banned country. Matching goes by `code`; `name` is for display.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BannedCountry {
    pub code: String,
    pub name: String,
}

impl BannedCountry {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into().to_uppercase(),
            name: name.into(),
        }
    }
}

/// Insertion-ordered ban set keyed by country code
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BanList {
    entries: Vec<BannedCountry>,
}

impl BanList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove the entry if its code is present, else append it.
    /// Returns `true` when the country is banned afterwards.
    pub fn toggle(&mut self, entry: BannedCountry) -> bool {
        if let Some(index) = self.position(&entry.code) {
            self.entries.remove(index);
            false
        } else {
            self.entries.push(entry);
            true
        }
    }

    #[must_use]
    pub fn contains_code(&self, code: &str) -> bool {
        self.position(code).is_some()
    }

    /// Look up an entry by code or display name, ignoring case
    #[must_use]
    pub fn find(&self, query: &str) -> Option<&BannedCountry> {
        let query = query.trim();
        self.entries.iter().find(|entry| {
            entry.code.eq_ignore_ascii_case(query) || entry.name.to_lowercase() == query.to_lowercase()
        })
    }

    /// Replace the display name of an entry, e.g. once the catalog is known
    pub fn rename(&mut self, code: &str, name: &str) {
        if let Some(index) = self.position(code) {
            self.entries[index].name = name.to_string();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BannedCountry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, code: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.code.eq_ignore_ascii_case(code))
    }
}
