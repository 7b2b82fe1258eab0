//! Country catalog entry

use serde::{Deserialize, Serialize};

/// One entry of the GeoDB country catalog
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    /// ISO 3166-1 alpha-2 code, the identity key
    pub code: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub currency_codes: Vec<String>,
    #[serde(default)]
    pub wiki_data_id: Option<String>,
}

impl Country {
    #[must_use]
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            currency_codes: Vec::new(),
            wiki_data_id: None,
        }
    }

    /// Case-insensitive code comparison
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.code.eq_ignore_ascii_case(code)
    }
}
