use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Structured profile extracted from a résumé document.
///
/// `name` is part of the wire format but is never populated by the parser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub linkedin: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub github: String,
    /// Domain → first URL seen on that domain.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub other_links: BTreeMap<String, String>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub experience: Vec<Experience>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub institution: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl Education {
    /// An education entry carries information only through its degree or institution.
    pub fn is_empty(&self) -> bool {
        self.degree.is_empty() && self.institution.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
    #[serde(default)]
    pub details: Vec<String>,
}
