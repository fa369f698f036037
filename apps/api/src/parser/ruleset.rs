//! Keyword lists and regex recognizers that drive extraction.
//!
//! `Ruleset` is the serde-loadable source form (every field defaults to the
//! built-in Indonesian/English lists). `CompiledRuleset` is what the parser
//! holds: regexes compiled once, keywords lowercased once.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const DEFAULT_SKILLS: &[&str] = &["Go", "Golang", "Java", "Python", "Docker", "PostgreSQL"];

const DEFAULT_DEGREE_KEYWORDS: &[&str] =
    &["bachelor", "master", "diploma", "sma", "smk", "sarjana"];

const DEFAULT_INSTITUTION_KEYWORDS: &[&str] =
    &["university", "institute", "college", "school", "politeknik"];

const DEFAULT_POSITION_KEYWORDS: &[&str] = &[
    "engineer",
    "developer",
    "manager",
    "intern",
    "analyst",
    "officer",
    "staff",
];

const DEFAULT_COMPANY_KEYWORDS: &[&str] = &[
    "corp",
    "company",
    "studio",
    "pt",
    "co.",
    "group",
    "llc",
    "indonesia",
];

const DEFAULT_SECTION_HEADERS: &[&str] = &["education", "experience", "skills", "projects"];

const DEFAULT_EDUCATION_SECTION: &str = "education";
const DEFAULT_EXPERIENCE_SECTION: &str = "experience";

const EMAIL_PATTERN: &str = r"[A-Za-z0-9_.\-]+@[A-Za-z0-9_.\-]+\.[a-zA-Z]{2,}";
const PHONE_PATTERN: &str = r"(?:\+62|\b0)[0-9 \t\-]{8,}[0-9]";
const YEAR_RANGE_PATTERN: &str = r"(?:19|20)[0-9]{2}\s*[-–]\s*(?:19|20)[0-9]{2}";
const URL_PATTERN: &str = r"https?://\S+";
const LINKEDIN_PATTERN: &str = r"(?i)https?://(?:www\.)?linkedin\.com/in/[a-zA-Z0-9\-_%]+";
const GITHUB_PATTERN: &str = r"(?i)https?://(?:www\.)?github\.com/[a-zA-Z0-9\-_%]+";

#[derive(Debug, Error)]
pub enum RulesetError {
    #[error("invalid {name} pattern: {source}")]
    InvalidPattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },

    #[error("invalid ruleset JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Source form of the extraction rules. Any field left out of a JSON
/// document falls back to the built-in default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Ruleset {
    /// Canonical skill names; output preserves this order and casing.
    pub skills: Vec<String>,
    pub degree_keywords: Vec<String>,
    pub institution_keywords: Vec<String>,
    pub position_keywords: Vec<String>,
    pub company_keywords: Vec<String>,
    pub section_headers: Vec<String>,
    /// Exact (case-insensitive) title line that opens the education section.
    pub education_section: String,
    pub experience_section: String,
    pub email_pattern: String,
    pub phone_pattern: String,
    pub year_range_pattern: String,
    pub url_pattern: String,
    pub linkedin_pattern: String,
    pub github_pattern: String,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for Ruleset {
    fn default() -> Self {
        Ruleset {
            skills: owned(DEFAULT_SKILLS),
            degree_keywords: owned(DEFAULT_DEGREE_KEYWORDS),
            institution_keywords: owned(DEFAULT_INSTITUTION_KEYWORDS),
            position_keywords: owned(DEFAULT_POSITION_KEYWORDS),
            company_keywords: owned(DEFAULT_COMPANY_KEYWORDS),
            section_headers: owned(DEFAULT_SECTION_HEADERS),
            education_section: DEFAULT_EDUCATION_SECTION.to_string(),
            experience_section: DEFAULT_EXPERIENCE_SECTION.to_string(),
            email_pattern: EMAIL_PATTERN.to_string(),
            phone_pattern: PHONE_PATTERN.to_string(),
            year_range_pattern: YEAR_RANGE_PATTERN.to_string(),
            url_pattern: URL_PATTERN.to_string(),
            linkedin_pattern: LINKEDIN_PATTERN.to_string(),
            github_pattern: GITHUB_PATTERN.to_string(),
        }
    }
}

impl Ruleset {
    pub fn from_json(json: &str) -> Result<Self, RulesetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn compile(&self) -> Result<CompiledRuleset, RulesetError> {
        Ok(CompiledRuleset {
            email: compile_pattern("email", &self.email_pattern)?,
            phone: compile_pattern("phone", &self.phone_pattern)?,
            year_range: compile_pattern("year_range", &self.year_range_pattern)?,
            url: compile_pattern("url", &self.url_pattern)?,
            linkedin: compile_pattern("linkedin", &self.linkedin_pattern)?,
            github: compile_pattern("github", &self.github_pattern)?,
            skills: self
                .skills
                .iter()
                .filter(|s| !s.is_empty())
                .map(|s| (s.clone(), s.to_lowercase()))
                .collect(),
            degree_keywords: lowercase_keywords(&self.degree_keywords),
            institution_keywords: lowercase_keywords(&self.institution_keywords),
            position_keywords: lowercase_keywords(&self.position_keywords),
            company_keywords: lowercase_keywords(&self.company_keywords),
            section_headers: lowercase_keywords(&self.section_headers),
            education_section: self.education_section.trim().to_lowercase(),
            experience_section: self.experience_section.trim().to_lowercase(),
        })
    }
}

fn compile_pattern(name: &'static str, source: &str) -> Result<Regex, RulesetError> {
    Regex::new(source).map_err(|source| RulesetError::InvalidPattern { name, source })
}

// An empty keyword would match every line.
fn lowercase_keywords(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Links found in a document, classified by destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    pub linkedin: String,
    pub github: String,
    pub other: BTreeMap<String, String>,
}

/// Compiled, immutable form of a [`Ruleset`]. Cheap to share across threads.
#[derive(Debug, Clone)]
pub struct CompiledRuleset {
    email: Regex,
    phone: Regex,
    year_range: Regex,
    url: Regex,
    linkedin: Regex,
    github: Regex,
    /// (canonical, lowercase) pairs.
    skills: Vec<(String, String)>,
    pub degree_keywords: Vec<String>,
    pub institution_keywords: Vec<String>,
    pub position_keywords: Vec<String>,
    pub company_keywords: Vec<String>,
    pub section_headers: Vec<String>,
    pub education_section: String,
    pub experience_section: String,
}

impl CompiledRuleset {
    /// First email address in `text`, or `""`.
    pub fn email(&self, text: &str) -> String {
        first_match(&self.email, text)
    }

    /// First phone number in `text`, or `""`.
    pub fn phone(&self, text: &str) -> String {
        first_match(&self.phone, text)
    }

    /// Start and end years of the first year range in `line`.
    ///
    /// Years are returned as written; a reversed range is not rejected.
    pub fn year_range(&self, line: &str) -> Option<(String, String)> {
        let found = self.year_range.find(line)?;
        let years: Vec<&str> = found
            .as_str()
            .split(|c: char| c == '-' || c == '–')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();
        match years.as_slice() {
            [start, end] => Some((start.to_string(), end.to_string())),
            _ => None,
        }
    }

    /// Classifies every URL in `text`. The first LinkedIn and GitHub profile
    /// URLs win, and other URLs are keyed by domain with the first one kept.
    pub fn links(&self, text: &str) -> Links {
        let mut links = Links::default();
        for found in self.url.find_iter(text) {
            let url = found.as_str();
            if self.linkedin.is_match(url) {
                if links.linkedin.is_empty() {
                    links.linkedin = url.to_string();
                }
            } else if self.github.is_match(url) {
                if links.github.is_empty() {
                    links.github = url.to_string();
                }
            } else {
                links
                    .other
                    .entry(domain_of(url).to_string())
                    .or_insert_with(|| url.to_string());
            }
        }
        links
    }

    /// Known skills mentioned anywhere in `text`, in canonical list order.
    pub fn skills(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        self.skills
            .iter()
            .filter(|(_, skill_lower)| lower.contains(skill_lower.as_str()))
            .map(|(skill, _)| skill.clone())
            .collect()
    }
}

fn first_match(re: &Regex, text: &str) -> String {
    re.find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

fn domain_of(url: &str) -> &str {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    rest.split('/').next().unwrap_or(rest)
}
