// Heuristic résumé parser.
// Text → lines → section blocks → typed entries, plus document-wide scans
// for contact details, skills and links. Pure and synchronous: no I/O, no
// shared mutable state, never fails on input.

pub mod lines;
pub mod mapper;
pub mod ruleset;
pub mod segmenter;

use tracing::debug;

use crate::models::{Education, Experience, Resume};
use crate::parser::lines::{split_lines, Line};
use crate::parser::mapper::{map_education, map_experience};
use crate::parser::ruleset::{CompiledRuleset, Ruleset, RulesetError};
use crate::parser::segmenter::segment;

/// Turns decoded document text into a [`Resume`].
///
/// Built once from a [`Ruleset`] and shared across requests.
#[derive(Debug, Clone)]
pub struct ResumeParser {
    rules: CompiledRuleset,
}

impl ResumeParser {
    pub fn new(ruleset: &Ruleset) -> Result<Self, RulesetError> {
        Ok(ResumeParser {
            rules: ruleset.compile()?,
        })
    }

    pub fn parse(&self, text: &str) -> Resume {
        let lines = split_lines(text);
        let links = self.rules.links(text);

        let resume = Resume {
            name: String::new(),
            email: self.rules.email(text),
            phone: self.rules.phone(text),
            skills: self.rules.skills(text),
            linkedin: links.linkedin,
            github: links.github,
            other_links: links.other,
            education: self.education(&lines),
            experience: self.experience(&lines),
        };

        debug!(
            lines = lines.len(),
            skills = resume.skills.len(),
            education = resume.education.len(),
            experience = resume.experience.len(),
            "parsed resume text"
        );
        resume
    }

    /// Entries with neither degree nor institution are discarded.
    fn education(&self, lines: &[Line<'_>]) -> Vec<Education> {
        segment(lines, &self.rules.education_section, &self.rules.section_headers)
            .iter()
            .map(|block| map_education(block, &self.rules))
            .filter(|entry| !entry.is_empty())
            .collect()
    }

    /// Every block becomes an entry, even one with no recognised field.
    fn experience(&self, lines: &[Line<'_>]) -> Vec<Experience> {
        segment(lines, &self.rules.experience_section, &self.rules.section_headers)
            .iter()
            .map(|block| map_experience(block, &self.rules))
            .collect()
    }
}
