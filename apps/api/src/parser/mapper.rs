//! Block-to-entity mapping.
//!
//! Each entity kind has an ordered list of [`FieldRule`]s. For every line of a
//! block the rules are tried in order; the first one that captures a value
//! assigns it and consumes the line. A rule only captures while its target
//! field is still empty, so each field is filled at most once per block.
//!
//! Experience blocks additionally collect detail lines. Detail collection is
//! a one-way switch: once a block enters [`BlockPhase::Detail`], every
//! remaining line is a detail and no rule is consulted again.

use tracing::trace;

use crate::models::{Education, Experience};
use crate::parser::lines::{contains_any, is_bullet, strip_bullet, Line};
use crate::parser::ruleset::CompiledRuleset;

/// Value captured from a line by a rule predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capture {
    /// The whole trimmed line, assigned verbatim.
    Line(String),
    Years { start: String, end: String },
}

/// One (predicate, setter) pair of the mapping policy.
pub struct FieldRule<E> {
    pub name: &'static str,
    pub capture: fn(&E, &Line<'_>, &CompiledRuleset) -> Option<Capture>,
    pub assign: fn(&mut E, Capture),
}

/// Tries `rules` in order against `line`. Returns true if a rule consumed it.
pub fn apply_rules<E>(
    entry: &mut E,
    rules: &[FieldRule<E>],
    line: &Line<'_>,
    ruleset: &CompiledRuleset,
) -> bool {
    for rule in rules {
        if let Some(captured) = (rule.capture)(entry, line, ruleset) {
            trace!(rule = rule.name, line = line.number, "field rule matched");
            (rule.assign)(entry, captured);
            return true;
        }
    }
    false
}

/// Entities whose start and end years are filled together from one line.
pub trait DateRange {
    fn has_dates(&self) -> bool;
    fn set_dates(&mut self, start: String, end: String);
}

impl DateRange for Education {
    fn has_dates(&self) -> bool {
        !self.start.is_empty() || !self.end.is_empty()
    }

    fn set_dates(&mut self, start: String, end: String) {
        self.start = start;
        self.end = end;
    }
}

impl DateRange for Experience {
    fn has_dates(&self) -> bool {
        !self.start.is_empty() || !self.end.is_empty()
    }

    fn set_dates(&mut self, start: String, end: String) {
        self.start = start;
        self.end = end;
    }
}

fn capture_years<E: DateRange>(
    entry: &E,
    line: &Line<'_>,
    ruleset: &CompiledRuleset,
) -> Option<Capture> {
    if entry.has_dates() {
        return None;
    }
    ruleset
        .year_range(line.text)
        .map(|(start, end)| Capture::Years { start, end })
}

fn assign_years<E: DateRange>(entry: &mut E, captured: Capture) {
    if let Capture::Years { start, end } = captured {
        entry.set_dates(start, end);
    }
}

fn keyword_line(field: &str, line: &Line<'_>, keywords: &[String]) -> Option<Capture> {
    (field.is_empty() && contains_any(&line.lower, keywords))
        .then(|| Capture::Line(line.text.to_string()))
}

fn capture_degree(entry: &Education, line: &Line<'_>, r: &CompiledRuleset) -> Option<Capture> {
    keyword_line(&entry.degree, line, &r.degree_keywords)
}

fn assign_degree(entry: &mut Education, captured: Capture) {
    if let Capture::Line(text) = captured {
        entry.degree = text;
    }
}

fn capture_institution(
    entry: &Education,
    line: &Line<'_>,
    r: &CompiledRuleset,
) -> Option<Capture> {
    keyword_line(&entry.institution, line, &r.institution_keywords)
}

fn assign_institution(entry: &mut Education, captured: Capture) {
    if let Capture::Line(text) = captured {
        entry.institution = text;
    }
}

fn capture_position(entry: &Experience, line: &Line<'_>, r: &CompiledRuleset) -> Option<Capture> {
    keyword_line(&entry.position, line, &r.position_keywords)
}

fn assign_position(entry: &mut Experience, captured: Capture) {
    if let Capture::Line(text) = captured {
        entry.position = text;
    }
}

fn capture_company(entry: &Experience, line: &Line<'_>, r: &CompiledRuleset) -> Option<Capture> {
    keyword_line(&entry.company, line, &r.company_keywords)
}

fn assign_company(entry: &mut Experience, captured: Capture) {
    if let Capture::Line(text) = captured {
        entry.company = text;
    }
}

pub const EDUCATION_RULES: &[FieldRule<Education>] = &[
    FieldRule {
        name: "date_range",
        capture: capture_years::<Education>,
        assign: assign_years::<Education>,
    },
    FieldRule {
        name: "degree",
        capture: capture_degree,
        assign: assign_degree,
    },
    FieldRule {
        name: "institution",
        capture: capture_institution,
        assign: assign_institution,
    },
];

pub const EXPERIENCE_RULES: &[FieldRule<Experience>] = &[
    FieldRule {
        name: "date_range",
        capture: capture_years::<Experience>,
        assign: assign_years::<Experience>,
    },
    FieldRule {
        name: "position",
        capture: capture_position,
        assign: assign_position,
    },
    FieldRule {
        name: "company",
        capture: capture_company,
        assign: assign_company,
    },
];

/// Where an experience block is in its layout: header lines first, then body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BlockPhase {
    #[default]
    Header,
    Detail,
}

/// Lines at block index 0..=2 are assumed to be header material.
const HEADER_LINES: usize = 3;

/// Whether an unconsumed header-phase line opens the detail body.
fn opens_details(entry: &Experience, line: &Line<'_>, index: usize) -> bool {
    is_bullet(line.text)
        || (!entry.company.is_empty() && !entry.position.is_empty() && index >= HEADER_LINES)
}

pub fn map_education(block: &[&Line<'_>], ruleset: &CompiledRuleset) -> Education {
    let mut entry = Education::default();
    for line in block {
        apply_rules(&mut entry, EDUCATION_RULES, line, ruleset);
    }
    entry
}

pub fn map_experience(block: &[&Line<'_>], ruleset: &CompiledRuleset) -> Experience {
    let mut entry = Experience::default();
    let mut phase = BlockPhase::Header;

    for (index, line) in block.iter().enumerate() {
        match phase {
            BlockPhase::Detail => entry.details.push(strip_bullet(line.text).to_string()),
            BlockPhase::Header => {
                if apply_rules(&mut entry, EXPERIENCE_RULES, line, ruleset) {
                    continue;
                }
                if opens_details(&entry, line, index) {
                    entry.details.push(strip_bullet(line.text).to_string());
                    phase = BlockPhase::Detail;
                }
            }
        }
    }
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lines::split_lines;
    use crate::parser::ruleset::Ruleset;
    use crate::parser::segmenter::Block;

    fn rules() -> CompiledRuleset {
        Ruleset::default().compile().unwrap()
    }

    fn experience_of(text: &str, ruleset: &CompiledRuleset) -> Experience {
        let lines = split_lines(text);
        let block: Block<'_, '_> = lines.iter().collect();
        map_experience(&block, ruleset)
    }

    fn education_of(text: &str, ruleset: &CompiledRuleset) -> Education {
        let lines = split_lines(text);
        let block: Block<'_, '_> = lines.iter().collect();
        map_education(&block, ruleset)
    }

    #[test]
    fn test_rule_order_is_dates_then_primary_then_secondary() {
        let names: Vec<_> = EDUCATION_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["date_range", "degree", "institution"]);
        let names: Vec<_> = EXPERIENCE_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, vec!["date_range", "position", "company"]);
    }

    #[test]
    fn test_date_rule_captures_only_while_dates_empty() {
        let r = rules();
        let line = Line::new("2015 - 2019", 0);
        let empty = Education::default();
        assert_eq!(
            capture_years(&empty, &line, &r),
            Some(Capture::Years {
                start: "2015".to_string(),
                end: "2019".to_string()
            })
        );
        let dated = Education {
            start: "2010".to_string(),
            end: "2014".to_string(),
            ..Default::default()
        };
        assert_eq!(capture_years(&dated, &line, &r), None);
    }

    #[test]
    fn test_degree_rule_assigns_whole_line_verbatim() {
        let r = rules();
        let line = Line::new("  Bachelor of Computer Science  ", 4);
        let mut entry = Education::default();
        assert!(apply_rules(&mut entry, EDUCATION_RULES, &line, &r));
        assert_eq!(entry.degree, "Bachelor of Computer Science");
        assert!(entry.institution.is_empty());
    }

    #[test]
    fn test_filled_field_is_never_overwritten() {
        let r = rules();
        let entry = education_of("Bachelor of Arts\nMaster of Science", &r);
        assert_eq!(entry.degree, "Bachelor of Arts");
    }

    #[test]
    fn test_line_consumed_by_earlier_rule_skips_later_rules() {
        let r = rules();
        // Matches both the degree and institution keyword lists.
        let entry = education_of("Sarjana Komputer, Universitas Indonesia University", &r);
        assert_eq!(
            entry.degree,
            "Sarjana Komputer, Universitas Indonesia University"
        );
        assert!(entry.institution.is_empty());
    }

    #[test]
    fn test_education_block_full() {
        let r = rules();
        let entry = education_of(
            "Bachelor of Computer Science\nUniversity of Indonesia\n2015 – 2019\nGPA 3.8",
            &r,
        );
        assert_eq!(
            entry,
            Education {
                degree: "Bachelor of Computer Science".to_string(),
                institution: "University of Indonesia".to_string(),
                start: "2015".to_string(),
                end: "2019".to_string(),
            }
        );
    }

    #[test]
    fn test_experience_block_with_bullet_and_wrapped_line() {
        let r = rules();
        let entry = experience_of(
            "2019 - 2021\nSoftware Engineer\nAcme Corp\n- Built systems\nand scaled them",
            &r,
        );
        assert_eq!(
            entry,
            Experience {
                position: "Software Engineer".to_string(),
                company: "Acme Corp".to_string(),
                start: "2019".to_string(),
                end: "2021".to_string(),
                details: vec!["Built systems".to_string(), "and scaled them".to_string()],
            }
        );
    }

    #[test]
    fn test_detail_phase_forecloses_field_assignment() {
        let r = rules();
        let entry = experience_of(
            "- Built systems\n2019 - 2021\nSoftware Engineer\nAcme Corp",
            &r,
        );
        assert!(entry.position.is_empty());
        assert!(entry.company.is_empty());
        assert!(entry.start.is_empty() && entry.end.is_empty());
        assert_eq!(
            entry.details,
            vec!["Built systems", "2019 - 2021", "Software Engineer", "Acme Corp"]
        );
    }

    #[test]
    fn test_late_plain_line_opens_details_once_header_is_complete() {
        let r = rules();
        let entry = experience_of(
            "Software Engineer\nAcme Corp\nJakarta\nMaintained services\n• Led rollout",
            &r,
        );
        // "Jakarta" sits at index 2 and is dropped as unrecognised header text.
        assert_eq!(entry.details, vec!["Maintained services", "Led rollout"]);
    }

    #[test]
    fn test_plain_lines_without_complete_header_are_dropped() {
        let r = rules();
        let entry = experience_of("Software Engineer\nRemote\nFull time\nOn call", &r);
        assert_eq!(entry.position, "Software Engineer");
        assert!(entry.details.is_empty());
    }

    #[test]
    fn test_unrecognised_block_maps_to_empty_experience() {
        let r = rules();
        assert_eq!(experience_of("Lorem ipsum", &r), Experience::default());
    }

    #[test]
    fn test_custom_keywords_drive_mapping() {
        let r = Ruleset {
            position_keywords: vec!["chef".to_string()],
            company_keywords: vec!["restaurant".to_string()],
            ..Default::default()
        }
        .compile()
        .unwrap();
        let entry = experience_of("Head Chef\nBlue Door Restaurant\nSoftware Engineer", &r);
        assert_eq!(entry.position, "Head Chef");
        assert_eq!(entry.company, "Blue Door Restaurant");
    }

    #[test]
    fn test_block_phase_starts_in_header() {
        assert_eq!(BlockPhase::default(), BlockPhase::Header);
    }
}
