//! Line model and stateless line predicates.

/// One trimmed line of document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    pub text: &'a str,
    pub lower: String,
    /// Zero-based position in the document.
    pub number: usize,
}

impl<'a> Line<'a> {
    pub fn new(raw: &'a str, number: usize) -> Self {
        let text = raw.trim();
        Line {
            text,
            lower: text.to_lowercase(),
            number,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.is_empty()
    }
}

/// Splits document text into trimmed lines, keeping blank lines.
pub fn split_lines(text: &str) -> Vec<Line<'_>> {
    text.split('\n')
        .enumerate()
        .map(|(number, raw)| Line::new(raw, number))
        .collect()
}

pub fn contains_any(lower_line: &str, keywords: &[String]) -> bool {
    keywords.iter().any(|k| lower_line.contains(k.as_str()))
}

/// Substring test against the header keywords, so "Project Experience" and
/// "this project experience" both count as headers.
pub fn is_section_header(line: &Line<'_>, headers: &[String]) -> bool {
    contains_any(&line.lower, headers)
}

pub fn is_bullet(text: &str) -> bool {
    text.starts_with('-') || text.starts_with('•')
}

/// Drops a leading bullet marker and the whitespace that follows it.
pub fn strip_bullet(text: &str) -> &str {
    text.strip_prefix('-')
        .or_else(|| text.strip_prefix('•'))
        .map(str::trim_start)
        .unwrap_or(text)
}
