//! Isolates one named section and cuts it into entry blocks.
//!
//! Scanning is forward-only: the section starts at a line equal to its name
//! and ends at the first other section header that closes a non-empty block.
//! Anything after that point is ignored for this section.

use crate::parser::lines::{is_section_header, Line};

/// Lines of one education or experience entry, in document order. Never empty.
pub type Block<'l, 'a> = Vec<&'l Line<'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Outside,
    Inside,
}

/// Returns the entry blocks of the section called `section` (lowercase).
pub fn segment<'l, 'a>(
    lines: &'l [Line<'a>],
    section: &str,
    headers: &[String],
) -> Vec<Block<'l, 'a>> {
    let mut blocks = Vec::new();
    let mut block: Block<'l, 'a> = Vec::new();
    let mut state = ScanState::Outside;

    for line in lines {
        // The section name line is consumed on every occurrence, without flushing.
        if line.lower == section {
            state = ScanState::Inside;
            continue;
        }
        if state == ScanState::Outside {
            continue;
        }

        if is_section_header(line, headers) && !block.is_empty() {
            blocks.push(std::mem::take(&mut block));
            return blocks;
        }
        if line.is_blank() {
            if !block.is_empty() {
                blocks.push(std::mem::take(&mut block));
            }
            continue;
        }
        // A header line reaching an empty block is ordinary content.
        block.push(line);
    }

    if !block.is_empty() {
        blocks.push(block);
    }
    blocks
}
