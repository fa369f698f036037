//! DOCX body text via docx-rs.
//!
//! Paragraphs are joined with `\n` and empty paragraphs are kept, because
//! blank lines are what separate entries inside a résumé section.

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};

use crate::document::DecodeError;

pub fn extract_text(bytes: &[u8]) -> Result<String, DecodeError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| DecodeError::Docx(format!("{e:?}")))?;

    let paragraphs: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(para) => Some(paragraph_text(para)),
            // Tables, section properties, bookmarks etc. carry no body text here.
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Runs within one paragraph are concatenated without a separator.
fn paragraph_text(para: &Paragraph) -> String {
    let mut text = String::new();
    for child in &para.children {
        if let ParagraphChild::Run(run) = child {
            for rc in &run.children {
                match rc {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    _ => {}
                }
            }
        }
    }
    text
}

/// Packs `paragraphs` into an in-memory DOCX; `""` becomes an empty paragraph.
#[cfg(test)]
pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    use std::io::Cursor;

    use docx_rs::{Docx, Run};

    let docx = paragraphs.iter().fold(Docx::new(), |docx, text| {
        let para = if text.is_empty() {
            Paragraph::new()
        } else {
            Paragraph::new().add_run(Run::new().add_text(*text))
        };
        docx.add_paragraph(para)
    });
    let mut buf = Cursor::new(Vec::new());
    docx.build().pack(&mut buf).unwrap();
    buf.into_inner()
}
