//! PDF export for generated artifacts.
//!
//! Renders plain LLM output onto A4 pages (595 × 842 pt) in built-in
//! Helvetica, wrapping long lines by character count rather than glyph
//! metrics. That approximation over-wraps slightly for narrow glyphs but
//! never overflows the right margin, which is the failure that matters
//! for a downloadable document.

use std::fs;
use std::path::{Path, PathBuf};

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use thiserror::Error;
use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Page geometry
// ────────────────────────────────────────────────────────────────────────────

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FONT_SIZE: i64 = 12;
const LEADING: i64 = 14;

/// Line slots between the top and bottom margins at the configured leading.
const LINES_PER_PAGE: usize = ((PAGE_HEIGHT - 2 * MARGIN) / LEADING) as usize;

/// Conservative wrap column. The usable width is 495 pt; Helvetica at 12 pt
/// averages just under 6 pt per character across running prose.
const MAX_LINE_CHARS: usize = 85;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
}

// ────────────────────────────────────────────────────────────────────────────
// Export
// ────────────────────────────────────────────────────────────────────────────

/// Writes `text` to `path` as a paginated PDF, creating missing parent
/// directories and overwriting any existing file. Returns the path written.
pub fn export_pdf(text: &str, path: &Path) -> Result<PathBuf, ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut lines: Vec<String> = text.lines().flat_map(wrap_line).collect();
    if lines.is_empty() {
        // keep the document valid with a single blank page
        lines.push(String::new());
    }

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => font_id,
        },
    });

    let mut kids: Vec<Object> = Vec::new();
    for page_lines in lines.chunks(LINES_PER_PAGE) {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
            Operation::new("TL", vec![LEADING.into()]),
            Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
        ];
        for (i, line) in page_lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("T*", vec![]));
            }
            if !line.is_empty() {
                operations.push(Operation::new(
                    "Tj",
                    vec![Object::string_literal(latin1_lossy(line))],
                ));
            }
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len();
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();
    doc.save(path)?;

    debug!("exported {} page(s) to {}", page_count, path.display());
    Ok(path.to_path_buf())
}

// ────────────────────────────────────────────────────────────────────────────
// Line wrapping
// ────────────────────────────────────────────────────────────────────────────

/// Greedy word-wrap of one source line to the wrap column.
///
/// Words longer than a full line are hard-split mid-word. A source line of
/// pure whitespace collapses to one blank output line so vertical structure
/// survives.
fn wrap_line(line: &str) -> Vec<String> {
    if line.chars().count() <= MAX_LINE_CHARS {
        return vec![line.to_string()];
    }

    let mut wrapped = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        let word_len = word.chars().count();

        if !current.is_empty() && current.chars().count() + 1 + word_len > MAX_LINE_CHARS {
            wrapped.push(std::mem::take(&mut current));
        }

        if word_len > MAX_LINE_CHARS {
            let mut chars = word.chars().peekable();
            while chars.peek().is_some() {
                let chunk: String = chars.by_ref().take(MAX_LINE_CHARS).collect();
                if chars.peek().is_some() {
                    wrapped.push(chunk);
                } else {
                    current = chunk;
                }
            }
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        wrapped.push(current);
    }
    if wrapped.is_empty() {
        wrapped.push(String::new());
    }
    wrapped
}

/// Maps text to Latin-1 bytes for the built-in font, replacing anything
/// outside that range with '?'. The font dictionary declares WinAnsi,
/// which matches Latin-1 across the printable range.
fn latin1_lossy(line: &str) -> Vec<u8> {
    line.chars()
        .map(|c| {
            let code = c as u32;
            if code <= 0xFF {
                code as u8
            } else {
                b'?'
            }
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
