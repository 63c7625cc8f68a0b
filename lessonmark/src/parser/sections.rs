use std::collections::BTreeMap;
use std::ops::Range;

use crate::parser::Parsed;
use crate::parser::active_check::parse_active_check;
use crate::parser::error::{Diagnostics, ParseError};
use crate::parser::lexer::{self, SectionLine};
use crate::section::{Depth, Language, SectionDocument, SectionName, to_paragraph};

type BucketKey = (Depth, Language, SectionName);

/// Raw lines of one section, plus the span of its header for diagnostics.
struct SectionBuffer {
    header: Range<usize>,
    lines: Vec<String>,
}

/// Where the next content line goes. Content is only kept once all three
/// coordinates are known.
#[derive(Default)]
struct Cursor {
    depth: Option<Depth>,
    language: Option<Language>,
    section: Option<SectionName>,
    header: Range<usize>,
}

impl Cursor {
    fn key(&self) -> Option<BucketKey> {
        Some((self.depth?, self.language?, self.section?))
    }
}

/// Parse a module document into deep/short × ro/en section buckets.
pub fn parse_sections(
    source: &str,
    file_id: usize,
) -> Result<Parsed<SectionDocument>, Vec<ParseError>> {
    let mut cursor = Cursor::default();
    let mut buffers: BTreeMap<BucketKey, SectionBuffer> = BTreeMap::new();

    for line in lexer::source_lines(source) {
        match lexer::classify_section_line(line.raw) {
            SectionLine::Note => break,
            SectionLine::Cluster => {}
            SectionLine::Language(language) => {
                if let Some(language) = language {
                    cursor.language = Some(language);
                    cursor.section = None;
                }
            }
            SectionLine::Depth { depth, language } => {
                cursor.depth = Some(depth);
                if language.is_some() {
                    cursor.language = language;
                }
                cursor.section = None;
            }
            SectionLine::Header(name) => {
                cursor.section = Some(name);
                cursor.header = line.span.clone();
                // A repeated header starts over. The bucket reappears with its first line.
                if let Some(key) = cursor.key() {
                    buffers.remove(&key);
                }
            }
            SectionLine::Blank => append(&cursor, &mut buffers, ""),
            // Preamble and instructions before the first section are dropped.
            SectionLine::Content(text) => append(&cursor, &mut buffers, text),
        }
    }

    let mut diagnostics = Diagnostics::new(file_id);
    let mut document = SectionDocument::default();
    for ((depth, language, name), buffer) in buffers {
        let sections = document.bucket_mut(depth, language);
        if name == SectionName::ActiveCheck {
            match parse_active_check(&buffer.lines, buffer.header, file_id) {
                Ok(check) => sections.active_check = Some(check),
                Err(error) => diagnostics.push(error),
            }
        } else {
            sections.set_paragraph(name, to_paragraph(&buffer.lines));
        }
    }

    diagnostics.finish(document)
}

/// Sections exist only once a line lands in them; a header with nothing
/// under it leaves no trace in the document.
fn append(cursor: &Cursor, buffers: &mut BTreeMap<BucketKey, SectionBuffer>, text: &str) {
    let Some(key) = cursor.key() else {
        return;
    };
    buffers
        .entry(key)
        .or_insert_with(|| SectionBuffer {
            header: cursor.header.clone(),
            lines: Vec::new(),
        })
        .lines
        .push(text.to_string());
}
