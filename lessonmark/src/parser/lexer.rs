//! Line classification shared by the lesson and section parsers.
//!
//! Every physical line is classified once, without looking at its
//! neighbours. The parsers decide what a classified line means in their
//! current state (continuation, list item, ignored text).

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::section::{Depth, Language, SectionName};

static SCREEN_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\[SCREEN\s+([A-Za-z]+)\]").expect("valid screen marker regex"));

static FIELD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+):\s*(.*)$").expect("valid field regex"));

/// One physical line of the source.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine<'a> {
    /// The line without its terminator.
    pub raw: &'a str,
    /// 1-based line number.
    pub number: usize,
    /// Byte span of `raw` in the source.
    pub span: Range<usize>,
}

/// Split a source into lines, keeping byte offsets for diagnostics.
pub fn source_lines(source: &str) -> Vec<SourceLine<'_>> {
    let mut offset = 0;
    source
        .split_inclusive('\n')
        .enumerate()
        .map(|(index, chunk)| {
            let raw = chunk
                .strip_suffix('\n')
                .map(|line| line.strip_suffix('\r').unwrap_or(line))
                .unwrap_or(chunk);
            let line = SourceLine {
                raw,
                number: index + 1,
                span: offset..offset + raw.len(),
            };
            offset += chunk.len();
            line
        })
        .collect()
}

/// List-opening keys. Their items are the `-` lines that follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKey {
    Steps,
    Options,
    Bullets,
}

impl ListKey {
    pub const ALL: [ListKey; 3] = [ListKey::Steps, ListKey::Options, ListKey::Bullets];

    pub fn prefix(self) -> &'static str {
        match self {
            ListKey::Steps => "steps:",
            ListKey::Options => "options:",
            ListKey::Bullets => "bullets:",
        }
    }
}

/// A classified line of a lesson document. Text payloads are trimmed.
#[derive(Debug, Clone, PartialEq)]
pub enum LessonLine<'a> {
    /// `# lesson_id`.
    Heading(&'a str),
    /// A lone `#`. Plain text unless empty headings are rejected.
    BareHeading,
    /// `[SCREEN kind]`, with the kind word as written.
    ScreenMarker(&'a str),
    ListStart(ListKey),
    /// `- text`, with the text after the dash.
    ListItem(&'a str),
    /// `key: value` where the key is letters only.
    Field { key: &'a str, value: &'a str },
    Blank,
    Text(&'a str),
}

impl LessonLine<'_> {
    /// Whether this line ends a multi-line field value.
    /// Only plain text continues a field.
    pub fn ends_field(&self) -> bool {
        match self {
            LessonLine::Text(text) => text.starts_with("[SCREEN"),
            LessonLine::BareHeading => false,
            _ => true,
        }
    }
}

pub fn classify_lesson_line(raw: &str) -> LessonLine<'_> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return LessonLine::Blank;
    }
    if trimmed == "#" {
        return LessonLine::BareHeading;
    }
    if let Some(rest) = trimmed.strip_prefix("# ") {
        return LessonLine::Heading(rest.trim());
    }
    if let Some(caps) = SCREEN_MARKER.captures(trimmed) {
        if let Some(kind) = caps.get(1) {
            return LessonLine::ScreenMarker(kind.as_str());
        }
    }
    let lower = trimmed.to_ascii_lowercase();
    if let Some(key) = ListKey::ALL
        .into_iter()
        .find(|key| lower.starts_with(key.prefix()))
    {
        return LessonLine::ListStart(key);
    }
    if let Some(item) = trimmed.strip_prefix('-') {
        return LessonLine::ListItem(item.trim());
    }
    if let Some(caps) = FIELD.captures(trimmed) {
        if let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) {
            return LessonLine::Field {
                key: key.as_str(),
                value: value.as_str(),
            };
        }
    }
    LessonLine::Text(trimmed)
}

/// A classified lesson line with its position.
#[derive(Debug, Clone, PartialEq)]
pub struct LessonToken<'a> {
    pub kind: LessonLine<'a>,
    pub line: SourceLine<'a>,
}

pub fn tokenize_lessons(source: &str) -> Vec<LessonToken<'_>> {
    source_lines(source)
        .into_iter()
        .map(|line| LessonToken {
            kind: classify_lesson_line(line.raw),
            line,
        })
        .collect()
}

/// A classified line of a module (section) document.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionLine<'a> {
    Blank,
    /// `NOTE ...`: everything from here on is a trailing comment.
    Note,
    /// `CLUSTER ...` divider.
    Cluster,
    /// A `LIMBA` line. `None` when no language marker was found on it.
    Language(Option<Language>),
    /// `MODUL ... DEEP|SHORT`, `DEEP ...` or `SHORT ...`.
    Depth {
        depth: Depth,
        language: Option<Language>,
    },
    Header(SectionName),
    /// Anything else, right-stripped but otherwise untouched.
    Content(&'a str),
}

pub fn classify_section_line(raw: &str) -> SectionLine<'_> {
    let line = raw.trim();
    if line.is_empty() {
        return SectionLine::Blank;
    }
    let upper = line.to_uppercase();
    if upper.starts_with("NOTE") {
        return SectionLine::Note;
    }
    if line.starts_with("CLUSTER") {
        return SectionLine::Cluster;
    }
    if upper.contains("LIMBA") {
        return SectionLine::Language(Language::detect(line));
    }
    if let Some(depth) = detect_depth(&upper) {
        return SectionLine::Depth {
            depth,
            language: Language::detect(line),
        };
    }
    if let Some(name) = SectionName::from_header(line) {
        return SectionLine::Header(name);
    }
    SectionLine::Content(raw.trim_end())
}

fn detect_depth(upper: &str) -> Option<Depth> {
    if upper.starts_with("MODUL") {
        if upper.contains("DEEP") {
            return Some(Depth::Deep);
        }
        if upper.contains("SHORT") {
            return Some(Depth::Short);
        }
    }
    if upper.starts_with("DEEP") {
        Some(Depth::Deep)
    } else if upper.starts_with("SHORT") {
        Some(Depth::Short)
    } else {
        None
    }
}
