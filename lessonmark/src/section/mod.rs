pub mod active_check;

use serde::Serialize;

pub use active_check::{ActiveCheck, CheckOption};

/// Content depth of a module variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Depth {
    Deep,
    Short,
}

/// Language of a module variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    Ro,
    En,
}

impl Language {
    /// Scan a line for a language marker. `ROM` wins over `ENG`.
    pub fn detect(line: &str) -> Option<Self> {
        let upper = line.to_uppercase();
        if upper.contains("ROM") {
            Some(Language::Ro)
        } else if upper.contains("ENG") {
            Some(Language::En)
        } else {
            None
        }
    }
}

/// The eight named sections of a module variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SectionName {
    Hook,
    Mirror,
    CoreInsight,
    ActiveCheck,
    MicroSimulator,
    RealWorldTransfer,
    AnchorPhrase,
    Close,
}

impl SectionName {
    pub const ALL: [SectionName; 8] = [
        SectionName::Hook,
        SectionName::Mirror,
        SectionName::CoreInsight,
        SectionName::ActiveCheck,
        SectionName::MicroSimulator,
        SectionName::RealWorldTransfer,
        SectionName::AnchorPhrase,
        SectionName::Close,
    ];

    /// The header line that opens this section in the source document.
    pub fn header(self) -> &'static str {
        match self {
            SectionName::Hook => "HOOK",
            SectionName::Mirror => "MIRROR",
            SectionName::CoreInsight => "CORE INSIGHT",
            SectionName::ActiveCheck => "ACTIVE CHECK",
            SectionName::MicroSimulator => "MICRO-SIMULATOR",
            SectionName::RealWorldTransfer => "REAL-WORLD TRANSFER",
            SectionName::AnchorPhrase => "ANCHOR PHRASE",
            SectionName::Close => "CLOSE",
        }
    }

    /// Exact (upper-cased, trimmed) header match.
    pub fn from_header(line: &str) -> Option<Self> {
        let upper = line.trim().to_uppercase();
        SectionName::ALL
            .into_iter()
            .find(|name| name.header() == upper)
    }
}

/// Rendered sections of one depth/language bucket. Absent sections stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub core_insight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_check: Option<ActiveCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub micro_simulator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub real_world: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_phrase: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub close: Option<String>,
}

impl Sections {
    pub fn is_empty(&self) -> bool {
        *self == Sections::default()
    }

    /// Paragraph text of a plain section. Always `None` for ACTIVE CHECK.
    pub fn paragraph(&self, name: SectionName) -> Option<&str> {
        let slot = match name {
            SectionName::Hook => &self.hook,
            SectionName::Mirror => &self.mirror,
            SectionName::CoreInsight => &self.core_insight,
            SectionName::ActiveCheck => return None,
            SectionName::MicroSimulator => &self.micro_simulator,
            SectionName::RealWorldTransfer => &self.real_world,
            SectionName::AnchorPhrase => &self.anchor_phrase,
            SectionName::Close => &self.close,
        };
        slot.as_deref()
    }

    /// Store a rendered paragraph. ACTIVE CHECK is set through `active_check`.
    pub(crate) fn set_paragraph(&mut self, name: SectionName, text: String) {
        let slot = match name {
            SectionName::Hook => &mut self.hook,
            SectionName::Mirror => &mut self.mirror,
            SectionName::CoreInsight => &mut self.core_insight,
            SectionName::ActiveCheck => return,
            SectionName::MicroSimulator => &mut self.micro_simulator,
            SectionName::RealWorldTransfer => &mut self.real_world,
            SectionName::AnchorPhrase => &mut self.anchor_phrase,
            SectionName::Close => &mut self.close,
        };
        *slot = Some(text);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LanguageSections {
    pub ro: Sections,
    pub en: Sections,
}

impl LanguageSections {
    pub fn get(&self, language: Language) -> &Sections {
        match language {
            Language::Ro => &self.ro,
            Language::En => &self.en,
        }
    }

    pub fn get_mut(&mut self, language: Language) -> &mut Sections {
        match language {
            Language::Ro => &mut self.ro,
            Language::En => &mut self.en,
        }
    }
}

/// A module document split along depth and language.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SectionDocument {
    pub deep: LanguageSections,
    pub short: LanguageSections,
}

impl SectionDocument {
    pub fn bucket(&self, depth: Depth, language: Language) -> &Sections {
        match depth {
            Depth::Deep => self.deep.get(language),
            Depth::Short => self.short.get(language),
        }
    }

    pub fn bucket_mut(&mut self, depth: Depth, language: Language) -> &mut Sections {
        match depth {
            Depth::Deep => self.deep.get_mut(language),
            Depth::Short => self.short.get_mut(language),
        }
    }
}

/// Drop blank lines at both ends, join with newlines and trim the result.
pub fn to_paragraph<S: AsRef<str>>(lines: &[S]) -> String {
    let is_blank = |line: &S| line.as_ref().trim().is_empty();
    let start = lines
        .iter()
        .position(|line| !is_blank(line))
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !is_blank(line))
        .map_or(start, |last| last + 1);

    lines[start..end]
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
