use std::fmt;

use serde::Serialize;

/// The kind named by a `[SCREEN kind]` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScreenKind {
    Content,
    Checkpoint,
    Quiz,
    Reflection,
    Protocol,
    ArcIntro,
}

impl ScreenKind {
    pub const ALL: [ScreenKind; 6] = [
        ScreenKind::Content,
        ScreenKind::Checkpoint,
        ScreenKind::Quiz,
        ScreenKind::Reflection,
        ScreenKind::Protocol,
        ScreenKind::ArcIntro,
    ];

    /// Resolve the word inside a screen marker (case-insensitive).
    pub fn from_marker(word: &str) -> Option<Self> {
        let lower = word.to_ascii_lowercase();
        ScreenKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == lower)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScreenKind::Content => "content",
            ScreenKind::Checkpoint => "checkpoint",
            ScreenKind::Quiz => "quiz",
            ScreenKind::Reflection => "reflection",
            ScreenKind::Protocol => "protocol",
            ScreenKind::ArcIntro => "arcintro",
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of a lesson. The id is either written with `id:` or
/// synthesized as `{lessonId}-screen-{n}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Screen {
    pub id: String,
    #[serde(flatten)]
    pub body: ScreenBody,
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        self.body.kind()
    }

    pub fn title(&self) -> &str {
        self.body.title()
    }
}

/// Kind-specific screen fields, serialized with a `kind` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ScreenBody {
    Content {
        title: String,
        body: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        bullets: Option<Vec<String>>,
    },
    Checkpoint {
        title: String,
        steps: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        helper: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Quiz {
        title: String,
        question: String,
        options: Vec<String>,
        correct_index: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
    },
    Reflection {
        title: String,
        prompt: String,
    },
    Protocol {
        title: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        body: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        steps: Option<Vec<String>>,
    },
    #[serde(rename = "arcintro")]
    ArcIntro { title: String, body: String },
}

impl ScreenBody {
    pub fn kind(&self) -> ScreenKind {
        match self {
            ScreenBody::Content { .. } => ScreenKind::Content,
            ScreenBody::Checkpoint { .. } => ScreenKind::Checkpoint,
            ScreenBody::Quiz { .. } => ScreenKind::Quiz,
            ScreenBody::Reflection { .. } => ScreenKind::Reflection,
            ScreenBody::Protocol { .. } => ScreenKind::Protocol,
            ScreenBody::ArcIntro { .. } => ScreenKind::ArcIntro,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ScreenBody::Content { title, .. }
            | ScreenBody::Checkpoint { title, .. }
            | ScreenBody::Quiz { title, .. }
            | ScreenBody::Reflection { title, .. }
            | ScreenBody::Protocol { title, .. }
            | ScreenBody::ArcIntro { title, .. } => title,
        }
    }
}
