pub mod screen;

use serde::Serialize;

pub use screen::{Screen, ScreenBody, ScreenKind};

/// A lesson opened by a `# lesson_id` heading.
/// Screens keep the order in which they appear in the source.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub lesson_id: String,
    pub screens: Vec<Screen>,
}

impl Lesson {
    pub fn new(lesson_id: impl Into<String>) -> Self {
        Lesson {
            lesson_id: lesson_id.into(),
            screens: Vec::new(),
        }
    }

    /// First screen of the given kind, if any.
    pub fn first_screen(&self, kind: ScreenKind) -> Option<&Screen> {
        self.screens.iter().find(|screen| screen.kind() == kind)
    }
}
