use serde::Serialize;

/// The multiple-choice block embedded in an ACTIVE CHECK section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveCheck {
    pub question: String,
    pub options: Vec<CheckOption>,
    /// Single upper-case letter. Falls back to the first option's id.
    pub correct_option_id: String,
    pub feedback: String,
}

impl ActiveCheck {
    pub fn correct_option(&self) -> Option<&CheckOption> {
        self.options
            .iter()
            .find(|option| option.id == self.correct_option_id)
    }
}

/// A lettered answer, written as `A) label`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOption {
    pub id: String,
    pub label: String,
}
