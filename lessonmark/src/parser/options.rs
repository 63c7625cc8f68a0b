use serde::Deserialize;

/// What to do with a lesson heading that has no id (`# ` or a bare `#`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmptyHeading {
    /// Close the current lesson and drop everything until the next heading.
    #[default]
    Skip,
    /// Report the heading as a parse error.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    pub empty_heading: EmptyHeading,
    /// Missing mandatory fields and unknown screen kinds are errors when set,
    /// warnings otherwise.
    pub strict_fields: bool,
    /// Non-numeric `correctIndex` falls back to 0 with a warning when set.
    pub lenient_correct_index: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            empty_heading: EmptyHeading::Skip,
            strict_fields: true,
            lenient_correct_index: false,
        }
    }
}
