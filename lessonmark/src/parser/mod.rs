pub mod error;
pub mod lexer;
mod active_check;
mod lessons;
mod options;
mod sections;

pub use error::ParseError;
pub use options::{EmptyHeading, ParseOptions};

use crate::lesson::Lesson;
use crate::section::SectionDocument;

/// A successful parse together with its non-fatal diagnostics.
#[derive(Debug, Clone)]
pub struct Parsed<T> {
    pub value: T,
    pub warnings: Vec<ParseError>,
}

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
    options: ParseOptions,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser::with_options(source, file_id, ParseOptions::default())
    }

    pub fn with_options(source: String, file_id: usize, options: ParseOptions) -> Self {
        Parser {
            source,
            file_id,
            options,
        }
    }

    /// Parse a lesson document (`# lesson` headings, `[SCREEN kind]` markers).
    pub fn parse_lessons(&self) -> Result<Parsed<Vec<Lesson>>, Vec<ParseError>> {
        lessons::parse_lessons(&self.source, self.file_id, &self.options)
    }

    /// Parse a module document into its depth/language section buckets.
    pub fn parse_sections(&self) -> Result<Parsed<SectionDocument>, Vec<ParseError>> {
        sections::parse_sections(&self.source, self.file_id)
    }
}
