use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};

/// Parse errors with source location information.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub message: String,
    pub span: Range<usize>,
    pub file_id: usize,
    pub severity: Severity,
    pub notes: Vec<String>,
}

impl ParseError {
    pub fn error(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            message: message.into(),
            span,
            file_id,
            severity: Severity::Error,
            notes: Vec::new(),
        }
    }

    pub fn warning(message: impl Into<String>, span: Range<usize>, file_id: usize) -> Self {
        ParseError {
            message: message.into(),
            span,
            file_id,
            severity: Severity::Warning,
            notes: Vec::new(),
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        Diagnostic::new(self.severity)
            .with_message(&self.message)
            .with_labels(vec![Label::primary(self.file_id, self.span.clone())])
            .with_notes(self.notes.clone())
    }
}

/// Collects errors and warnings while a document is parsed.
/// Recoverable problems become warnings when the caller asked for leniency.
pub(crate) struct Diagnostics {
    pub file_id: usize,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseError>,
}

impl Diagnostics {
    pub fn new(file_id: usize) -> Self {
        Diagnostics {
            file_id,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Build an error, or a warning when `lenient` is set.
    pub fn diagnostic(
        &self,
        lenient: bool,
        message: impl Into<String>,
        span: Range<usize>,
    ) -> ParseError {
        if lenient {
            ParseError::warning(message, span, self.file_id)
        } else {
            ParseError::error(message, span, self.file_id)
        }
    }

    pub fn push(&mut self, diagnostic: ParseError) {
        if diagnostic.is_warning() {
            self.warnings.push(diagnostic);
        } else {
            self.errors.push(diagnostic);
        }
    }

    pub fn finish<T>(self, value: T) -> Result<super::Parsed<T>, Vec<ParseError>> {
        if self.errors.is_empty() {
            Ok(super::Parsed {
                value,
                warnings: self.warnings,
            })
        } else {
            Err(self.errors)
        }
    }
}
