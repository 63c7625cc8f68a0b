use std::ops::Range;

use crate::parser::error::ParseError;
use crate::section::{ActiveCheck, CheckOption};

/// Parse the raw lines of an ACTIVE CHECK section.
///
/// Recognised lines (after trimming, blank lines skipped):
/// - `ÎNTREBARE` / `QUESTION`: marker only, its own text is dropped
/// - `A) label`: one option
/// - `CORECT: B` / `CORRECT: B`: the correct letter, then feedback follows
/// - `FEEDBACK`: feedback follows
///
/// Any other line belongs to the feedback once feedback has started, and to
/// the question before that.
pub fn parse_active_check(
    lines: &[String],
    header: Range<usize>,
    file_id: usize,
) -> Result<ActiveCheck, ParseError> {
    let mut question: Vec<&str> = Vec::new();
    let mut feedback: Vec<&str> = Vec::new();
    let mut options = Vec::new();
    let mut correct: Option<String> = None;
    let mut collecting_feedback = false;

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let upper = line.to_uppercase();
        if upper.starts_with("ÎNTREBARE") || upper.starts_with("QUESTION") {
            continue;
        }
        if let Some(option) = parse_option(line) {
            options.push(option);
            collecting_feedback = false;
            continue;
        }
        if upper.starts_with("CORECT") || upper.starts_with("CORRECT") {
            // An empty letter clears an earlier one.
            if let Some(segment) = line.split(':').nth(1) {
                correct = correct_letter(segment);
            }
            collecting_feedback = true;
            continue;
        }
        if upper.starts_with("FEEDBACK") {
            collecting_feedback = true;
            continue;
        }
        if collecting_feedback {
            feedback.push(line);
        } else {
            question.push(line);
        }
    }

    let Some(first) = options.first() else {
        return Err(ParseError::error(
            "ACTIVE CHECK section has no options",
            header,
            file_id,
        )
        .with_note("write each answer on its own line as `A) answer text`"));
    };
    let correct_option_id = correct.unwrap_or_else(|| first.id.clone());

    Ok(ActiveCheck {
        question: question.join(" ").replace("  ", " ").trim().to_string(),
        options,
        correct_option_id,
        feedback: feedback.join("\n").trim().to_string(),
    })
}

/// `X) label`: a letter, then `)`, then at least one more character.
fn parse_option(line: &str) -> Option<CheckOption> {
    let mut chars = line.chars();
    let letter = chars.next().filter(|c| c.is_alphabetic())?;
    chars.next().filter(|c| *c == ')')?;
    let label = chars.as_str();
    if label.is_empty() {
        return None;
    }
    Some(CheckOption {
        id: letter.to_string(),
        label: label.trim().to_string(),
    })
}

fn correct_letter(segment: &str) -> Option<String> {
    segment
        .trim()
        .to_uppercase()
        .chars()
        .next()
        .map(|c| c.to_string())
}
