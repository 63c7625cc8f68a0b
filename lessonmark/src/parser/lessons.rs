use std::mem;
use std::ops::Range;

use crate::lesson::{Lesson, Screen, ScreenBody, ScreenKind};
use crate::parser::Parsed;
use crate::parser::error::{Diagnostics, ParseError};
use crate::parser::lexer::{self, LessonLine, LessonToken, ListKey};
use crate::parser::options::{EmptyHeading, ParseOptions};

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a lesson document into its lessons, in source order.
pub fn parse_lessons(
    source: &str,
    file_id: usize,
    options: &ParseOptions,
) -> Result<Parsed<Vec<Lesson>>, Vec<ParseError>> {
    let tokens = lexer::tokenize_lessons(source);
    let mut state = ParseState::new(file_id, options);

    if options.empty_heading == EmptyHeading::Reject {
        for token in tokens.iter().filter(|t| t.kind == LessonLine::BareHeading) {
            state.reject_empty_heading(token);
        }
    }

    let mut i = 0;
    while i < tokens.len() {
        i = state.step(&tokens, i);
    }

    state.finalize()
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

enum State {
    /// Before the first heading, or after an empty one.
    NoLesson,
    InLesson(Lesson),
    InScreen(Lesson, ScreenBuilder),
}

struct ParseState<'o> {
    options: &'o ParseOptions,
    state: State,
    lessons: Vec<Lesson>,
    diagnostics: Diagnostics,
}

impl<'o> ParseState<'o> {
    fn new(file_id: usize, options: &'o ParseOptions) -> Self {
        ParseState {
            options,
            state: State::NoLesson,
            lessons: Vec::new(),
            diagnostics: Diagnostics::new(file_id),
        }
    }

    /// Consume the token at `i` (plus any lookahead it owns) and return the
    /// index of the next unconsumed token.
    fn step(&mut self, tokens: &[LessonToken<'_>], i: usize) -> usize {
        let token = &tokens[i];
        match &token.kind {
            LessonLine::Heading(id) => {
                self.close_lesson();
                self.open_lesson(id, token);
                i + 1
            }
            LessonLine::ScreenMarker(word) => {
                self.close_screen();
                self.open_screen(word, token);
                i + 1
            }
            LessonLine::ListStart(key) => {
                let (items, next) = collect_list(tokens, i + 1);
                if let State::InScreen(_, screen) = &mut self.state {
                    screen.set_list(*key, items);
                    next
                } else {
                    i + 1
                }
            }
            LessonLine::Field { key, .. } => {
                if !matches!(self.state, State::InScreen(..)) {
                    return i + 1;
                }
                let (value, next) = collect_field(tokens, i);
                let span = token.line.span.start..tokens[next - 1].line.span.end;
                self.set_field(key, value, span, token.line.number);
                next
            }
            LessonLine::ListItem(_)
            | LessonLine::Blank
            | LessonLine::Text(_)
            | LessonLine::BareHeading => i + 1,
        }
    }

    fn open_lesson(&mut self, id: &str, token: &LessonToken<'_>) {
        if !id.is_empty() {
            self.state = State::InLesson(Lesson::new(id));
        } else if self.options.empty_heading == EmptyHeading::Reject {
            self.reject_empty_heading(token);
        }
    }

    fn reject_empty_heading(&mut self, token: &LessonToken<'_>) {
        let error = ParseError::error(
            format!("lesson heading on line {} has no id", token.line.number),
            token.line.span.clone(),
            self.diagnostics.file_id,
        )
        .with_note("write the lesson id after `# `, e.g. `# calm_breathing`");
        self.diagnostics.push(error);
    }

    /// A marker outside any lesson is ignored, and so are the fields after it.
    fn open_screen(&mut self, word: &str, token: &LessonToken<'_>) {
        match mem::replace(&mut self.state, State::NoLesson) {
            State::InLesson(lesson) => {
                let screen = ScreenBuilder::new(word, token.line.span.clone());
                self.state = State::InScreen(lesson, screen);
            }
            other => self.state = other,
        }
    }

    fn close_screen(&mut self) {
        match mem::replace(&mut self.state, State::NoLesson) {
            State::InScreen(mut lesson, builder) => {
                let position = lesson.screens.len() + 1;
                if let Some(screen) =
                    builder.build(&lesson.lesson_id, position, self.options, &mut self.diagnostics)
                {
                    lesson.screens.push(screen);
                }
                self.state = State::InLesson(lesson);
            }
            other => self.state = other,
        }
    }

    fn close_lesson(&mut self) {
        self.close_screen();
        if let State::InLesson(lesson) = mem::replace(&mut self.state, State::NoLesson) {
            self.lessons.push(lesson);
        }
    }

    fn set_field(&mut self, key: &str, value: String, span: Range<usize>, line: usize) {
        let correct_index = if key.eq_ignore_ascii_case("correctindex") {
            Some(self.parse_correct_index(&value, span, line))
        } else {
            None
        };
        let State::InScreen(_, screen) = &mut self.state else {
            return;
        };
        if let Some(index) = correct_index {
            screen.correct_index = Some(index);
            return;
        }
        let slot = match key.to_ascii_lowercase().as_str() {
            "id" => &mut screen.id,
            "title" => &mut screen.title,
            "body" => &mut screen.body,
            "helper" => &mut screen.helper,
            "question" => &mut screen.question,
            "explanation" => &mut screen.explanation,
            "prompt" => &mut screen.prompt,
            // Unknown keys are consumed together with their continuation lines.
            _ => return,
        };
        *slot = Some(value);
    }

    fn parse_correct_index(&mut self, value: &str, span: Range<usize>, line: usize) -> usize {
        if value.is_empty() {
            return 0;
        }
        match value.parse::<usize>() {
            Ok(index) => index,
            Err(_) => {
                let diagnostic = self
                    .diagnostics
                    .diagnostic(
                        self.options.lenient_correct_index,
                        format!("correctIndex on line {line} is not a number: `{value}`"),
                        span,
                    )
                    .with_note("correctIndex is the 0-based position of the right option");
                self.diagnostics.push(diagnostic);
                0
            }
        }
    }

    fn finalize(mut self) -> Result<Parsed<Vec<Lesson>>, Vec<ParseError>> {
        self.close_lesson();
        self.diagnostics.finish(self.lessons)
    }
}

// ---------------------------------------------------------------------------
// Screen builder
// ---------------------------------------------------------------------------

/// Fields accumulated between a screen marker and the next boundary.
/// A repeated key replaces the earlier value.
struct ScreenBuilder {
    kind: String,
    span: Range<usize>,
    id: Option<String>,
    title: Option<String>,
    body: Option<String>,
    helper: Option<String>,
    question: Option<String>,
    explanation: Option<String>,
    prompt: Option<String>,
    steps: Option<Vec<String>>,
    options: Option<Vec<String>>,
    bullets: Option<Vec<String>>,
    correct_index: Option<usize>,
}

impl ScreenBuilder {
    fn new(kind: &str, span: Range<usize>) -> Self {
        ScreenBuilder {
            kind: kind.to_ascii_lowercase(),
            span,
            id: None,
            title: None,
            body: None,
            helper: None,
            question: None,
            explanation: None,
            prompt: None,
            steps: None,
            options: None,
            bullets: None,
            correct_index: None,
        }
    }

    fn set_list(&mut self, key: ListKey, items: Vec<String>) {
        let slot = match key {
            ListKey::Steps => &mut self.steps,
            ListKey::Options => &mut self.options,
            ListKey::Bullets => &mut self.bullets,
        };
        *slot = Some(items);
    }

    /// Turn the accumulated fields into a typed screen. Returns `None` when
    /// the screen is rejected; the reason is recorded in `diagnostics`.
    fn build(
        self,
        lesson_id: &str,
        position: usize,
        options: &ParseOptions,
        diagnostics: &mut Diagnostics,
    ) -> Option<Screen> {
        let lenient = !options.strict_fields;
        let Some(kind) = ScreenKind::from_marker(&self.kind) else {
            let known: Vec<&str> = ScreenKind::ALL.iter().map(|k| k.as_str()).collect();
            let diagnostic = diagnostics
                .diagnostic(
                    lenient,
                    format!("unknown screen kind `{}` in lesson `{lesson_id}`", self.kind),
                    self.span,
                )
                .with_note(format!("expected one of: {}", known.join(", ")));
            diagnostics.push(diagnostic);
            return None;
        };

        let id = self
            .id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| format!("{lesson_id}-screen-{position}"));

        let mut missing = Vec::new();
        let title = required(&mut missing, "title", self.title);
        let body = match kind {
            ScreenKind::Content => ScreenBody::Content {
                title,
                body: required(&mut missing, "body", self.body),
                bullets: self.bullets,
            },
            ScreenKind::Checkpoint => ScreenBody::Checkpoint {
                title,
                steps: required(&mut missing, "steps", self.steps),
                helper: self.helper,
            },
            ScreenKind::Quiz => ScreenBody::Quiz {
                title,
                question: required(&mut missing, "question", self.question),
                options: required(&mut missing, "options", self.options),
                correct_index: self.correct_index.unwrap_or(0),
                explanation: self.explanation,
            },
            ScreenKind::Reflection => ScreenBody::Reflection {
                title,
                prompt: required(&mut missing, "prompt", self.prompt),
            },
            ScreenKind::Protocol => ScreenBody::Protocol {
                title,
                body: self.body,
                steps: self.steps,
            },
            ScreenKind::ArcIntro => ScreenBody::ArcIntro {
                title,
                body: required(&mut missing, "body", self.body),
            },
        };

        if !missing.is_empty() {
            let diagnostic = diagnostics.diagnostic(
                lenient,
                format!(
                    "{kind} screen `{id}` is missing required field(s): {}",
                    missing.join(", ")
                ),
                self.span,
            );
            diagnostics.push(diagnostic);
            if !lenient {
                return None;
            }
        }

        Some(Screen { id, body })
    }
}

fn required<T: Default>(missing: &mut Vec<&'static str>, name: &'static str, value: Option<T>) -> T {
    value.unwrap_or_else(|| {
        missing.push(name);
        T::default()
    })
}

// ---------------------------------------------------------------------------
// Lookahead
// ---------------------------------------------------------------------------

/// Collect the `-` items starting at `start`. Stops at the first other line.
fn collect_list(tokens: &[LessonToken<'_>], start: usize) -> (Vec<String>, usize) {
    let mut items = Vec::new();
    let mut i = start;
    while let Some(LessonToken {
        kind: LessonLine::ListItem(item),
        ..
    }) = tokens.get(i)
    {
        items.push(item.to_string());
        i += 1;
    }
    (items, i)
}

/// Collect a field value: the text after `key:` plus every following line
/// up to the next blank, boundary, field, list or item line.
fn collect_field(tokens: &[LessonToken<'_>], start: usize) -> (String, usize) {
    let mut parts: Vec<&str> = Vec::new();
    if let LessonLine::Field { value, .. } = &tokens[start].kind {
        parts.push(*value);
    }

    let mut i = start + 1;
    while let Some(token) = tokens.get(i) {
        if token.kind.ends_field() {
            break;
        }
        match &token.kind {
            LessonLine::Text(text) => parts.push(*text),
            LessonLine::BareHeading => parts.push("#"),
            _ => {}
        }
        i += 1;
    }

    let value = parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();
    (value, i)
}
