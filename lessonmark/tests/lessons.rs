use lessonmark::parser::EmptyHeading;
use lessonmark::{Lesson, ParseError, ParseOptions, Parser, ScreenBody, ScreenKind};

fn parse(source: &str) -> Vec<Lesson> {
    Parser::new(source.to_string(), 0)
        .parse_lessons()
        .expect("parse failed")
        .value
}

fn parse_with(source: &str, options: ParseOptions) -> Result<Vec<Lesson>, Vec<ParseError>> {
    Parser::with_options(source.to_string(), 0, options)
        .parse_lessons()
        .map(|parsed| parsed.value)
}

fn parse_errors(source: &str) -> Vec<ParseError> {
    match Parser::new(source.to_string(), 0).parse_lessons() {
        Ok(_) => panic!("expected parse errors"),
        Err(errors) => errors,
    }
}

#[test]
fn single_content_screen() {
    let lessons = parse("# lesson_one\n[SCREEN content]\ntitle: Hello\nbody: World\n");
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].lesson_id, "lesson_one");
    assert_eq!(lessons[0].screens.len(), 1);

    let screen = &lessons[0].screens[0];
    assert_eq!(screen.id, "lesson_one-screen-1");
    assert_eq!(
        screen.body,
        ScreenBody::Content {
            title: "Hello".into(),
            body: "World".into(),
            bullets: None,
        }
    );
}

#[test]
fn serialized_shape() {
    let lessons = parse("# lesson_one\n[SCREEN content]\ntitle: Hello\nbody: World\n");
    let json = serde_json::to_value(&lessons[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "lessonId": "lesson_one",
            "screens": [{
                "id": "lesson_one-screen-1",
                "kind": "content",
                "title": "Hello",
                "body": "World"
            }]
        })
    );
}

#[test]
fn synthesized_ids_follow_position() {
    let source = "\
# calm
[SCREEN content]
title: One
body: a
[SCREEN reflection]
id: custom-id
title: Two
prompt: b
[SCREEN content]
title: Three
body: c
";
    let lessons = parse(source);
    let ids: Vec<&str> = lessons[0].screens.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids, ["calm-screen-1", "custom-id", "calm-screen-3"]);
}

#[test]
fn empty_explicit_id_is_synthesized() {
    let lessons = parse("# calm\n[SCREEN content]\nid:\ntitle: T\nbody: B\n");
    assert_eq!(lessons[0].screens[0].id, "calm-screen-1");
}

#[test]
fn multi_line_field_values() {
    let source = "\
# calm
[SCREEN content]
title: Breathing
body: First line
second line
  third line indented
helper: ignored for content
";
    let lessons = parse(source);
    match &lessons[0].screens[0].body {
        ScreenBody::Content { body, .. } => {
            assert_eq!(body, "First line\nsecond line\nthird line indented");
        }
        other => panic!("unexpected screen: {:?}", other),
    }
}

#[test]
fn field_value_stops_at_blank_line() {
    let source = "\
# calm
[SCREEN content]
title: T
body: kept

dropped stray text
";
    let lessons = parse(source);
    match &lessons[0].screens[0].body {
        ScreenBody::Content { body, .. } => assert_eq!(body, "kept"),
        other => panic!("unexpected screen: {:?}", other),
    }
}

#[test]
fn value_may_start_on_next_line() {
    let lessons = parse("# calm\n[SCREEN reflection]\ntitle: T\nprompt:\nWhat did you notice?\n");
    match &lessons[0].screens[0].body {
        ScreenBody::Reflection { prompt, .. } => assert_eq!(prompt, "What did you notice?"),
        other => panic!("unexpected screen: {:?}", other),
    }
}

#[test]
fn checkpoint_steps_list() {
    let source = "\
# calm
[SCREEN checkpoint]
title: Try it
steps:
- Inhale for 4
-Hold for 4
  - Exhale for 6
helper: Take your time.
";
    let lessons = parse(source);
    assert_eq!(
        lessons[0].screens[0].body,
        ScreenBody::Checkpoint {
            title: "Try it".into(),
            steps: vec![
                "Inhale for 4".into(),
                "Hold for 4".into(),
                "Exhale for 6".into()
            ],
            helper: Some("Take your time.".into()),
        }
    );
}

#[test]
fn list_ends_at_first_non_item_line() {
    let source = "\
# calm
[SCREEN checkpoint]
title: Try it
steps:
- one

- not a step
";
    let lessons = parse(source);
    match &lessons[0].screens[0].body {
        ScreenBody::Checkpoint { steps, .. } => assert_eq!(steps, &vec!["one".to_string()]),
        other => panic!("unexpected screen: {:?}", other),
    }
}

#[test]
fn quiz_screen() {
    let source = "\
# calm
[SCREEN quiz]
title: Check
question: Which one?
options:
- First
- Second
- Third
correctIndex: 2
explanation: Because.
";
    let lessons = parse(source);
    assert_eq!(
        lessons[0].screens[0].body,
        ScreenBody::Quiz {
            title: "Check".into(),
            question: "Which one?".into(),
            options: vec!["First".into(), "Second".into(), "Third".into()],
            correct_index: 2,
            explanation: Some("Because.".into()),
        }
    );
    let json = serde_json::to_value(&lessons[0].screens[0]).unwrap();
    assert_eq!(json["correctIndex"], 2);
    assert_eq!(json["kind"], "quiz");
}

#[test]
fn empty_correct_index_defaults_to_zero() {
    let source = "# calm\n[SCREEN quiz]\ntitle: Q\nquestion: ?\noptions:\n- a\ncorrectIndex:\n";
    match &parse(source)[0].screens[0].body {
        ScreenBody::Quiz { correct_index, .. } => assert_eq!(*correct_index, 0),
        other => panic!("unexpected screen: {:?}", other),
    }
}

#[test]
fn non_numeric_correct_index_names_the_line() {
    let source = "# calm\n[SCREEN quiz]\ntitle: Q\nquestion: ?\noptions:\n- a\ncorrectIndex: two\n";
    let errors = parse_errors(source);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("line 7"), "{}", errors[0].message);
    assert!(errors[0].message.contains("two"));
}

#[test]
fn lenient_correct_index_warns_and_uses_zero() {
    let source = "# calm\n[SCREEN quiz]\ntitle: Q\nquestion: ?\noptions:\n- a\ncorrectIndex: two\n";
    let options = ParseOptions {
        lenient_correct_index: true,
        ..ParseOptions::default()
    };
    let parsed = Parser::with_options(source.to_string(), 0, options)
        .parse_lessons()
        .expect("lenient parse");
    assert_eq!(parsed.warnings.len(), 1);
    assert!(parsed.warnings[0].is_warning());
    match &parsed.value[0].screens[0].body {
        ScreenBody::Quiz { correct_index, .. } => assert_eq!(*correct_index, 0),
        other => panic!("unexpected screen: {:?}", other),
    }
}

#[test]
fn protocol_and_arc_intro_screens() {
    let source = "\
# mod_arc_trezire
[SCREEN arcIntro]
title: Awakening
body: The path begins.
[SCREEN protocol]
title: Evening routine
steps:
- Write
- Breathe
";
    let lessons = parse(source);
    let screens = &lessons[0].screens;
    assert_eq!(screens[0].kind(), ScreenKind::ArcIntro);
    assert_eq!(screens[0].title(), "Awakening");
    assert_eq!(
        screens[1].body,
        ScreenBody::Protocol {
            title: "Evening routine".into(),
            body: None,
            steps: Some(vec!["Write".into(), "Breathe".into()]),
        }
    );
    let json = serde_json::to_value(&screens[0]).unwrap();
    assert_eq!(json["kind"], "arcintro");
}

#[test]
fn content_bullets() {
    let source = "# calm\n[SCREEN content]\ntitle: T\nbody: B\nbullets:\n- one\n- two\n";
    match &parse(source)[0].screens[0].body {
        ScreenBody::Content { bullets, .. } => {
            assert_eq!(bullets.as_deref(), Some(&["one".to_string(), "two".to_string()][..]));
        }
        other => panic!("unexpected screen: {:?}", other),
    }
}

#[test]
fn lesson_count_matches_non_empty_headings() {
    let source = "\
intro text before any lesson
# one
[SCREEN content]
title: a
body: b
# two
## not a lesson
# three
";
    let lessons = parse(source);
    let ids: Vec<&str> = lessons.iter().map(|l| l.lesson_id.as_str()).collect();
    assert_eq!(ids, ["one", "two", "three"]);
    assert!(lessons[1].screens.is_empty());
}

#[test]
fn bare_hash_is_text_inside_a_lesson() {
    let source = "\
# one
[SCREEN content]
title: a
body: first
#
more
[SCREEN reflection]
title: r
prompt: p
# two
";
    let lessons = parse(source);
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[0].screens.len(), 2);
    match &lessons[0].screens[0].body {
        ScreenBody::Content { body, .. } => assert_eq!(body, "first\n#\nmore"),
        other => panic!("unexpected screen: {other:?}"),
    }
    assert_eq!(lessons[0].screens[1].kind(), ScreenKind::Reflection);
}

#[test]
fn bare_hash_between_screens_is_ignored() {
    let lessons = parse("# one\n#\n[SCREEN reflection]\ntitle: r\nprompt: p\n");
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].screens.len(), 1);
}

#[test]
fn empty_heading_can_be_rejected() {
    let options = ParseOptions {
        empty_heading: EmptyHeading::Reject,
        ..ParseOptions::default()
    };
    let errors = parse_with("# one\n#\n", options).unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("line 2"));
}

#[test]
fn screen_marker_without_lesson_is_ignored() {
    let source = "\
[SCREEN content]
title: orphan
body: orphan
# one
[SCREEN content]
title: a
body: b
";
    let lessons = parse(source);
    assert_eq!(lessons.len(), 1);
    assert_eq!(lessons[0].screens.len(), 1);
    assert_eq!(lessons[0].screens[0].title(), "a");
}

#[test]
fn marker_kind_is_case_insensitive() {
    let lessons = parse("# one\n[SCREEN Reflection]\ntitle: t\nprompt: p\n");
    assert_eq!(lessons[0].screens[0].kind(), ScreenKind::Reflection);
}

#[test]
fn unknown_keys_consume_their_continuation() {
    let source = "\
# one
[SCREEN content]
title: a
notes: internal remark
that spans two lines
body: b
";
    match &parse(source)[0].screens[0].body {
        ScreenBody::Content { title, body, .. } => {
            assert_eq!(title, "a");
            assert_eq!(body, "b");
        }
        other => panic!("unexpected screen: {:?}", other),
    }
}

#[test]
fn missing_required_field_is_an_error() {
    let errors = parse_errors("# one\n[SCREEN content]\ntitle: only a title\n");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].message.contains("one-screen-1"));
    assert!(errors[0].message.contains("body"));
}

#[test]
fn all_bad_screens_are_reported() {
    let source = "\
# one
[SCREEN content]
body: no title
[SCREEN reflection]
title: no prompt
[SCREEN video]
title: unknown kind
";
    let errors = parse_errors(source);
    assert_eq!(errors.len(), 3);
    assert!(errors[2].message.contains("video"));
}

#[test]
fn lenient_fields_keep_screen_with_defaults() {
    let options = ParseOptions {
        strict_fields: false,
        ..ParseOptions::default()
    };
    let parsed = Parser::with_options("# one\n[SCREEN reflection]\ntitle: t\n".to_string(), 0, options)
        .parse_lessons()
        .expect("lenient parse");
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(
        parsed.value[0].screens[0].body,
        ScreenBody::Reflection {
            title: "t".into(),
            prompt: String::new(),
        }
    );
}

#[test]
fn repeated_key_replaces_value() {
    let lessons = parse("# one\n[SCREEN content]\ntitle: first\ntitle: second\nbody: b\n");
    assert_eq!(lessons[0].screens[0].title(), "second");
}

#[test]
fn crlf_line_endings() {
    let lessons = parse("# one\r\n[SCREEN content]\r\ntitle: a\r\nbody: b\r\n");
    assert_eq!(lessons[0].screens[0].title(), "a");
}

#[test]
fn error_span_points_at_marker_line() {
    let source = "# one\n[SCREEN content]\ntitle: t\n";
    let errors = parse_errors(source);
    assert_eq!(&source[errors[0].span.clone()], "[SCREEN content]");
}
