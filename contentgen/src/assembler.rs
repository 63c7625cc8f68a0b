use std::collections::BTreeMap;

use lessonmark::Lesson;
use serde::Serialize;

use crate::arc::{ArcIntro, ArcIntroGroup, ArcZone};
use crate::error::Result;

/// What a lesson id stands for inside a module document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LessonRole {
    Lesson,
    ArcIntro,
    FinalTest,
}

impl LessonRole {
    /// Classify an id without knowing its module.
    pub fn of(lesson_id: &str) -> LessonRole {
        if lesson_id.ends_with("_final_test") {
            LessonRole::FinalTest
        } else if lesson_id.contains("_arc_") {
            LessonRole::ArcIntro
        } else {
            LessonRole::Lesson
        }
    }
}

/// Lessons of one module with the arc and final-test pseudo-lessons taken out.
#[derive(Debug, Clone, Default)]
pub struct SplitLessons {
    pub lessons: Vec<Lesson>,
    pub arc_intros: BTreeMap<ArcZone, ArcIntro>,
}

/// Separate a module's regular lessons from its arc introductions.
///
/// - `{module}_final_test` is dropped.
/// - `{module}_arc_{zone}` feeds the zone's intro; a later lesson for the
///   same zone replaces an earlier one. Unknown zones are dropped.
/// - Everything else is kept in order.
pub fn split_lessons(lessons: Vec<Lesson>, module_id: &str) -> SplitLessons {
    let final_test = format!("{module_id}_final_test");
    let arc_prefix = format!("{module_id}_arc_");
    let mut split = SplitLessons::default();

    for lesson in lessons {
        if lesson.lesson_id == final_test {
            continue;
        }
        let Some(suffix) = lesson.lesson_id.strip_prefix(&arc_prefix) else {
            split.lessons.push(lesson);
            continue;
        };
        let Some(zone) = ArcZone::from_suffix(suffix) else {
            tracing::trace!(lesson = %lesson.lesson_id, "arc lesson with unknown zone dropped");
            continue;
        };
        if let Some(intro) = ArcIntro::from_lesson(&lesson) {
            split.arc_intros.insert(zone, intro);
        }
    }

    split
}

/// A module ready for output.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub id: String,
    pub title: String,
    pub arc_intros: ArcIntroGroup,
    pub lessons: Vec<Lesson>,
}

/// Split a module's lessons and require all four arc introductions.
pub fn assemble_module(module_id: &str, title: &str, lessons: Vec<Lesson>) -> Result<Module> {
    let split = split_lessons(lessons, module_id);
    let arc_intros = ArcIntroGroup::from_zones(module_id, split.arc_intros)?;
    Ok(Module {
        id: module_id.to_string(),
        title: title.to_string(),
        arc_intros,
        lessons: split.lessons,
    })
}
