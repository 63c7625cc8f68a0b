use lessonmark::{Lesson, Parser};

use crate::Generated;
use crate::assembler::{Module, assemble_module, split_lessons};
use crate::config::{Config, LessonModuleConfig};
use crate::error::{GenerateError, Result};
use crate::sources::SourceFiles;

/// Everything the lessons artifact is rendered from.
#[derive(Debug, Clone, Default)]
pub struct LessonBundle {
    /// Regular lessons of every module, in config then source order.
    pub lessons: Vec<Lesson>,
    /// Modules assembled with their arc introductions.
    pub modules: Vec<Module>,
}

/// Parse and assemble every configured lesson module.
/// The first failing module aborts the whole run.
pub fn generate_lessons(config: &Config, sources: &mut SourceFiles) -> Result<Generated<LessonBundle>> {
    let lessons_config = config.lessons()?;
    let mut bundle = LessonBundle::default();
    let mut warnings = Vec::new();

    for module in &lessons_config.modules {
        let path = config.resolve(&module.source);
        let (file_id, source) = sources.load(&module.id, &path)?;
        let parsed = Parser::with_options(source, file_id, config.parser.clone())
            .parse_lessons()
            .map_err(|errors| GenerateError::Parse {
                path: path.clone(),
                errors,
            })?;
        warnings.extend(parsed.warnings);

        let lessons = without_excluded(parsed.value, module);
        tracing::debug!(
            module = %module.id,
            lessons = lessons.len(),
            "parsed lesson module"
        );

        if module.arcs {
            let assembled = assemble_module(&module.id, &module.title, lessons)?;
            bundle.lessons.extend(assembled.lessons.iter().cloned());
            bundle.modules.push(assembled);
        } else {
            bundle.lessons.extend(split_lessons(lessons, &module.id).lessons);
        }
    }

    Ok(Generated {
        value: bundle,
        warnings,
    })
}

fn without_excluded(lessons: Vec<Lesson>, module: &LessonModuleConfig) -> Vec<Lesson> {
    lessons
        .into_iter()
        .filter(|lesson| !module.exclude.contains(&lesson.lesson_id))
        .collect()
}
