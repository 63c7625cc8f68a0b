use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

use lessonmark::Lesson;
use serde::Serialize;
use serde::ser::Serializer;
use tempfile::NamedTempFile;

use crate::assembler::Module;
use crate::error::{GenerateError, Result};
use crate::lessons::LessonBundle;
use crate::wow::WowModule;

const LESSON_TYPES: &str = r#"export type OmniKunoScreenKind =
  | "content"
  | "checkpoint"
  | "quiz"
  | "reflection"
  | "protocol"
  | "arcintro";

export type OmniKunoLessonScreen =
  | {
      id?: string;
      kind: "content";
      title: string;
      body: string;
      bullets?: string[];
    }
  | {
      id?: string;
      kind: "checkpoint";
      title: string;
      steps: string[];
      helper?: string;
    }
  | {
      id?: string;
      kind: "quiz";
      title: string;
      question: string;
      options: string[];
      correctIndex: number;
      explanation?: string;
    }
  | {
      id?: string;
      kind: "reflection";
      title: string;
      prompt: string;
    }
  | {
      id?: string;
      kind: "protocol";
      title: string;
      body?: string;
      steps?: string[];
    }
  | {
      id?: string;
      kind: "arcintro";
      title: string;
      body: string;
    };

export type OmniKunoLessonContent = {
  lessonId: string;
  screens: OmniKunoLessonScreen[];
};

export type OmniKunoArcZone = "trezire" | "primele_ciocniri" | "profunzime" | "maestrie";

export type OmniKunoArcIntro = {
  id: string;
  title: string;
  body: string;
};

export type OmniKunoArcIntroGroup = Record<OmniKunoArcZone, OmniKunoArcIntro>;

export type OmniKunoModuleContent = {
  id: string;
  title: string;
  arcIntros: OmniKunoArcIntroGroup;
  lessons: OmniKunoLessonContent[];
};
"#;

const WOW_BANNER: &str =
    "// AUTO-GENERATED FILE. Run \"lessonmark sections\" to update.\n";
const WOW_IMPORT: &str = "import type { WowModuleContent } from \"./types\";\n\n";

/// A JSON object whose keys keep insertion order.
struct OrderedMap<'a, T>(Vec<(&'a str, &'a T)>);

impl<T: Serialize> Serialize for OrderedMap<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(key, value)| (*key, *value)))
    }
}

/// Lessons keyed by id. A repeated id keeps its first position and its
/// last value.
fn lesson_map(lessons: &[Lesson]) -> OrderedMap<'_, Lesson> {
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut entries: Vec<(&str, &Lesson)> = Vec::with_capacity(lessons.len());
    for lesson in lessons {
        let id = lesson.lesson_id.as_str();
        match positions.get(id) {
            Some(&position) => entries[position].1 = lesson,
            None => {
                positions.insert(id, entries.len());
                entries.push((id, lesson));
            }
        }
    }
    OrderedMap(entries)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render the lessons data module.
pub fn render_lessons(bundle: &LessonBundle) -> Result<String> {
    let modules = OrderedMap(
        bundle
            .modules
            .iter()
            .map(|module| (module.id.as_str(), module))
            .collect::<Vec<(&str, &Module)>>(),
    );
    let arc_intros = OrderedMap(
        bundle
            .modules
            .iter()
            .map(|module| (module.id.as_str(), &module.arc_intros))
            .collect(),
    );

    let mut out = String::from(LESSON_TYPES);
    out.push_str(&format!(
        "\nexport const OMNI_KUNO_LESSON_CONTENT: Record<string, OmniKunoLessonContent> = {};\n",
        to_json(&lesson_map(&bundle.lessons))?
    ));
    out.push_str(&format!(
        "\nexport const OMNI_KUNO_MODULES: Record<string, OmniKunoModuleContent> = {};\n",
        to_json(&modules)?
    ));
    out.push_str(&format!(
        "\nexport const OMNI_KUNO_ARC_INTROS: Record<string, OmniKunoArcIntroGroup> = {};\n",
        to_json(&arc_intros)?
    ));
    Ok(out)
}

/// Render the sections ("wow") data module.
pub fn render_wow(modules: &[WowModule]) -> Result<String> {
    Ok(format!(
        "{WOW_BANNER}{WOW_IMPORT}export const WOW_MODULE_CONTENT: WowModuleContent[] = {};\n",
        to_json(modules)?
    ))
}

/// Write an artifact, creating missing parent directories.
pub fn write_artifact(path: &Path, contents: &str) -> Result<()> {
    write_artifacts(&[(path, contents)])
}

/// Write several artifacts as a unit. Each one is staged in a temporary
/// file next to its target; targets are only replaced once every staged
/// write succeeded, so a failed write leaves all of them untouched.
pub fn write_artifacts(artifacts: &[(&Path, &str)]) -> Result<()> {
    let mut staged = Vec::with_capacity(artifacts.len());
    for &(path, contents) in artifacts {
        staged.push((path, stage(path, contents)?));
    }
    for (path, file) in staged {
        file.persist(path).map_err(|e| GenerateError::Write {
            path: path.to_path_buf(),
            source: e.error,
        })?;
    }
    Ok(())
}

fn stage(path: &Path, contents: &str) -> Result<NamedTempFile> {
    let to_write_error = |source| GenerateError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(dir).map_err(to_write_error)?;
    let mut file = NamedTempFile::new_in(dir).map_err(to_write_error)?;
    file.write_all(contents.as_bytes()).map_err(to_write_error)?;
    Ok(file)
}
