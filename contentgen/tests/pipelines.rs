use std::fs;
use std::path::Path;

use contentgen::render::{render_lessons, render_wow, write_artifact, write_artifacts};
use contentgen::{Config, GenerateError, SourceFiles, generate_lessons, generate_wow};

const CALM: &str = "\
# calm_arc_trezire
[SCREEN arcintro]
title: Trezire
body: Începutul.

# calm_breathing
[SCREEN content]
title: Respirație
body: Inspiră.
[SCREEN quiz]
title: Verificare
question: Cât inspiri?
options:
- 2 secunde
- 4 secunde
correctIndex: 1

# calm_arc_primele_ciocniri
[SCREEN arcintro]
title: Ciocniri
body: Primele.

# calm_arc_profunzime
[SCREEN arcintro]
title: Profunzime
body: Adânc.

# calm_arc_maestrie
[SCREEN arcintro]
title: Maestrie
body: Final.

# calm_final_test
[SCREEN reflection]
title: Test
prompt: ?
";

const CLARITY: &str = "\
MODUL DEEP (ROM)
HOOK
Cârlig.
ACTIVE CHECK
Ce alegi?
A) Unu
B) Doi
CORECT: B
LIMBA ENG
HOOK
Hook.
";

fn write(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn config(dir: &Path, toml: &str) -> Config {
    write(dir, "lessonmark.toml", toml);
    Config::load(&dir.join("lessonmark.toml")).expect("config loads")
}

const LESSONS_TOML: &str = r#"
[lessons]
output = "out/lessons.ts"

[[lessons.modules]]
id = "calm"
title = "Calm"
source = "docs/calm.md"
"#;

#[test]
fn lessons_pipeline_assembles_modules() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "docs/calm.md", CALM);
    let config = config(dir.path(), LESSONS_TOML);

    let mut sources = SourceFiles::new();
    let generated = generate_lessons(&config, &mut sources).unwrap();
    assert!(generated.warnings.is_empty());

    let bundle = generated.value;
    let ids: Vec<&str> = bundle.lessons.iter().map(|l| l.lesson_id.as_str()).collect();
    assert_eq!(ids, ["calm_breathing"]);
    assert_eq!(bundle.modules.len(), 1);
    assert_eq!(bundle.modules[0].arc_intros.maestrie.body, "Final.");

    let rendered = render_lessons(&bundle).unwrap();
    assert!(rendered.contains("export const OMNI_KUNO_LESSON_CONTENT"));
    assert!(rendered.contains("\"calm_breathing-screen-2\""));
    assert!(rendered.contains("\"correctIndex\": 1"));
    assert!(rendered.contains("\"Respirație\""), "non-ASCII text is not escaped");
    assert!(rendered.contains("export const OMNI_KUNO_ARC_INTROS"));
    assert!(!rendered.contains("calm_final_test"));
}

#[test]
fn exclusions_and_modules_without_arcs() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "docs/plain.md",
        "# plain_one\n[SCREEN reflection]\ntitle: t\nprompt: p\n# calm_final_test\n# plain_final_test\n",
    );
    let config = config(
        dir.path(),
        r#"
[lessons]
output = "out/lessons.ts"

[[lessons.modules]]
id = "plain"
source = "docs/plain.md"
arcs = false
exclude = ["calm_final_test"]
"#,
    );

    let bundle = generate_lessons(&config, &mut SourceFiles::new())
        .unwrap()
        .value;
    let ids: Vec<&str> = bundle.lessons.iter().map(|l| l.lesson_id.as_str()).collect();
    assert_eq!(ids, ["plain_one"]);
    assert!(bundle.modules.is_empty());
}

#[test]
fn missing_source_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), LESSONS_TOML);
    let error = generate_lessons(&config, &mut SourceFiles::new()).unwrap_err();
    match error {
        GenerateError::MissingSource { module, path } => {
            assert_eq!(module, "calm");
            assert!(path.ends_with("docs/calm.md"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_arc_zone_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "docs/calm.md",
        &CALM.replace("# calm_arc_profunzime", "# calm_arc_other"),
    );
    let config = config(dir.path(), LESSONS_TOML);
    let error = generate_lessons(&config, &mut SourceFiles::new()).unwrap_err();
    assert!(matches!(error, GenerateError::MissingArcZones { .. }));
    assert!(error.to_string().contains("profunzime"));
}

#[test]
fn parse_errors_carry_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "docs/calm.md",
        &CALM.replace("correctIndex: 1", "correctIndex: one"),
    );
    let config = config(dir.path(), LESSONS_TOML);
    let mut sources = SourceFiles::new();
    match generate_lessons(&config, &mut sources).unwrap_err() {
        GenerateError::Parse { errors, .. } => {
            assert_eq!(errors.len(), 1);
            assert!(errors[0].message.contains("correctIndex"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn parser_options_come_from_config() {
    let dir = tempfile::tempdir().unwrap();
    write(
        dir.path(),
        "docs/calm.md",
        &CALM.replace("correctIndex: 1", "correctIndex: one"),
    );
    let toml = format!("[parser]\nlenient_correct_index = true\n{LESSONS_TOML}");
    let config = config(dir.path(), &toml);
    let generated = generate_lessons(&config, &mut SourceFiles::new()).unwrap();
    assert_eq!(generated.warnings.len(), 1);
}

#[test]
fn wow_pipeline_in_config_order() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "teme/clarity_01.md", CLARITY);
    write(dir.path(), "teme/focus_01.md", "SHORT ENG\nCLOSE\nBye.\n");
    let config = config(
        dir.path(),
        r#"
[wow]
output = "out/wow/data.ts"
source_dir = "teme"

[[wow.modules]]
key = "focus_01"
cluster = "focus_cluster"
titles = { ro = "Focus", en = "Focus" }

[[wow.modules]]
key = "clarity_01"
cluster = "clarity_cluster"
titles = { ro = "Iluzia clarității", en = "Illusion of Clarity" }
"#,
    );

    let modules = generate_wow(&config, &mut SourceFiles::new()).unwrap().value;
    let keys: Vec<&str> = modules.iter().map(|m| m.module_key.as_str()).collect();
    assert_eq!(keys, ["focus_01", "clarity_01"]);

    let clarity = &modules[1].sections;
    assert_eq!(clarity.deep.ro.hook.as_deref(), Some("Cârlig."));
    assert_eq!(clarity.deep.en.hook.as_deref(), Some("Hook."));
    assert_eq!(
        clarity.deep.ro.active_check.as_ref().unwrap().correct_option_id,
        "B"
    );

    let rendered = render_wow(&modules).unwrap();
    assert!(rendered.starts_with("// AUTO-GENERATED FILE."));
    assert!(rendered.contains("export const WOW_MODULE_CONTENT: WowModuleContent[] = ["));
    assert!(rendered.contains("\"moduleKey\": \"clarity_01\""));
    assert!(rendered.contains("\"correctOptionId\": \"B\""));
}

#[test]
fn missing_pipeline_section() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(dir.path(), LESSONS_TOML);
    let error = generate_wow(&config, &mut SourceFiles::new()).unwrap_err();
    assert!(matches!(error, GenerateError::MissingPipeline("wow")));
}

#[test]
fn invalid_config_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "lessonmark.toml", "[lessons\n");
    let error = Config::load(&dir.path().join("lessonmark.toml")).unwrap_err();
    assert!(matches!(error, GenerateError::Config { .. }));
}

#[test]
fn artifact_parent_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a/b/out.ts");
    write_artifact(&path, "export {};\n").unwrap();
    assert_eq!(fs::read_to_string(path).unwrap(), "export {};\n");
}

#[test]
fn artifacts_are_written_together() {
    let dir = tempfile::tempdir().unwrap();
    let lessons = dir.path().join("out/lessons.ts");
    let wow = dir.path().join("out/wow/data.ts");
    write_artifacts(&[(lessons.as_path(), "a"), (wow.as_path(), "b")]).unwrap();
    assert_eq!(fs::read_to_string(&lessons).unwrap(), "a");
    assert_eq!(fs::read_to_string(&wow).unwrap(), "b");
}

#[test]
fn failed_write_leaves_every_target_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let lessons = dir.path().join("lessons.ts");
    fs::write(&lessons, "old").unwrap();
    // A regular file where a directory is needed makes the second write fail.
    fs::write(dir.path().join("blocked"), "").unwrap();
    let wow = dir.path().join("blocked/data.ts");

    let error = write_artifacts(&[(lessons.as_path(), "new"), (wow.as_path(), "b")]).unwrap_err();
    assert!(matches!(error, GenerateError::Write { .. }));
    assert_eq!(fs::read_to_string(&lessons).unwrap(), "old");
    let leftovers: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(leftovers.len(), 2, "staged files are cleaned up");
}
