use std::collections::HashSet;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use serde::Serialize;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use contentgen::assembler::LessonRole;
use contentgen::config::DEFAULT_CONFIG;
use contentgen::render::{render_lessons, render_wow, write_artifacts};
use contentgen::{Config, GenerateError, SourceFiles, generate_lessons, generate_wow};
use lessonmark::{ParseError, ParseOptions, Parsed};

#[derive(Parser)]
#[command(
    name = "lessonmark",
    version,
    about = "Lesson markup parser and content generator"
)]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate the lessons data module
    Lessons(PipelineArgs),

    /// Generate the module sections data module
    Sections(PipelineArgs),

    /// Run both pipelines; nothing is written unless both succeed
    All(PipelineArgs),

    /// Parse a single document and print its structure
    Parse(ParseArgs),

    /// List the lesson ids of a document
    Ids(IdsArgs),
}

#[derive(clap::Args)]
struct PipelineArgs {
    /// Parse and assemble only, don't write output
    #[arg(long)]
    check: bool,
}

#[derive(clap::Args)]
struct ParseArgs {
    /// Markup document to parse
    file: PathBuf,

    /// Parse as a module-section document instead of a lesson document
    #[arg(long)]
    sections: bool,

    /// Print JSON instead of a debug dump
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
struct IdsArgs {
    /// Lesson document
    file: PathBuf,
}

#[derive(Clone, Copy)]
enum Pipeline {
    Lessons,
    Sections,
}

/// A rendered output file, held in memory until every pipeline succeeded.
struct Artifact {
    path: PathBuf,
    contents: String,
    summary: String,
}

/// Renders diagnostics and fatal errors to stderr.
struct Reporter {
    writer: StandardStream,
    config: term::Config,
}

impl Reporter {
    fn new(no_color: bool) -> Self {
        let color_choice = if no_color {
            ColorChoice::Never
        } else {
            ColorChoice::Auto
        };
        Reporter {
            writer: StandardStream::stderr(color_choice),
            config: term::Config::default(),
        }
    }

    fn emit(&self, sources: &SourceFiles, diagnostics: &[ParseError]) {
        for error in diagnostics {
            let diagnostic = error.to_diagnostic();
            let _ = term::emit_to_write_style(
                &mut self.writer.lock(),
                &self.config,
                sources.files(),
                &diagnostic,
            );
        }
    }

    fn fail(&self, sources: &SourceFiles, error: GenerateError) -> ! {
        if let GenerateError::Parse { errors, .. } = &error {
            self.emit(sources, errors);
        }
        eprintln!("error: {error}");
        process::exit(1);
    }
}

fn or_exit<T>(result: contentgen::Result<T>, reporter: &Reporter, sources: &SourceFiles) -> T {
    match result {
        Ok(value) => value,
        Err(error) => reporter.fail(sources, error),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.no_color);
    let reporter = Reporter::new(cli.no_color);

    match &cli.command {
        Command::Lessons(args) => run_pipelines(&cli, &reporter, &[Pipeline::Lessons], args.check),
        Command::Sections(args) => {
            run_pipelines(&cli, &reporter, &[Pipeline::Sections], args.check)
        }
        Command::All(args) => run_pipelines(
            &cli,
            &reporter,
            &[Pipeline::Lessons, Pipeline::Sections],
            args.check,
        ),
        Command::Parse(args) => do_parse(&cli, &reporter, args),
        Command::Ids(args) => do_ids(&cli, &reporter, args),
    }
}

fn init_tracing(no_color: bool) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(!no_color)
                .with_target(false),
        )
        .init();
}

fn run_pipelines(cli: &Cli, reporter: &Reporter, pipelines: &[Pipeline], check: bool) {
    let mut sources = SourceFiles::new();
    let config = or_exit(Config::load(&cli.config), reporter, &sources);

    let mut artifacts = Vec::with_capacity(pipelines.len());
    for &pipeline in pipelines {
        let (artifact, warnings) =
            or_exit(build_artifact(&config, &mut sources, pipeline), reporter, &sources);
        reporter.emit(&sources, &warnings);
        artifacts.push(artifact);
    }

    if check {
        for artifact in &artifacts {
            eprintln!("ok: {} ({})", artifact.summary, artifact.path.display());
        }
        return;
    }

    let files: Vec<(&Path, &str)> = artifacts
        .iter()
        .map(|artifact| (artifact.path.as_path(), artifact.contents.as_str()))
        .collect();
    or_exit(write_artifacts(&files), reporter, &sources);
    for artifact in &artifacts {
        tracing::info!("wrote {} to {}", artifact.summary, artifact.path.display());
    }
}

fn build_artifact(
    config: &Config,
    sources: &mut SourceFiles,
    pipeline: Pipeline,
) -> contentgen::Result<(Artifact, Vec<ParseError>)> {
    match pipeline {
        Pipeline::Lessons => {
            let generated = generate_lessons(config, sources)?;
            let bundle = &generated.value;
            let artifact = Artifact {
                path: config.resolve(&config.lessons()?.output),
                contents: render_lessons(bundle)?,
                summary: format!(
                    "{} lessons in {} modules",
                    bundle.lessons.len(),
                    bundle.modules.len()
                ),
            };
            Ok((artifact, generated.warnings))
        }
        Pipeline::Sections => {
            let generated = generate_wow(config, sources)?;
            let artifact = Artifact {
                path: config.resolve(&config.wow()?.output),
                contents: render_wow(&generated.value)?,
                summary: format!("{} section modules", generated.value.len()),
            };
            Ok((artifact, generated.warnings))
        }
    }
}

/// Parser options from the config file, when there is one.
fn parser_options(path: &Path, reporter: &Reporter, sources: &SourceFiles) -> ParseOptions {
    if !path.exists() {
        return ParseOptions::default();
    }
    or_exit(Config::load(path), reporter, sources).parser
}

fn read_document(path: &Path, sources: &mut SourceFiles) -> (usize, String) {
    match std::fs::read_to_string(path) {
        Ok(source) => {
            let file_id = sources.add(path.display().to_string(), source.clone());
            (file_id, source)
        }
        Err(e) => {
            eprintln!("error: cannot read '{}': {}", path.display(), e);
            process::exit(1);
        }
    }
}

/// Print warnings and return the value, or print the errors and exit.
fn parsed_or_exit<T>(
    result: Result<Parsed<T>, Vec<ParseError>>,
    reporter: &Reporter,
    sources: &SourceFiles,
) -> T {
    match result {
        Ok(parsed) => {
            reporter.emit(sources, &parsed.warnings);
            parsed.value
        }
        Err(errors) => {
            reporter.emit(sources, &errors);
            process::exit(1);
        }
    }
}

fn print_value<T: Debug + Serialize>(value: &T, json: bool) {
    if !json {
        println!("{:#?}", value);
        return;
    }
    match serde_json::to_string_pretty(value) {
        Ok(text) => println!("{text}"),
        Err(e) => {
            eprintln!("error: cannot serialize output: {e}");
            process::exit(1);
        }
    }
}

fn do_parse(cli: &Cli, reporter: &Reporter, args: &ParseArgs) {
    let mut sources = SourceFiles::new();
    let options = parser_options(&cli.config, reporter, &sources);
    let (file_id, source) = read_document(&args.file, &mut sources);
    let parser = lessonmark::Parser::with_options(source, file_id, options);

    if args.sections {
        let document = parsed_or_exit(parser.parse_sections(), reporter, &sources);
        print_value(&document, args.json);
    } else {
        let lessons = parsed_or_exit(parser.parse_lessons(), reporter, &sources);
        print_value(&lessons, args.json);
    }
}

fn do_ids(cli: &Cli, reporter: &Reporter, args: &IdsArgs) {
    let mut sources = SourceFiles::new();
    let options = parser_options(&cli.config, reporter, &sources);
    let (file_id, source) = read_document(&args.file, &mut sources);
    let parser = lessonmark::Parser::with_options(source, file_id, options);
    let lessons = parsed_or_exit(parser.parse_lessons(), reporter, &sources);

    let mut seen = HashSet::new();
    for lesson in &lessons {
        let id = lesson.lesson_id.as_str();
        let mut line = match LessonRole::of(id) {
            LessonRole::Lesson => id.to_string(),
            LessonRole::ArcIntro => format!("{id}  (arc intro)"),
            LessonRole::FinalTest => format!("{id}  (final test)"),
        };
        if !seen.insert(id) {
            line.push_str("  (duplicate)");
        }
        println!("{line}");
    }
}
