pub mod arc;
pub mod assembler;
pub mod config;
pub mod error;
pub mod lessons;
pub mod render;
pub mod sources;
pub mod wow;

pub use config::Config;
pub use error::{GenerateError, Result};
pub use lessons::{LessonBundle, generate_lessons};
pub use sources::SourceFiles;
pub use wow::{WowModule, generate_wow};

use lessonmark::ParseError;

/// Pipeline output plus the parser warnings collected along the way.
#[derive(Debug)]
pub struct Generated<T> {
    pub value: T,
    pub warnings: Vec<ParseError>,
}
