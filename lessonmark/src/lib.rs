pub mod lesson;
pub mod parser;
pub mod section;

pub use lesson::{Lesson, Screen, ScreenBody, ScreenKind};
pub use parser::{ParseError, ParseOptions, Parsed, Parser};
pub use section::{SectionDocument, Sections};
