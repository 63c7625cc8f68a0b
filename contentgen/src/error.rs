use std::io;
use std::path::PathBuf;

use lessonmark::ParseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("cannot read config '{}': {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config '{}': {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A configured source document does not exist.
    #[error("missing source file for {module}: {}", .path.display())]
    MissingSource { module: String, path: PathBuf },

    #[error("cannot read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Parse errors; the diagnostics point into the loaded source files.
    #[error("{} error(s) while parsing '{}'", .errors.len(), .path.display())]
    Parse {
        path: PathBuf,
        errors: Vec<ParseError>,
    },

    #[error("module {module} is missing arc intro(s) for: {}", .zones.join(", "))]
    MissingArcZones {
        module: String,
        zones: Vec<&'static str>,
    },

    #[error("config has no [{0}] section")]
    MissingPipeline(&'static str),

    #[error("cannot serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GenerateError>;
