use std::path::{Path, PathBuf};

use lessonmark::ParseOptions;
use serde::{Deserialize, Serialize};

use crate::error::{GenerateError, Result};

pub const DEFAULT_CONFIG: &str = "lessonmark.toml";

/// Generator configuration, usually loaded from `lessonmark.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub parser: ParseOptions,
    #[serde(default)]
    pub lessons: Option<LessonsConfig>,
    #[serde(default)]
    pub wow: Option<WowConfig>,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonsConfig {
    pub output: PathBuf,
    #[serde(default)]
    pub modules: Vec<LessonModuleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LessonModuleConfig {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub source: PathBuf,
    /// Extra lesson ids to leave out of the output.
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Require and extract the four arc introductions.
    #[serde(default = "default_true")]
    pub arcs: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WowConfig {
    pub output: PathBuf,
    pub source_dir: PathBuf,
    #[serde(default)]
    pub modules: Vec<WowModuleConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WowModuleConfig {
    pub key: String,
    pub cluster: String,
    pub titles: Titles,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Titles {
    pub ro: String,
    pub en: String,
}

fn default_true() -> bool {
    true
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = std::fs::read_to_string(path).map_err(|source| GenerateError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Config::from_toml(&text, base_dir).map_err(|source| GenerateError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(text: &str, base_dir: PathBuf) -> std::result::Result<Config, toml::de::Error> {
        let mut config: Config = toml::from_str(text)?;
        config.base_dir = base_dir;
        Ok(config)
    }

    /// Resolve a configured path against the config file's directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.base_dir.join(path)
    }

    pub fn lessons(&self) -> Result<&LessonsConfig> {
        self.lessons
            .as_ref()
            .ok_or(GenerateError::MissingPipeline("lessons"))
    }

    pub fn wow(&self) -> Result<&WowConfig> {
        self.wow.as_ref().ok_or(GenerateError::MissingPipeline("wow"))
    }
}

impl WowConfig {
    /// `<source_dir>/<key>.md`
    pub fn module_source(&self, key: &str) -> PathBuf {
        self.source_dir.join(format!("{key}.md"))
    }
}
