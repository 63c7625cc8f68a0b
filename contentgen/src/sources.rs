use std::io;
use std::path::Path;

use codespan_reporting::files::SimpleFiles;

use crate::error::{GenerateError, Result};

/// Every source document read during a run, kept for diagnostic rendering.
pub struct SourceFiles {
    files: SimpleFiles<String, String>,
}

impl SourceFiles {
    pub fn new() -> Self {
        SourceFiles {
            files: SimpleFiles::new(),
        }
    }

    /// Read a configured source document. A file that does not exist is a
    /// configuration error for `module`.
    pub fn load(&mut self, module: &str, path: &Path) -> Result<(usize, String)> {
        let source = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                GenerateError::MissingSource {
                    module: module.to_string(),
                    path: path.to_path_buf(),
                }
            } else {
                GenerateError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let file_id = self.add(path.display().to_string(), source.clone());
        Ok((file_id, source))
    }

    pub fn add(&mut self, name: String, source: String) -> usize {
        self.files.add(name, source)
    }

    pub fn files(&self) -> &SimpleFiles<String, String> {
        &self.files
    }
}

impl Default for SourceFiles {
    fn default() -> Self {
        SourceFiles::new()
    }
}
