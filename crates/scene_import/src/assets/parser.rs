//! Parser collaborator interface
//!
//! A parser reads a scene file and returns the vendor-neutral
//! [`ForeignScene`](super::ForeignScene) with the requested post-processing
//! applied. Parsing is one-shot: failure carries the backend's diagnostic and no
//! partial scene.

use std::path::{Path, PathBuf};

use thiserror::Error;

use super::foreign::ForeignScene;
use super::post_process::PostProcess;

/// Scene file could not be read or understood
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to parse {}: {message}", path.display())]
pub struct ParseError {
    /// File that failed to parse
    pub path: PathBuf,
    /// Diagnostic reported by the parser backend
    pub message: String,
}

impl ParseError {
    /// Create a parse error
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Scene file parser backend
pub trait SceneParser {
    /// Parse `path` and post-process the result according to `flags`
    fn parse(&self, path: &Path, flags: PostProcess) -> Result<ForeignScene, ParseError>;
}
