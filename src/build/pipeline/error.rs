//! Pipeline error types.

use std::path::{Path, PathBuf};

use crate::build::data::DataError;
use crate::build::document::FrontMatterError;
use crate::build::layout::LayoutError;
use crate::build::render::EngineError;
use crate::util::error_chain;

/// Errors that can occur while transforming a single file.
///
/// None of these stop the pipeline: the offending file is dropped and the
/// next one is processed.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("streaming not supported")]
    StreamingUnsupported,

    #[error("data file error: {0}")]
    ConfigData(#[from] DataError),

    #[error("front matter error: {0}")]
    FrontMatter(#[from] FrontMatterError),

    #[error("layout not declared in front matter or data")]
    LayoutRequired,

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutError),

    #[error("failed to render {}: {}", .file.display(), error_chain(&**.source))]
    Template {
        file: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error("stage '{stage}' failed: {message}")]
    Stage { stage: String, message: String },
}

impl PipelineError {
    /// Create a stage-specific error.
    pub fn stage(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Stage {
            stage: stage.into(),
            message: message.into(),
        }
    }
}

/// The error event reported to the host for a dropped file.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{}: {message}", .file_name.display())]
pub struct FileError {
    pub message: String,
    pub file_name: PathBuf,
}

impl FileError {
    pub fn new(file_name: &Path, error: &PipelineError) -> Self {
        Self {
            message: error.to_string(),
            file_name: file_name.to_path_buf(),
        }
    }
}
