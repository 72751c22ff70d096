//! Configuration loading and types for layup.
//!
//! This module handles all aspects of configuration:
//! - Type definitions for the pipeline options (`types`)
//! - Process-wide defaults and option merging (`resolve`)
//! - Loading partial options from files (`load`)

mod load;
mod resolve;
mod types;

use std::path::PathBuf;

pub use resolve::{global_defaults, set_global_defaults};
pub use types::{ExtraData, MarkdownConfig, Options, SearchPaths};

use crate::build::MarkdownError;

// =============================================================================
// Errors
// =============================================================================

/// Errors raised while building a pipeline, before any file is processed.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid options: {0}")]
    Invalid(#[from] serde_json::Error),

    #[error("options must be a mapping, not a scalar or array")]
    NotAMapping,

    #[error("failed to read options file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse options file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("markdown configuration error: {0}")]
    Markdown(#[from] MarkdownError),

    #[error("failed to load templates: {0}")]
    Engine(#[from] tera::Error),
}
