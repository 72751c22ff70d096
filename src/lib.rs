//! Render templates and Markdown documents through Tera layouts.
//!
//! Each file handed to a [`Pipeline`] goes through front matter extraction,
//! data merging, optional Markdown conversion and layout wrapping before it
//! is rendered:
//!
//! ```ignore
//! use layup::{Options, Pipeline, SourceFile};
//!
//! let options = Options::resolve(serde_json::json!({
//!     "base_path": "templates",
//!     "extra_data": { "site": { "title": "Example Site" } },
//! }))?;
//! let pipeline = Pipeline::new(options)?;
//!
//! let page = SourceFile::new("posts/hello.md", "---\nlayout: post\n---\n# Hello\n");
//! let rendered = pipeline.transform_blocking(page)?;
//! assert_eq!(rendered.path, std::path::Path::new("posts/hello.html"));
//! ```

pub mod build;
pub mod config;
mod util;

pub use build::pipeline::{
    EnvironmentHook, FileError, Pipeline, PipelineBuilder, PipelineError, RunReport, Stage,
};
pub use build::{Contents, DataContext, Environment, SourceFile, TemplateEngine};
pub use config::{ConfigError, Options, set_global_defaults};
