//! Build pipeline for file processing.
//!
//! The pipeline transforms each file through a series of stages:
//! 1. Front matter extraction
//! 2. Data context merging
//! 3. Markdown rendering (Markdown files only)
//! 4. Layout wrapping (when a layout is declared)
//! 5. Template rendering (through the template engine)
//! 6. Output (contents and extension rewriting)
//!
//! Custom stages can be inserted before or after any named stage that runs
//! ahead of rendering.

mod context;
mod document;
mod error;
mod stages;

pub use context::PipelineContext;
pub use document::ProcessingFile;
pub use error::{FileError, PipelineError};

use futures_util::stream::{self, StreamExt};

use crate::build::document::SourceFile;
use crate::build::markdown::parser_options;
use crate::build::render::{Environment, TemplateEngine};
use crate::config::{ConfigError, Options};

use stages::{DataStage, FrontMatterStage, LayoutStage, MarkdownStage, OutputStage};

/// A stage in the file processing pipeline.
///
/// Stages transform one file at a time. Each stage receives the file's
/// processing state and can modify it in place before passing it on.
pub trait Stage: Send + Sync {
    /// Unique name for this stage (used for insertion points).
    fn name(&self) -> &'static str;

    /// Process a file through this stage.
    fn process(
        &self,
        file: &mut ProcessingFile,
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError>;
}

/// Callback run once against a freshly built environment, before any file
/// is processed. Use it to register filters, functions and globals.
pub type EnvironmentHook = Box<dyn FnOnce(&mut Environment) + Send>;

/// Outcome of running a batch of files.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Transformed (or passed-through) files, in input order
    pub files: Vec<SourceFile>,
    /// One event per dropped file
    pub errors: Vec<FileError>,
}

/// The file processing pipeline.
///
/// Orchestrates the per-file transform. Options and the template engine are
/// fixed at construction; every file gets its own processing state.
///
/// # Extension Points
///
/// Insert custom stages using `insert_before` or `insert_after`:
///
/// ```ignore
/// pipeline.insert_after("front_matter", MyCustomStage);
/// ```
pub struct Pipeline<E = Environment> {
    options: Options,
    markdown_options: pulldown_cmark::Options,
    engine: E,
    /// Stages run before rendering
    stages: Vec<Box<dyn Stage>>,
    /// Stages run after rendering
    finalize_stages: Vec<Box<dyn Stage>>,
}

/// Builder for a pipeline using the built-in Tera environment.
pub struct PipelineBuilder {
    options: Options,
    hook: Option<EnvironmentHook>,
}

impl PipelineBuilder {
    /// Register the environment hook.
    pub fn environment_hook<F>(mut self, hook: F) -> Self
    where
        F: FnOnce(&mut Environment) + Send + 'static,
    {
        self.hook = Some(Box::new(hook));
        self
    }

    /// Load templates, run the hook and assemble the pipeline.
    pub fn build(self) -> Result<Pipeline, ConfigError> {
        let markdown_options = parser_options(&self.options.markdown)?;

        let mut environment =
            Environment::new(&self.options.base_path, &self.options.engine_options)?;
        if let Some(hook) = self.hook {
            hook(&mut environment);
        }

        Ok(Pipeline::assemble(self.options, markdown_options, environment))
    }
}

impl Pipeline {
    /// Create a pipeline with the built-in Tera environment and no hook.
    pub fn new(options: Options) -> Result<Self, ConfigError> {
        Self::builder(options).build()
    }

    pub fn builder(options: Options) -> PipelineBuilder {
        PipelineBuilder {
            options,
            hook: None,
        }
    }
}

impl<E: TemplateEngine> Pipeline<E> {
    /// Create a pipeline rendering through a custom engine.
    pub fn with_engine(options: Options, engine: E) -> Result<Self, ConfigError> {
        let markdown_options = parser_options(&options.markdown)?;
        Ok(Self::assemble(options, markdown_options, engine))
    }

    fn assemble(options: Options, markdown_options: pulldown_cmark::Options, engine: E) -> Self {
        let mut pipeline = Self {
            options,
            markdown_options,
            engine,
            stages: Vec::new(),
            finalize_stages: Vec::new(),
        };
        pipeline.add_stage(FrontMatterStage);
        pipeline.add_stage(DataStage);
        pipeline.add_stage(MarkdownStage);
        pipeline.add_stage(LayoutStage);
        pipeline.finalize_stages.push(Box::new(OutputStage));
        pipeline
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Add a stage to the end of the pre-render stages.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Insert a stage before the named stage.
    ///
    /// # Panics
    ///
    /// Panics if no pre-render stage with the given name exists.
    pub fn insert_before<S: Stage + 'static>(&mut self, name: &str, stage: S) -> &mut Self {
        let pos = self.position(name);
        self.stages.insert(pos, Box::new(stage));
        self
    }

    /// Insert a stage after the named stage.
    ///
    /// # Panics
    ///
    /// Panics if no pre-render stage with the given name exists.
    pub fn insert_after<S: Stage + 'static>(&mut self, name: &str, stage: S) -> &mut Self {
        let pos = self.position(name);
        self.stages.insert(pos + 1, Box::new(stage));
        self
    }

    fn position(&self, name: &str) -> usize {
        self.stages
            .iter()
            .position(|s| s.name() == name)
            .unwrap_or_else(|| panic!("stage '{}' not found in pipeline", name))
    }

    /// Get the names of all stages in order, with `render` marking the
    /// template engine step.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages
            .iter()
            .map(|s| s.name())
            .chain(std::iter::once("render"))
            .chain(self.finalize_stages.iter().map(|s| s.name()))
            .collect()
    }

    /// Transform one file.
    ///
    /// Files without contents pass through untouched; stream contents are
    /// rejected. On error the file is consumed and only the error remains.
    #[tracing::instrument(skip_all, fields(path = %file.path.display()))]
    pub async fn transform(&self, file: SourceFile) -> Result<SourceFile, PipelineError> {
        if file.is_null() {
            tracing::debug!("passing through file without contents");
            return Ok(file);
        }
        if file.is_stream() {
            return Err(PipelineError::StreamingUnsupported);
        }

        let ctx = PipelineContext::new(&self.options, self.markdown_options);
        let mut processing = ProcessingFile::new(file);

        for stage in &self.stages {
            tracing::debug!(stage = stage.name(), "running stage");
            stage.process(&mut processing, &ctx)?;
        }

        // The engine sees the file path as the template name, so its
        // diagnostics point at the right file.
        let name = processing.file.path.display().to_string();
        let html = self
            .engine
            .render(&name, &processing.content, &processing.data)
            .await
            .map_err(|source| PipelineError::Template {
                file: processing.file.path.clone(),
                source,
            })?;
        processing.output = Some(html);

        for stage in &self.finalize_stages {
            tracing::debug!(stage = stage.name(), "running stage");
            stage.process(&mut processing, &ctx)?;
        }

        Ok(processing.into_file())
    }

    /// Transform one file, blocking the current thread until rendering
    /// completes.
    pub fn transform_blocking(&self, file: SourceFile) -> Result<SourceFile, PipelineError> {
        pollster::block_on(self.transform(file))
    }

    /// Transform a batch of files with up to `concurrency` in flight.
    ///
    /// Failed files are dropped and reported in [`RunReport::errors`];
    /// processing always continues with the next file. Output keeps the
    /// input order.
    pub async fn run<I>(&self, files: I, concurrency: usize) -> RunReport
    where
        I: IntoIterator<Item = SourceFile>,
    {
        let results: Vec<_> = stream::iter(files)
            .map(|file| async move {
                let path = file.path.clone();
                (path, self.transform(file).await)
            })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        let mut report = RunReport::default();
        for (path, result) in results {
            match result {
                Ok(file) => report.files.push(file),
                Err(err) => {
                    let event = FileError::new(&path, &err);
                    tracing::error!(file = %path.display(), error = %event.message, "dropping file");
                    report.errors.push(event);
                }
            }
        }
        report
    }
}
