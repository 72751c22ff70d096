//! Pipeline context for sharing state across stages.

use crate::config::Options;

/// Shared, read-only context for pipeline stages.
///
/// Built once per file from the pipeline's immutable options, so stages
/// never see another file's state.
pub struct PipelineContext<'a> {
    /// The pipeline's effective options
    pub options: &'a Options,

    /// Markdown parser options, validated when the pipeline was built
    pub markdown_options: pulldown_cmark::Options,
}

impl<'a> PipelineContext<'a> {
    /// Create a new pipeline context.
    pub fn new(options: &'a Options, markdown_options: pulldown_cmark::Options) -> Self {
        Self {
            options,
            markdown_options,
        }
    }
}
