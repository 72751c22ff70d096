//! Markdown rendering stage.

use crate::build::markdown::{is_markdown, render_markdown};
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingFile, Stage};

/// Stage that converts Markdown bodies to HTML.
///
/// Only files with a Markdown extension are converted, and only the body
/// left after front matter extraction is fed to the converter.
pub struct MarkdownStage;

impl Stage for MarkdownStage {
    fn name(&self) -> &'static str {
        "markdown"
    }

    fn process(
        &self,
        file: &mut ProcessingFile,
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        if is_markdown(&file.file.path) {
            file.content = render_markdown(
                &file.content,
                ctx.markdown_options,
                ctx.options.escape_markdown,
            );
        }
        Ok(())
    }
}
