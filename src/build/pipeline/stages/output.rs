//! Output stage.

use crate::build::document::Contents;
use crate::build::paths::replace_extension;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingFile, Stage};

/// Stage that stores the rendered HTML on the file.
///
/// Unless `inherit_extension` is set, the extension is replaced with
/// `output_ext` (or stripped when that is null).
pub struct OutputStage;

impl Stage for OutputStage {
    fn name(&self) -> &'static str {
        "output"
    }

    fn process(
        &self,
        file: &mut ProcessingFile,
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        let html = file.output.take().ok_or_else(|| {
            PipelineError::stage(
                "output",
                format!(
                    "file '{}' has no rendered output (was the render step run?)",
                    file.file.path.display()
                ),
            )
        })?;

        file.file.contents = Contents::Buffer(html.into_bytes());
        if !ctx.options.inherit_extension {
            file.file.path = replace_extension(&file.file.path, ctx.options.output_ext.as_deref());
        }

        Ok(())
    }
}
