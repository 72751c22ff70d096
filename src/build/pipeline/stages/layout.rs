//! Layout wrapping stage.

use crate::build::layout::wrap_layout;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingFile, Stage};

/// Stage that turns the body into a child template of its layout.
///
/// A layout may come from front matter, sidecar data or `extra_data`.
/// Front matter without any declared layout is rejected.
pub struct LayoutStage;

impl Stage for LayoutStage {
    fn name(&self) -> &'static str {
        "layout"
    }

    fn process(
        &self,
        file: &mut ProcessingFile,
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        match wrap_layout(&file.data, &file.content, ctx.options)? {
            Some(wrapped) => file.content = wrapped,
            None if file.front_matter.has_attributes() => {
                return Err(PipelineError::LayoutRequired);
            }
            None => {}
        }
        Ok(())
    }
}
