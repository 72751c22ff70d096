//! Front matter extraction stage.

use crate::build::document::parse_front_matter;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingFile, Stage};

/// Stage that splits the front matter block from the body.
///
/// Runs for every file regardless of type. Files without front matter keep
/// their content unchanged and get empty attributes.
pub struct FrontMatterStage;

impl Stage for FrontMatterStage {
    fn name(&self) -> &'static str {
        "front_matter"
    }

    fn process(
        &self,
        file: &mut ProcessingFile,
        _ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        let front_matter = parse_front_matter(&file.content)?;
        file.content = front_matter.body.clone();
        file.front_matter = front_matter;
        Ok(())
    }
}
