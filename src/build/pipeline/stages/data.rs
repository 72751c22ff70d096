//! Data context stage.

use crate::build::data::DataContext;
use crate::build::pipeline::{PipelineContext, PipelineError, ProcessingFile, Stage};

/// Stage that builds the file's template data.
///
/// A fresh context is built for every file; `extra_data` files are read
/// again each time.
pub struct DataStage;

impl Stage for DataStage {
    fn name(&self) -> &'static str {
        "data"
    }

    fn process(
        &self,
        file: &mut ProcessingFile,
        ctx: &PipelineContext,
    ) -> Result<(), PipelineError> {
        file.data = DataContext::build(ctx.options, &file.file, &file.front_matter)?;
        Ok(())
    }
}
