//! Per-file state for pipeline processing.

use crate::build::data::DataContext;
use crate::build::document::{FrontMatter, SourceFile};

/// A file being processed through the pipeline.
///
/// Wraps the incoming `SourceFile` with state that evolves through the
/// stages:
///
/// 1. Initially: `content` = raw text, `front_matter` and `data` empty
/// 2. After front_matter: `content` = body without the front matter block
/// 3. After data: `data` = merged template context
/// 4. After markdown: `content` = HTML (Markdown files only)
/// 5. After layout: `content` = child template of the declared layout
/// 6. After rendering: `output` = final HTML
/// 7. After output: `file` carries the HTML and its final path
#[derive(Debug)]
pub struct ProcessingFile {
    /// The file as handed in by the host
    pub file: SourceFile,

    /// Front matter extracted from the raw content
    pub front_matter: FrontMatter,

    /// Data the file is rendered with
    pub data: DataContext,

    /// Template source being assembled
    pub content: String,

    /// Rendered output.
    ///
    /// None until the render step populates it.
    pub output: Option<String>,
}

impl ProcessingFile {
    /// Start processing a file with buffered contents.
    pub fn new(file: SourceFile) -> Self {
        let content = file.text().unwrap_or_default();
        Self {
            file,
            front_matter: FrontMatter::default(),
            data: DataContext::new(),
            content,
            output: None,
        }
    }

    /// Finish processing, yielding the transformed file.
    pub fn into_file(self) -> SourceFile {
        self.file
    }
}
