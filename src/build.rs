mod data;
mod document;
mod layout;
mod markdown;
mod paths;
pub mod pipeline;
mod render;

pub use data::{DataContext, DataError, PAGE_KEY};
pub use document::{Contents, FrontMatter, FrontMatterError, SourceFile, parse_front_matter};
pub use layout::{LayoutError, block, extends_directive, layout_name, wrap_layout};
pub use markdown::{MARKDOWN_EXTENSIONS, MarkdownError, is_markdown, parser_options, render_markdown};
pub use paths::replace_extension;
pub use render::{EngineError, Environment, RenderFuture, TemplateEngine};
