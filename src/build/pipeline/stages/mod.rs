//! Default pipeline stages.
//!
//! Before rendering, each file passes through:
//!
//! 1. **FrontMatterStage** - Split the front matter block from the body
//! 2. **DataStage** - Merge extra data, sidecar data and front matter
//! 3. **MarkdownStage** - Convert Markdown bodies to HTML
//! 4. **LayoutStage** - Wrap the body in its declared layout
//!
//! After rendering:
//!
//! 5. **OutputStage** - Store the HTML and rewrite the file extension

mod data;
mod front_matter;
mod layout;
mod markdown;
mod output;

pub use data::DataStage;
pub use front_matter::FrontMatterStage;
pub use layout::LayoutStage;
pub use markdown::MarkdownStage;
pub use output::OutputStage;
