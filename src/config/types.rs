//! Configuration type definitions.
//!
//! These types are pure data. Merging and loading live in `resolve` and
//! `load`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// Pipeline options
// =============================================================================

/// The effective options of one pipeline.
///
/// Every field has a default, so a partial YAML document such as:
///
/// ```yaml
/// base_path: [templates, shared/templates]
/// output_ext: .htm
/// extra_data:
///   site:
///     title: Example Site
/// use_block: false
/// ```
///
/// deserializes into a complete `Options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Template search roots, consulted in order
    pub base_path: SearchPaths,
    /// Extension given to rendered files; `null` strips the extension
    pub output_ext: Option<String>,
    /// Base data context: an inline mapping or the path of a JSON file
    pub extra_data: ExtraData,
    /// Whether layout content is wrapped in the named block by default
    pub use_block: bool,
    /// Name of the layout block that receives page content
    pub block_name: String,
    /// Suffix appended to `page.layout` in the `extends` tag
    pub layout_extension: String,
    /// Unescape Markdown text nodes so template syntax survives conversion
    pub escape_markdown: bool,
    /// Keep the input file's extension instead of `output_ext`
    pub inherit_extension: bool,
    /// Options forwarded verbatim to the template environment
    pub engine_options: Map<String, Value>,
    /// Markdown processing configuration
    pub markdown: MarkdownConfig,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_path: SearchPaths::default(),
            output_ext: Some(".html".to_string()),
            extra_data: ExtraData::default(),
            use_block: true,
            block_name: "content".to_string(),
            layout_extension: ".html".to_string(),
            escape_markdown: false,
            inherit_extension: false,
            engine_options: default_engine_options(),
            markdown: MarkdownConfig::default(),
        }
    }
}

fn default_engine_options() -> Map<String, Value> {
    let mut options = Map::new();
    options.insert("autoescape".to_string(), Value::Bool(true));
    options
}

// =============================================================================
// Template search paths
// =============================================================================

/// One template root or an ordered list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchPaths {
    One(PathBuf),
    Many(Vec<PathBuf>),
}

impl SearchPaths {
    /// The roots in lookup order.
    pub fn roots(&self) -> Vec<&Path> {
        match self {
            SearchPaths::One(path) => vec![path.as_path()],
            SearchPaths::Many(paths) => paths.iter().map(PathBuf::as_path).collect(),
        }
    }
}

impl Default for SearchPaths {
    fn default() -> Self {
        SearchPaths::One(PathBuf::from("."))
    }
}

// =============================================================================
// Extra data
// =============================================================================

/// Where the base data context comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraData {
    /// Data given inline in the options
    Inline(Map<String, Value>),
    /// Path to a JSON document, read again for every file
    File(PathBuf),
}

impl Default for ExtraData {
    fn default() -> Self {
        ExtraData::Inline(Map::new())
    }
}

// =============================================================================
// Markdown configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkdownConfig {
    /// Extensions to enable for markdown processing
    #[serde(default = "default_markdown_extensions")]
    pub extensions: Vec<String>,
}

/// `heading_attributes` is supported but off by default: it would treat a
/// heading ending in `{{ title }}` as an attribute block.
fn default_markdown_extensions() -> Vec<String> {
    vec![
        "definition_lists".to_string(),
        "footnotes".to_string(),
        "gfm".to_string(),
        "strikethrough".to_string(),
        "tables".to_string(),
        "tasklists".to_string(),
    ]
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            extensions: default_markdown_extensions(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_options_fill_defaults() {
        let options: Options = serde_json::from_value(json!({ "block_name": "main" })).unwrap();
        assert_eq!(options.block_name, "main");
        assert_eq!(options.output_ext.as_deref(), Some(".html"));
        assert!(options.use_block);
        assert_eq!(options.base_path, SearchPaths::One(PathBuf::from(".")));
    }

    #[test]
    fn test_null_output_ext() {
        let options: Options = serde_json::from_value(json!({ "output_ext": null })).unwrap();
        assert_eq!(options.output_ext, None);
    }

    #[test]
    fn test_search_paths_formats() {
        let one: SearchPaths = serde_json::from_value(json!("templates")).unwrap();
        assert_eq!(one.roots(), vec![Path::new("templates")]);

        let many: SearchPaths = serde_json::from_value(json!(["a", "b"])).unwrap();
        assert_eq!(many.roots(), vec![Path::new("a"), Path::new("b")]);
    }

    #[test]
    fn test_extra_data_formats() {
        let inline: ExtraData = serde_json::from_value(json!({ "title": "x" })).unwrap();
        assert!(matches!(inline, ExtraData::Inline(map) if map["title"] == "x"));

        let file: ExtraData = serde_json::from_value(json!("data/site.json")).unwrap();
        assert_eq!(file, ExtraData::File(PathBuf::from("data/site.json")));
    }
}
