//! Markdown rendering.

use std::path::Path;

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd, html};

use crate::config::MarkdownConfig;

/// Extensions (lowercase, without dot) that mark a file as Markdown.
pub const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown"];

#[derive(thiserror::Error, Debug)]
pub enum MarkdownError {
    #[error("invalid markdown extension: {0}")]
    InvalidExtension(String),
}

/// Returns true if the path's extension marks it as Markdown.
pub fn is_markdown(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_lowercase();
            MARKDOWN_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Translate configured extension names into parser options.
pub fn parser_options(markdown_config: &MarkdownConfig) -> Result<Options, MarkdownError> {
    let mut options = Options::empty();
    for extension in &markdown_config.extensions {
        match extension.as_str() {
            "definition_lists" => options.insert(Options::ENABLE_DEFINITION_LIST),
            "footnotes" => options.insert(Options::ENABLE_FOOTNOTES),
            "gfm" => options.insert(Options::ENABLE_GFM),
            "heading_attributes" => options.insert(Options::ENABLE_HEADING_ATTRIBUTES),
            "strikethrough" => options.insert(Options::ENABLE_STRIKETHROUGH),
            "tables" => options.insert(Options::ENABLE_TABLES),
            "tasklists" => options.insert(Options::ENABLE_TASKLISTS),
            other => return Err(MarkdownError::InvalidExtension(other.to_string())),
        }
    }
    Ok(options)
}

/// Render markdown to HTML using pulldown-cmark.
///
/// Text is escaped for `<`, `>` and `&` only; quotes pass through. With
/// `unescape_text` set, text outside code is written verbatim, so template
/// expressions like `{% if a > b %}` or `{{ a < b }}` reach the template
/// engine intact. Code spans and code blocks are always escaped.
pub fn render_markdown(markdown: &str, options: Options, unescape_text: bool) -> String {
    let parser = Parser::new_ext(markdown, options);

    let mut in_code_block = false;
    let events = parser.map(|event| match event {
        Event::Start(Tag::CodeBlock(_)) => {
            in_code_block = true;
            event
        }
        Event::End(TagEnd::CodeBlock) => {
            in_code_block = false;
            event
        }
        Event::Text(text) if unescape_text && !in_code_block => Event::InlineHtml(text),
        _ => event,
    });

    let mut html_output = String::new();
    html::push_html(&mut html_output, events);
    html_output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_options() -> Options {
        parser_options(&MarkdownConfig::default()).unwrap()
    }

    #[test]
    fn test_is_markdown() {
        assert!(is_markdown(Path::new("docs/intro.md")));
        assert!(is_markdown(Path::new("guide.markdown")));
        assert!(is_markdown(Path::new("README.MD")));
        assert!(!is_markdown(Path::new("page.njk")));
        assert!(!is_markdown(Path::new("page.mdx")));
        assert!(!is_markdown(Path::new("md")));
    }

    #[test]
    fn test_render_basic_markdown() {
        let html = render_markdown("# Hello\n\nWorld", default_options(), false);
        assert_eq!(html, "<h1>Hello</h1>\n<p>World</p>\n");
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = render_markdown("<div class=\"note\">hi</div>\n", default_options(), false);
        assert_eq!(html, "<div class=\"note\">hi</div>\n");
    }

    #[test]
    fn test_text_escaped_by_default() {
        let html = render_markdown("{{ \"a\" }} & b < c", default_options(), false);
        assert_eq!(html, "<p>{{ \"a\" }} &amp; b &lt; c</p>\n");
    }

    #[test]
    fn test_unescape_text_keeps_template_syntax() {
        let html = render_markdown("{% if a > b %}yes{% endif %}", default_options(), true);
        assert_eq!(html, "<p>{% if a > b %}yes{% endif %}</p>\n");
    }

    #[test]
    fn test_unescape_text_leaves_code_escaped() {
        let html = render_markdown("```\na < b\n```\n\n`x > y`", default_options(), true);
        assert!(html.contains("a &lt; b"));
        assert!(html.contains("<code>x &gt; y</code>"));
    }

    #[test]
    fn test_tables_extension() {
        let html = render_markdown("| a |\n|---|\n| 1 |\n", default_options(), false);
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_invalid_extension() {
        let config = MarkdownConfig {
            extensions: vec!["not_a_real_extension".to_string()],
        };
        assert!(matches!(
            parser_options(&config),
            Err(MarkdownError::InvalidExtension(name)) if name == "not_a_real_extension"
        ));
    }
}
