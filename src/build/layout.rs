//! Layout wrapping.
//!
//! A page that declares `page.layout` is turned into a child template of
//! that layout before rendering:
//!
//! ```text
//! {% extends "post.html" %}{% block content %}<p>Body</p>{% endblock content %}
//! ```
//!
//! With block wrapping off the body is appended as-is after the `extends`
//! tag, and is expected to define its own block overrides (usually calling
//! `{{ super() }}`).

use serde_json::Value;

use super::data::DataContext;
use crate::config::Options;

/// A declared layout that cannot be written into an `extends` tag.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("layout must be a string, got {0}")]
    NotAString(Value),

    #[error("layout name {0:?} must not contain quotes")]
    Quoted(String),
}

/// Validate the layout name declared by `data`, if any.
pub fn layout_name(data: &DataContext) -> Result<Option<&str>, LayoutError> {
    match data.layout() {
        None => Ok(None),
        Some(Value::String(name)) if name.contains('"') => Err(LayoutError::Quoted(name.clone())),
        Some(Value::String(name)) => Ok(Some(name)),
        Some(other) => Err(LayoutError::NotAString(other.clone())),
    }
}

/// The `extends` tag for a layout name.
pub fn extends_directive(layout: &str, layout_extension: &str) -> String {
    format!("{{% extends \"{layout}{layout_extension}\" %}}")
}

/// Wrap `body` in the named block.
pub fn block(name: &str, body: &str) -> String {
    format!("{{% block {name} %}}{body}{{% endblock {name} %}}")
}

/// Wrap `body` in the layout declared by `data`.
///
/// Returns `None` when no layout is declared.
pub fn wrap_layout(
    data: &DataContext,
    body: &str,
    options: &Options,
) -> Result<Option<String>, LayoutError> {
    let Some(layout) = layout_name(data)? else {
        return Ok(None);
    };
    let use_block = data.use_block().unwrap_or(options.use_block);

    let mut wrapped = extends_directive(layout, &options.layout_extension);
    if use_block {
        wrapped.push_str(&block(&options.block_name, body));
    } else {
        wrapped.push_str(body);
    }
    Ok(Some(wrapped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn context(value: Value) -> DataContext {
        match value {
            Value::Object(map) => DataContext::from(map),
            other => panic!("expected an object, got {other}"),
        }
    }

    #[test]
    fn test_no_layout() {
        let data = context(json!({ "title": "x" }));
        assert_eq!(wrap_layout(&data, "body", &Options::default()), Ok(None));
    }

    #[test]
    fn test_block_form() {
        let data = context(json!({ "page": { "layout": "layout" } }));
        assert_eq!(
            wrap_layout(&data, "<p>Body</p>", &Options::default()).unwrap().unwrap(),
            "{% extends \"layout.html\" %}{% block content %}<p>Body</p>{% endblock content %}"
        );
    }

    #[test]
    fn test_raw_form_from_options() {
        let data = context(json!({ "page": { "layout": "layout" } }));
        let options = Options {
            use_block: false,
            ..Options::default()
        };
        assert_eq!(
            wrap_layout(&data, "{% block content %}{{ super() }}{% endblock content %}", &options)
                .unwrap()
                .unwrap(),
            "{% extends \"layout.html\" %}{% block content %}{{ super() }}{% endblock content %}"
        );
    }

    #[test]
    fn test_page_use_block_overrides_options() {
        let data = context(json!({ "page": { "layout": "layout", "useBlock": false } }));
        assert_eq!(
            wrap_layout(&data, "raw", &Options::default()).unwrap().unwrap(),
            "{% extends \"layout.html\" %}raw"
        );

        let data = context(json!({ "page": { "layout": "layout", "useBlock": true } }));
        let options = Options {
            use_block: false,
            ..Options::default()
        };
        assert!(wrap_layout(&data, "x", &options)
            .unwrap()
            .unwrap()
            .contains("{% block content %}x{% endblock content %}"));
    }

    #[test]
    fn test_custom_block_and_extension() {
        let data = context(json!({ "page": { "layout": "layouts/post" } }));
        let options = Options {
            block_name: "main".to_string(),
            layout_extension: ".tera".to_string(),
            ..Options::default()
        };
        assert_eq!(
            wrap_layout(&data, "x", &options).unwrap().unwrap(),
            "{% extends \"layouts/post.tera\" %}{% block main %}x{% endblock main %}"
        );
    }

    #[test]
    fn test_non_string_layout_is_rejected() {
        let data = context(json!({ "page": { "layout": { "name": "post" } } }));
        assert_eq!(
            wrap_layout(&data, "x", &Options::default()),
            Err(LayoutError::NotAString(json!({ "name": "post" })))
        );

        let data = context(json!({ "page": { "layout": 404 } }));
        assert!(matches!(
            wrap_layout(&data, "x", &Options::default()),
            Err(LayoutError::NotAString(_))
        ));
    }

    #[test]
    fn test_quoted_layout_is_rejected() {
        let data = context(json!({ "page": { "layout": "post\" %}{{ secret }}" } }));
        let err = wrap_layout(&data, "x", &Options::default()).unwrap_err();
        assert!(matches!(err, LayoutError::Quoted(_)));
        assert!(err.to_string().contains("must not contain quotes"));
    }
}
