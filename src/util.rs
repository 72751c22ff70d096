//! Shared utility functions.

use serde_json::Value;

/// Recursively merge `overlay` into `base`.
///
/// Mappings merge key by key. Any other value in `overlay` (scalar, array,
/// or an explicit `null`) replaces what `base` held at that key.
///
/// ```ignore
/// base:    { "site": { "title": "A", "lang": "en" }, "tags": [1, 2] }
/// overlay: { "site": { "title": "B" }, "tags": [3] }
/// result:  { "site": { "title": "B", "lang": "en" }, "tags": [3] }
/// ```
pub fn deep_merge(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// Truthiness of a data value, following template-language conventions:
/// `null`, `false`, `0`, `""` are false, everything else (including empty
/// arrays and mappings) is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Render an error and all of its sources as one line.
///
/// Tera nests the interesting part of a failure (the missing variable, the
/// bad tag) a few levels down the source chain.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deep_merge_nested_objects() {
        let mut base = json!({ "site": { "title": "A", "lang": "en" }, "n": 1 });
        deep_merge(&mut base, json!({ "site": { "title": "B" }, "extra": true }));
        assert_eq!(
            base,
            json!({ "site": { "title": "B", "lang": "en" }, "n": 1, "extra": true })
        );
    }

    #[test]
    fn test_deep_merge_arrays_replace() {
        let mut base = json!({ "tags": [1, 2, 3] });
        deep_merge(&mut base, json!({ "tags": [9] }));
        assert_eq!(base, json!({ "tags": [9] }));
    }

    #[test]
    fn test_deep_merge_null_replaces() {
        let mut base = json!({ "output_ext": ".html" });
        deep_merge(&mut base, json!({ "output_ext": null }));
        assert_eq!(base, json!({ "output_ext": null }));
    }

    #[test]
    fn test_deep_merge_scalar_over_object() {
        let mut base = json!({ "extra_data": { "a": 1 } });
        deep_merge(&mut base, json!({ "extra_data": "data.json" }));
        assert_eq!(base, json!({ "extra_data": "data.json" }));
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("no")));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn test_error_chain() {
        #[derive(thiserror::Error, Debug)]
        #[error("outer")]
        struct Outer(#[source] std::io::Error);

        let err = Outer(std::io::Error::other("inner"));
        assert_eq!(error_chain(&err), "outer: inner");
    }
}
