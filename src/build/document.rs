use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

// =============================================================================
// Files handed in by the host pipeline
// =============================================================================

/// A file flowing through the host's build pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// Path of the file; rewritten on output unless the extension is inherited
    pub path: PathBuf,
    /// The file contents
    pub contents: Contents,
    /// Sidecar data attached by an upstream step
    pub data: Option<Map<String, Value>>,
}

/// The shape of a file's contents.
#[derive(Debug, Clone, PartialEq)]
pub enum Contents {
    /// No contents (e.g. a directory entry); passed through untouched
    Null,
    /// Fully read contents
    Buffer(Vec<u8>),
    /// Contents still behind an unread stream; not supported
    Stream,
}

impl SourceFile {
    /// Create a file with buffered contents and no sidecar data.
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Buffer(contents.into()),
            data: None,
        }
    }

    /// Attach sidecar data.
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    /// Returns true if this file carries no contents.
    pub fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }

    /// Returns true if this file's contents are an unread stream.
    pub fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Stream)
    }

    /// Get the buffered contents, if available.
    pub fn bytes(&self) -> Option<&[u8]> {
        match &self.contents {
            Contents::Buffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Get the buffered contents as text (lossy), if available.
    pub fn text(&self) -> Option<String> {
        self.bytes()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// =============================================================================
// Front matter
// =============================================================================

/// Front matter metadata and the body that follows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    /// Parsed attributes (empty if the file has no front matter)
    pub attributes: Map<String, Value>,
    /// The content without the front matter block
    pub body: String,
}

impl FrontMatter {
    /// Returns true if the file declared at least one attribute.
    pub fn has_attributes(&self) -> bool {
        !self.attributes.is_empty()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum FrontMatterError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("front matter must be a mapping of attributes")]
    NotAMapping,

    #[error("unsupported front matter value: {0}")]
    Value(#[from] serde_json::Error),
}

/// Parse front matter from the start of a document.
///
/// Front matter is a YAML block on the very first lines of the file:
///
/// ```markdown
/// ---
/// title: My Page
/// layout: default
/// ---
/// # Content starts here
/// ```
///
/// The block may also open and close with `= yaml =`, and may close with
/// `...`. A file without a complete block yields empty attributes and its
/// content unchanged as the body.
pub fn parse_front_matter(content: &str) -> Result<FrontMatter, FrontMatterError> {
    let Some((yaml, body)) = split_front_matter(content) else {
        return Ok(FrontMatter {
            attributes: Map::new(),
            body: content.to_string(),
        });
    };

    if yaml.trim().is_empty() {
        return Ok(FrontMatter {
            attributes: Map::new(),
            body: body.to_string(),
        });
    }

    let attributes = match serde_yaml::from_str::<serde_yaml::Value>(yaml)? {
        serde_yaml::Value::Null => Map::new(),
        mapping @ serde_yaml::Value::Mapping(_) => match serde_json::to_value(mapping)? {
            Value::Object(map) => map,
            _ => return Err(FrontMatterError::NotAMapping),
        },
        _ => return Err(FrontMatterError::NotAMapping),
    };

    Ok(FrontMatter {
        attributes,
        body: body.to_string(),
    })
}

/// Split `content` into the YAML between the delimiters and the body after
/// the closing delimiter line.
fn split_front_matter(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let first_end = content.find('\n')?;
    let opening = content[..first_end].trim_end();
    if opening != "---" && opening != "= yaml =" {
        return None;
    }

    let yaml_start = first_end + 1;
    let mut offset = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        let delimiter = line.trim_end();
        if delimiter == opening || delimiter == "..." {
            let yaml = &content[yaml_start..offset];
            let body = &content[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }

    None
}
