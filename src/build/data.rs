//! Per-file template data context.
//!
//! Precedence, lowest first:
//! 1. `extra_data` from the options (inline mapping or JSON file)
//! 2. sidecar data attached to the file
//! 3. front matter attributes, nested under `page`

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};

use super::document::{FrontMatter, SourceFile};
use crate::config::{ExtraData, Options};
use crate::util::{deep_merge, is_truthy};

/// Reserved key holding front matter attributes.
pub const PAGE_KEY: &str = "page";

#[derive(thiserror::Error, Debug)]
pub enum DataError {
    #[error("failed to read data file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse data file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("data file {0} must contain a JSON object")]
    NotAnObject(PathBuf),
}

impl DataError {
    /// The data file the error is about.
    pub fn path(&self) -> &Path {
        match self {
            DataError::Read { path, .. } | DataError::Parse { path, .. } => path,
            DataError::NotAnObject(path) => path,
        }
    }
}

/// The merged data a single file is rendered with.
///
/// Always an owned tree: nothing in it aliases the options, so one file's
/// template cannot leak state into the next.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DataContext(Map<String, Value>);

impl DataContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the context for one file.
    pub fn build(
        options: &Options,
        file: &SourceFile,
        front_matter: &FrontMatter,
    ) -> Result<Self, DataError> {
        let mut context = Self(load_extra_data(&options.extra_data)?);

        if let Some(sidecar) = &file.data {
            context.merge(sidecar.clone());
        }

        if front_matter.has_attributes() {
            let mut page = Map::new();
            page.insert(
                PAGE_KEY.to_string(),
                Value::Object(front_matter.attributes.clone()),
            );
            context.merge(page);
        }

        Ok(context)
    }

    /// Deep-merge `overlay` on top of this context.
    pub fn merge(&mut self, overlay: Map<String, Value>) {
        let mut merged = Value::Object(std::mem::take(&mut self.0));
        deep_merge(&mut merged, Value::Object(overlay));
        if let Value::Object(map) = merged {
            self.0 = map;
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a key of the `page` mapping.
    pub fn page(&self, key: &str) -> Option<&Value> {
        self.0.get(PAGE_KEY)?.as_object()?.get(key)
    }

    /// The declared layout value, if any. A `null` layout counts as
    /// undeclared.
    pub fn layout(&self) -> Option<&Value> {
        self.page("layout").filter(|layout| !layout.is_null())
    }

    /// Per-page override of the block-wrapping toggle.
    pub fn use_block(&self) -> Option<bool> {
        self.page("useBlock").map(is_truthy)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for DataContext {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Resolve `extra_data` into a fresh mapping.
fn load_extra_data(extra_data: &ExtraData) -> Result<Map<String, Value>, DataError> {
    match extra_data {
        ExtraData::Inline(data) => Ok(data.clone()),
        ExtraData::File(path) => {
            let content = std::fs::read_to_string(path).map_err(|source| DataError::Read {
                path: path.clone(),
                source,
            })?;
            match serde_json::from_str(&content) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(_) => Err(DataError::NotAnObject(path.clone())),
                Err(source) => Err(DataError::Parse {
                    path: path.clone(),
                    source,
                }),
            }
        }
    }
}
