//! Configuration loading from files.
//!
//! Options files are partial: only the keys they name override the
//! process-wide defaults.

use std::path::Path;

use serde_json::Value;

use super::{ConfigError, Options};

impl Options {
    /// Load a YAML (or JSON) options file and resolve it over the
    /// process-wide defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let overrides: Value = serde_yaml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded options file");
        Self::resolve(overrides)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExtraData, SearchPaths};
    use std::path::PathBuf;

    #[test]
    fn test_load_yaml_options() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("layup.yaml");
        std::fs::write(
            &path,
            "base_path:\n  - templates\n  - shared\noutput_ext: null\nextra_data:\n  site:\n    title: Example Site\nuse_block: false\n",
        )
        .unwrap();

        let options = Options::load_from_file(&path).unwrap();
        assert_eq!(
            options.base_path,
            SearchPaths::Many(vec![PathBuf::from("templates"), PathBuf::from("shared")])
        );
        assert_eq!(options.output_ext, None);
        assert!(!options.use_block);
        match options.extra_data {
            ExtraData::Inline(data) => assert_eq!(data["site"]["title"], "Example Site"),
            other => panic!("expected inline data, got {other:?}"),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let result = Options::load_from_file(Path::new("/definitely/not/here.yaml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_malformed_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.yaml");
        std::fs::write(&path, "base_path: [unclosed\n").unwrap();

        assert!(matches!(
            Options::load_from_file(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
