//! Output path rewriting.

use std::path::{Path, PathBuf};

/// Replace the extension of `path` with `ext`.
///
/// `ext` may be given with or without its leading dot. `None` or an empty
/// extension strips the extension entirely.
///
/// # Examples
/// ```ignore
/// replace_extension("pages/index.njk", Some(".html")) => "pages/index.html"
/// replace_extension("pages/index.njk", Some("htm"))   => "pages/index.htm"
/// replace_extension("pages/index.njk", None)          => "pages/index"
/// ```
pub fn replace_extension(path: &Path, ext: Option<&str>) -> PathBuf {
    let ext = ext.map(|e| e.trim_start_matches('.')).unwrap_or("");
    path.with_extension(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_extension() {
        assert_eq!(
            replace_extension(Path::new("fixtures/hello-world.njk"), Some(".html")),
            PathBuf::from("fixtures/hello-world.html")
        );
        assert_eq!(
            replace_extension(Path::new("post.md"), Some("htm")),
            PathBuf::from("post.htm")
        );
    }

    #[test]
    fn test_replace_extension_strips() {
        assert_eq!(
            replace_extension(Path::new("fixtures/hello-world.njk"), None),
            PathBuf::from("fixtures/hello-world")
        );
        assert_eq!(
            replace_extension(Path::new("a/b.njk"), Some("")),
            PathBuf::from("a/b")
        );
    }

    #[test]
    fn test_replace_extension_without_existing() {
        assert_eq!(
            replace_extension(Path::new("README"), Some(".html")),
            PathBuf::from("README.html")
        );
    }

    #[test]
    fn test_replace_compound_extension() {
        assert_eq!(
            replace_extension(Path::new("feed.njk"), Some(".xml.gz")),
            PathBuf::from("feed.xml.gz")
        );
    }
}
