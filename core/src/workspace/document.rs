use std::path::{Path, PathBuf};

/// A file to submit, addressed relative to its exercise directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: PathBuf,
    pub filepath: PathBuf,
}

impl Document {
    pub fn new(root: impl Into<PathBuf>, filepath: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            filepath: filepath.into(),
        }
    }

    /// Path relative to the root, always with forward slashes.
    ///
    /// ```
    /// use exo_core::workspace::Document;
    ///
    /// let doc = Document::new("/ws/go/clock", "/ws/go/clock/cmd/main.go");
    /// assert_eq!(doc.path(), "cmd/main.go");
    /// ```
    pub fn path(&self) -> String {
        let rel = self
            .filepath
            .strip_prefix(&self.root)
            .unwrap_or(&self.filepath);
        fsutil::to_slash(rel)
            .trim_start_matches('/')
            .to_owned()
    }

    pub fn filepath(&self) -> &Path {
        &self.filepath
    }
}
