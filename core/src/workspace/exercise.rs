use std::{
    fmt,
    path::{Path, PathBuf},
};

use super::{error::Result, ExerciseMetadata};

/// One exercise directory: `<root>/<track>/<slug>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Exercise {
    pub root: PathBuf,
    pub track: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationStatus {
    /// No legacy metadata.
    Noop,
    /// Legacy metadata was converted into the file at the given path.
    Migrated(PathBuf),
    /// Current metadata already existed; the legacy file at the given path was deleted.
    Removed(PathBuf),
}

impl fmt::Display for MigrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Noop => Ok(()),
            Self::Migrated(path) => write!(f, "Migrated metadata to {}", path.display()),
            Self::Removed(path) => write!(f, "Removed legacy metadata at {}", path.display()),
        }
    }
}

impl Exercise {
    pub fn new(root: impl Into<PathBuf>, track: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            track: track.into(),
            slug: slug.into(),
        }
    }

    /// Splits `<root>/<track>/<slug>` back into its parts.
    ///
    /// ```
    /// use exo_core::workspace::Exercise;
    /// use std::path::Path;
    ///
    /// let ex = Exercise::from_dir("/ws/teams/acme/go/clock-2");
    /// assert_eq!(ex.root, Path::new("/ws/teams/acme"));
    /// assert_eq!(ex.track, "go");
    /// assert_eq!(ex.slug, "clock-2");
    /// ```
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let name = |p: Option<&Path>| {
            p.and_then(Path::file_name)
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default()
        };
        let track_dir = dir.parent();
        Self {
            root: track_dir
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .unwrap_or_default(),
            track: name(track_dir),
            slug: name(Some(dir)),
        }
    }

    /// `<track>/<slug>`, always with a forward slash.
    pub fn path(&self) -> String {
        format!("{}/{}", self.track, self.slug)
    }

    pub fn filepath(&self) -> PathBuf {
        self.root.join(&self.track).join(&self.slug)
    }

    pub fn metadata_filepath(&self) -> PathBuf {
        ExerciseMetadata::filepath_in(self.filepath())
    }

    pub fn legacy_metadata_filepath(&self) -> PathBuf {
        ExerciseMetadata::legacy_filepath_in(self.filepath())
    }

    pub fn has_metadata(&self) -> Result<bool> {
        Ok(fsutil::lexists(self.metadata_filepath())?)
    }

    pub fn has_legacy_metadata(&self) -> Result<bool> {
        Ok(fsutil::lexists(self.legacy_metadata_filepath())?)
    }

    /// Moves `.solution.json` to `.exercism/metadata.json`.
    /// An existing current file wins over the legacy one.
    pub fn migrate_legacy_metadata_file(&self) -> Result<MigrationStatus> {
        let legacy = self.legacy_metadata_filepath();
        if !self.has_legacy_metadata()? {
            return Ok(MigrationStatus::Noop);
        }
        if self.has_metadata()? {
            fsutil::remove_file(&legacy)?;
            return Ok(MigrationStatus::Removed(legacy));
        }

        let mut metadata = ExerciseMetadata::read_legacy(self.filepath())?;
        metadata.write(self.filepath())?;
        fsutil::remove_file(&legacy)?;
        Ok(MigrationStatus::Migrated(self.metadata_filepath()))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const LEGACY_JSON: &str = r#"{"track":"bash","exercise":"bob","id":"legacy-id","url":"","handle":"alice","is_requester":true,"auto_approve":false}"#;

    fn exercise_in(tmp: &tempfile::TempDir) -> Exercise {
        let ex = Exercise::new(tmp.path(), "bash", "bob");
        fsutil::mkdir_all(ex.filepath()).unwrap();
        ex
    }

    #[test]
    fn paths() {
        let ex = Exercise::new("/ws", "bash", "bob");
        assert_eq!(ex.path(), "bash/bob");
        assert_eq!(ex.filepath(), Path::new("/ws/bash/bob"));
        assert_eq!(
            ex.metadata_filepath(),
            Path::new("/ws/bash/bob/.exercism/metadata.json")
        );
        assert_eq!(
            ex.legacy_metadata_filepath(),
            Path::new("/ws/bash/bob/.solution.json")
        );
        assert_eq!(Exercise::from_dir(ex.filepath()), ex);
    }

    #[test]
    fn migrate_without_legacy_is_noop() {
        let tmp = tempfile::tempdir().unwrap();
        let ex = exercise_in(&tmp);

        let status = ex.migrate_legacy_metadata_file().unwrap();
        assert_eq!(status, MigrationStatus::Noop);
        assert_eq!(status.to_string(), "");
        assert!(!ex.has_metadata().unwrap());
        assert!(!ex.has_legacy_metadata().unwrap());
    }

    #[test]
    fn migrate_legacy_only() {
        let tmp = tempfile::tempdir().unwrap();
        let ex = exercise_in(&tmp);
        fsutil::write(ex.legacy_metadata_filepath(), LEGACY_JSON).unwrap();

        let status = ex.migrate_legacy_metadata_file().unwrap();
        assert_eq!(status, MigrationStatus::Migrated(ex.metadata_filepath()));
        assert!(status.to_string().starts_with("Migrated metadata to "));
        assert!(ex.has_metadata().unwrap());
        assert!(!ex.has_legacy_metadata().unwrap());

        let metadata = ExerciseMetadata::read(ex.filepath()).unwrap();
        assert_eq!(metadata.id, "legacy-id");
        assert_eq!(metadata.exercise_slug, "bob");
    }

    #[test]
    fn migrate_with_both_keeps_current() {
        let tmp = tempfile::tempdir().unwrap();
        let ex = exercise_in(&tmp);
        fsutil::write(ex.legacy_metadata_filepath(), LEGACY_JSON).unwrap();
        let mut current = ExerciseMetadata {
            track: "bash".to_owned(),
            exercise_slug: "bob".to_owned(),
            id: "current-id".to_owned(),
            ..Default::default()
        };
        current.write(ex.filepath()).unwrap();
        let before = fsutil::read_to_string(ex.metadata_filepath()).unwrap();

        let status = ex.migrate_legacy_metadata_file().unwrap();
        assert_eq!(status, MigrationStatus::Removed(ex.legacy_metadata_filepath()));
        assert!(status.to_string().starts_with("Removed legacy metadata at "));
        assert!(!ex.has_legacy_metadata().unwrap());
        assert_eq!(fsutil::read_to_string(ex.metadata_filepath()).unwrap(), before);
    }
}
