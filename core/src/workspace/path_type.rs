use std::{fs, path::Path};

use super::error::{Error, Result};

/// How a command-line argument should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum PathType {
    Dir,
    File,
    /// Nothing exists at that path, so it is taken as a bare exercise name.
    #[strum(serialize = "exercise id")]
    ExerciseId,
}

/// Classifies `arg` without requiring it to exist.
/// A symlink is classified by its target.
pub fn detect_path_type(arg: impl AsRef<Path>) -> Result<PathType> {
    let path = fsutil::absolute_path(arg)?;
    if !fsutil::lexists(&path)? {
        return Ok(PathType::ExerciseId);
    }
    // follows symlinks, so a dangling link is an error here
    let meta = fs::metadata(&path).map_err(|e| Error::io(&path, e))?;
    Ok(if meta.is_dir() {
        PathType::Dir
    } else {
        PathType::File
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detects_dirs_files_and_names() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("clock");
        fsutil::mkdir_all(&dir).unwrap();
        fsutil::write(dir.join("clock.go"), "package clock").unwrap();

        assert_eq!(detect_path_type(&dir).unwrap(), PathType::Dir);
        assert_eq!(detect_path_type(dir.join("clock.go")).unwrap(), PathType::File);
        assert_eq!(
            detect_path_type(tmp.path().join("bob")).unwrap(),
            PathType::ExerciseId
        );
        assert_eq!(PathType::ExerciseId.to_string(), "exercise id");
        assert_eq!(PathType::Dir.to_string(), "dir");
    }

    #[cfg(unix)]
    #[test]
    fn symlinks_are_classified_by_target() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("real");
        fsutil::mkdir_all(&dir).unwrap();
        fsutil::write(dir.join("f.txt"), "x").unwrap();
        symlink(&dir, tmp.path().join("link-dir")).unwrap();
        symlink(dir.join("f.txt"), tmp.path().join("link-file")).unwrap();
        symlink(tmp.path().join("missing"), tmp.path().join("dangling")).unwrap();

        assert_eq!(detect_path_type(tmp.path().join("link-dir")).unwrap(), PathType::Dir);
        assert_eq!(detect_path_type(tmp.path().join("link-file")).unwrap(), PathType::File);
        assert!(detect_path_type(tmp.path().join("dangling")).is_err());
    }
}
