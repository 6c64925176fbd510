use std::{collections::BTreeSet, path::PathBuf};

use super::{
    error::{Error, Result},
    path_type::{detect_path_type, PathType},
    Workspace,
};

/// What the arguments of `submit` point at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transmission {
    /// Absolute paths of the files given explicitly.
    pub files: Vec<PathBuf>,
    /// The exercise directory, or the literal directory/name argument.
    /// `None` when no argument was given.
    pub dir: Option<PathBuf>,
    pub arg_dirs: Vec<String>,
}

impl Transmission {
    pub fn new<S: AsRef<str>>(ws: &Workspace, args: &[S]) -> Result<Self> {
        let mut tx = Self::default();
        for arg in args {
            let arg = arg.as_ref();
            match detect_path_type(arg)? {
                PathType::File => tx.files.push(fsutil::absolute_path(arg)?),
                PathType::Dir | PathType::ExerciseId => tx.arg_dirs.push(arg.to_owned()),
            }
        }

        if tx.arg_dirs.len() > 1 {
            return Err(Error::MoreThanOneDir);
        }
        if !tx.arg_dirs.is_empty() && !tx.files.is_empty() {
            return Err(Error::MixedFilesAndDir);
        }

        if !tx.files.is_empty() {
            let dirs = tx
                .files
                .iter()
                .map(|f| ws.exercise_dir(f))
                .collect::<Result<BTreeSet<_>>>()?;
            if dirs.len() > 1 {
                return Err(Error::FilesFromMultipleExercises);
            }
            tx.dir = dirs.into_iter().next();
        }
        if let [dir] = tx.arg_dirs.as_slice() {
            tx.dir = Some(PathBuf::from(dir));
        }
        Ok(tx)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::workspace::ExerciseMetadata;
    use pretty_assertions::assert_eq;
    use std::path::Path;

    fn exercise(ws: &Workspace, rel: &str, files: &[&str]) -> PathBuf {
        let dir = ws.dir.join(rel);
        ExerciseMetadata {
            track: "go".to_owned(),
            exercise_slug: "x".to_owned(),
            id: rel.to_owned(),
            ..Default::default()
        }
        .write(&dir)
        .unwrap();
        for f in files {
            fsutil::write_with_mkdir(dir.join(f), "content").unwrap();
        }
        dir
    }

    fn s(p: &Path) -> String {
        p.to_string_lossy().into_owned()
    }

    #[test]
    fn single_file_resolves_its_exercise() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        let clock = exercise(&ws, "go/clock", &["clock.go", "sub/util.go"]);

        let tx = Transmission::new(&ws, &[s(&clock.join("sub/util.go"))]).unwrap();
        assert_eq!(tx.files, [clock.join("sub/util.go")]);
        assert_eq!(tx.dir, Some(clock.clone()));

        let tx = Transmission::new(&ws, &[s(&clock.join("clock.go")), s(&clock.join("sub/util.go"))])
            .unwrap();
        assert_eq!(tx.files.len(), 2);
        assert_eq!(tx.dir, Some(clock));
    }

    #[test]
    fn files_from_two_exercises() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        let clock = exercise(&ws, "go/clock", &["clock.go"]);
        let leap = exercise(&ws, "go/leap", &["leap.go"]);

        let err = Transmission::new(&ws, &[s(&clock.join("clock.go")), s(&leap.join("leap.go"))])
            .unwrap_err();
        assert!(matches!(err, Error::FilesFromMultipleExercises));
    }

    #[test]
    fn directory_arguments() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        let clock = exercise(&ws, "go/clock", &["clock.go"]);
        let leap = exercise(&ws, "go/leap", &[]);

        let tx = Transmission::new(&ws, &[s(&clock)]).unwrap();
        assert_eq!(tx.dir, Some(clock.clone()));
        assert!(tx.files.is_empty());

        let err = Transmission::new(&ws, &[s(&clock), s(&leap)]).unwrap_err();
        assert!(matches!(err, Error::MoreThanOneDir));

        let err = Transmission::new(&ws, &[s(&clock.join("clock.go")), s(&leap)]).unwrap_err();
        assert!(matches!(err, Error::MixedFilesAndDir));
    }

    #[test]
    fn bare_name_is_kept_literally() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();

        let tx = Transmission::new(&ws, &["no-such-exercise-anywhere"]).unwrap();
        assert_eq!(tx.dir, Some(PathBuf::from("no-such-exercise-anywhere")));
        assert_eq!(tx.arg_dirs, ["no-such-exercise-anywhere"]);
    }

    #[test]
    fn no_arguments() {
        let ws = Workspace::new("/ws");
        let tx = Transmission::new::<&str>(&ws, &[]).unwrap();
        assert_eq!(tx, Transmission::default());
    }
}
