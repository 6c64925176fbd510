//! Mapping between the on-disk workspace tree and the exercises it holds.
//!
//! Nothing in this module logs or prints; every failure is returned as an [`Error`].

pub mod document;
pub mod error;
pub mod exercise;
pub mod exercise_config;
pub mod metadata;
pub mod path_type;
pub mod platform;
pub mod test_configuration;
pub mod transmission;

pub use document::*;
pub use error::*;
pub use exercise::*;
pub use exercise_config::*;
pub use metadata::*;
pub use path_type::*;
pub use platform::Platform;
pub use test_configuration::*;
pub use transmission::*;

use std::{
    fmt,
    path::{Component, Path, PathBuf, MAIN_SEPARATOR},
};

use lazy_regex::regex_is_match;
use walkdir::WalkDir;

#[derive(Clone)]
pub struct Workspace {
    pub dir: PathBuf,
    platform: &'static dyn Platform,
}

impl fmt::Debug for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Workspace").field("dir", &self.dir).finish()
    }
}

impl Workspace {
    const TEAMS_DIR: &str = "teams";
    const USERS_DIR: &str = "users";

    /// A view over `dir`. Does no I/O.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            platform: platform::native(),
        }
    }

    /// Like [`Workspace::new`], but the directory must exist. Symlinks in `dir` are resolved.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let platform = platform::native();
        let resolved = platform
            .canonicalize(dir)
            .map_err(|e| Error::io(dir, e))?;
        if !resolved.is_dir() {
            return Err(Error::NotExist(dir.display().to_string()));
        }
        Ok(Self {
            dir: resolved,
            platform,
        })
    }

    pub fn with_platform(mut self, platform: &'static dyn Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn platform(&self) -> &'static dyn Platform {
        self.platform
    }

    /// Finds the directories the user means by `exercise`.
    ///
    /// An existing path must lie inside the workspace and is returned resolved.
    /// A bare name matches every directory named `<name>` or `<name>-<digits>`.
    pub fn locate(&self, exercise: &str) -> Result<Vec<PathBuf>> {
        let path = fsutil::absolute_path(exercise)?;
        let exists = path.try_exists().map_err(|e| Error::io(&path, e))?;
        if exists {
            if !self.contains(&path) {
                return Err(Error::NotInWorkspace(path));
            }
            let resolved = self
                .platform
                .canonicalize(&path)
                .map_err(|e| Error::io(&path, e))?;
            return Ok(vec![resolved]);
        }

        if exercise.contains(|c| c == '/' || c == MAIN_SEPARATOR) {
            return Err(Error::NotExist(exercise.to_owned()));
        }

        let found = self.find_by_name(exercise)?;
        if found.is_empty() {
            return Err(Error::NotExist(exercise.to_owned()));
        }
        Ok(found)
    }

    fn find_by_name(&self, name: &str) -> Result<Vec<PathBuf>> {
        let root = self
            .platform
            .canonicalize(&self.dir)
            .unwrap_or_else(|_| self.dir.clone());
        if !fsutil::lexists(&root)? {
            return Ok(Vec::new());
        }

        let mut found = Vec::new();
        let mut it = WalkDir::new(&root).min_depth(1).sort_by_file_name().into_iter();
        while let Some(entry) = it.next() {
            let entry = entry?;
            let path = if entry.path_is_symlink() {
                match self.platform.canonicalize(entry.path()) {
                    Ok(target) => target,
                    Err(_) => continue,
                }
            } else {
                entry.path().to_owned()
            };
            if !path.is_dir() {
                continue;
            }

            let Some(base) = path.file_name().and_then(|s| s.to_str()) else {
                continue
            };
            if self::matches_exercise_name(base, name) {
                found.push(path);
                if entry.file_type().is_dir() {
                    it.skip_current_dir();
                }
            }
        }
        Ok(found)
    }

    /// Lexically, or after resolving symlinks on both sides.
    fn contains(&self, path: &Path) -> bool {
        let path = fsutil::normalize_path(path);
        if path.starts_with(&self.dir) {
            return true;
        }
        let Ok(root) = self.platform.canonicalize(&self.dir) else {
            return false
        };
        if path.starts_with(&root) {
            return true;
        }
        self.platform
            .canonicalize(&path)
            .map_or(false, |resolved| resolved.starts_with(&root))
    }

    /// Every `<track>/<slug>` directory, fetched or not.
    /// Team solutions are included, other users' solutions are not.
    pub fn potential_exercises(&self) -> Result<Vec<Exercise>> {
        let mut exercises = Vec::new();
        for top in fsutil::list_subdir_names(&self.dir)? {
            match top.as_str() {
                Self::USERS_DIR => continue,
                Self::TEAMS_DIR => {
                    let teams = self.dir.join(Self::TEAMS_DIR);
                    for team in fsutil::list_subdir_names(&teams)? {
                        exercises.extend(self::exercises_under(teams.join(team))?);
                    }
                }
                track => {
                    for slug in fsutil::list_subdir_names(self.dir.join(track))? {
                        exercises.push(Exercise::new(&self.dir, track, slug));
                    }
                }
            }
        }
        Ok(exercises)
    }

    /// The subset of [`Workspace::potential_exercises`] that has metadata.
    pub fn exercises(&self) -> Result<Vec<Exercise>> {
        let mut exercises = Vec::new();
        for ex in self.potential_exercises()? {
            if ex.has_metadata()? {
                exercises.push(ex);
            }
        }
        Ok(exercises)
    }

    /// Walks up from `path` to the exercise directory holding it.
    ///
    /// Only `<track>/<slug>`, `teams/<team>/<track>/<slug>` and `users/<handle>/<track>/<slug>`
    /// qualify; metadata found anywhere else is ignored.
    pub fn exercise_dir(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let path = fsutil::absolute_path(path)?;
        let (root, mut dir) = self.anchor(&path)?;
        loop {
            if dir == root {
                return Err(Error::MissingMetadata(path));
            }
            if !fsutil::lexists(&dir)? {
                return Err(Error::NotExist(dir.display().to_string()));
            }
            let at_exercise_depth = dir
                .strip_prefix(&root)
                .map_or(false, Self::is_exercise_location);
            if at_exercise_depth
                && dir.is_dir()
                && (fsutil::lexists(ExerciseMetadata::filepath_in(&dir))?
                    || fsutil::lexists(ExerciseMetadata::legacy_filepath_in(&dir))?)
            {
                return Ok(dir);
            }
            match dir.parent() {
                Some(parent) => dir = parent.to_owned(),
                None => return Err(Error::MissingMetadata(path)),
            }
        }
    }

    fn is_exercise_location(rel: &Path) -> bool {
        let parts: Vec<Component> = rel.components().collect();
        match parts.as_slice() {
            [Component::Normal(top), Component::Normal(_)] => {
                *top != Self::TEAMS_DIR && *top != Self::USERS_DIR
            }
            [Component::Normal(top), Component::Normal(_), Component::Normal(_), Component::Normal(_)] => {
                *top == Self::TEAMS_DIR || *top == Self::USERS_DIR
            }
            _ => false,
        }
    }

    /// Returns `(workspace root, path)` in a form where the root is a prefix of the path.
    fn anchor(&self, path: &Path) -> Result<(PathBuf, PathBuf)> {
        if path.starts_with(&self.dir) {
            return Ok((self.dir.clone(), path.to_owned()));
        }
        let canon = |p: &Path| self.platform.canonicalize(p).ok();
        if let Some(root) = canon(&self.dir) {
            if path.starts_with(&root) {
                return Ok((root, path.to_owned()));
            }
            if let Some(resolved) = canon(path).filter(|p| p.starts_with(&root)) {
                return Ok((root, resolved));
            }
        }

        let lower = |p: &Path| PathBuf::from(p.to_string_lossy().to_lowercase());
        if lower(path).starts_with(lower(&self.dir)) {
            return Err(Error::CaseMismatch {
                workspace: self.dir.clone(),
                path: path.to_owned(),
            });
        }
        Err(Error::NotInWorkspace(path.to_owned()))
    }

    /// Where to store the solution `solution_id` of `exercise`: the existing directory
    /// holding it, otherwise the first unused `<ws>/<exercise>[-N]`.
    pub fn solution_path(&self, exercise: &str, solution_id: &str) -> Result<PathBuf> {
        let existing = self.find_by_name(exercise)?;
        for dir in &existing {
            match ExerciseMetadata::read(dir) {
                Ok(m) if m.id == solution_id => return Ok(dir.clone()),
                Ok(_) => {}
                Err(e) if e.is_not_exist() => {}
                Err(e) => return Err(e),
            }
        }

        let base = self.dir.join(exercise);
        let mut candidate = base.clone();
        let mut n = 1;
        while existing.contains(&candidate) || fsutil::lexists(&candidate)? {
            n += 1;
            candidate = PathBuf::from(format!("{}-{}", base.display(), n));
        }
        Ok(candidate)
    }
}

/// `bat` matches `bat`, `bat-2` and `bat-`, but not `batten`.
///
/// ```
/// use exo_core::workspace::matches_exercise_name;
///
/// assert!(matches_exercise_name("bat", "bat"));
/// assert!(matches_exercise_name("bat-200", "bat"));
/// assert!(!matches_exercise_name("batten", "bat"));
/// assert!(!matches_exercise_name("batman-2", "bat"));
/// ```
pub fn matches_exercise_name(dir_name: &str, exercise: &str) -> bool {
    match dir_name.strip_prefix(exercise) {
        Some("") => true,
        Some(suffix) => regex_is_match!(r"^-\d*$", suffix),
        None => false,
    }
}

fn exercises_under(root: PathBuf) -> Result<Vec<Exercise>> {
    let mut exercises = Vec::new();
    for track in fsutil::list_subdir_names(&root)? {
        for slug in fsutil::list_subdir_names(root.join(&track))? {
            exercises.push(Exercise::new(&root, &track, slug));
        }
    }
    Ok(exercises)
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn mkdirs(root: &Path, dirs: &[&str]) {
        for d in dirs {
            fsutil::mkdir_all(root.join(d)).unwrap();
        }
    }

    fn write_metadata(dir: &Path, id: &str) {
        let slug = dir.file_name().unwrap().to_string_lossy().into_owned();
        ExerciseMetadata {
            track: "go".to_owned(),
            exercise_slug: slug,
            id: id.to_owned(),
            is_requester: true,
            ..Default::default()
        }
        .write(dir)
        .unwrap();
    }

    /// A workspace whose root has no symlinks in it.
    fn workspace() -> (TempDir, Workspace) {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::open(tmp.path()).unwrap();
        (tmp, ws)
    }

    fn sorted(mut v: Vec<PathBuf>) -> Vec<PathBuf> {
        v.sort();
        v
    }

    #[test]
    fn open_requires_existing_dir() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(Workspace::open(tmp.path().join("nope")).is_err());
    }

    #[test]
    fn locate_by_absolute_path() {
        let (_tmp, ws) = workspace();
        mkdirs(&ws.dir, &["go/clock", "ruby/clock"]);

        let clock = ws.dir.join("go").join("clock");
        assert_eq!(ws.locate(clock.to_str().unwrap()).unwrap(), [clock]);
    }

    #[test]
    fn locate_existing_path_outside_workspace() {
        let (_tmp, ws) = workspace();
        let outside = tempfile::tempdir().unwrap();
        let err = ws.locate(outside.path().to_str().unwrap()).unwrap_err();
        assert!(err.is_not_in_workspace());
    }

    #[test]
    fn locate_missing_path_with_separator_is_not_exist() {
        let (_tmp, ws) = workspace();
        mkdirs(&ws.dir, &["go/clock"]);

        let missing = ws.dir.join("go").join("clock-9");
        let err = ws.locate(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::NotExist(_)));
        assert!(ws.locate("go/definitely-missing").unwrap_err().is_not_exist());
    }

    #[test]
    fn locate_by_name_finds_all_tracks() {
        let (_tmp, ws) = workspace();
        mkdirs(&ws.dir, &["go/clock", "ruby/clock", "go/bob"]);

        assert_eq!(
            sorted(ws.locate("clock").unwrap()),
            [ws.dir.join("go/clock"), ws.dir.join("ruby/clock")]
        );
    }

    #[test]
    fn locate_by_name_with_numeric_suffix() {
        let (_tmp, ws) = workspace();
        mkdirs(
            &ws.dir,
            &["go/bat", "go/bat-2", "go/bat-200", "go/batten", "go/batman-2", "go/bat-"],
        );

        assert_eq!(
            sorted(ws.locate("bat").unwrap()),
            [
                ws.dir.join("go/bat"),
                ws.dir.join("go/bat-"),
                ws.dir.join("go/bat-2"),
                ws.dir.join("go/bat-200"),
            ]
        );
        assert_eq!(ws.locate("bat-2").unwrap(), [ws.dir.join("go/bat-2")]);
    }

    #[test]
    fn locate_by_name_ignores_files_and_matched_subtrees() {
        let (_tmp, ws) = workspace();
        mkdirs(&ws.dir, &["go/leap/leap", "users/bob/go/leap"]);
        fsutil::write(ws.dir.join("go").join("bob"), "not a dir").unwrap();

        assert_eq!(
            sorted(ws.locate("leap").unwrap()),
            [ws.dir.join("go/leap"), ws.dir.join("users/bob/go/leap")]
        );
        assert_eq!(ws.locate("bob").unwrap(), [ws.dir.join("users/bob")]);
    }

    #[test]
    fn locate_unknown_name() {
        let (_tmp, ws) = workspace();
        mkdirs(&ws.dir, &["go/clock"]);
        assert!(matches!(ws.locate("zzz-unknown").unwrap_err(), Error::NotExist(_)));
    }

    #[cfg(unix)]
    #[test]
    fn locate_through_symlinked_workspace() {
        use std::os::unix::fs::symlink;

        let tmp = tempfile::tempdir().unwrap();
        let real = fsutil::canonicalize_path(tmp.path()).unwrap().join("real");
        mkdirs(&real, &["go/clock"]);
        let link = tmp.path().join("link");
        symlink(&real, &link).unwrap();

        let ws = Workspace::new(&link);
        assert_eq!(ws.locate("clock").unwrap(), [real.join("go/clock")]);

        let via_link = link.join("go").join("clock");
        assert_eq!(ws.locate(via_link.to_str().unwrap()).unwrap(), [real.join("go/clock")]);
    }

    #[cfg(unix)]
    #[test]
    fn locate_follows_symlinked_exercise_dirs() {
        use std::os::unix::fs::symlink;

        let (_tmp, ws) = workspace();
        let elsewhere = tempfile::tempdir().unwrap();
        let target = fsutil::canonicalize_path(elsewhere.path()).unwrap().join("clock");
        fsutil::mkdir_all(&target).unwrap();
        mkdirs(&ws.dir, &["go"]);
        symlink(&target, ws.dir.join("go").join("clock")).unwrap();
        symlink(ws.dir.join("nowhere"), ws.dir.join("go").join("clock-2")).unwrap();

        assert_eq!(ws.locate("clock").unwrap(), [target]);
    }

    #[test]
    fn potential_exercises_layout() {
        let (_tmp, ws) = workspace();
        mkdirs(
            &ws.dir,
            &[
                "go/clock/sub",
                "ruby/bob",
                "teams/acme/go/leap",
                "users/alice/go/clock",
            ],
        );
        fsutil::write(ws.dir.join("README.md"), "hi").unwrap();

        let mut got = ws.potential_exercises().unwrap();
        got.sort();
        let mut want = vec![
            Exercise::new(&ws.dir, "go", "clock"),
            Exercise::new(&ws.dir, "ruby", "bob"),
            Exercise::new(ws.dir.join("teams/acme"), "go", "leap"),
        ];
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn exercises_only_with_metadata() {
        let (_tmp, ws) = workspace();
        mkdirs(&ws.dir, &["go/clock", "go/leap", "teams/acme/go/bob"]);
        write_metadata(&ws.dir.join("go/clock"), "1");
        write_metadata(&ws.dir.join("teams/acme/go/bob"), "2");

        let mut got = ws.exercises().unwrap();
        got.sort();
        let mut want = vec![
            Exercise::new(&ws.dir, "go", "clock"),
            Exercise::new(ws.dir.join("teams/acme"), "go", "bob"),
        ];
        want.sort();
        assert_eq!(got, want);
    }

    #[test]
    fn exercise_dir_walks_up_to_metadata() {
        let (_tmp, ws) = workspace();
        let clock = ws.dir.join("go/clock");
        mkdirs(&ws.dir, &["go/clock/cmd/deep"]);
        write_metadata(&clock, "1");
        fsutil::write(clock.join("cmd/deep/main.go"), "package main").unwrap();

        assert_eq!(ws.exercise_dir(clock.join("cmd/deep/main.go")).unwrap(), clock);
        assert_eq!(ws.exercise_dir(&clock).unwrap(), clock);
    }

    #[test]
    fn exercise_dir_accepts_legacy_metadata() {
        let (_tmp, ws) = workspace();
        let bob = ws.dir.join("ruby/bob");
        mkdirs(&ws.dir, &["ruby/bob"]);
        fsutil::write(bob.join(".solution.json"), "{}").unwrap();
        fsutil::write(bob.join("bob.rb"), "").unwrap();
        assert_eq!(ws.exercise_dir(bob.join("bob.rb")).unwrap(), bob);
    }

    #[test]
    fn exercise_dir_failures() {
        let (_tmp, ws) = workspace();
        mkdirs(&ws.dir, &["go/leap"]);
        fsutil::write(ws.dir.join("go/leap/leap.go"), "").unwrap();

        let err = ws.exercise_dir(ws.dir.join("go/leap/leap.go")).unwrap_err();
        assert!(err.is_missing_metadata());

        let err = ws.exercise_dir(ws.dir.join("go/leap/nope.go")).unwrap_err();
        assert!(matches!(err, Error::NotExist(_)));

        let outside = tempfile::tempdir().unwrap();
        let err = ws.exercise_dir(outside.path().join("x.go")).unwrap_err();
        assert!(matches!(err, Error::NotInWorkspace(_)));
    }

    #[cfg(unix)]
    #[test]
    fn exercise_dir_reports_case_mismatch() {
        let ws = Workspace::new("/tmp/Exo-Workspace-Case");
        let err = ws
            .exercise_dir("/tmp/exo-workspace-case/go/clock/clock.go")
            .unwrap_err();
        assert!(matches!(err, Error::CaseMismatch { .. }));
        assert!(err.to_string().contains("directory location may be case sensitive"));
        assert!(err.is_not_in_workspace());
    }

    #[test]
    fn exercise_dir_in_teams_and_users_subtrees() {
        let (_tmp, ws) = workspace();
        let team = ws.dir.join("teams/acme/go/clock");
        let other = ws.dir.join("users/alice/go/clock");
        mkdirs(&ws.dir, &["teams/acme/go/clock/src", "users/alice/go/clock"]);
        write_metadata(&team, "1");
        write_metadata(&other, "2");
        fsutil::write(team.join("src/clock.go"), "").unwrap();
        fsutil::write(other.join("clock.go"), "").unwrap();

        assert_eq!(ws.exercise_dir(team.join("src/clock.go")).unwrap(), team);
        assert_eq!(ws.exercise_dir(other.join("clock.go")).unwrap(), other);
    }

    #[test]
    fn exercise_dir_ignores_metadata_at_track_level() {
        let (_tmp, ws) = workspace();
        mkdirs(&ws.dir, &["go/clock", "teams/acme/go/leap"]);
        fsutil::write(ws.dir.join("go/.solution.json"), "{}").unwrap();
        fsutil::write(ws.dir.join("go/clock/clock.go"), "").unwrap();
        write_metadata(&ws.dir.join("teams/acme"), "3");
        fsutil::write(ws.dir.join("teams/acme/go/leap/leap.go"), "").unwrap();

        let err = ws.exercise_dir(ws.dir.join("go/clock/clock.go")).unwrap_err();
        assert!(err.is_missing_metadata());
        let err = ws
            .exercise_dir(ws.dir.join("teams/acme/go/leap/leap.go"))
            .unwrap_err();
        assert!(err.is_missing_metadata());

        write_metadata(&ws.dir.join("go/clock"), "4");
        assert_eq!(
            ws.exercise_dir(ws.dir.join("go/clock/clock.go")).unwrap(),
            ws.dir.join("go/clock")
        );
    }

    #[test]
    fn exercise_dir_ignores_metadata_nested_inside_exercise() {
        let (_tmp, ws) = workspace();
        let bob = ws.dir.join("ruby/bob");
        mkdirs(&ws.dir, &["ruby/bob/lib"]);
        write_metadata(&bob, "1");
        write_metadata(&bob.join("lib"), "2");
        fsutil::write(bob.join("lib/bob.rb"), "").unwrap();

        assert_eq!(ws.exercise_dir(bob.join("lib/bob.rb")).unwrap(), bob);
        assert_eq!(ws.exercise_dir(bob.join("lib")).unwrap(), bob);
    }

    #[test]
    fn lookups_in_a_workspace_not_created_yet() {
        let tmp = tempfile::tempdir().unwrap();
        let ws = Workspace::new(tmp.path().join("not-created-yet"));

        assert!(ws.locate("clock").unwrap_err().is_not_exist());
        assert_eq!(
            ws.solution_path("clock", "a").unwrap(),
            ws.dir.join("clock")
        );
    }

    #[test]
    fn solution_path_reuses_or_picks_free_suffix() {
        let (_tmp, ws) = workspace();
        assert_eq!(ws.solution_path("clock", "a").unwrap(), ws.dir.join("clock"));

        mkdirs(&ws.dir, &["clock", "clock-2"]);
        write_metadata(&ws.dir.join("clock"), "a");
        write_metadata(&ws.dir.join("clock-2"), "b");

        assert_eq!(ws.solution_path("clock", "a").unwrap(), ws.dir.join("clock"));
        assert_eq!(ws.solution_path("clock", "b").unwrap(), ws.dir.join("clock-2"));
        assert_eq!(ws.solution_path("clock", "c").unwrap(), ws.dir.join("clock-3"));
    }
}
