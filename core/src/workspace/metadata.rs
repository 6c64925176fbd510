use std::{
    fmt,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{error::Result, Exercise};

/// The record binding a directory to a solution on the server.
/// Persisted as `.exercism/metadata.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseMetadata {
    pub track: String,

    #[serde(rename = "exercise")]
    pub exercise_slug: String,

    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub team: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub handle: String,

    #[serde(default)]
    pub is_requester: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub auto_approve: bool,

    /// Directory this record was read from or written to.
    #[serde(skip)]
    pub dir: PathBuf,
}

impl ExerciseMetadata {
    pub const METADATA_DIR: &str = ".exercism";
    pub const METADATA_FILENAME: &str = "metadata.json";
    pub const LEGACY_METADATA_FILENAME: &str = ".solution.json";

    pub fn filepath_in(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref()
            .join(Self::METADATA_DIR)
            .join(Self::METADATA_FILENAME)
    }

    pub fn legacy_filepath_in(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(Self::LEGACY_METADATA_FILENAME)
    }

    #[must_use]
    pub fn read(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut metadata: Self = fsutil::read_json_with_deserialize(Self::filepath_in(dir))?;
        metadata.dir = dir.to_owned();
        Ok(metadata)
    }

    #[must_use]
    pub fn read_legacy(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut metadata: Self =
            fsutil::read_json_with_deserialize(Self::legacy_filepath_in(dir))?;
        metadata.dir = dir.to_owned();
        Ok(metadata)
    }

    /// Writes the record readable by the owner only.
    #[must_use]
    pub fn write(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fsutil::write_json_private_with_mkdir(Self::filepath_in(dir), self)?;
        self.dir = dir.to_owned();
        Ok(())
    }

    /// Disambiguating part of the directory name, e.g. `"2"` for `clock-2`.
    pub fn suffix(&self) -> String {
        let base = self
            .dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        base.replacen(&self.exercise_slug, "", 1)
            .trim_matches(|c| c == '-' || c == '.')
            .to_owned()
    }

    /// Where the solution lives inside the workspace `ws`.
    ///
    /// Team solutions go under `teams/<team>`, other users' solutions under
    /// `users/<handle>`.
    pub fn exercise(&self, ws: impl AsRef<Path>) -> Exercise {
        let ws = ws.as_ref();
        let root = if !self.team.is_empty() {
            ws.join("teams").join(&self.team)
        } else if !self.is_requester {
            ws.join("users").join(&self.handle)
        } else {
            ws.to_owned()
        };
        Exercise::new(root, &self.track, &self.exercise_slug)
    }
}

impl fmt::Display for ExerciseMetadata {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.track, self.exercise_slug)?;
        let suffix = self.suffix();
        if !suffix.is_empty() {
            write!(f, " ({})", suffix)?;
        }
        if !self.is_requester && !self.handle.is_empty() {
            write!(f, " by @{}", self.handle)?;
        }
        Ok(())
    }
}
