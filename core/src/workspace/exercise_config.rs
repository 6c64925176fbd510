use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::error::{Error, Result};

/// The exercise-authored `.exercism/config.json`. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExerciseConfig {
    #[serde(default)]
    pub files: ExerciseFiles,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ExerciseFiles {
    pub solution: Option<Vec<String>>,
    pub test: Option<Vec<String>>,
}

impl ExerciseConfig {
    pub const FILENAME: &str = "config.json";

    pub fn filepath_in(dir: impl AsRef<Path>) -> PathBuf {
        dir.as_ref().join(".exercism").join(Self::FILENAME)
    }

    #[must_use]
    pub fn read(dir: impl AsRef<Path>) -> Result<Self> {
        Ok(fsutil::read_json_with_deserialize(Self::filepath_in(dir))?)
    }

    pub fn solution_files(&self) -> Result<&[String]> {
        self.files
            .solution
            .as_deref()
            .ok_or(Error::MissingConfigKey("files.solution"))
    }

    pub fn test_files(&self) -> Result<&[String]> {
        self.files
            .test
            .as_deref()
            .ok_or(Error::MissingConfigKey("files.test"))
    }
}
