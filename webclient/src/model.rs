use crate::error::*;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, time::Duration};

pub use reqwest::Url;

pub type UtcDateTime = chrono::DateTime<chrono::Utc>;

/// Response body of `GET /solutions/{uuid|latest}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SolutionPayload {
    pub solution: Solution,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Solution {
    pub id: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub team: Option<Team>,
    pub user: SolutionUser,
    pub exercise: ExerciseInfo,
    #[serde(default)]
    pub file_download_base_url: String,
    #[serde(default)]
    pub files: Vec<String>,
    #[serde(default)]
    pub iteration: Option<Iteration>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Team {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SolutionUser {
    pub handle: String,
    pub is_requester: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExerciseInfo {
    pub id: String,
    #[serde(default)]
    pub instructions_url: String,
    #[serde(default)]
    pub auto_approve: bool,
    pub track: TrackInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackInfo {
    pub id: String,
    #[serde(default)]
    pub language: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Iteration {
    pub submitted_at: Option<UtcDateTime>,
}

impl Solution {
    pub fn team_slug(&self) -> &str {
        self.team.as_ref().map_or("", |t| t.slug.as_str())
    }

    pub fn submitted_at(&self) -> Option<UtcDateTime> {
        self.iteration.as_ref().and_then(|it| it.submitted_at)
    }

    /// Pairs of (path as listed by the server, absolute download URL).
    pub fn file_urls(&self) -> Vec<(&str, String)> {
        self.files
            .iter()
            .map(|f| (f.as_str(), format!("{}{}", self.file_download_base_url, f)))
            .collect()
    }
}

/// Error body the API returns on 4xx.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub possible_track_ids: Vec<String>,
}

/// Which solution to fetch.
/// Either a solution `uuid`, or an `exercise` slug optionally scoped by `track` and `team`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SolutionRequest {
    pub uuid: Option<String>,
    pub exercise: Option<String>,
    pub track: Option<String>,
    pub team: Option<String>,
}

impl SolutionRequest {
    pub fn by_uuid(uuid: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            ..Default::default()
        }
    }

    pub fn by_exercise(exercise: impl Into<String>) -> Self {
        Self {
            exercise: Some(exercise.into()),
            ..Default::default()
        }
    }

    pub fn track(mut self, track: impl Into<String>) -> Self {
        self.track = Some(track.into());
        self
    }

    pub fn team(mut self, team: impl Into<String>) -> Self {
        self.team = Some(team.into());
        self
    }
}

/// One file of a submission.
/// `name` is the exercise-relative path with forward slashes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub contents: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PingResult {
    pub service: String,
    pub url: String,
    pub status: String,
    pub latency: Duration,
}

#[async_trait]
pub trait Client: Send + Sync {
    fn base_url(&self) -> &Url;

    async fn fetch_solution(&self, req: &SolutionRequest) -> Result<Solution>;

    /// Returns `None` when the server has no content for the file.
    async fn download_file(&self, url: &str) -> Result<Option<Vec<u8>>>;

    async fn submit(&self, solution_id: &str, files: &[UploadFile]) -> Result<()>;

    async fn validate_token(&self) -> Result<()>;
}
