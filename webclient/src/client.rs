use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::{
    error::*,
    http::{self, multipart, Response},
    model::*,
};

/// Everything the HTTP client needs, passed explicitly at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientContext {
    pub base_url: Url,
    pub token: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl ClientContext {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(base_url: &str, token: impl Into<String>, version: &str) -> Result<Self> {
        let base_url = parse_url(base_url.trim_end_matches('/'))?;
        Ok(Self {
            base_url,
            token: token.into(),
            user_agent: format!("exo-cli/{} ({}/{})", version, std::env::consts::OS, std::env::consts::ARCH),
            timeout: Self::DEFAULT_TIMEOUT,
        })
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `<base>/<path>` without doubling slashes.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

pub fn parse_url(url: impl AsRef<str>) -> Result<Url> {
    Url::parse(url.as_ref()).map_err(|e| Error::InvalidSyntaxUrl {
        url: url.as_ref().to_owned(),
        source: e,
    })
}

#[derive(Debug)]
pub struct ApiClient {
    ctx: ClientContext,
    http: http::Client,
}

impl ApiClient {
    pub fn new(ctx: ClientContext) -> Result<Self> {
        let http = http::Client::new(&ctx.user_agent, Some(&ctx.token), ctx.timeout)?;
        Ok(Self { ctx, http })
    }

    pub fn context(&self) -> &ClientContext {
        &self.ctx
    }

    /// Builds the URL and the query of a solution request.
    ///
    /// ```
    /// use exo_webclient::{ApiClient, ClientContext, SolutionRequest};
    ///
    /// let ctx = ClientContext::new("https://api.example.com/v1", "", "0.0.0").unwrap();
    /// let req = SolutionRequest::by_exercise("clock").track("go");
    /// let (url, query) = ApiClient::solution_url(&ctx, &req);
    /// assert_eq!(url, "https://api.example.com/v1/solutions/latest");
    /// assert_eq!(query, [("exercise_id", "clock".to_owned()), ("track_id", "go".to_owned())]);
    /// ```
    pub fn solution_url(
        ctx: &ClientContext,
        req: &SolutionRequest,
    ) -> (String, Vec<(&'static str, String)>) {
        let id = req.uuid.as_deref().unwrap_or("latest");
        let url = ctx.endpoint(&format!("solutions/{}", id));

        let mut query = Vec::new();
        if let Some(slug) = &req.exercise {
            query.push(("exercise_id", slug.to_owned()));
            if let Some(track) = &req.track {
                query.push(("track_id", track.to_owned()));
            }
            if let Some(team) = &req.team {
                query.push(("team_id", team.to_owned()));
            }
        }
        (url, query)
    }

    async fn check_response(resp: Response) -> Result<Response> {
        let status = resp.status();
        let requested_url = resp.url().to_string();
        if status.is_success() {
            return Ok(resp);
        }
        match status {
            StatusCode::UNAUTHORIZED => Err(Error::Unauthorized { requested_url }),
            StatusCode::INTERNAL_SERVER_ERROR => Err(Error::InternalServerError { requested_url }),
            _ => {
                let body = resp.text().await?;
                match serde_json::from_str::<ApiErrorBody>(&body) {
                    Ok(ApiErrorBody { error }) => Err(Error::Api {
                        status,
                        kind: error.kind,
                        message: error.message,
                    }),
                    Err(_) => Err(Error::UnexpectedResponseCode {
                        got: status,
                        requested_url,
                    }),
                }
            }
        }
    }
}

#[async_trait]
impl Client for ApiClient {
    fn base_url(&self) -> &Url {
        &self.ctx.base_url
    }

    async fn fetch_solution(&self, req: &SolutionRequest) -> Result<Solution> {
        let (url, query) = Self::solution_url(&self.ctx, req);
        let resp = self.http.get(&url).query(&query).send().await?;
        let resp = Self::check_response(resp).await?;
        let payload: SolutionPayload = serde_json::from_str(&resp.text().await?)?;
        Ok(payload.solution)
    }

    async fn download_file(&self, url: &str) -> Result<Option<Vec<u8>>> {
        let url = parse_url(url)?;
        let resp = self.http.get(url).send().await?;
        if resp.status() != StatusCode::OK {
            log::debug!("Skipping file (status {})", resp.status());
            return Ok(None);
        }
        let bytes = resp.bytes().await?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(bytes.to_vec()))
    }

    async fn submit(&self, solution_id: &str, files: &[UploadFile]) -> Result<()> {
        let url = self.ctx.endpoint(&format!("solutions/{}", solution_id));
        let form = files.iter().fold(multipart::Form::new(), |form, f| {
            let part = multipart::Part::bytes(f.contents.clone()).file_name(f.name.clone());
            form.part("files[]", part)
        });
        let resp = self.http.patch(&url).multipart(form).send().await?;
        Self::check_response(resp).await?;
        Ok(())
    }

    async fn validate_token(&self) -> Result<()> {
        let url = self.ctx.endpoint("validate_token");
        let resp = self.http.get(&url).send().await?;
        Self::check_response(resp).await?;
        Ok(())
    }
}

/// Checks whether `url` answers at all. Any HTTP response counts as "connected".
pub async fn ping(service: &str, url: &str, ctx: &ClientContext) -> PingResult {
    let started = Instant::now();
    let status = match http::Client::new(&ctx.user_agent, None, ctx.timeout) {
        Ok(c) => match c.get(url).send().await {
            Ok(_) => "connected".to_owned(),
            Err(e) => e.to_string(),
        },
        Err(e) => e.to_string(),
    };
    PingResult {
        service: service.to_owned(),
        url: url.to_owned(),
        status,
        latency: started.elapsed(),
    }
}
