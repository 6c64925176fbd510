use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::Serialize;

pub use ::reqwest::{multipart, Error, IntoUrl, Method, Response};

/// Thin wrapper over `reqwest::Client` that stamps every request with the
/// user agent and (optionally) a bearer token, and logs the exchange.
#[derive(Debug, Clone)]
pub struct Client {
    inner: ::reqwest::Client,
}

pub struct RequestBuilder {
    inner: ::reqwest::RequestBuilder,
    method: Method,
}

macro_rules! emit_request_fn {
    ($method:ident, $m:expr) => {
        pub fn $method(&self, u: impl IntoUrl) -> RequestBuilder {
            RequestBuilder::new(self.inner.$method(u), $m)
        }
    };
}

impl Client {
    pub fn new(user_agent: &str, token: Option<&str>, timeout: Duration) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            if let Ok(mut v) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                v.set_sensitive(true);
                headers.insert(header::AUTHORIZATION, v);
            }
        }
        let inner = ::reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .gzip(true)
            .build()?;
        Ok(Self { inner })
    }

    emit_request_fn!(get, Method::GET);
    emit_request_fn!(patch, Method::PATCH);
}

impl RequestBuilder {
    fn new(b: ::reqwest::RequestBuilder, method: Method) -> Self {
        Self { inner: b, method }
    }

    pub async fn send(self) -> Result<Response, Error> {
        let (client, req) = self.inner.build_split();
        let req = req?;
        log::debug!("Request {} {}", self.method, req.url());
        let resp = client.execute(req).await?;
        log::debug!("Response StatusCode={}", resp.status().as_u16());
        Ok(resp)
    }

    pub fn query<T: Serialize + ?Sized>(mut self, query: &T) -> Self {
        self.inner = self.inner.query(query);
        self
    }

    pub fn multipart(mut self, form: multipart::Form) -> Self {
        self.inner = self.inner.multipart(form);
        self
    }
}
