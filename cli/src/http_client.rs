use anyhow::{Context, Result};
use percent_encoding::{percent_encode, NON_ALPHANUMERIC};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::Connection;
use crate::response::{scalar_text, ApiResponse};

/// Failure reported by the API layer.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{}", status_line(.status, .code.as_deref(), .message.as_deref(), .body))]
    Status {
        status: u16,
        code: Option<String>,
        message: Option<String>,
        body: String,
    },

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

fn status_line(status: &u16, code: Option<&str>, message: Option<&str>, body: &str) -> String {
    match (code, message) {
        (Some(c), Some(m)) => format!("{status} {c}: {m}"),
        (None, Some(m)) => format!("{status}: {m}"),
        _ => format!("{status}: {body}"),
    }
}

impl ApiError {
    fn from_response(resp: ApiResponse) -> Self {
        let parsed = serde_json::from_str::<serde_json::Value>(&resp.body).ok();
        let field = |key: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(key))
                .filter(|v| !v.is_null())
                .map(scalar_text)
        };
        let (code, message) = (field("code"), field("message"));
        Self::Status {
            status: resp.status,
            code,
            message,
            body: resp.body,
        }
    }
}

pub struct Client {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl Client {
    pub fn new(conn: &Connection, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("deployctl/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: conn.base_url.clone(),
            token: conn.token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "request");
        let req = self.http.request(method, url);
        match &self.token {
            Some(t) => req.bearer_auth(t),
            None => req,
        }
    }

    /// Send and capture status plus body, whatever the status.
    pub async fn send_raw(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<ApiResponse, ApiError> {
        let resp = self.request(method, path).query(query).send().await?;
        let resp = ApiResponse::read(resp).await?;
        debug!(status = resp.status, bytes = resp.body.len(), "response");
        Ok(resp)
    }

    /// Send and decode a successful JSON body; non-2xx/3xx become
    /// [`ApiError::Status`].
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let resp = self.send_raw(Method::GET, path, query).await?;
        if !resp.is_ok() {
            return Err(ApiError::from_response(resp));
        }
        Ok(serde_json::from_str(&resp.body)?)
    }
}

/// Encode one path segment, e.g. a deployment name.
pub fn encode_segment(segment: &str) -> String {
    percent_encode(segment.as_bytes(), NON_ALPHANUMERIC).to_string()
}
