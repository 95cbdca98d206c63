//! `HttpClient` over reqwest against a remote base URL.

use super::{HttpClient, HttpResponse};
use crate::config::ClientConfig;
use crate::error::ApiError;
use async_trait::async_trait;
use http::Method;
use serde_json::Value;

pub struct ReqwestClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ReqwestClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        let base = format!(
            "{}{}",
            config.base_url.trim_end_matches('/'),
            config.api_prefix.trim_end_matches('/')
        );
        let mut c = Self::new(&base);
        c.token = config.token.clone();
        c
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<HttpResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%method, %url, "sending request");
        let mut req = self.client.request(method, &url);
        if !query.is_empty() {
            req = req.query(query);
        }
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(b) = &body {
            req = req.json(b);
        }
        let resp = req.send().await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?;
        let out = HttpResponse {
            status,
            body: bytes.to_vec(),
        };
        if !out.is_success() {
            tracing::warn!(status, %url, "request failed");
        }
        out.error_for_status()
    }
}
