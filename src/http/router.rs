//! `HttpClient` that dispatches into an in-process axum `Router` (no sockets).

use super::{path_and_query, HttpClient, HttpResponse};
use crate::error::ApiError;
use async_trait::async_trait;
use axum::body::Body;
use axum::Router;
use http::{header, Method, Request};
use serde_json::Value;
use tower::ServiceExt;

#[derive(Clone)]
pub struct RouterClient {
    router: Router,
}

impl RouterClient {
    pub fn new(router: Router) -> Self {
        Self { router }
    }
}

#[async_trait]
impl HttpClient for RouterClient {
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<HttpResponse, ApiError> {
        let uri = path_and_query(path, query);
        let mut builder = Request::builder().method(method).uri(&uri);
        let body = match body {
            Some(v) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&v)?)
            }
            None => Body::empty(),
        };
        let req = builder
            .body(body)
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let resp = self
            .router
            .clone()
            .oneshot(req)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        HttpResponse {
            status,
            body: bytes.to_vec(),
        }
        .error_for_status()
    }
}
