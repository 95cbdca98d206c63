//! HTTP client boundary. The core only needs GET/POST/PUT/DELETE with query parameters and
//! JSON bodies; retries, auth headers and timeouts belong to the implementation.

mod reqwest_client;
mod router;

pub use reqwest_client::ReqwestClient;
pub use router::RouterClient;

use crate::error::ApiError;
use async_trait::async_trait;
use http::Method;
use serde_json::Value;

/// Status and raw body of a completed request.
#[derive(Clone, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Non-2xx becomes `ApiError::Http` carrying status and body.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Http {
                status: self.status,
                body: String::from_utf8_lossy(&self.body).into_owned(),
            })
        }
    }

    /// Parse the body as JSON; an empty body is `null`.
    pub fn json(&self) -> Result<Value, ApiError> {
        if self.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_slice(&self.body)?)
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a request against `path` (relative to the client's base). Implementations must
    /// return `ApiError::Http` for non-2xx responses.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<Value>,
    ) -> Result<HttpResponse, ApiError>;

    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<HttpResponse, ApiError> {
        self.request(Method::GET, path, query, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<HttpResponse, ApiError> {
        self.request(Method::POST, path, &[], Some(body)).await
    }

    async fn put(&self, path: &str, body: Value) -> Result<HttpResponse, ApiError> {
        self.request(Method::PUT, path, &[], Some(body)).await
    }

    async fn delete(&self, path: &str) -> Result<HttpResponse, ApiError> {
        self.request(Method::DELETE, path, &[], None).await
    }
}

/// `path?k=v&...` with form-urlencoded parameters.
pub(crate) fn path_and_query(path: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return path.to_string();
    }
    let qs = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(query.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .finish();
    format!("{}?{}", path, qs)
}
