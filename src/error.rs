//! Typed errors for schema/factory construction and API calls.

use thiserror::Error;

/// Construction-time errors. Never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("http client is required")]
    MissingClient,
    #[error("resource path is required")]
    MissingPath,
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    #[error("config load: {0}")]
    Load(String),
}

/// Coarse classification used by callers to pick a user-facing message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Validation,
    Http,
    Transport,
    Decode,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("validation: {0}")]
    Validation(String),
    #[error("http {status}: {body}")]
    Http { status: u16, body: String },
    #[error("transport: {0}")]
    Transport(String),
    #[error("decode: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Config(_) => ErrorKind::Config,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::Transport(_) => ErrorKind::Transport,
            ApiError::Decode(_) => ErrorKind::Decode,
        }
    }

    /// HTTP status for server errors, `None` for anything raised client-side.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Http { body, .. } => Some(body.as_str()),
            _ => None,
        }
    }

    /// Best-effort human message: the `error.message` field of a JSON error body when present.
    pub fn message(&self) -> String {
        if let ApiError::Http { body, .. } = self {
            if let Ok(v) = serde_json::from_str::<serde_json::Value>(body) {
                if let Some(m) = v.pointer("/error/message").and_then(|m| m.as_str()) {
                    return m.to_string();
                }
                if let Some(m) = v.get("message").and_then(|m| m.as_str()) {
                    return m.to_string();
                }
            }
        }
        self.to_string()
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_exposes_status_and_body() {
        let e = ApiError::Http {
            status: 409,
            body: r#"{"error":{"code":"conflict","message":"email taken"}}"#.into(),
        };
        assert_eq!(e.kind(), ErrorKind::Http);
        assert_eq!(e.status(), Some(409));
        assert!(e.body().unwrap().contains("conflict"));
        assert_eq!(e.message(), "email taken");
    }

    #[test]
    fn validation_error_has_no_status() {
        let e = ApiError::Validation("id is required".into());
        assert_eq!(e.status(), None);
        assert_eq!(e.message(), "validation: id is required");
    }

    #[test]
    fn config_error_converts() {
        let e: ApiError = ConfigError::MissingPath.into();
        assert_eq!(e.kind(), ErrorKind::Config);
    }
}
