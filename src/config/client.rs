//! Client configuration from the environment (`.env` honoured).

use crate::codec::DEFAULT_PAGE_SIZE;
use crate::error::ConfigError;
use crate::table::SelectionPolicy;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";
const MAX_PAGE_SIZE: u32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_prefix: String,
    /// Bearer token attached by `ReqwestClient`; storage and refresh are the caller's business.
    pub token: Option<String>,
    pub default_page_size: u32,
    pub selection_policy: SelectionPolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            token: None,
            default_page_size: DEFAULT_PAGE_SIZE,
            selection_policy: SelectionPolicy::Retain,
        }
    }
}

impl ClientConfig {
    /// Load `.env` if present, then read `ADMIN_*` variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();
        if let Some(v) = lookup("ADMIN_API_BASE_URL").filter(|v| !v.trim().is_empty()) {
            if !(v.starts_with("http://") || v.starts_with("https://")) {
                return Err(ConfigError::Load(format!(
                    "ADMIN_API_BASE_URL must be an http(s) url, got '{}'",
                    v
                )));
            }
            cfg.base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("ADMIN_API_PREFIX") {
            let v = v.trim().trim_matches('/');
            cfg.api_prefix = if v.is_empty() { String::new() } else { format!("/{}", v) };
        }
        cfg.token = lookup("ADMIN_API_TOKEN").filter(|t| !t.trim().is_empty());
        if let Some(v) = lookup("ADMIN_DEFAULT_PAGE_SIZE") {
            let n: u32 = v
                .trim()
                .parse()
                .map_err(|_| ConfigError::Load(format!("ADMIN_DEFAULT_PAGE_SIZE: invalid number '{}'", v)))?;
            if n == 0 || n > MAX_PAGE_SIZE {
                return Err(ConfigError::Load(format!(
                    "ADMIN_DEFAULT_PAGE_SIZE must be between 1 and {}",
                    MAX_PAGE_SIZE
                )));
            }
            cfg.default_page_size = n;
        }
        if let Some(v) = lookup("ADMIN_SELECTION_POLICY") {
            cfg.selection_policy = v.parse()?;
        }
        Ok(cfg)
    }
}
