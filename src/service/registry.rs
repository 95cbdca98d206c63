//! Named companion resources used to resolve relation fields.

use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Anything that can list candidate rows for a relation picker.
#[async_trait]
pub trait RelationSource: Send + Sync {
    /// Up to `size` rows as JSON objects, narrowed by `keyword` when non-blank.
    async fn options(&self, keyword: &str, size: u32) -> Result<Vec<Value>, ApiError>;
}

#[derive(Clone, Default)]
pub struct ApiRegistry {
    sources: HashMap<String, Arc<dyn RelationSource>>,
}

impl ApiRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, source: Arc<dyn RelationSource>) -> &mut Self {
        self.sources.insert(name.into(), source);
        self
    }

    pub fn with(mut self, name: impl Into<String>, source: Arc<dyn RelationSource>) -> Self {
        self.register(name, source);
        self
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn RelationSource>> {
        self.sources.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for ApiRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("ApiRegistry").field("sources", &names).finish()
    }
}
