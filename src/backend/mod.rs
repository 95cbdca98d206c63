//! In-memory REST backend serving the resource path convention the client speaks:
//! `GET /{c}` (search), `GET /{c}/{id}`, `POST /{c}`, `PUT /{c}/{id}`, `DELETE /{c}/{id}`.
//! Backs the demo console and end-to-end tests.

mod error;
mod handlers;
pub mod query;
mod routes;

pub use error::BackendError;
pub use routes::{common_routes, entity_routes};

use crate::codec::value_to_key;
use axum::Router;
use query::Row;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Wire shape a collection answers list queries with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListShape {
    #[default]
    Items,
    /// Legacy `{ content, ... }` envelope.
    Content,
    /// Unpaged bare array of every match.
    BareArray,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdKind {
    #[default]
    Sequence,
    Uuid,
}

#[derive(Clone, Debug)]
pub struct CollectionConfig {
    pub id_field: String,
    pub shape: ListShape,
    pub id_kind: IdKind,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            id_field: "id".into(),
            shape: ListShape::Items,
            id_kind: IdKind::Sequence,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Collection {
    pub(crate) config: CollectionConfig,
    pub(crate) rows: Vec<Row>,
    pub(crate) next_id: u64,
    pub(crate) fail_with: Option<u16>,
}

impl Collection {
    pub(crate) fn position(&self, id: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|r| r.get(&self.config.id_field).map(value_to_key).as_deref() == Some(id))
    }
}

/// Shared backend state. Cloning shares the same collections.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a collection (replacing any existing one of that name).
    pub fn with_collection(self, name: &str, config: CollectionConfig) -> Self {
        self.write().insert(
            name.to_string(),
            Collection {
                config,
                next_id: 1,
                ..Collection::default()
            },
        );
        self
    }

    /// Insert rows as-is; rows without an id get one assigned.
    pub fn seed(&self, name: &str, rows: Vec<Value>) -> Result<(), BackendError> {
        let mut guard = self.write();
        let coll = guard
            .get_mut(name)
            .ok_or_else(|| BackendError::NotFound(name.to_string()))?;
        for v in rows {
            let Value::Object(mut row) = v else {
                return Err(BackendError::BadRequest("seed rows must be objects".into()));
            };
            if !row.contains_key(&coll.config.id_field) {
                let id = handlers::next_id(coll);
                row.insert(coll.config.id_field.clone(), id);
            } else if let Some(n) = row.get(&coll.config.id_field).and_then(Value::as_u64) {
                coll.next_id = coll.next_id.max(n + 1);
            }
            coll.rows.push(row);
        }
        Ok(())
    }

    /// Make every request against `name` fail with `status` until cleared with `None`.
    pub fn fail_with(&self, name: &str, status: Option<u16>) {
        if let Some(c) = self.write().get_mut(name) {
            c.fail_with = status;
        }
    }

    pub fn len(&self, name: &str) -> usize {
        self.read().get(name).map(|c| c.rows.len()).unwrap_or(0)
    }

    /// Entity routes plus health/version.
    pub fn router(&self) -> Router {
        Router::new()
            .merge(common_routes())
            .merge(entity_routes(self.clone()))
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Collection>> {
        self.collections.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Collection>> {
        self.collections.write().unwrap_or_else(PoisonError::into_inner)
    }
}
