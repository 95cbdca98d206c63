//! Load entity schemas authored as JSON and resolve them against a registry.

use crate::error::ConfigError;
use crate::schema::{resolve, EntitySchema, ResolvedSchema};
use crate::service::ApiRegistry;
use serde_json::Value;

/// Parse one schema document (`{ "entityName", "idField", "fields": [...] }`).
pub fn from_json(json: &str, registry: &ApiRegistry) -> Result<ResolvedSchema, ConfigError> {
    let schema: EntitySchema = serde_json::from_str(json).map_err(|e| ConfigError::Load(e.to_string()))?;
    resolve(&schema, registry)
}

/// Parse either a single schema object or an array of them.
pub fn from_value(value: Value, registry: &ApiRegistry) -> Result<Vec<ResolvedSchema>, ConfigError> {
    let schemas: Vec<EntitySchema> = match value {
        Value::Array(_) => serde_json::from_value(value),
        other => serde_json::from_value(other).map(|s| vec![s]),
    }
    .map_err(|e| ConfigError::Load(e.to_string()))?;
    schemas.iter().map(|s| resolve(s, registry)).collect()
}
