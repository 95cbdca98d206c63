//! EntityApi: generic CRUD client per resource path, plus adapters and the relation registry.

pub mod adapters;
mod api;
mod registry;

pub use api::{normalize_path, CrudSource, EntityApi, EntityApiBuilder, EntityId};
pub use registry::{ApiRegistry, RelationSource};
