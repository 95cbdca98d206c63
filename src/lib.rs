//! Admin console SDK: schema-driven CRUD tables over the training platform's REST API.

pub mod backend;
pub mod codec;
pub mod config;
pub mod envelope;
pub mod error;
pub mod http;
pub mod logging;
pub mod resources;
pub mod schema;
pub mod service;
pub mod table;

pub use codec::{build_page_params, Filter, PaginationRequest, SortDirection, SortEntry};
pub use config::ClientConfig;
pub use envelope::{decode_page, normalize, PageResponse};
pub use error::{ApiError, ConfigError, ErrorKind};
pub use http::{HttpClient, HttpResponse, ReqwestClient, RouterClient};
pub use schema::{resolve, EntitySchema, FieldSchema, FieldType, FilterType, ResolvedSchema};
pub use service::{ApiRegistry, CrudSource, EntityApi, RelationSource};
pub use table::{FetchOutcome, SelectionPolicy, TableController, TableStatus, TableView};
