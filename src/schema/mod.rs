//! Entity schema: authored types, validation, resolution into column rules.

pub mod loader;
pub mod resolved;
pub mod types;
pub mod validator;

pub use resolved::*;
pub use types::*;
pub use validator::*;
