//! client-core: Shared infrastructure for the counselor client crates.
pub mod config;
pub mod error;
pub mod observability;

pub use reqwest;
pub use serde;
pub use serde_json;
pub use tracing;
pub use validator;

pub use error::ApiError;
