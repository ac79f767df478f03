//! HTTP client layer: request execution, de-duplication, token storage
//! and typed endpoint wrappers.

pub mod endpoints;
pub mod error;
pub mod http;
pub mod token_store;

pub use error::ApiError;
pub use http::{ApiClient, RequestOptions, request_key};
pub use token_store::{FileTokenStore, MemoryTokenStore, TOKEN_STORAGE_KEY, TokenStore};
