//! moviecat library
//!
//! A cached, retrying client for the TMDB movie catalog. The modules are public
//! so the binary and the integration tests can share them.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod output;
pub mod retry;

pub use cache::{QueryKey, ResponseCache};
pub use config::{Config, ConfigError};
pub use data::{CatalogError, MovieClient};
pub use retry::{with_retry, with_retry_if, RetryPolicy};
