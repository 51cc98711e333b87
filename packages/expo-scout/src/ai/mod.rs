//! Search backend implementations.
//!
//! This module provides reference implementations of the `SearchBackend`
//! trait. Users can use these directly or implement their own.

pub mod rate_limited;

#[cfg(feature = "openai")]
mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAISearch, DEFAULT_BASE_URL, DEFAULT_MODEL};

pub use rate_limited::{RateLimitedBackend, SearchBackendExt};
