//! Credential handling.

pub mod credentials;

pub use credentials::{BackendCredentials, SecretString, API_KEY_ENV};
