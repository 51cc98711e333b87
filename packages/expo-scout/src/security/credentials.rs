//! Backend credentials held in secure memory.
//!
//! Uses the `secrecy` crate so API keys never end up in logs or error text.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use crate::error::{Result, ScoutError};

/// Environment variable holding the search backend API key.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use.
    ///
    /// Only call this when building an outgoing request.
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// True when the secret is empty or only whitespace.
    pub fn is_blank(&self) -> bool {
        self.expose().trim().is_empty()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Credentials for a search backend.
#[derive(Clone)]
pub struct BackendCredentials {
    pub api_key: SecretString,

    /// Model identifier
    pub model: String,

    /// API base URL, if not the provider default
    pub base_url: Option<String>,
}

impl BackendCredentials {
    /// Create credentials, rejecting a blank key.
    pub fn new(api_key: impl Into<SecretString>, model: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_blank() {
            return Err(ScoutError::MissingCredentials(format!(
                "{API_KEY_ENV} is empty"
            )));
        }
        Ok(Self {
            api_key,
            model: model.into(),
            base_url: None,
        })
    }

    /// Read the key from `OPENAI_API_KEY`.
    pub fn from_env(model: impl Into<String>) -> Result<Self> {
        let key = std::env::var(API_KEY_ENV)
            .map_err(|_| ScoutError::MissingCredentials(format!("{API_KEY_ENV} not set")))?;
        Self::new(key, model)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }
}

impl fmt::Debug for BackendCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendCredentials")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug_or_display() {
        let secret = SecretString::new("sk-super-secret-key");
        assert!(!format!("{:?}", secret).contains("sk-super"));
        assert_eq!(format!("{}", secret), "[REDACTED]");
        assert_eq!(secret.expose(), "sk-super-secret-key");
    }

    #[test]
    fn test_blank_key_is_missing_credentials() {
        assert!(matches!(
            BackendCredentials::new("  ", "gpt-4o"),
            Err(ScoutError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_credentials_debug_redacts_key() {
        let creds = BackendCredentials::new("sk-secret", "gpt-4o-search-preview")
            .unwrap()
            .with_base_url("http://localhost:8080/v1");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("gpt-4o-search-preview"));
        assert!(debug.contains("localhost"));
    }
}
