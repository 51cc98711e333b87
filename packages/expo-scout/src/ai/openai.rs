//! OpenAI-compatible implementation of the search backend.
//!
//! Sends each request as one chat completion. Request kinds that need live
//! results carry `web_search_options`, which search-enabled models honor.
//!
//! # Example
//!
//! ```rust,ignore
//! use expo_scout::ai::OpenAISearch;
//!
//! let backend = OpenAISearch::from_env()?.with_model("gpt-4o-search-preview");
//! let scout = Scout::open(store, backend, ScoutConfig::default()).await?;
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, ScoutError};
use crate::security::{BackendCredentials, SecretString};
use crate::traits::backend::{SearchBackend, SearchRequest};

pub const DEFAULT_MODEL: &str = "gpt-4o-search-preview";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI chat-completions search backend.
#[derive(Clone, Debug)]
pub struct OpenAISearch {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    web_search: bool,
}

impl OpenAISearch {
    /// Create a backend with the given API key. A blank key is rejected.
    pub fn new(api_key: impl Into<SecretString>) -> Result<Self> {
        Ok(Self::from_credentials(BackendCredentials::new(
            api_key,
            DEFAULT_MODEL,
        )?))
    }

    /// Create from environment variable `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_credentials(BackendCredentials::from_env(
            DEFAULT_MODEL,
        )?))
    }

    pub fn from_credentials(credentials: BackendCredentials) -> Self {
        Self {
            client: Client::new(),
            api_key: credentials.api_key,
            model: credentials.model,
            base_url: credentials
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            web_search: true,
        }
    }

    /// Set the chat model (default: gpt-4o-search-preview).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for proxies or compatible providers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Enable or disable `web_search_options` on search requests.
    ///
    /// Models without search support reject the option.
    pub fn with_web_search(mut self, enabled: bool) -> Self {
        self.web_search = enabled;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: &SearchRequest) -> ChatRequest {
        let mut messages = Vec::with_capacity(2);
        if !request.system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: request.system.clone(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: request.prompt.clone(),
        });

        let web_search = self.web_search && request.kind.needs_web_search();
        ChatRequest {
            model: self.model.clone(),
            messages,
            web_search_options: web_search.then(WebSearchOptions::default),
        }
    }
}

#[async_trait]
impl SearchBackend for OpenAISearch {
    async fn search(&self, request: &SearchRequest) -> Result<String> {
        let body = self.build_request(request);
        debug!(
            kind = %request.kind,
            model = %self.model,
            web_search = body.web_search_options.is_some(),
            "Sending chat completion"
        );

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| ScoutError::Backend(Box::new(e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ScoutError::Backend(
                format!("OpenAI API error ({status}): {error_text}").into(),
            ));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(|e| ScoutError::Backend(Box::new(e)))?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ScoutError::Backend("No response from OpenAI".into()))
    }
}

// Request/response types

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    web_search_options: Option<WebSearchOptions>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Default, Serialize)]
struct WebSearchOptions {}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::backend::SearchKind;

    #[test]
    fn test_blank_key_rejected() {
        assert!(matches!(
            OpenAISearch::new(""),
            Err(ScoutError::MissingCredentials(_))
        ));
    }

    #[test]
    fn test_web_search_only_for_search_kinds() {
        let backend = OpenAISearch::new("sk-test").unwrap();

        let discovery = SearchRequest::new(SearchKind::Discovery, "Thailand")
            .with_system("sys")
            .with_prompt("find shows");
        let body = serde_json::to_value(backend.build_request(&discovery)).unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert!(body.get("web_search_options").is_some());

        let email = SearchRequest::new(SearchKind::EmailDraft, "Pack Expo").with_prompt("draft");
        let body = serde_json::to_value(backend.build_request(&email)).unwrap();
        assert!(body.get("web_search_options").is_none());
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_web_search_can_be_disabled() {
        let backend = OpenAISearch::new("sk-test")
            .unwrap()
            .with_web_search(false)
            .with_base_url("http://localhost:1234/v1/");
        let request = SearchRequest::new(SearchKind::DeepEnrichment, "Pack Expo");
        let body = serde_json::to_value(backend.build_request(&request)).unwrap();

        assert!(body.get("web_search_options").is_none());
        assert_eq!(backend.base_url, "http://localhost:1234/v1");
    }

    #[test]
    fn test_debug_redacts_key() {
        let backend = OpenAISearch::new("sk-very-secret").unwrap();
        assert!(!format!("{:?}", backend).contains("sk-very-secret"));
    }
}
