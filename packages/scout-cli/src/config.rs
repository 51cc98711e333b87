use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use expo_scout::ai::{OpenAISearch, RateLimitedBackend, DEFAULT_BASE_URL, DEFAULT_MODEL};
use expo_scout::{
    BackendCredentials, FileStore, KeyValueStore, ScoutConfig, SecretString, SqliteStore,
};

/// Settings loaded from environment variables, overridable by flags.
///
/// `.env` is read before parsing, so its values act as defaults too.
#[derive(Debug, Clone, Args)]
pub struct Settings {
    /// Search backend API key
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<SecretString>,

    /// Chat model used for searches
    #[arg(long, env = "SCOUT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// OpenAI-compatible API base URL
    #[arg(long, env = "SCOUT_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory holding the persisted catalog
    #[arg(long, env = "SCOUT_DATA_DIR", default_value = "./.expo-scout")]
    pub data_dir: PathBuf,

    /// Keep the catalog in a SQLite database inside the data directory
    #[arg(long)]
    pub sqlite: bool,

    /// Concurrent shallow-enrichment workers
    #[arg(long, env = "SCOUT_WORKERS", default_value_t = 3)]
    pub workers: usize,

    /// Backend request limit per minute (unlimited when unset)
    #[arg(long, env = "SCOUT_REQUESTS_PER_MINUTE")]
    pub requests_per_minute: Option<u32>,

    /// Disable web search options (for models without search support)
    #[arg(long)]
    pub no_web_search: bool,
}

/// The backend used by the CLI.
pub type Backend = RateLimitedBackend<OpenAISearch>;

impl Settings {
    pub fn scout_config(&self) -> ScoutConfig {
        ScoutConfig::new().with_enrichment_workers(self.workers)
    }

    /// Build the search backend. Fails when no API key is configured.
    pub fn backend(&self) -> Result<Backend> {
        let api_key = self.api_key.clone().unwrap_or_else(|| SecretString::new(""));
        let credentials = BackendCredentials::new(api_key, &self.model)
            .context("OPENAI_API_KEY must be set")?
            .with_base_url(&self.base_url);
        let search =
            OpenAISearch::from_credentials(credentials).with_web_search(!self.no_web_search);

        // Without a limit the quota is high enough never to bind.
        let per_minute = self.requests_per_minute.unwrap_or(u32::MAX);
        RateLimitedBackend::new(search, per_minute)
            .context("SCOUT_REQUESTS_PER_MINUTE must be > 0")
    }

    /// Open the configured catalog store.
    pub async fn store(&self) -> Result<Arc<dyn KeyValueStore>> {
        if self.sqlite {
            tokio::fs::create_dir_all(&self.data_dir)
                .await
                .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;
            let url = format!("sqlite://{}?mode=rwc", self.data_dir.join("scout.db").display());
            let store = SqliteStore::new(&url)
                .await
                .with_context(|| format!("Failed to open {url}"))?;
            return Ok(Arc::new(store));
        }

        let store = FileStore::open(&self.data_dir)
            .await
            .with_context(|| format!("Failed to open {}", self.data_dir.display()))?;
        Ok(Arc::new(store))
    }
}
