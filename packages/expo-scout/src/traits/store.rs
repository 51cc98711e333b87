//! Persistence boundary for the catalog.
//!
//! The catalog lives in a key-value store as one serialized blob under a
//! fixed key. Stores know nothing about events; they move strings.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::Result;
use crate::types::catalog::Catalog;

/// A string key-value store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value for `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for `key` as a single write.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key).await
    }
}

/// Load the catalog stored under `key`.
///
/// A missing or unreadable blob is an empty catalog. Only a failing store
/// is an error.
pub async fn load_catalog<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Catalog> {
    Ok(store
        .get(key)
        .await?
        .map(|blob| Catalog::from_blob(&blob))
        .unwrap_or_default())
}

/// Persist `catalog` under `key` as one blob.
pub async fn save_catalog<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    catalog: &Catalog,
) -> Result<()> {
    let blob = catalog.to_blob()?;
    store.set(key, &blob).await
}
