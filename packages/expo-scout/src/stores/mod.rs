//! Storage implementations for the catalog blob.
//!
//! Available backends:
//! - `MemoryStore` - In-memory storage (always available)
//! - `FileStore` - One JSON file per key in a directory (always available)
//! - `SqliteStore` - SQLite file-based storage (requires `sqlite` feature)

pub mod file;
pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::FileStore;
pub use memory::MemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;
