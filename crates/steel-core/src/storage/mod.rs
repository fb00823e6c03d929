//! Storage boundary for per-board data.

#[cfg(not(target_arch = "wasm32"))]
mod file;
mod memory;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::board::BoardId;
use crate::session::BoardData;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Board not found: {0}")]
    NotFound(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Trait for board data storage backends.
///
/// Browser extension storage, files or a test map all fit behind it.
///
/// Note: On native platforms, implementations must be Send + Sync.
/// On WASM, these bounds are relaxed since it's single-threaded.
#[cfg(not(target_arch = "wasm32"))]
pub trait Storage: Send + Sync {
    /// Save a board's data.
    fn save(&self, board: &BoardId, data: &BoardData) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a board's data.
    fn load(&self, board: &BoardId) -> BoxFuture<'_, StorageResult<BoardData>>;

    /// Delete a board's data.
    fn delete(&self, board: &BoardId) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored boards.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<BoardId>>>;
}

/// Trait for board data storage backends (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait Storage {
    /// Save a board's data.
    fn save(&self, board: &BoardId, data: &BoardData) -> BoxFuture<'_, StorageResult<()>>;

    /// Load a board's data.
    fn load(&self, board: &BoardId) -> BoxFuture<'_, StorageResult<BoardData>>;

    /// Delete a board's data.
    fn delete(&self, board: &BoardId) -> BoxFuture<'_, StorageResult<()>>;

    /// List all stored boards.
    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<BoardId>>>;
}
