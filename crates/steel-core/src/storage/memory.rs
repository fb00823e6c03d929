//! In-memory storage implementation.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::board::BoardId;
use crate::session::BoardData;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Entries are kept as JSON under `board:<id>` keys, mirroring how the
/// browser extension store lays them out.
#[derive(Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    /// Create a new empty memory storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw value under `key`, bypassing serialization.
    pub fn insert_raw(&self, key: impl Into<String>, value: impl Into<String>) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), value.into());
        }
    }
}

impl Storage for MemoryStorage {
    fn save(&self, board: &BoardId, data: &BoardData) -> BoxFuture<'_, StorageResult<()>> {
        let key = board.storage_key();
        let json = data.to_json();
        Box::pin(async move {
            let json = json.map_err(|e| StorageError::Serialization(e.to_string()))?;
            let mut entries = self.entries.write().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            entries.insert(key, json);
            Ok(())
        })
    }

    fn load(&self, board: &BoardId) -> BoxFuture<'_, StorageResult<BoardData>> {
        let key = board.storage_key();
        let id = board.to_string();
        Box::pin(async move {
            let entries = self.entries.read().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            let json = entries.get(&key).ok_or(StorageError::NotFound(id))?;
            BoardData::from_json(json).map_err(|e| StorageError::Serialization(e.to_string()))
        })
    }

    fn delete(&self, board: &BoardId) -> BoxFuture<'_, StorageResult<()>> {
        let key = board.storage_key();
        Box::pin(async move {
            let mut entries = self.entries.write().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            entries.remove(&key);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<BoardId>>> {
        Box::pin(async move {
            let entries = self.entries.read().map_err(|e| {
                StorageError::Other(format!("Lock error: {}", e))
            })?;
            Ok(entries.keys().filter_map(|k| BoardId::from_storage_key(k)).collect())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block_on<F: std::future::Future>(f: F) -> F::Output {
        // Simple blocking executor for tests
        use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

        fn dummy_raw_waker() -> RawWaker {
            fn no_op(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                dummy_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, no_op, no_op, no_op);
            RawWaker::new(std::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(dummy_raw_waker()) };
        let mut cx = Context::from_waker(&waker);
        let mut f = std::pin::pin!(f);

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {}
            }
        }
    }

    fn sample() -> BoardData {
        BoardData {
            names: vec!["Ann".into(), "Bo".into()],
            active_names: Some(vec!["Bo".into()]),
            last_winner: Some("Ann".into()),
        }
    }

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let board = BoardId::new("board-1");

        block_on(storage.save(&board, &sample())).unwrap();
        let loaded = block_on(storage.load(&board)).unwrap();

        assert_eq!(loaded, sample());
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load(&BoardId::new("board-404")));

        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_corrupt_entry() {
        let storage = MemoryStorage::new();
        storage.insert_raw("board:board-1", "{not json");
        let result = block_on(storage.load(&BoardId::new("board-1")));

        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[test]
    fn test_delete() {
        let storage = MemoryStorage::new();
        let board = BoardId::new("board-1");

        block_on(storage.save(&board, &sample())).unwrap();
        block_on(storage.delete(&board)).unwrap();
        assert!(block_on(storage.load(&board)).is_err());
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();

        block_on(storage.save(&BoardId::new("board-1"), &sample())).unwrap();
        block_on(storage.save(&BoardId::new("board-2"), &sample())).unwrap();
        storage.insert_raw("unrelated", "{}");

        let mut list = block_on(storage.list()).unwrap();
        list.sort();
        assert_eq!(list, vec![BoardId::new("board-1"), BoardId::new("board-2")]);
    }
}
