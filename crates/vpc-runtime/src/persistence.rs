#![forbid(unsafe_code)]

//! Durable key/value storage seam.
//!
//! The browser's `localStorage` can be missing, full, or denied (privacy
//! mode, sandboxed iframes). Callers therefore treat every operation as
//! fallible and degrade to in-memory state on error; nothing here is fatal.
//!
//! # Backends
//!
//! | Backend           | Use                                   |
//! |-------------------|---------------------------------------|
//! | [`MemoryStorage`] | tests, server-side rendering          |
//! | [`NoopStorage`]   | default when no storage is injected   |
//! | `vpc_web::LocalStorage` | browser `window.localStorage`   |

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Failure talking to a storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backend does not exist or refused access entirely.
    Unavailable(String),
    /// A read for `key` failed.
    Read { key: String, reason: String },
    /// A write for `key` failed (quota, permissions).
    Write { key: String, reason: String },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(reason) => write!(f, "storage unavailable: {reason}"),
            Self::Read { key, reason } => write!(f, "failed to read {key:?}: {reason}"),
            Self::Write { key, reason } => write!(f, "failed to write {key:?}: {reason}"),
        }
    }
}

impl std::error::Error for StorageError {}

pub type StorageResult<T> = Result<T, StorageError>;

/// Plain-text key/value storage that outlives a single page load.
pub trait DurableStorage {
    /// Read `key`. `Ok(None)` means the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite `key` with `value`.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

/// Storage that remembers nothing and never fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopStorage;

impl DurableStorage for NoopStorage {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    entries: HashMap<String, String>,
    unavailable: bool,
    writes: u64,
}

/// In-memory storage.
///
/// Cloning shares the same entries, so a test can keep a handle after
/// moving a clone into a store. [`set_unavailable`](Self::set_unavailable)
/// makes every operation fail, which mirrors a browser denying access.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with the given entries.
    #[must_use]
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let storage = Self::new();
        {
            let mut inner = storage.inner.borrow_mut();
            for (key, value) in entries {
                inner.entries.insert(key.to_string(), value.to_string());
            }
        }
        storage
    }

    /// Toggle simulated unavailability.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.borrow_mut().unavailable = unavailable;
    }

    pub fn remove(&self, key: &str) {
        self.inner.borrow_mut().entries.remove(key);
    }

    pub fn clear(&self) {
        self.inner.borrow_mut().entries.clear();
    }

    /// Peek at a value regardless of simulated unavailability.
    #[must_use]
    pub fn peek(&self, key: &str) -> Option<String> {
        self.inner.borrow().entries.get(key).cloned()
    }

    /// Number of successful writes so far.
    #[must_use]
    pub fn write_count(&self) -> u64 {
        self.inner.borrow().writes
    }
}

impl DurableStorage for MemoryStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let inner = self.inner.borrow();
        if inner.unavailable {
            return Err(StorageError::Read {
                key: key.to_string(),
                reason: "access denied".into(),
            });
        }
        Ok(inner.entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut inner = self.inner.borrow_mut();
        if inner.unavailable {
            return Err(StorageError::Write {
                key: key.to_string(),
                reason: "access denied".into(),
            });
        }
        inner.entries.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("k"), Ok(None));
        storage.set("k", "v").expect("write");
        assert_eq!(storage.get("k"), Ok(Some("v".into())));
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn clones_share_entries() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();
        storage.set("vpc_theme", "light").expect("write");
        assert_eq!(handle.peek("vpc_theme").as_deref(), Some("light"));
        handle.clear();
        assert_eq!(storage.get("vpc_theme"), Ok(None));
    }

    #[test]
    fn unavailable_storage_fails_both_ways() {
        let storage = MemoryStorage::with_entries([("k", "v")]);
        storage.set_unavailable(true);
        assert!(matches!(storage.get("k"), Err(StorageError::Read { .. })));
        assert!(matches!(storage.set("k", "w"), Err(StorageError::Write { .. })));
        assert_eq!(storage.peek("k").as_deref(), Some("v"));
        storage.set_unavailable(false);
        assert_eq!(storage.get("k"), Ok(Some("v".into())));
    }

    #[test]
    fn noop_storage_never_remembers() {
        let storage = NoopStorage;
        storage.set("k", "v").expect("noop write");
        assert_eq!(storage.get("k"), Ok(None));
    }

    #[test]
    fn error_display_names_key() {
        let err = StorageError::Write {
            key: "vpc_theme".into(),
            reason: "quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "failed to write \"vpc_theme\": quota exceeded");
    }
}
