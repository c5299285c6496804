// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Persistent key-value storage with change detection
//!
//! The host's persistent store is abstracted behind [`KeyValueStore`].
//! [`ChangeDetectingStore`] wraps any implementation and reports whether a
//! write replaced a different value, which decides whether to notify.

mod file;
mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Fixed store keys for the salt capture
pub mod keys {
    pub const SALT: &str = "KS_API_CLIENT_SALT";
    pub const USER_ID: &str = "KS_USER_ID";
    pub const USER_NAME: &str = "KS_USER_NAME";
    pub const USER_HEAD_URL: &str = "KS_USER_HEADURL";
    pub const MIN_INFO: &str = "KS_MIN_INFO";
}

/// String-keyed, string-valued persistent store supplied by the host
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn read(&self, key: &str) -> Result<Option<String>> {
        (**self).read(key)
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        (**self).write(key, value)
    }
}

/// Result of a change-detected write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOutcome {
    /// The new value differs from the previous one (absent counts as different)
    pub changed: bool,
    /// Value stored before this write
    pub previous: Option<String>,
}

/// Store adapter that reads the previous value before every primary write
#[derive(Debug, Clone, Default)]
pub struct ChangeDetectingStore<S> {
    inner: S,
}

impl<S: KeyValueStore> ChangeDetectingStore<S> {
    /// Wrap a store
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Write `value` under `key` and report whether it changed.
    ///
    /// The write always happens, even when the value is unchanged.
    pub fn write_if_changed(&self, key: &str, value: &str) -> Result<WriteOutcome> {
        let previous = self.inner.read(key)?;
        self.inner.write(key, value)?;

        let changed = previous.as_deref() != Some(value);
        tracing::debug!(key, changed, had_previous = previous.is_some(), "Store write");

        Ok(WriteOutcome { changed, previous })
    }

    /// Unconditional write for auxiliary slots
    pub fn write(&self, key: &str, value: &str) -> Result<()> {
        self.inner.write(key, value)
    }

    /// Read through to the wrapped store
    pub fn read(&self, key: &str) -> Result<Option<String>> {
        self.inner.read(key)
    }

    /// Wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Memory store that counts writes
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: AtomicUsize,
    }

    impl KeyValueStore for CountingStore {
        fn read(&self, key: &str) -> Result<Option<String>> {
            self.inner.read(key)
        }

        fn write(&self, key: &str, value: &str) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.write(key, value)
        }
    }

    #[test]
    fn test_unchanged_value_still_written() {
        let store = ChangeDetectingStore::new(CountingStore::default());

        store.write_if_changed("k", "v1").unwrap();
        let second = store.write_if_changed("k", "v1").unwrap();

        assert!(!second.changed);
        assert_eq!(store.inner().writes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_same_value_twice() {
        let store = ChangeDetectingStore::new(MemoryStore::new());

        let first = store.write_if_changed("k", "v1").unwrap();
        assert!(first.changed);
        assert_eq!(first.previous, None);

        let second = store.write_if_changed("k", "v1").unwrap();
        assert!(!second.changed);
        assert_eq!(second.previous.as_deref(), Some("v1"));
    }

    #[test]
    fn test_different_value() {
        let store = ChangeDetectingStore::new(MemoryStore::new());
        store.write_if_changed("k", "v1").unwrap();

        let outcome = store.write_if_changed("k", "v2").unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.previous.as_deref(), Some("v1"));
        assert_eq!(store.read("k").unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_absent_differs_from_empty() {
        let store = ChangeDetectingStore::new(MemoryStore::new());

        assert!(store.write_if_changed("k", "").unwrap().changed);
        assert!(!store.write_if_changed("k", "").unwrap().changed);
    }

    #[test]
    fn test_shared_store() {
        let shared = std::sync::Arc::new(MemoryStore::new());
        let store = ChangeDetectingStore::new(shared.clone());

        store.write("aux", "1").unwrap();
        assert_eq!(shared.read("aux").unwrap().as_deref(), Some("1"));
    }
}
