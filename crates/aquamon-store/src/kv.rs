//! The opaque key-value persistence substrate.
//!
//! Notifications and history are serialized as JSON strings under stable
//! keys. The substrate contract is deliberately small: `get`/`put`/
//! `remove` by key, with "durable enough" semantics. Write failures are
//! logged and swallowed; the periodic monitoring loop re-persists on the
//! next mutation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, warn};

/// An opaque string store addressed by key.
///
/// Implementations must tolerate concurrent callers (`&self` methods) and
/// must never panic on missing or unreadable entries.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, or `None` if absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &str);

    /// Remove the entry under `key`. Removing a missing key is a no-op.
    fn remove(&self, key: &str);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) {
        (**self).put(key, value);
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

/// In-memory store, used for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().expect("store mutex poisoned").len()
    }

    /// Whether the store holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }

    fn put(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries
            .lock()
            .expect("store mutex poisoned")
            .remove(key);
    }
}

/// File-backed store: one file per sanitized key under a root directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a file store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory cannot be
    /// created.
    pub fn open<P: AsRef<Path>>(root: P) -> std::io::Result<Self> {
        let root = root.as_ref().to_path_buf();
        std::fs::create_dir_all(&root)?;
        info!("Opened file store at {}", root.display());
        Ok(Self { root })
    }

    /// Open the default data directory.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the directory cannot be
    /// created.
    pub fn open_default() -> std::io::Result<Self> {
        Self::open(default_data_dir())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
            .collect();
        self.root.join(format!("{sanitized}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Treating unreadable entry {} as absent: {}", path.display(), e);
                None
            }
        }
    }

    fn put(&self, key: &str, value: &str) {
        let path = self.path_for(key);
        if let Err(e) = std::fs::write(&path, value) {
            // Durable-enough: the next mutation re-persists the full state.
            warn!("Failed to persist {}: {}", path.display(), e);
        } else {
            debug!("Persisted {} ({} bytes)", path.display(), value.len());
        }
    }

    fn remove(&self, key: &str) {
        let path = self.path_for(key);
        if let Err(e) = std::fs::remove_file(&path)
            && e.kind() != std::io::ErrorKind::NotFound
        {
            warn!("Failed to remove {}: {}", path.display(), e);
        }
    }
}

/// Default data directory following platform conventions.
///
/// - Linux: `~/.local/share/aquamon`
/// - macOS: `~/Library/Application Support/aquamon`
/// - Windows: `C:\Users\<user>\AppData\Local\aquamon`
#[must_use]
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("aquamon")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").is_none());

        store.put("a", "1");
        assert_eq!(store.get("a").as_deref(), Some("1"));

        store.put("a", "2");
        assert_eq!(store.get("a").as_deref(), Some("2"));

        store.remove("a");
        assert!(store.get("a").is_none());
    }

    #[test]
    fn test_memory_store_remove_missing_is_noop() {
        let store = MemoryStore::new();
        store.remove("never-existed");
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.put("basin-history-b1", "[]");
        assert_eq!(store.get("basin-history-b1").as_deref(), Some("[]"));

        store.remove("basin-history-b1");
        assert!(store.get("basin-history-b1").is_none());
    }

    #[test]
    fn test_file_store_sanitizes_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.put("weird/key with spaces", "v");
        assert_eq!(store.get("weird/key with spaces").as_deref(), Some("v"));

        // No path traversal: everything stays under the root.
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_file_store_creates_root() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("deep").join("nested");
        let store = FileStore::open(&nested).unwrap();
        store.put("k", "v");
        assert!(nested.exists());
    }

    #[test]
    fn test_arc_forwarding() {
        let store = Arc::new(MemoryStore::new());
        let clone = Arc::clone(&store);
        clone.put("shared", "yes");
        assert_eq!(store.get("shared").as_deref(), Some("yes"));
    }

    #[test]
    fn test_default_data_dir_ends_with_app_name() {
        assert!(default_data_dir().ends_with("aquamon"));
    }
}
