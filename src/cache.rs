use crate::models::{RawUser, UserIdentity};
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

// 1. SessionCache Contract
/// SessionCache
///
/// Defines the abstract contract for the persisted session cache: the
/// stand-in for the single local-storage key the browser application wrote.
/// The trait lets us swap the concrete implementation from the on-disk file
/// (FileSessionCache) to the in-memory variant (MemorySessionCache) during
/// testing without affecting the Session Store.
///
/// The cache is **advisory**: it is written synchronously on every Session
/// Store transition but is never authoritative over a fresh network
/// response, and every operation here is best-effort. A cache failure must
/// never surface to a caller.
pub trait SessionCache: Send + Sync {
    /// Reads the cached user record. Returns `None` when the cache is empty
    /// or its content is corrupt; corrupt content is discarded on the spot so
    /// the next read starts clean.
    fn load(&self) -> Option<RawUser>;

    /// Persists the normalized identity. Failures are logged and swallowed.
    fn save(&self, identity: &UserIdentity);

    /// Removes any persisted identity. Failures are logged and swallowed.
    fn clear(&self);
}

/// CacheState
///
/// The concrete type used to share the cache across the application state.
pub type CacheState = Arc<dyn SessionCache>;

// 2. The Real Implementation (On-Disk File)
/// FileSessionCache
///
/// Stores the JSON-serialized normalized identity in a single file under the
/// application data directory.
pub struct FileSessionCache {
    path: PathBuf,
}

impl FileSessionCache {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SessionCache for FileSessionCache {
    /// load
    ///
    /// A missing file is the normal logged-out state. Unreadable or
    /// unparsable content is treated as corrupt: the file is removed and the
    /// read behaves as if the cache were empty.
    fn load(&self) -> Option<RawUser> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(_) => return None,
        };

        match serde_json::from_str::<RawUser>(&content) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!("discarding corrupt session cache: {}", e);
                self.clear();
                None
            }
        }
    }

    fn save(&self, identity: &UserIdentity) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::warn!("failed to create session cache directory: {}", e);
                return;
            }
        }

        match serde_json::to_string(identity) {
            Ok(json) => {
                if let Err(e) = fs::write(&self.path, json) {
                    tracing::warn!("failed to persist session cache: {}", e);
                }
            }
            Err(e) => tracing::warn!("failed to serialize session cache: {}", e),
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to clear session cache: {}", e);
            }
        }
    }
}

// 3. The In-Memory Implementation (For Unit Tests)
/// MemorySessionCache
///
/// A cache backed by a string slot instead of a file, used in tests. Holding
/// the raw string (rather than a parsed record) allows tests to inject
/// deliberately corrupt content and observe the discard behavior.
#[derive(Default)]
pub struct MemorySessionCache {
    content: Mutex<Option<String>>,
}

impl MemorySessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeds the cache with arbitrary raw content, valid or not.
    pub fn with_content(raw: &str) -> Self {
        Self {
            content: Mutex::new(Some(raw.to_string())),
        }
    }

    /// Snapshot of the raw stored content, for assertions.
    pub fn snapshot(&self) -> Option<String> {
        self.content.lock().unwrap().clone()
    }
}

impl SessionCache for MemorySessionCache {
    fn load(&self) -> Option<RawUser> {
        let mut slot = self.content.lock().unwrap();
        let content = slot.clone()?;

        match serde_json::from_str::<RawUser>(&content) {
            Ok(raw) => Some(raw),
            Err(e) => {
                tracing::warn!("discarding corrupt session cache: {}", e);
                *slot = None;
                None
            }
        }
    }

    fn save(&self, identity: &UserIdentity) {
        if let Ok(json) = serde_json::to_string(identity) {
            *self.content.lock().unwrap() = Some(json);
        }
    }

    fn clear(&self) {
        *self.content.lock().unwrap() = None;
    }
}
