use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard};

use im::OrdMap;

use crate::storage::{OrderedWrites, Storage, StorageKey, StorageValue};

#[derive(Clone, Default)]
struct Versioned {
    version: u64,
    entries: OrdMap<StorageKey, StorageValue>,
}

/// A copy-on-write, in-memory [`Storage`].
///
/// Versions are persistent maps sharing structure with their predecessor. A
/// commit derives the next version without holding the lock readers use and
/// publishes it with a single swap, so a reader sees either the old or the new
/// version, never a mix. [`Storage::snapshot`] pins the current version: the
/// returned handle keeps answering from it no matter how many commits land
/// afterwards on the original.
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    state: Arc<RwLock<Versioned>>,
    // Serialises commits. Readers never take it.
    writer: Arc<Mutex<()>>,
}

impl std::fmt::Debug for InMemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read();
        f.debug_struct("InMemoryStorage")
            .field("version", &state.version)
            .field("entries", &state.entries.len())
            .finish()
    }
}

impl InMemoryStorage {
    /// Creates a new, empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys currently stored.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    // The lock only ever guards a swap, so a poisoned lock still holds a
    // complete version.
    fn read(&self) -> RwLockReadGuard<'_, Versioned> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn current(&self) -> Versioned {
        self.read().clone()
    }
}

impl Storage for InMemoryStorage {
    fn get(&self, key: &StorageKey) -> Option<StorageValue> {
        self.read().entries.get(key).cloned()
    }

    fn commit(&self, writes: OrderedWrites) -> Result<u64, anyhow::Error> {
        let _writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let Versioned {
            version,
            mut entries,
        } = self.current();
        if writes.is_empty() {
            return Ok(version);
        }

        for (key, value) in writes.ordered_writes {
            entries.insert(key, value);
        }
        let next = Versioned {
            version: version + 1,
            entries,
        };

        *self.state.write().unwrap_or_else(PoisonError::into_inner) = next;
        Ok(version + 1)
    }

    fn version(&self) -> u64 {
        self.read().version
    }

    fn snapshot(&self) -> Self {
        Self {
            state: Arc::new(RwLock::new(self.current())),
            writer: Default::default(),
        }
    }

    fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }
}
