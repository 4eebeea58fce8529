use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::codec::{StateKeyCodec, StateValueCodec};
use crate::event::Event;
use crate::storage::{OrderedWrites, StorageKey, StorageValue};
use crate::{Prefix, Storage};

/// Accumulates writes on top of the underlying storage.
struct Delta<S: Storage> {
    inner: S,
    writes: BTreeMap<StorageKey, StorageValue>,
}

/// A wrapper that adds additional writes on top of an underlying Delta.
/// These are handy for implementing operations that might revert on top of an existing
/// checkpoint, without running the risk that the whole checkpoint will be discarded if some particular
/// operation reverts.
struct RevertableDelta<S: Storage> {
    /// The inner (non-revertable) delta
    inner: Delta<S>,
    /// A cache containing the most recent values written. Reads are first checked
    /// against this map, and if the key is not present, the underlying Delta is checked.
    writes: BTreeMap<StorageKey, StorageValue>,
}

impl<S: Storage> Debug for RevertableDelta<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevertableDelta")
            .field("inner", &self.inner)
            .field("pending_writes", &self.writes.len())
            .finish()
    }
}

/// This structure is responsible for storing the write set
/// and is obtained from the `WorkingSet` by using either the `checkpoint` or `revert` method.
pub struct StateCheckpoint<S: Storage> {
    delta: Delta<S>,
}

impl<S: Storage> StateCheckpoint<S> {
    /// Creates a checkpoint with no pending writes on top of `inner`.
    pub fn new(inner: S) -> Self {
        Self {
            delta: Delta::new(inner),
        }
    }

    /// Opens a new revertable [`WorkingSet`] on top of this checkpoint.
    pub fn to_revertable(self) -> WorkingSet<S> {
        WorkingSet {
            delta: self.delta.get_revertable_wrapper(),
            events: Default::default(),
        }
    }

    /// Drains the accumulated writes, sorted by key, leaving the checkpoint empty.
    pub fn freeze(&mut self) -> OrderedWrites {
        self.delta.freeze()
    }
}

/// This structure contains the write set and the events collected during the execution of a call.
/// There are two ways to convert it into a StateCheckpoint:
/// 1. By using the checkpoint() method, where all the changes are added to the underlying StateCheckpoint.
/// 2. By using the revert method, where the most recent changes are reverted and the previous `StateCheckpoint` is returned.
pub struct WorkingSet<S: Storage> {
    delta: RevertableDelta<S>,
    events: Vec<Event>,
}

impl<S: Storage> Debug for WorkingSet<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkingSet")
            .field("delta", &self.delta)
            .field("events", &self.events.len())
            .finish()
    }
}

impl<S: Storage> WorkingSet<S> {
    /// Creates a working set with no pending writes on top of `inner`.
    pub fn new(inner: S) -> Self {
        StateCheckpoint::new(inner).to_revertable()
    }

    /// Keeps the writes of this working set, folding them into the returned checkpoint.
    pub fn checkpoint(self) -> StateCheckpoint<S> {
        StateCheckpoint {
            delta: self.delta.commit(),
        }
    }

    /// Discards the writes and events of this working set.
    pub fn revert(self) -> StateCheckpoint<S> {
        StateCheckpoint {
            delta: self.delta.revert(),
        }
    }

    pub(crate) fn get(&mut self, key: StorageKey) -> Option<StorageValue> {
        self.delta.get(key)
    }

    pub(crate) fn set(&mut self, key: StorageKey, value: StorageValue) {
        self.delta.set(key, value)
    }

    /// Records an event. Events live and die with the working set's writes.
    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Removes and returns all the events recorded so far.
    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Returns the events recorded so far.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Returns `true` if the working set holds writes that were not checkpointed yet.
    pub fn has_pending_writes(&self) -> bool {
        !self.delta.writes.is_empty()
    }
}

impl<S: Storage> WorkingSet<S> {
    pub(crate) fn set_value<K, V, C>(&mut self, prefix: &Prefix, codec: &C, key: &K, value: &V)
    where
        C: StateKeyCodec<K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new(prefix, key, codec);
        let storage_value = StorageValue::new(value, codec);
        self.set(storage_key, storage_value);
    }

    pub(crate) fn get_value<K, V, C>(&mut self, prefix: &Prefix, codec: &C, key: &K) -> Option<V>
    where
        C: StateKeyCodec<K> + StateValueCodec<V>,
    {
        let storage_key = StorageKey::new(prefix, key, codec);
        self.get_decoded(storage_key, codec)
    }

    fn get_decoded<V, C>(&mut self, storage_key: StorageKey, codec: &C) -> Option<V>
    where
        C: StateValueCodec<V>,
    {
        let storage_value = self.get(storage_key)?;
        Some(codec.decode_value_unwrap(storage_value.value()))
    }
}

impl<S: Storage> RevertableDelta<S> {
    fn get(&mut self, key: StorageKey) -> Option<StorageValue> {
        if let Some(value) = self.writes.get(&key) {
            return Some(value.clone());
        }
        self.inner.get(key)
    }

    fn set(&mut self, key: StorageKey, value: StorageValue) {
        self.writes.insert(key, value);
    }

    fn commit(self) -> Delta<S> {
        let mut inner = self.inner;
        for (k, v) in self.writes.into_iter() {
            inner.set(k, v);
        }
        inner
    }

    fn revert(self) -> Delta<S> {
        self.inner
    }
}

impl<S: Storage> Delta<S> {
    fn new(inner: S) -> Self {
        Self {
            inner,
            writes: Default::default(),
        }
    }

    fn get_revertable_wrapper(self) -> RevertableDelta<S> {
        RevertableDelta {
            inner: self,
            writes: Default::default(),
        }
    }

    fn get(&mut self, key: StorageKey) -> Option<StorageValue> {
        match self.writes.get(&key) {
            Some(value) => Some(value.clone()),
            None => self.inner.get(&key),
        }
    }

    fn set(&mut self, key: StorageKey, value: StorageValue) {
        self.writes.insert(key, value);
    }

    fn freeze(&mut self) -> OrderedWrites {
        let writes = std::mem::take(&mut self.writes);
        OrderedWrites {
            ordered_writes: writes.into_iter().collect(),
        }
    }
}

impl<S: Storage> Debug for Delta<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delta")
            .field("writes", &self.writes.len())
            .finish()
    }
}
