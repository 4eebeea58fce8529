use std::fmt::Display;
use std::sync::Arc;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::codec::{StateKeyCodec, StateValueCodec};
use crate::Prefix;

/// `Key` type for the [`Storage`].
#[derive(
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Debug,
    Serialize,
    Deserialize,
    BorshDeserialize,
    BorshSerialize,
)]
pub struct StorageKey {
    key: Arc<Vec<u8>>,
}

impl StorageKey {
    /// Creates a new [`StorageKey`] that combines a prefix and a key.
    pub fn new<K, KC>(prefix: &Prefix, key: &K, codec: &KC) -> Self
    where
        KC: StateKeyCodec<K>,
    {
        let encoded_key = codec.encode_key(key);

        let mut full_key = Vec::<u8>::with_capacity(prefix.len() + encoded_key.len());
        full_key.extend(prefix.as_bytes());
        full_key.extend(&encoded_key);

        Self {
            key: Arc::new(full_key),
        }
    }

    /// Returns the raw bytes of the key.
    pub fn key(&self) -> Arc<Vec<u8>> {
        self.key.clone()
    }
}

impl AsRef<Vec<u8>> for StorageKey {
    fn as_ref(&self) -> &Vec<u8> {
        &self.key
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode(self.key.as_slice()))
    }
}

/// A serialized value suitable for storing. Internally uses an [`Arc<Vec<u8>>`] for cheap cloning.
#[derive(
    Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize, Default,
)]
pub struct StorageValue {
    value: Arc<Vec<u8>>,
}

impl From<Vec<u8>> for StorageValue {
    fn from(value: Vec<u8>) -> Self {
        Self {
            value: Arc::new(value),
        }
    }
}

impl StorageValue {
    /// Create a new storage value by serializing the input with the given codec.
    pub fn new<V, VC>(value: &V, codec: &VC) -> Self
    where
        VC: StateValueCodec<V>,
    {
        let encoded_value = codec.encode_value(value);
        Self {
            value: Arc::new(encoded_value),
        }
    }

    /// Get the bytes of this value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

/// The writes produced by a [`StateCheckpoint`](crate::StateCheckpoint), sorted by key.
///
/// State is insert-only: a write either creates a key or overwrites it.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct OrderedWrites {
    /// Writes in ascending key order.
    pub ordered_writes: Vec<(StorageKey, StorageValue)>,
}

impl OrderedWrites {
    /// Returns `true` if there is nothing to commit.
    pub fn is_empty(&self) -> bool {
        self.ordered_writes.is_empty()
    }

    /// Returns the number of keys touched.
    pub fn len(&self) -> usize {
        self.ordered_writes.len()
    }
}

/// An interface for storing and retrieving values in the storage.
pub trait Storage: Clone {
    /// Returns the value corresponding to the key or None if key is absent.
    fn get(&self, key: &StorageKey) -> Option<StorageValue>;

    /// Applies all the writes as a single atomic step and returns the new
    /// version of the storage.
    ///
    /// Readers of the storage observe either none or all of the writes.
    fn commit(&self, writes: OrderedWrites) -> Result<u64, anyhow::Error>;

    /// Returns the number of commits applied so far.
    fn version(&self) -> u64;

    /// Returns a read-only view pinned to the current version. Later commits
    /// on `self` are not visible through it.
    fn snapshot(&self) -> Self;

    /// Indicates if storage is empty or not.
    /// Useful during initialization
    fn is_empty(&self) -> bool;
}

// Used only in tests.
#[cfg(test)]
impl From<Vec<u8>> for StorageKey {
    fn from(key: Vec<u8>) -> Self {
        Self { key: Arc::new(key) }
    }
}

