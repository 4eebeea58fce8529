use std::marker::PhantomData;

use crate::codec::{BorshCodec, StateKeyCodec, StateValueCodec};
use crate::{Prefix, Storage, WorkingSet};

/// A container that maps keys to values.
///
/// # Type parameters
/// [`StateMap`] is generic over:
/// - a key type (`K`);
/// - a value type (`V`);
/// - a codec (`C`) able to encode `K` and `V`.
#[derive(borsh::BorshDeserialize, borsh::BorshSerialize, Debug, PartialEq, Clone)]
pub struct StateMap<K, V, C = BorshCodec> {
    _phantom: (PhantomData<K>, PhantomData<V>),
    codec: C,
    prefix: Prefix,
}

impl<K, V> StateMap<K, V>
where
    BorshCodec: StateKeyCodec<K> + StateValueCodec<V>,
{
    /// Creates a new [`StateMap`] with the given prefix and the default
    /// codec (i.e. [`BorshCodec`]).
    pub fn new(prefix: Prefix) -> Self {
        Self::with_codec(prefix, BorshCodec)
    }
}

impl<K, V, C> StateMap<K, V, C>
where
    C: StateKeyCodec<K> + StateValueCodec<V>,
{
    /// Creates a new [`StateMap`] with the given prefix and codec.
    pub fn with_codec(prefix: Prefix, codec: C) -> Self {
        Self {
            _phantom: (PhantomData, PhantomData),
            codec,
            prefix,
        }
    }

    /// Returns the prefix used when this [`StateMap`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    /// Inserts a key-value pair into the map.
    pub fn set<S: Storage>(&self, key: &K, value: &V, working_set: &mut WorkingSet<S>) {
        working_set.set_value(self.prefix(), &self.codec, key, value)
    }

    /// Returns the value corresponding to the key or None if key is absent in the StateMap.
    pub fn get<S: Storage>(&self, key: &K, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.get_value(self.prefix(), &self.codec, key)
    }

    /// Returns `true` if the map holds a value for the key.
    pub fn contains<S: Storage>(&self, key: &K, working_set: &mut WorkingSet<S>) -> bool {
        self.get(key, working_set).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStorage;

    #[test]
    fn test_state_map_set_get_overwrite() {
        let mut working_set = WorkingSet::new(InMemoryStorage::new());
        let map = StateMap::<u64, String>::new(Prefix::new(b"map/".to_vec()));

        assert!(map.get(&1, &mut working_set).is_none());
        assert!(!map.contains(&1, &mut working_set));

        map.set(&1, &"one".to_owned(), &mut working_set);
        map.set(&2, &"two".to_owned(), &mut working_set);
        assert_eq!(map.get(&1, &mut working_set), Some("one".to_owned()));
        assert!(map.contains(&2, &mut working_set));

        map.set(&1, &"uno".to_owned(), &mut working_set);
        assert_eq!(map.get(&1, &mut working_set), Some("uno".to_owned()));
        assert_eq!(map.get(&2, &mut working_set), Some("two".to_owned()));
    }

    #[test]
    fn test_prefixes_do_not_collide() {
        let mut working_set = WorkingSet::new(InMemoryStorage::new());
        let left = StateMap::<u64, u64>::new(Prefix::new(b"left/".to_vec()));
        let right = StateMap::<u64, u64>::new(Prefix::new(b"right/".to_vec()));

        left.set(&7, &1, &mut working_set);
        right.set(&7, &2, &mut working_set);

        assert_eq!(left.get(&7, &mut working_set), Some(1));
        assert_eq!(right.get(&7, &mut working_set), Some(2));
    }
}
