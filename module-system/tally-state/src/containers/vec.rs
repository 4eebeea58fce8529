use std::marker::PhantomData;

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;

use crate::codec::{BorshCodec, StateKeyCodec, StateValueCodec};
use crate::{Prefix, Storage, WorkingSet};

/// An append-only sequence stored under a single prefix.
///
/// The length lives at index key `0`, element `i` at index key `i + 1`. Elements
/// keep their position forever: there is no way to remove or reorder them.
#[derive(Debug, PartialEq, Eq, Clone, BorshDeserialize, BorshSerialize)]
pub struct StateVec<V, C = BorshCodec> {
    _phantom: PhantomData<V>,
    codec: C,
    prefix: Prefix,
}

/// Error type for `StateVec` get method.
#[derive(Debug, Error)]
pub enum Error {
    /// The index is past the end of the vector.
    #[error("Index out of bounds for index: {0}")]
    IndexOutOfBounds(usize),
    /// The length says the element exists but storage has nothing for it.
    #[error("Value not found for prefix: {0} and index: {1}")]
    MissingValue(Prefix, usize),
}

impl<V> StateVec<V>
where
    BorshCodec: StateValueCodec<V>,
{
    /// Creates a new [`StateVec`] with the given prefix and the default
    /// codec (i.e. [`BorshCodec`]).
    pub fn new(prefix: Prefix) -> Self {
        Self::with_codec(prefix, BorshCodec)
    }
}

impl<V, C> StateVec<V, C>
where
    C: StateValueCodec<V> + StateValueCodec<usize>,
{
    /// Creates a new [`StateVec`] with the given prefix and codec.
    pub fn with_codec(prefix: Prefix, codec: C) -> Self {
        Self {
            _phantom: PhantomData,
            codec,
            prefix,
        }
    }

    /// Returns the prefix used when this [`StateVec`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }

    fn internal_codec(&self) -> IndexCodec<C> {
        IndexCodec::new(&self.codec)
    }

    fn set_len<S: Storage>(&self, length: usize, working_set: &mut WorkingSet<S>) {
        working_set.set_value(self.prefix(), &self.internal_codec(), &IndexKey(0), &length);
    }

    /// Returns the value for the given index.
    pub fn get<S: Storage>(&self, index: usize, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.get_value(self.prefix(), &self.internal_codec(), &IndexKey(index + 1))
    }

    /// Returns the value for the given index.
    /// If the index is out of bounds, returns an error.
    /// If the value is absent, returns an error.
    pub fn get_or_err<S: Storage>(
        &self,
        index: usize,
        working_set: &mut WorkingSet<S>,
    ) -> Result<V, Error> {
        let len = self.len(working_set);

        if index < len {
            self.get(index, working_set)
                .ok_or_else(|| Error::MissingValue(self.prefix().clone(), index))
        } else {
            Err(Error::IndexOutOfBounds(index))
        }
    }

    /// Returns the length of the [`StateVec`].
    pub fn len<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> usize {
        let len = working_set.get_value::<_, usize, _>(
            self.prefix(),
            &self.internal_codec(),
            &IndexKey(0),
        );
        len.unwrap_or_default()
    }

    /// Returns `true` if nothing was ever pushed.
    pub fn is_empty<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> bool {
        self.len(working_set) == 0
    }

    /// Pushes a value to the end of the [`StateVec`] and returns its index.
    pub fn push<S: Storage>(&self, value: &V, working_set: &mut WorkingSet<S>) -> usize {
        let len = self.len(working_set);

        working_set.set_value(
            self.prefix(),
            &self.internal_codec(),
            &IndexKey(len + 1),
            value,
        );
        self.set_len(len + 1, working_set);
        len
    }

    /// Returns up to `limit` values starting at `offset`, in index order.
    pub fn range<S: Storage>(
        &self,
        offset: usize,
        limit: usize,
        working_set: &mut WorkingSet<S>,
    ) -> Result<Vec<V>, Error> {
        let len = self.len(working_set);
        let end = offset.saturating_add(limit).min(len);

        (offset..end)
            .map(|index| self.get_or_err(index, working_set))
            .collect()
    }

    /// Returns every value, in index order.
    pub fn collect_all<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> Result<Vec<V>, Error> {
        self.range(0, usize::MAX, working_set)
    }
}

#[derive(Debug)]
struct IndexKey(usize);

struct IndexCodec<'a, VC> {
    value_codec: &'a VC,
}

impl<'a, VC> IndexCodec<'a, VC> {
    pub fn new(value_codec: &'a VC) -> Self {
        Self { value_codec }
    }
}

impl<'a, VC> StateKeyCodec<IndexKey> for IndexCodec<'a, VC> {
    fn encode_key(&self, i: &IndexKey) -> Vec<u8> {
        (i.0 as u64).to_be_bytes().to_vec()
    }
}

impl<'a, V, VC> StateValueCodec<V> for IndexCodec<'a, VC>
where
    VC: StateValueCodec<V>,
{
    type Error = VC::Error;

    fn encode_value(&self, value: &V) -> Vec<u8> {
        self.value_codec.encode_value(value)
    }

    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::Error> {
        self.value_codec.try_decode_value(bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::InMemoryStorage;

    #[test]
    fn test_state_vec_push_and_read() {
        let mut working_set = WorkingSet::new(InMemoryStorage::new());
        let state_vec = StateVec::<u32>::new(Prefix::new("test".as_bytes().to_vec()));

        assert!(state_vec.is_empty(&mut working_set));
        assert_eq!(state_vec.push(&10, &mut working_set), 0);
        assert_eq!(state_vec.push(&8, &mut working_set), 1);
        assert_eq!(state_vec.push(&u32::MAX, &mut working_set), 2);

        assert_eq!(state_vec.len(&mut working_set), 3);
        assert_eq!(state_vec.get(1, &mut working_set), Some(8));
        assert_eq!(
            state_vec.collect_all(&mut working_set).unwrap(),
            vec![10, 8, u32::MAX]
        );
        assert_eq!(state_vec.range(1, 10, &mut working_set).unwrap(), vec![8, u32::MAX]);
        assert!(state_vec.range(5, 10, &mut working_set).unwrap().is_empty());
    }

    #[test]
    fn test_state_vec_out_of_bounds() {
        let mut working_set = WorkingSet::new(InMemoryStorage::new());
        let state_vec = StateVec::<u32>::new(Prefix::new("test".as_bytes().to_vec()));
        state_vec.push(&1, &mut working_set);

        assert!(matches!(
            state_vec.get_or_err(1, &mut working_set),
            Err(Error::IndexOutOfBounds(1))
        ));
        assert!(state_vec.get(1, &mut working_set).is_none());
    }
}
