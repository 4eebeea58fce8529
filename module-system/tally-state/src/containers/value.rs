use std::marker::PhantomData;

use borsh::{BorshDeserialize, BorshSerialize};

use crate::codec::{BorshCodec, StateKeyCodec, StateValueCodec};
use crate::{Prefix, Storage, WorkingSet};

/// The key of a [`StateValue`]. It is very similar to the unit type `()`, i.e. it has
/// only one value, and encodes to zero bytes.
#[derive(Debug, BorshDeserialize)]
pub struct SingletonKey;

impl BorshSerialize for SingletonKey {
    fn serialize<W: std::io::Write>(&self, _writer: &mut W) -> std::io::Result<()> {
        Ok(())
    }
}

/// Container for a single value.
#[derive(Debug, PartialEq, Eq, Clone, BorshDeserialize, BorshSerialize)]
pub struct StateValue<V, C = BorshCodec> {
    _phantom: PhantomData<V>,
    codec: C,
    prefix: Prefix,
}

impl<V> StateValue<V>
where
    BorshCodec: StateValueCodec<V>,
{
    /// Creates a new [`StateValue`] with the given prefix and the default
    /// codec (i.e. [`BorshCodec`]).
    pub fn new(prefix: Prefix) -> Self {
        Self::with_codec(prefix, BorshCodec)
    }
}

impl<V, C> StateValue<V, C>
where
    C: StateValueCodec<V>,
{
    /// Creates a new [`StateValue`] with the given prefix and codec.
    pub fn with_codec(prefix: Prefix, codec: C) -> Self {
        Self {
            _phantom: PhantomData,
            codec,
            prefix,
        }
    }

    /// Returns the prefix used when this [`StateValue`] was created.
    pub fn prefix(&self) -> &Prefix {
        &self.prefix
    }
}

impl<V, C> StateValue<V, C>
where
    C: StateValueCodec<V> + StateKeyCodec<SingletonKey>,
{
    /// Sets a value in the StateValue.
    pub fn set<S: Storage>(&self, value: &V, working_set: &mut WorkingSet<S>) {
        working_set.set_value(self.prefix(), &self.codec, &SingletonKey, value)
    }

    /// Gets a value from the StateValue or None if the value is absent.
    pub fn get<S: Storage>(&self, working_set: &mut WorkingSet<S>) -> Option<V> {
        working_set.get_value(self.prefix(), &self.codec, &SingletonKey)
    }
}
