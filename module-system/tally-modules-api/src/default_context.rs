use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tally_state::InMemoryStorage;

use crate::{Address, Context, Spec};

/// The context every call of the Tally ledger runs in.
///
/// `timestamp` is sampled by the runner once per transaction, so every rule of
/// a call sees the same instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct DefaultContext {
    pub sender: Address,
    pub timestamp: u64,
}

impl Spec for DefaultContext {
    type Address = Address;
    type Storage = InMemoryStorage;
    type Hasher = sha2::Sha256;
}

impl Context for DefaultContext {
    fn sender(&self) -> &Self::Address {
        &self.sender
    }

    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn new(sender: Self::Address, timestamp: u64) -> Self {
        Self { sender, timestamp }
    }
}

