//! The interface every Tally module implements, together with the types shared
//! by modules and the ledger runner.

mod bech32;
pub mod default_context;
mod error;
mod prefix;
mod response;
mod serde_address;
#[cfg(test)]
mod tests;
pub mod utils;

use std::fmt::{self, Debug, Display};
use std::hash::Hash;
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
pub use error::Error;
pub use prefix::Prefix;
pub use response::CallResponse;
use serde::de::DeserializeOwned;
use serde::Serialize;
pub use tally_state::{Event, Storage, WorkingSet};

pub use crate::bech32::{AddressBech32, Bech32ParseError, HRP};

/// A 32-byte identity.
///
/// Displayed and serialized to human readable formats as a bech32m string with
/// the `tally` HRP; binary formats carry the raw bytes.
#[derive(PartialEq, Clone, Copy, Eq, PartialOrd, Ord, Hash, BorshDeserialize, BorshSerialize)]
pub struct Address {
    addr: [u8; 32],
}

impl<'a> TryFrom<&'a [u8]> for Address {
    type Error = anyhow::Error;

    fn try_from(addr: &'a [u8]) -> Result<Self, Self::Error> {
        if addr.len() != 32 {
            anyhow::bail!("Address must be 32 bytes long");
        }
        let mut addr_bytes = [0u8; 32];
        addr_bytes.copy_from_slice(addr);
        Ok(Self { addr: addr_bytes })
    }
}

impl From<[u8; 32]> for Address {
    fn from(addr: [u8; 32]) -> Self {
        Self { addr }
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.addr
    }
}

impl FromStr for Address {
    type Err = Bech32ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bech32: AddressBech32 = s.parse()?;
        Ok(Address::from(bech32.to_byte_array()))
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AddressBech32::from(self))
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", AddressBech32::from(self))
    }
}

/// Address bound shared by every [`Spec`].
pub trait BasicAddress:
    Eq
    + Hash
    + Ord
    + Copy
    + Debug
    + Display
    + Send
    + Sync
    + Serialize
    + DeserializeOwned
    + BorshSerialize
    + BorshDeserialize
    + From<[u8; 32]>
    + AsRef<[u8]>
    + 'static
{
}

impl BasicAddress for Address {}

/// The concrete types a module is instantiated with.
pub trait Spec {
    /// The identity type callers and voters are named by.
    type Address: BasicAddress;

    /// The storage backing the module's state containers.
    type Storage: Storage + Send + Sync;

    /// The hash function used to derive module addresses.
    type Hasher: sha2::Digest<OutputSize = sha2::digest::typenum::U32>;
}

/// Everything a module knows about the transaction it is executing.
pub trait Context: Spec + Clone + Debug + PartialEq + Send + Sync + 'static {
    /// Sender of the transaction.
    fn sender(&self) -> &Self::Address;

    /// Ledger time of the transaction, in seconds since the UNIX epoch.
    fn timestamp(&self) -> u64;

    /// Constructor for the Context.
    fn new(sender: Self::Address, timestamp: u64) -> Self;
}

/// Every module has to implement this trait.
pub trait Module {
    /// Execution context.
    type Context: Context;

    /// Configuration for the genesis method.
    type Config;

    /// Module defined argument to the call method.
    type CallMessage: Debug + BorshSerialize + BorshDeserialize;

    /// Genesis is called when the ledger is deployed and can be used to set initial state values in the module.
    fn genesis(
        &self,
        _config: &Self::Config,
        _working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> Result<(), Error> {
        Ok(())
    }

    /// Call allows interaction with the module and invokes state changes.
    /// It takes a module defined type and a context as parameters.
    fn call(
        &self,
        message: Self::CallMessage,
        context: &Self::Context,
        working_set: &mut WorkingSet<<Self::Context as Spec>::Storage>,
    ) -> Result<CallResponse, Error>;
}

/// Every module has to implement this trait.
pub trait ModuleInfo {
    /// Execution context.
    type Context: Context;

    /// Returns address of the module.
    fn address(&self) -> &<Self::Context as Spec>::Address;

    /// Returns the prefix of the module.
    fn prefix(&self) -> Prefix;
}
