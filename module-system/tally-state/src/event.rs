use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

/// An event emitted by a module while handling a call.
///
/// The key names the event kind (`"<Module>: <kind>"`), the value holds the
/// Borsh encoding of the module's typed event.
#[derive(Debug, Clone, PartialEq, Eq, BorshSerialize, BorshDeserialize, Serialize, Deserialize)]
pub struct Event {
    key: String,
    value: Vec<u8>,
}

impl Event {
    /// Creates an event by encoding `value` with Borsh.
    pub fn new<V: BorshSerialize>(key: &str, value: &V) -> Self {
        Self {
            key: key.to_owned(),
            value: value.try_to_vec().expect("Failed to serialize event"),
        }
    }

    /// Returns the event key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the raw encoded value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Decodes the value back into the typed event.
    pub fn decode<V: BorshDeserialize>(&self) -> Result<V, std::io::Error> {
        V::try_from_slice(&self.value)
    }
}
