use sha2::Digest;

use crate::{Context, Spec};

/// Derives a deterministic address by hashing a human readable label.
pub fn generate_address<C: Context>(key: &str) -> <C as Spec>::Address {
    let hash: [u8; 32] = <C as Spec>::Hasher::digest(key.as_bytes()).into();
    C::Address::from(hash)
}
