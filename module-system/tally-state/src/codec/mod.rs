//! Serialization and deserialization -related logic.

mod borsh_codec;

pub use borsh_codec::BorshCodec;

/// A trait for types that can serialize and deserialize values for storage
/// access.
pub trait StateValueCodec<V> {
    /// Error type that can arise during deserialization.
    type Error: std::fmt::Debug;

    /// Serializes a value into a bytes vector.
    ///
    /// This method **must** not panic as all instances of the value type are
    /// supposed to be serializable.
    fn encode_value(&self, value: &V) -> Vec<u8>;

    /// Tries to deserialize a value from a bytes slice, and returns a
    /// [`Result`] with either the deserialized value or an error.
    fn try_decode_value(&self, bytes: &[u8]) -> Result<V, Self::Error>;

    /// Deserializes a value from a bytes slice.
    ///
    /// # Panics
    /// Panics if the call to [`StateValueCodec::try_decode_value`] fails. Stored
    /// values are only ever written by the same codec, so a decoding failure
    /// means the state itself is corrupt.
    fn decode_value_unwrap(&self, bytes: &[u8]) -> V {
        self.try_decode_value(bytes).unwrap_or_else(|err| {
            panic!(
                "Failed to decode value 0x{}, error: {:?}",
                hex::encode(bytes),
                err
            )
        })
    }
}

/// A trait for types that can serialize keys for storage access.
///
/// Note that, unlike [`StateValueCodec`], this trait does not provide
/// deserialization logic as it's not needed nor supported.
pub trait StateKeyCodec<K> {
    /// Serializes a key into a bytes vector.
    ///
    /// # Determinism
    ///
    /// Equal (as defined by [`Eq`]) values **MUST** be serialized to the same
    /// byte sequence, independently of the compilation target.
    fn encode_key(&self, key: &K) -> Vec<u8>;
}

#[cfg(test)]
mod tests {
    use proptest::collection::vec;
    use proptest::prelude::any;
    use proptest::strategy::Strategy;

    use super::*;

    fn arb_vec_u64() -> impl Strategy<Value = Vec<u64>> {
        vec(any::<u64>(), 0..512)
    }

    proptest::proptest! {
        #[test]
        fn test_borsh_value_codec_is_lossless(values in arb_vec_u64()) {
            let codec = BorshCodec;
            let encoded = codec.encode_value(&values);
            let decoded: Vec<u64> = codec.try_decode_value(&encoded).unwrap();
            assert_eq!(decoded, values);
        }

        #[test]
        fn test_borsh_key_encoding_is_deterministic(key in any::<u64>()) {
            let codec = BorshCodec;
            assert_eq!(codec.encode_key(&key), codec.encode_key(&key));
            assert_eq!(codec.encode_key(&key), key.to_le_bytes().to_vec());
        }
    }
}
