//! Canonical binary encoding.
//!
//! Everything that is hashed, signed or sent to the network goes through
//! Borsh:
//!
//! - integers are little-endian at their declared width
//! - strings and byte vectors carry a `u32` length prefix
//! - fixed-size arrays (keys, signatures, hashes) are written raw
//! - enums are a one-byte discriminant followed by the variant's fields
//! - sequences carry a `u32` element count
//!
//! Encoding is deterministic: equal values always produce equal bytes.

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::EncodingError;

/// Encode a value into its canonical bytes.
///
/// Fails when a length does not fit the `u32` prefix.
pub fn encode<T: BorshSerialize + ?Sized>(value: &T) -> Result<Vec<u8>, EncodingError> {
    borsh::to_vec(value).map_err(|e| EncodingError::Serialize(e.to_string()))
}

/// Decode a value from canonical bytes.
///
/// The whole buffer must be consumed.
pub fn decode<T: BorshDeserialize>(bytes: &[u8]) -> Result<T, EncodingError> {
    let mut rest = bytes;
    let value =
        T::deserialize(&mut rest).map_err(|e| EncodingError::Deserialize(e.to_string()))?;
    if !rest.is_empty() {
        return Err(EncodingError::TrailingBytes(rest.len()));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AccountId, Action, CryptoHash, DeleteKeyAction, Gas, NearToken, PublicKey, Transaction,
        TransferAction,
    };

    #[test]
    fn test_integers_little_endian() {
        assert_eq!(encode(&0x0102_0304u32).unwrap(), vec![4, 3, 2, 1]);
        assert_eq!(encode(&42u64).unwrap(), vec![42, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_string_length_prefixed() {
        assert_eq!(encode("abc").unwrap(), vec![3, 0, 0, 0, b'a', b'b', b'c']);
        assert_eq!(encode("").unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_bytes_length_prefixed() {
        assert_eq!(encode(&vec![0xffu8; 2]).unwrap(), vec![2, 0, 0, 0, 0xff, 0xff]);
    }

    #[test]
    fn test_account_id_encodes_as_string() {
        let account: AccountId = "aurora".parse().unwrap();
        assert_eq!(encode(&account).unwrap(), encode("aurora").unwrap());
    }

    #[test]
    fn test_public_key_is_discriminant_plus_raw_bytes() {
        let key = PublicKey::ed25519_from_bytes([5u8; 32]);
        let bytes = encode(&key).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..], &[5u8; 32]);
    }

    #[test]
    fn test_deterministic() {
        let value = (
            CryptoHash::from_bytes([1u8; 32]),
            Gas::MAX,
            NearToken::from_yoctonear(u128::MAX),
        );
        assert_eq!(encode(&value).unwrap(), encode(&value).unwrap());
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode(&7u32).unwrap();
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(decode::<u32>(&bytes), Err(EncodingError::TrailingBytes(2)));
    }

    #[test]
    fn test_decode_rejects_short_input() {
        assert!(matches!(
            decode::<u64>(&[1, 2, 3]),
            Err(EncodingError::Deserialize(_))
        ));
    }

    #[test]
    fn test_decode_validates_account_id() {
        let bytes = encode("Not Valid").unwrap();
        assert!(matches!(
            decode::<AccountId>(&bytes),
            Err(EncodingError::Deserialize(_))
        ));
    }

    #[test]
    fn test_transaction_decodes_to_itself() {
        // Key bytes are opaque on the wire, whether or not they are a curve point
        for fill in 0u8..=20 {
            let tx = Transaction::new(
                "alice.near".parse().unwrap(),
                PublicKey::ed25519_from_bytes([fill; 32]),
                u64::from(fill) * 1_000,
                "aurora".parse().unwrap(),
                CryptoHash::from_bytes([fill.wrapping_add(1); 32]),
                vec![
                    Action::function_call("submit", b"testing".to_vec(), Gas::MAX, NearToken::ZERO),
                    Action::Transfer(TransferAction),
                    Action::function_call("", Vec::new(), Gas::from_gas(1), NearToken::ONE_YOCTO),
                    Action::DeleteKey(DeleteKeyAction),
                ],
            );
            let bytes = encode(&tx).unwrap();
            assert_eq!(decode::<Transaction>(&bytes).unwrap(), tx, "fill {fill}");
        }
    }
}
