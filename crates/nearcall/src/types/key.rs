//! Cryptographic key types for NEAR.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use borsh::{BorshDeserialize, BorshSerialize};
use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ParseKeyError;

/// Key type identifier.
///
/// The discriminant is the first byte of every encoded key and signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyType {
    /// Ed25519 key.
    Ed25519 = 0,
}

impl KeyType {
    /// Get the string prefix for this key type.
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::Ed25519 => "ed25519",
        }
    }

    /// Get the expected public key length in bytes.
    pub fn key_len(&self) -> usize {
        match self {
            KeyType::Ed25519 => 32,
        }
    }

    /// Get the expected signature length in bytes.
    pub fn signature_len(&self) -> usize {
        match self {
            KeyType::Ed25519 => 64,
        }
    }
}

impl TryFrom<u8> for KeyType {
    type Error = ParseKeyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(KeyType::Ed25519),
            _ => Err(ParseKeyError::UnknownKeyType(value.to_string())),
        }
    }
}

impl FromStr for KeyType {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ed25519" => Ok(KeyType::Ed25519),
            other => Err(ParseKeyError::UnknownKeyType(other.to_string())),
        }
    }
}

/// Split `"<type>:<base58>"` and decode the payload.
fn decode_prefixed(s: &str) -> Result<(KeyType, Vec<u8>), ParseKeyError> {
    let (key_type, data_str) = s.split_once(':').ok_or(ParseKeyError::InvalidFormat)?;
    let key_type: KeyType = key_type.parse()?;
    let data = bs58::decode(data_str)
        .into_vec()
        .map_err(|e| ParseKeyError::InvalidBase58(e.to_string()))?;
    Ok((key_type, data))
}

/// Render `"<type>:<base58>"`.
fn write_prefixed(f: &mut fmt::Formatter<'_>, key_type: KeyType, data: &[u8]) -> fmt::Result {
    write!(f, "{}:{}", key_type.as_str(), bs58::encode(data).into_string())
}

/// Read the leading key type byte of an encoded key or signature.
fn read_key_type<R: std::io::Read>(reader: &mut R) -> std::io::Result<KeyType> {
    KeyType::try_from(u8::deserialize_reader(reader)?)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

// ============================================================================
// PublicKey
// ============================================================================

/// Ed25519 public key.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PublicKey {
    key_type: KeyType,
    data: [u8; 32],
}

impl PublicKey {
    /// Create an Ed25519 public key from raw 32 bytes.
    pub fn ed25519_from_bytes(bytes: [u8; 32]) -> Self {
        Self {
            key_type: KeyType::Ed25519,
            data: bytes,
        }
    }

    /// Get the key type.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Get the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.data
    }

    fn verifying_key(&self) -> Option<VerifyingKey> {
        VerifyingKey::from_bytes(&self.data).ok()
    }
}

impl FromStr for PublicKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key_type, data) = decode_prefixed(s)?;

        let data: [u8; 32] = data
            .as_slice()
            .try_into()
            .map_err(|_| ParseKeyError::InvalidLength {
                expected: key_type.key_len(),
                actual: data.len(),
            })?;

        VerifyingKey::from_bytes(&data).map_err(|_| ParseKeyError::InvalidCurvePoint)?;

        Ok(Self { key_type, data })
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_prefixed(f, self.key_type, &self.data)
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s: String = serde::Deserialize::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl BorshSerialize for PublicKey {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&(self.key_type as u8), writer)?;
        writer.write_all(&self.data)
    }
}

/// The wire form is an opaque 32-byte array; curve validity is only checked
/// when parsing text and when verifying.
impl BorshDeserialize for PublicKey {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let key_type = read_key_type(reader)?;
        let data = <[u8; 32]>::deserialize_reader(reader)?;
        Ok(Self { key_type, data })
    }
}

// ============================================================================
// SecretKey
// ============================================================================

/// Ed25519 secret key (the 32-byte seed).
#[derive(Clone)]
pub struct SecretKey {
    key_type: KeyType,
    signing_key: SigningKey,
}

impl SecretKey {
    /// Create an Ed25519 secret key from a raw 32-byte seed.
    pub fn ed25519_from_bytes(seed: [u8; 32]) -> Self {
        Self {
            key_type: KeyType::Ed25519,
            signing_key: SigningKey::from_bytes(&seed),
        }
    }

    /// Get the key type.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Derive the public key.
    pub fn public_key(&self) -> PublicKey {
        PublicKey::ed25519_from_bytes(self.signing_key.verifying_key().to_bytes())
    }

    /// Sign a message with plain Ed25519 (the message is hashed internally
    /// with SHA-512 as part of the algorithm, nothing else).
    pub fn sign(&self, message: &[u8]) -> Signature {
        Signature::ed25519_from_bytes(self.signing_key.sign(message).to_bytes())
    }
}

impl FromStr for SecretKey {
    type Err = ParseKeyError;

    /// Accepts `ed25519:<base58>` of a 32-byte seed or a 64-byte
    /// `seed || public key` pair, as written by near-cli.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key_type, data) = decode_prefixed(s)?;

        let seed: [u8; 32] = match data.len() {
            32 | 64 => data[..32].try_into().map_err(|_| ParseKeyError::InvalidFormat)?,
            actual => {
                return Err(ParseKeyError::InvalidLength {
                    expected: 64,
                    actual,
                });
            }
        };

        let secret_key = Self {
            key_type,
            signing_key: SigningKey::from_bytes(&seed),
        };

        if data.len() == 64 && secret_key.public_key().as_bytes()[..] != data[32..] {
            return Err(ParseKeyError::KeyPairMismatch);
        }

        Ok(secret_key)
    }
}

impl Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_prefixed(f, self.key_type, &self.signing_key.to_bytes())
    }
}

impl Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({}:***)", self.key_type.as_str())
    }
}

// ============================================================================
// Signature
// ============================================================================

/// Ed25519 signature.
#[derive(Clone, PartialEq, Eq)]
pub struct Signature {
    key_type: KeyType,
    data: [u8; 64],
}

impl Signature {
    /// Create an Ed25519 signature from raw 64 bytes.
    pub fn ed25519_from_bytes(bytes: [u8; 64]) -> Self {
        Self {
            key_type: KeyType::Ed25519,
            data: bytes,
        }
    }

    /// Get the key type.
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Get the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; 64] {
        &self.data
    }

    /// Verify this signature over `message`.
    pub fn verify(&self, message: &[u8], public_key: &PublicKey) -> bool {
        if self.key_type != public_key.key_type() {
            return false;
        }
        let Some(verifying_key) = public_key.verifying_key() else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&self.data);
        verifying_key.verify(message, &signature).is_ok()
    }
}

impl Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_prefixed(f, self.key_type, &self.data)
    }
}

impl Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self)
    }
}

impl BorshSerialize for Signature {
    fn serialize<W: std::io::Write>(&self, writer: &mut W) -> std::io::Result<()> {
        borsh::BorshSerialize::serialize(&(self.key_type as u8), writer)?;
        writer.write_all(&self.data)
    }
}

impl BorshDeserialize for Signature {
    fn deserialize_reader<R: std::io::Read>(reader: &mut R) -> std::io::Result<Self> {
        let key_type = read_key_type(reader)?;
        let data = <[u8; 64]>::deserialize_reader(reader)?;
        Ok(Self { key_type, data })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: [u8; 32] = [1u8; 32];
    const PUBLIC: &str = "ed25519:AKnL4NNf3DGWZJS6cPknBuEGnVsV4A4m5tgebLHaRSZ9";
    const EXPANDED: &str = "ed25519:2AXDGYSE4f2sz7tvMMzyHvUfcoJmxudvdhBcmiUSo6iuCXagjUCKEQF21awZnUGxmwD4m9vGXuC3qieHXJQHAcT";

    #[test]
    fn test_public_key_from_seed() {
        let secret = SecretKey::ed25519_from_bytes(SEED);
        assert_eq!(secret.public_key().to_string(), PUBLIC);
    }

    #[test]
    fn test_sign_and_verify() {
        let secret = SecretKey::ed25519_from_bytes([42u8; 32]);
        let public = secret.public_key();
        let signature = secret.sign(b"hello");
        assert!(signature.verify(b"hello", &public));
        assert!(!signature.verify(b"other", &public));
    }

    #[test]
    fn test_public_key_roundtrip() {
        let public: PublicKey = PUBLIC.parse().unwrap();
        assert_eq!(public.to_string(), PUBLIC);
        assert_eq!(public.key_type(), KeyType::Ed25519);
    }

    #[test]
    fn test_secret_key_expanded_form() {
        let secret: SecretKey = EXPANDED.parse().unwrap();
        assert_eq!(secret.public_key().to_string(), PUBLIC);
        // Display always uses the 32-byte seed
        let reparsed: SecretKey = secret.to_string().parse().unwrap();
        assert_eq!(reparsed.public_key().to_string(), PUBLIC);
    }

    #[test]
    fn test_secret_key_mismatched_pair() {
        let mut pair = SEED.to_vec();
        pair.extend_from_slice(&[2u8; 32]);
        let s = format!("ed25519:{}", bs58::encode(pair).into_string());
        assert_eq!(s.parse::<SecretKey>().unwrap_err(), ParseKeyError::KeyPairMismatch);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "AKnL4NNf3DGWZJS6cPknBuEGnVsV4A4m5tgebLHaRSZ9".parse::<PublicKey>(),
            Err(ParseKeyError::InvalidFormat)
        );
        assert_eq!(
            "secp256k1:AKnL4NNf3DGWZJS6cPknBuEGnVsV4A4m5tgebLHaRSZ9".parse::<PublicKey>(),
            Err(ParseKeyError::UnknownKeyType("secp256k1".to_string()))
        );
        assert!(matches!(
            "ed25519:0OIl".parse::<PublicKey>(),
            Err(ParseKeyError::InvalidBase58(_))
        ));
        let short = format!("ed25519:{}", bs58::encode([1u8; 16]).into_string());
        assert_eq!(
            short.parse::<PublicKey>(),
            Err(ParseKeyError::InvalidLength {
                expected: 32,
                actual: 16
            })
        );
    }

    #[test]
    fn test_secret_key_debug_hides_material() {
        let secret = SecretKey::ed25519_from_bytes(SEED);
        assert_eq!(format!("{:?}", secret), "SecretKey(ed25519:***)");
    }

    #[test]
    fn test_public_key_borsh_layout() {
        let public: PublicKey = PUBLIC.parse().unwrap();
        let bytes = borsh::to_vec(&public).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 0);
        assert_eq!(&bytes[1..], public.as_bytes());

        let decoded: PublicKey = borsh::from_slice(&bytes).unwrap();
        assert_eq!(decoded, public);
    }

    #[test]
    fn test_borsh_accepts_off_curve_key_bytes() {
        // [2u8; 32] does not decompress to a curve point
        let public = PublicKey::ed25519_from_bytes([2u8; 32]);
        assert!(format!("{}", public).parse::<PublicKey>().is_err());

        let bytes = borsh::to_vec(&public).unwrap();
        let decoded: PublicKey = borsh::from_slice(&bytes).unwrap();
        assert_eq!(decoded, public);

        let signature = SecretKey::ed25519_from_bytes(SEED).sign(b"data");
        assert!(!signature.verify(b"data", &decoded));
    }

    #[test]
    fn test_unknown_discriminant_rejected() {
        let mut bytes = vec![1u8];
        bytes.extend_from_slice(&[0u8; 64]);
        assert!(borsh::from_slice::<Signature>(&bytes).is_err());
        assert!(borsh::from_slice::<PublicKey>(&bytes[..33]).is_err());
    }

    #[test]
    fn test_signature_borsh_layout() {
        let signature = SecretKey::ed25519_from_bytes(SEED).sign(b"data");
        let bytes = borsh::to_vec(&signature).unwrap();
        assert_eq!(bytes.len(), 65);
        assert_eq!(bytes[0], 0);
        let decoded: Signature = borsh::from_slice(&bytes).unwrap();
        assert_eq!(decoded, signature);
    }
}
