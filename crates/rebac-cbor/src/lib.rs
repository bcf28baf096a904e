//! Canonical CBOR helpers and SHA-256 digests used to compare caveat contexts by value.

use serde::Serialize;
use serde_cbor::{
    ser::Write as CborWrite,
    value::Value as CborValue,
};
use sha2::{Digest, Sha256};
use std::fmt;

/// Prefix for rendered digests (e.g. `sha256:deadbeef`).
pub const HASH_PREFIX: &str = "sha256:";

/// Serialize a value into canonical CBOR bytes using RFC 8949 deterministic rules.
///
/// Map keys are ordered through `serde_cbor`'s canonical `Value` ordering, so two maps with
/// the same entries encode to the same bytes regardless of how they were built.
pub fn to_canonical_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_cbor::Error> {
    let mut buf = Vec::with_capacity(64);
    write_canonical_cbor(value, &mut buf)?;
    Ok(buf)
}

/// Serialize a value directly into an arbitrary CBOR writer using canonical settings.
pub fn write_canonical_cbor<T: Serialize, W>(value: &T, writer: W) -> Result<(), serde_cbor::Error>
where
    W: CborWrite,
{
    let canonical_value: CborValue = serde_cbor::value::to_value(value)?;
    let mut serializer = serde_cbor::ser::Serializer::new(writer);
    serializer.self_describe()?;
    canonical_value.serialize(&mut serializer)
}

/// Wrapper around a 32-byte SHA-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; 32]);

impl Hash {
    /// Compute the hash of a value's canonical CBOR encoding.
    pub fn of_cbor<T: Serialize>(value: &T) -> Result<Self, serde_cbor::Error> {
        Ok(Self::of_bytes(&to_canonical_cbor(value)?))
    }

    /// Compute the hash of the provided byte slice.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        let digest = hasher.finalize();
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&digest);
        Hash(arr)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Render the digest as a `sha256:...` hex string.
    pub fn to_hex(&self) -> String {
        format!("{HASH_PREFIX}{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hash").field(&self.to_hex()).finish()
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
