//! Store-generated record identity.
//!
//! Identities are 12 bytes rendered as 24 lowercase hex characters. The
//! first four bytes are the creation time in big-endian Unix seconds, the
//! remaining eight are random.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Length of an identity in bytes.
pub const OBJECT_ID_LEN: usize = 12;

/// Malformed identity.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdError {
    #[error("expected {expected} hex characters, got {got}")]
    Length { expected: usize, got: usize },

    #[error("invalid hex: {0}")]
    Hex(String),
}

/// A 12-byte record identity.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; OBJECT_ID_LEN]);

impl ObjectId {
    /// Generate a fresh identity stamped with the current time.
    pub fn new() -> Self {
        let secs = chrono::Utc::now().timestamp().clamp(0, i64::from(u32::MAX)) as u32;
        let mut bytes = [0u8; OBJECT_ID_LEN];
        bytes[..4].copy_from_slice(&secs.to_be_bytes());
        rand::thread_rng().fill_bytes(&mut bytes[4..]);
        Self(bytes)
    }

    pub fn from_bytes(bytes: [u8; OBJECT_ID_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; OBJECT_ID_LEN] {
        &self.0
    }

    /// Parse a path or query parameter, returning `None` when malformed.
    pub fn parse(s: &str) -> Option<Self> {
        s.parse().ok()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for ObjectId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != OBJECT_ID_LEN * 2 {
            return Err(IdError::Length {
                expected: OBJECT_ID_LEN * 2,
                got: s.len(),
            });
        }
        let mut bytes = [0u8; OBJECT_ID_LEN];
        hex::decode_to_slice(s, &mut bytes).map_err(|e| IdError::Hex(e.to_string()))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl Serialize for ObjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for ObjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
