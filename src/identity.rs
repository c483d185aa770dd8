//! Ledger identities (32-byte public keys)

use crate::error::{QearnError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of a raw public key
pub const IDENTITY_LEN: usize = 32;

/// Length of the textual identity form (56 letters + 4 checksum letters)
pub const IDENTITY_TEXT_LEN: usize = 60;

const LETTERS_PER_GROUP: usize = 14;

/// A wallet holder's public key.
///
/// Parsed from either 64 hex characters or the 60-letter uppercase
/// identity form shown by wallets. The 4 trailing checksum letters of the
/// textual form are not verified here; that belongs to the signing side.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity([u8; IDENTITY_LEN]);

impl Identity {
    pub const fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    /// Build from a slice, which must be exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; IDENTITY_LEN] = bytes.try_into().map_err(|_| {
            QearnError::InvalidIdentity(format!(
                "expected {} bytes, got {}",
                IDENTITY_LEN,
                bytes.len()
            ))
        })?;
        Ok(Self(arr))
    }

    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode the 60-letter identity form into its public key
    pub fn from_identity_text(text: &str) -> Result<Self> {
        let letters = text.as_bytes();
        if letters.len() != IDENTITY_TEXT_LEN {
            return Err(QearnError::InvalidIdentity(format!(
                "expected {} letters, got {}",
                IDENTITY_TEXT_LEN,
                letters.len()
            )));
        }
        if !letters.iter().all(u8::is_ascii_uppercase) {
            return Err(QearnError::InvalidIdentity(
                "identity must contain only letters A-Z".to_string(),
            ));
        }

        let mut key = [0u8; IDENTITY_LEN];
        for (group, chunk) in letters[..IDENTITY_LEN / 8 * LETTERS_PER_GROUP]
            .chunks(LETTERS_PER_GROUP)
            .enumerate()
        {
            // Least significant letter first
            let mut value: u64 = 0;
            for &letter in chunk.iter().rev() {
                value = value
                    .checked_mul(26)
                    .and_then(|v| v.checked_add(u64::from(letter - b'A')))
                    .ok_or_else(|| {
                        QearnError::InvalidIdentity(format!("group {} overflows 64 bits", group))
                    })?;
            }
            key[group * 8..group * 8 + 8].copy_from_slice(&value.to_le_bytes());
        }

        Ok(Self(key))
    }
}

impl FromStr for Identity {
    type Err = QearnError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s.len() {
            IDENTITY_TEXT_LEN => Self::from_identity_text(s),
            64 => {
                let bytes = hex::decode(s).map_err(|e| QearnError::InvalidIdentity(e.to_string()))?;
                Self::from_slice(&bytes)
            }
            len => Err(QearnError::InvalidIdentity(format!(
                "expected 64 hex characters or {} letters, got {} characters",
                IDENTITY_TEXT_LEN, len
            ))),
        }
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.to_hex())
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
