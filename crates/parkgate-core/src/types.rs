use crate::{Result, constants::UID_LENGTH, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Contactless card UID (fixed 4 bytes, as delivered by the gate reader).
///
/// Equality is exact byte-wise comparison; there are no ordering semantics.
///
/// # Security
/// This type implements constant-time comparison to prevent timing attacks
/// when testing UIDs against the authorization list.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
pub struct CardUid([u8; UID_LENGTH]);

impl CardUid {
    /// Create a card UID from a fixed-length byte array.
    #[must_use]
    pub fn new(bytes: [u8; UID_LENGTH]) -> Self {
        CardUid(bytes)
    }

    /// Create a card UID from a byte slice with length validation.
    ///
    /// # Errors
    /// Returns `Error::InvalidCardUid` if the slice is not exactly
    /// [`UID_LENGTH`] bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let arr: [u8; UID_LENGTH] = bytes.try_into().map_err(|_| {
            Error::InvalidCardUid(format!(
                "UID must be {UID_LENGTH} bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(CardUid(arr))
    }

    /// Get the raw UID bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; UID_LENGTH] {
        &self.0
    }

    /// Format the UID as an uppercase hex string (e.g. "D3A7B128").
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02X}")).collect()
    }
}

impl fmt::Display for CardUid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for CardUid {
    type Err = Error;

    /// Parse from an 8-digit hex string, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        if s.len() != UID_LENGTH * 2 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidCardUid(format!(
                "Expected {} hex digits, got '{s}'",
                UID_LENGTH * 2
            )));
        }
        let mut bytes = [0u8; UID_LENGTH];
        for (i, byte) in bytes.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[i * 2..i * 2 + 2], 16)
                .map_err(|e| Error::InvalidCardUid(format!("Invalid UID '{s}': {e}")))?;
        }
        Ok(CardUid(bytes))
    }
}

/// Constant-time comparison implementation for CardUid
///
/// This prevents timing attacks by ensuring comparison takes the same time
/// regardless of where the byte arrays differ.
impl PartialEq for CardUid {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

/// Hash implementation for CardUid
///
/// Implements standard hashing for use in hash-based collections.
impl std::hash::Hash for CardUid {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Classification of the in-progress gate request.
///
/// Determined at card-scan time from registry membership: a UID absent from
/// the registry wants to enter, a UID present wants to exit. `None` outside
/// of an authorized interaction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    #[default]
    None,
    Entry,
    Exit,
}

impl Intent {
    /// Returns `true` if intent is Entry.
    #[inline]
    #[must_use]
    pub fn is_entry(self) -> bool {
        matches!(self, Intent::Entry)
    }

    /// Returns `true` if intent is Exit.
    #[inline]
    #[must_use]
    pub fn is_exit(self) -> bool {
        matches!(self, Intent::Exit)
    }

    /// Returns `true` if no interaction is in progress.
    #[inline]
    #[must_use]
    pub fn is_none(self) -> bool {
        matches!(self, Intent::None)
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Intent::None => write!(f, "None"),
            Intent::Entry => write!(f, "Entry"),
            Intent::Exit => write!(f, "Exit"),
        }
    }
}
