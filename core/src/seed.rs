//! Ticket seed encoding.
//!
//! Seeds are stored and transported as standard base64 text. TOTP secrets are
//! exchanged in RFC 4648 base32, the alphabet authenticator apps and
//! `otpauth://` URIs use. Converting between the two is a pure re-encoding of
//! the same bytes:
//!
//! ```text
//! base64 text ──decode──▶ raw bytes ──encode──▶ base32 text
//! ```
//!
//! Every conversion of the same stored seed yields the same secret, which is
//! what lets the holder's device and the gate derive the same code space.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const BASE32: base32::Alphabet = base32::Alphabet::RFC4648 { padding: false };

/// Seed could not be turned into secret material.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeedError {
    /// Seed text is empty.
    #[error("Seed cannot be empty")]
    Empty,

    /// Seed text is not valid base64.
    #[error("Seed is not valid base64: {0}")]
    InvalidBase64(String),

    /// Secret text is not valid base32.
    #[error("Secret is not valid base32")]
    InvalidBase32,
}

/// Ticket seed, as base64 text.
///
/// `Debug` never prints the seed value.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(String);

impl Seed {
    /// Wrap base64 seed text as stored.
    #[must_use]
    pub fn new(base64: impl Into<String>) -> Self {
        Self(base64.into())
    }

    /// Encode raw seed bytes into their stored form.
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(STANDARD.encode(bytes))
    }

    /// Stored base64 text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the seed into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::Empty`] for empty text and
    /// [`SeedError::InvalidBase64`] if the text does not decode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SeedError> {
        let text = self.0.trim();
        if text.is_empty() {
            return Err(SeedError::Empty);
        }
        STANDARD
            .decode(text)
            .map_err(|e| SeedError::InvalidBase64(e.to_string()))
    }

    /// Re-encode the seed as a base32 TOTP secret.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError`] if the seed does not decode.
    pub fn to_totp_secret(&self) -> Result<TotpSecret, SeedError> {
        let bytes = self.to_bytes()?;
        Ok(TotpSecret(base32::encode(BASE32, &bytes)))
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// TOTP secret in RFC 4648 base32, without padding.
#[derive(Clone, PartialEq, Eq)]
pub struct TotpSecret(String);

impl TotpSecret {
    /// Parse base32 secret text. Padding and lowercase are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::InvalidBase32`] if the text does not decode.
    pub fn from_base32(text: &str) -> Result<Self, SeedError> {
        let normalised = text.trim().trim_end_matches('=').to_ascii_uppercase();
        if normalised.is_empty() {
            return Err(SeedError::Empty);
        }
        base32::decode(BASE32, &normalised).ok_or(SeedError::InvalidBase32)?;
        Ok(Self(normalised))
    }

    /// Base32 text of the secret.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Raw secret bytes for the HMAC.
    ///
    /// # Errors
    ///
    /// Returns [`SeedError::InvalidBase32`] if the text does not decode.
    pub fn to_bytes(&self) -> Result<Vec<u8>, SeedError> {
        base32::decode(BASE32, &self.0).ok_or(SeedError::InvalidBase32)
    }
}

impl fmt::Debug for TotpSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TotpSecret(<redacted>)")
    }
}
