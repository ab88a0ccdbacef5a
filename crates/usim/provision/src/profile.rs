//! Provisioning profiles
//!
//! A [`Profile`] holds the four values as the operator wrote them. It is
//! assembled from layers (built-in defaults, then an optional JSON file, then
//! command-line overrides) and normalized once into wire-ready buffers.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec::{decode_hex_array, encode_bcd_imsi, encode_pin};
use crate::constants::{
    IMSI_MAX_DIGITS, IMSI_MIN_PROFILE_DIGITS, IMSI_RECORD_LEN, KEY_LEN, PIN_FIELD_LEN, defaults,
};
use crate::error::{Error, Result, ValidationError};

/// Provisioning values for one card, as text
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Profile {
    imsi: String,
    key: String,
    opc: String,
    pin: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self::new(defaults::IMSI, defaults::KEY, defaults::OPC, defaults::PIN)
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("imsi", &self.imsi)
            .field("key", &"<redacted>")
            .field("opc", &"<redacted>")
            .field("pin", &"<redacted>")
            .finish()
    }
}

impl Profile {
    /// Create a profile from its four values
    pub fn new(
        imsi: impl Into<String>,
        key: impl Into<String>,
        opc: impl Into<String>,
        pin: impl Into<String>,
    ) -> Self {
        Self {
            imsi: imsi.into(),
            key: key.into(),
            opc: opc.into(),
            pin: pin.into(),
        }
    }

    /// IMSI digits
    pub fn imsi(&self) -> &str {
        &self.imsi
    }

    /// Secret key K as hex
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Operator constant OPc as hex
    pub fn opc(&self) -> &str {
        &self.opc
    }

    /// PIN digits
    pub fn pin(&self) -> &str {
        &self.pin
    }

    /// A new profile with every value present in `overrides` replaced
    pub fn merge(&self, overrides: &ProfileOverrides) -> Self {
        let pick = |over: &Option<String>, base: &String| over.as_ref().unwrap_or(base).clone();
        Self {
            imsi: pick(&overrides.imsi, &self.imsi),
            key: pick(&overrides.key, &self.key),
            opc: pick(&overrides.opc, &self.opc),
            pin: pick(&overrides.pin, &self.pin),
        }
    }

    /// Validate all four values and encode them for the wire
    ///
    /// Fails on the first invalid field; nothing is encoded partially.
    pub fn normalize(&self) -> Result<NormalizedProfile> {
        let imsi_len = self.imsi.len();
        if !(IMSI_MIN_PROFILE_DIGITS..=IMSI_MAX_DIGITS).contains(&imsi_len)
            && self.imsi.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(Error::validation(
                "IMSI",
                ValidationError::OutOfRange {
                    value: imsi_len,
                    min: IMSI_MIN_PROFILE_DIGITS,
                    max: IMSI_MAX_DIGITS,
                },
            ));
        }

        let imsi = encode_bcd_imsi(&self.imsi).map_err(|e| Error::validation("IMSI", e))?;
        let key = decode_hex_array(&self.key).map_err(|e| Error::validation("key", e))?;
        let opc = decode_hex_array(&self.opc).map_err(|e| Error::validation("OPc", e))?;
        let pin = encode_pin(&self.pin).map_err(|e| Error::validation("PIN", e))?;

        debug!(imsi = %self.imsi, "Profile validated");

        Ok(NormalizedProfile {
            imsi,
            key,
            opc,
            pin,
        })
    }
}

/// Optional per-field replacements for a [`Profile`]
///
/// This is also the shape of a JSON profile file; any subset of the four
/// keys may be present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileOverrides {
    /// IMSI digits
    #[serde(default)]
    pub imsi: Option<String>,
    /// Secret key K as hex
    #[serde(default)]
    pub key: Option<String>,
    /// Operator constant OPc as hex
    #[serde(default)]
    pub opc: Option<String>,
    /// PIN digits
    #[serde(default)]
    pub pin: Option<String>,
}

impl ProfileOverrides {
    /// Parse overrides from JSON text
    pub fn from_json_str(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load overrides from a JSON profile file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| Error::ProfileIo {
            path: path.to_path_buf(),
            source,
        })?;
        let overrides = Self::from_json_str(&text).map_err(|source| Error::ProfileJson {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "Profile file loaded");
        Ok(overrides)
    }

    /// Whether no value is overridden
    pub const fn is_empty(&self) -> bool {
        self.imsi.is_none() && self.key.is_none() && self.opc.is_none() && self.pin.is_none()
    }
}

/// A validated profile in wire encoding
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct NormalizedProfile {
    imsi: [u8; IMSI_RECORD_LEN],
    key: [u8; KEY_LEN],
    opc: [u8; KEY_LEN],
    pin: [u8; PIN_FIELD_LEN],
}

impl fmt::Debug for NormalizedProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NormalizedProfile")
            .field("imsi", &hex::encode_upper(self.imsi))
            .finish_non_exhaustive()
    }
}

impl NormalizedProfile {
    /// BCD IMSI record
    pub const fn imsi(&self) -> &[u8; IMSI_RECORD_LEN] {
        &self.imsi
    }

    /// Secret key K
    pub const fn key(&self) -> &[u8; KEY_LEN] {
        &self.key
    }

    /// Operator constant OPc
    pub const fn opc(&self) -> &[u8; KEY_LEN] {
        &self.opc
    }

    /// Padded ASCII PIN
    pub const fn pin(&self) -> &[u8; PIN_FIELD_LEN] {
        &self.pin
    }
}
