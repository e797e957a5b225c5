//! Key-length context. Lengths are copied out of the preferences store when a
//! session starts, may be edited freely, and only go back to the store on an
//! explicit [`KeySettings::save`].

use std::collections::BTreeMap;
use std::fmt;

use rand::{CryptoRng, RngCore};
use thiserror::Error;

use super::fingerprint::fingerprint;
use super::generator::KeyGenerator;
use crate::prefs::{Preferences, PrefsError};
use crate::registry::SettingKey;

/// Largest length accepted for any generated key, matching fwknop's own
/// `MAX_KEY_LEN`.
pub const MAX_KEY_LENGTH: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("no length configured for {0}")]
    MissingLength(KeyLength),
    #[error("length for {length} must be an integer from 1 to {}, got {value:?}", MAX_KEY_LENGTH)]
    InvalidLength { length: KeyLength, value: String },
}

/// Which generated key a length applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum KeyLength {
    Rijndael,
    Hmac,
    Base64Rijndael,
    Base64Hmac,
}

impl KeyLength {
    pub const ALL: [KeyLength; 4] = [
        KeyLength::Rijndael,
        KeyLength::Hmac,
        KeyLength::Base64Rijndael,
        KeyLength::Base64Hmac,
    ];

    pub fn pref_key(self) -> &'static str {
        match self {
            KeyLength::Rijndael => "key.rijndael.length",
            KeyLength::Hmac => "key.hmac.length",
            KeyLength::Base64Rijndael => "key.base64.rijndael.length",
            KeyLength::Base64Hmac => "key.base64.hmac.length",
        }
    }

    /// Setting that receives a key generated with this length.
    pub fn target(self) -> SettingKey {
        match self {
            KeyLength::Rijndael => SettingKey::Key,
            KeyLength::Hmac => SettingKey::HmacKey,
            KeyLength::Base64Rijndael => SettingKey::KeyBase64,
            KeyLength::Base64Hmac => SettingKey::HmacKeyBase64,
        }
    }

    pub fn is_base64(self) -> bool {
        matches!(self, KeyLength::Base64Rijndael | KeyLength::Base64Hmac)
    }
}

impl fmt::Display for KeyLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.pref_key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeySettings {
    lengths: BTreeMap<KeyLength, String>,
}

impl KeySettings {
    pub fn from_preferences<P: Preferences + ?Sized>(prefs: &P) -> Self {
        let lengths = KeyLength::ALL
            .iter()
            .filter_map(|length| prefs.get(length.pref_key()).map(|value| (*length, value)))
            .collect();
        Self { lengths }
    }

    pub fn set(&mut self, length: KeyLength, value: impl Into<String>) {
        self.lengths.insert(length, value.into());
    }

    pub fn get(&self, length: KeyLength) -> Option<&str> {
        self.lengths.get(&length).map(String::as_str)
    }

    /// Parsed length; zero, oversized, garbage and missing entries are all
    /// errors.
    pub fn length(&self, length: KeyLength) -> Result<usize, KeyError> {
        let raw = self.get(length).ok_or(KeyError::MissingLength(length))?;
        match raw.trim().parse::<usize>() {
            Ok(n) if (1..=MAX_KEY_LENGTH).contains(&n) => Ok(n),
            _ => Err(KeyError::InvalidLength {
                length,
                value: raw.to_string(),
            }),
        }
    }

    /// Generates the key for `length` with the encoding its target setting
    /// expects.
    pub fn generate_with<R: RngCore + CryptoRng>(
        &self,
        length: KeyLength,
        generator: &mut KeyGenerator<R>,
    ) -> Result<String, KeyError> {
        let n = self.length(length)?;
        let key = if length.is_base64() {
            generator.base64(n)
        } else {
            generator.alphabetic(n)
        };
        tracing::debug!(
            setting = %length.target(),
            length = n,
            fingerprint = %fingerprint(&key),
            "generated key"
        );
        Ok(key)
    }

    pub fn generate(&self, length: KeyLength) -> Result<String, KeyError> {
        self.generate_with(length, &mut KeyGenerator::new())
    }

    pub fn rijndael_key(&self) -> Result<String, KeyError> {
        self.generate(KeyLength::Rijndael)
    }

    pub fn hmac_key(&self) -> Result<String, KeyError> {
        self.generate(KeyLength::Hmac)
    }

    pub fn base64_rijndael_key(&self) -> Result<String, KeyError> {
        self.generate(KeyLength::Base64Rijndael)
    }

    pub fn base64_hmac_key(&self) -> Result<String, KeyError> {
        self.generate(KeyLength::Base64Hmac)
    }

    /// Writes every known length back to `prefs` and persists the store.
    pub fn save<P: Preferences + ?Sized>(&self, prefs: &mut P) -> Result<(), PrefsError> {
        for (length, value) in &self.lengths {
            prefs.set(length.pref_key(), value.clone());
        }
        prefs.persist()
    }
}
