//! Secret key material for `.fwknoprc` files: random Rijndael and HMAC keys,
//! the key-length context they are sized from, and log-safe fingerprints.
//! Generation and length bookkeeping are kept apart so a length problem never
//! touches the random source.

pub mod fingerprint;
pub mod generator;
pub mod settings;

pub use generator::KeyGenerator;
pub use settings::{KeyError, KeyLength, KeySettings, MAX_KEY_LENGTH};
