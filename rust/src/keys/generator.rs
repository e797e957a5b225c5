//! Random key generation in the two encodings fwknop accepts: plain letters
//! for `KEY`/`HMAC_KEY`, and random bytes as standard base64 for the
//! `*_BASE64` settings.

use base64::{engine::general_purpose::STANDARD, Engine};
use rand::rngs::OsRng;
use rand::{CryptoRng, Rng, RngCore};
use zeroize::Zeroize;

const ALPHABET: &[u8; 52] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Wraps a cryptographic RNG. The default `OsRng` holds no state of its own,
/// so independent generators never share output.
#[derive(Debug, Clone)]
pub struct KeyGenerator<R = OsRng> {
    rng: R,
}

impl KeyGenerator<OsRng> {
    pub fn new() -> Self {
        Self { rng: OsRng }
    }
}

impl Default for KeyGenerator<OsRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore + CryptoRng> KeyGenerator<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Exactly `length` characters drawn uniformly from `[A-Za-z]`.
    pub fn alphabetic(&mut self, length: usize) -> String {
        (0..length)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())] as char)
            .collect()
    }

    /// `length` random bytes encoded as padded standard base64.
    pub fn base64(&mut self, length: usize) -> String {
        let mut bytes = vec![0u8; length];
        self.rng.fill_bytes(&mut bytes);
        let encoded = STANDARD.encode(&bytes);
        bytes.zeroize();
        encoded
    }
}

/// Base64 form of an operator-chosen passphrase, for `GPG_SIGNING_PW_BASE64`
/// and friends.
pub fn encode_base64(passphrase: &str) -> String {
    STANDARD.encode(passphrase.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::{encode_base64, KeyGenerator};
    use base64::{engine::general_purpose::STANDARD, Engine};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn alphabetic_keys_have_requested_length() {
        let mut generator = KeyGenerator::new();
        let key = generator.alphabetic(16);
        assert_eq!(key.len(), 16);
        assert!(key.chars().all(|c| c.is_ascii_alphabetic()));
        assert_eq!(generator.alphabetic(0), "");
    }

    #[test]
    fn successive_keys_differ() {
        let mut generator = KeyGenerator::new();
        assert_ne!(generator.alphabetic(32), generator.alphabetic(32));
        assert_ne!(generator.base64(32), generator.base64(32));
    }

    #[test]
    fn base64_keys_decode_to_requested_bytes() {
        let mut generator = KeyGenerator::new();
        for length in [1usize, 2, 3, 16, 20, 32, 64] {
            let key = generator.base64(length);
            assert_eq!(STANDARD.decode(&key).expect("valid base64").len(), length);
            assert_eq!(key.len(), length.div_ceil(3) * 4);
        }
    }

    #[test]
    fn hmac_key_of_twenty_bytes() {
        let key = KeyGenerator::new().base64(20);
        assert_eq!(key.len(), 28);
        assert!(key.ends_with('='));
        assert_eq!(STANDARD.decode(&key).unwrap().len(), 20);
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let a = KeyGenerator::with_rng(StdRng::seed_from_u64(7)).alphabetic(24);
        let b = KeyGenerator::with_rng(StdRng::seed_from_u64(7)).alphabetic(24);
        assert_eq!(a, b);
    }

    #[test]
    fn encodes_passphrase() {
        assert_eq!(encode_base64("fwknop"), "Zndrbm9w");
    }
}
