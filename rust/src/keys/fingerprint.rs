//! Short SHA-256 fingerprints so logs can refer to a generated key without
//! ever containing it.

use sha2::{Digest, Sha256};

const FINGERPRINT_HEX_LEN: usize = 8;

pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// First 8 hex characters of the SHA-256 digest of `secret`.
pub fn fingerprint(secret: &str) -> String {
    let mut hex = sha256_hex(secret.as_bytes());
    hex.truncate(FINGERPRINT_HEX_LEN);
    hex
}

#[cfg(test)]
mod tests {
    use super::{fingerprint, sha256_hex};
    use hex::ToHex;
    use sha2::{Digest, Sha256};

    #[test]
    fn hashes_to_hex() {
        let expected: String = Sha256::digest(b"fwknop").encode_hex();
        assert_eq!(sha256_hex(b"fwknop"), expected);
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fingerprint_is_a_prefix() {
        assert_eq!(fingerprint(""), "e3b0c442");
        assert_ne!(fingerprint("a"), fingerprint("b"));
    }
}
