use sha2::{Digest, Sha256};

const FINGERPRINT_LEN: usize = 12;

/// Short, stable digest of a secret value, safe to put in logs.
pub fn fingerprint(secret: &str) -> String {
    let digest = Sha256::digest(secret.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}
