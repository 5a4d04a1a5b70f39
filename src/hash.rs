//! Content digests for archive headers

use sha2::{Digest, Sha256};

/// SHA-256 of `data` as 64 lowercase hex characters
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
