//! One-time registration codes. Only the SHA-256 of a code is ever kept.

use rand::Rng;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Six digits, never starting with zero.
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

pub fn hash_otp(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.trim().as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare a submitted code with a stored hash in constant time.
pub fn otp_matches(code: &str, stored_hash: &str) -> bool {
    hash_otp(code)
        .as_bytes()
        .ct_eq(stored_hash.as_bytes())
        .into()
}
