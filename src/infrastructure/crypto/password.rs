//! Password hashing and verification
//!
//! Stored passwords are either bcrypt hashes or legacy plaintext.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};
use sha2::{Digest, Sha256};
use tracing::debug;

const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];

/// Length of a modular-crypt bcrypt string: `$2b$NN$` plus 53 salt/hash chars.
const BCRYPT_HASH_LEN: usize = 60;

/// bcrypt ignores input past this many bytes.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Hash a password using bcrypt.
///
/// Fails with [`BcryptError::Truncation`] for passwords longer than
/// [`MAX_PASSWORD_BYTES`].
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(BcryptError::Truncation(password.len()));
    }
    hash(password, DEFAULT_COST)
}

/// Whether a stored password value has the shape of a bcrypt hash.
pub fn is_password_hash(stored: &str) -> bool {
    let bytes = stored.as_bytes();
    bytes.len() == BCRYPT_HASH_LEN
        && BCRYPT_PREFIXES.iter().any(|p| stored.starts_with(p))
        && bytes[4].is_ascii_digit()
        && bytes[5].is_ascii_digit()
        && bytes[6] == b'$'
        && bytes[7..]
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || *b == b'.' || *b == b'/')
}

/// Verify a candidate against a stored password.
///
/// A stored bcrypt hash never matches a candidate longer than
/// [`MAX_PASSWORD_BYTES`]. A stored value bcrypt cannot use is compared as
/// plaintext. Plaintext values are compared through their SHA-256 digests,
/// which is equivalent to exact string equality.
pub fn verify_password(candidate: &str, stored: &str) -> bool {
    if is_password_hash(stored) {
        // Longer than any hash-shaped plaintext, so this holds for both paths.
        if candidate.len() > MAX_PASSWORD_BYTES {
            debug!("Candidate of {} bytes exceeds the bcrypt limit", candidate.len());
            return false;
        }
        match verify(candidate, stored) {
            Ok(matched) => return matched,
            Err(e) => debug!("Stored password is not a usable bcrypt hash: {}", e),
        }
    }

    let lhs = Sha256::digest(candidate.as_bytes());
    let rhs = Sha256::digest(stored.as_bytes());
    lhs.iter()
        .zip(rhs.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
