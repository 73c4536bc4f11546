//! Password digest for the H2 login handshake.

use sha2::{Digest, Sha256};

/// Computes `SHA256(UTF16BE(upper(username) + "@" + password))`, the
/// 32-byte digest sent as the password-hash field of the handshake.
#[must_use]
pub fn password_hash(username: &str, password: &str) -> [u8; 32] {
    let combined = format!("{}@{}", username.to_ascii_uppercase(), password);
    let utf16be: Vec<u8> = combined
        .encode_utf16()
        .flat_map(u16::to_be_bytes)
        .collect();
    let digest = Sha256::digest(&utf16be);
    let mut out = [0_u8; 32];
    out.copy_from_slice(&digest);
    out
}
