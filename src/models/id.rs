//! Snippet identifier generation.
//!
//! Identifiers are the base-36 epoch milliseconds followed by a base-36
//! random component. Uniqueness is probabilistic; import enforces it
//! against the existing collection separately.

use chrono::Utc;
use uuid::Uuid;

const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a fresh snippet identifier
pub fn generate() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    // Random half of a v4 uuid; 64 bits is plenty for a personal collection
    let random = (Uuid::new_v4().as_u128() & u64::MAX as u128) as u64;

    let mut id = encode_base36(millis);
    id.push_str(&encode_base36(random as u128));
    id
}

/// Encodes an unsigned integer with lowercase base-36 digits
pub fn encode_base36(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut digits = Vec::new();
    while value > 0 {
        digits.push(ALPHABET[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();

    String::from_utf8(digits).unwrap_or_default()
}
