use crate::error::InvalidKeyError;

/// Number of ordinals in the partition key space (`'A'..='Z'`).
pub const KEY_SPACE_SIZE: i64 = 26;

/// Maps a key to the zero-based alphabet position of its first letter.
///
/// `"Apple"` -> 0, `"bob"` -> 1, `"Zebra"` -> 25. Empty keys and keys starting with
/// anything other than an ASCII letter are rejected.
pub fn derive_partition_key(key: &str) -> Result<i64, InvalidKeyError> {
    match key.chars().next() {
        Some(first) if first.is_ascii_alphabetic() => {
            Ok((first.to_ascii_uppercase() as u8 - b'A') as i64)
        }
        _ => Err(InvalidKeyError {
            key: key.to_string(),
        }),
    }
}
