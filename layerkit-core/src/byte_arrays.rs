//! Byte array helpers
//!
//! Hex formatting, hashing and concatenation shared by headers and packets.

use bytes::{BufMut, BytesMut};
use std::fmt::Write;

/// Format each byte as two lowercase hex digits joined by `separator`.
///
/// ```
/// use layerkit_core::byte_arrays::to_hex_string;
///
/// assert_eq!(to_hex_string(&[0x00, 0x01, 0x0a], ":"), "00:01:0a");
/// assert_eq!(to_hex_string(&[0x00, 0x01, 0x0a], " "), "00 01 0a");
/// ```
pub fn to_hex_string(data: &[u8], separator: &str) -> String {
    if data.is_empty() {
        return String::new();
    }

    let mut out = String::with_capacity(data.len() * (2 + separator.len()));
    for (i, byte) in data.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        // Writing to a String cannot fail
        let _ = write!(out, "{:02x}", byte);
    }
    out
}

/// Order-sensitive hash of a byte sequence.
///
/// Starts at 1 and folds each signed byte in as `31 * h + b` with
/// wrapping arithmetic, so equal sequences always hash equally and the
/// value is stable across runs.
pub fn hash_bytes(data: &[u8]) -> i32 {
    data.iter().fold(1i32, |hash, &byte| {
        hash.wrapping_mul(31).wrapping_add(byte as i8 as i32)
    })
}

/// Concatenate byte slices in order into a freshly allocated buffer
pub fn concat<I, B>(parts: I) -> Vec<u8>
where
    I: IntoIterator<Item = B>,
    B: AsRef<[u8]>,
{
    let parts: Vec<B> = parts.into_iter().collect();
    let length = parts.iter().map(|part| part.as_ref().len()).sum();

    let mut buffer = BytesMut::with_capacity(length);
    for part in &parts {
        buffer.put_slice(part.as_ref());
    }

    buffer.to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_string_separators() {
        let data = [0x00, 0x01, 0x0a, 0xff];
        assert_eq!(to_hex_string(&data, ":"), "00:01:0a:ff");
        assert_eq!(to_hex_string(&data, " "), "00 01 0a ff");
        assert_eq!(to_hex_string(&data, ""), "00010aff");
    }

    #[test]
    fn test_hex_string_edge_cases() {
        assert_eq!(to_hex_string(&[], ":"), "");
        assert_eq!(to_hex_string(&[0xAB], " "), "ab");
    }

    #[test]
    fn test_hash_bytes_known_values() {
        assert_eq!(hash_bytes(&[]), 1);
        assert_eq!(hash_bytes(&[0x00]), 31);
        assert_eq!(hash_bytes(&[0x01, 0x02]), (31 + 1) * 31 + 2);
        // bytes are folded in as signed values
        assert_eq!(hash_bytes(&[0xFF]), 31 - 1);
    }

    #[test]
    fn test_hash_bytes_order_sensitive() {
        assert_ne!(hash_bytes(&[0x01, 0x02]), hash_bytes(&[0x02, 0x01]));
    }

    #[test]
    fn test_hash_bytes_long_input_wraps() {
        let data = vec![0x7Fu8; 4096];
        assert_eq!(hash_bytes(&data), hash_bytes(&data.clone()));
    }

    #[test]
    fn test_concat() {
        let fields = vec![vec![0x00, 0x01], vec![], vec![0x0A]];
        assert_eq!(concat(&fields), vec![0x00, 0x01, 0x0A]);
        assert_eq!(concat(Vec::<Vec<u8>>::new()), Vec::<u8>::new());
    }
}
