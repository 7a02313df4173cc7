//! Identity canonicalization

use crate::{GateError, Leaf, Result};

/// Width of every leaf in bytes.
pub const LEAF_WIDTH: usize = 32;

/// Right-align a raw identity into a 32-byte leaf, zero-filling the front.
///
/// A 20-byte address becomes 12 zero bytes followed by the address. Inputs
/// wider than [`LEAF_WIDTH`] are rejected.
pub fn canonicalize(raw: &[u8]) -> Result<Leaf> {
    if raw.len() > LEAF_WIDTH {
        return Err(GateError::InvalidAddressFormat);
    }
    let mut leaf = [0u8; LEAF_WIDTH];
    leaf[LEAF_WIDTH - raw.len()..].copy_from_slice(raw);
    Ok(Leaf::from_bytes(leaf))
}

/// Decode a hex identity, with or without a `0x` prefix.
pub fn parse_address(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() || digits.len() > LEAF_WIDTH * 2 {
        return Err(GateError::InvalidAddressFormat);
    }
    hex::decode(digits).map_err(|_| GateError::InvalidAddressFormat)
}

pub fn canonicalize_str(s: &str) -> Result<Leaf> {
    canonicalize(&parse_address(s)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_is_left_padded() {
        let address = [0x42u8; 20];
        let leaf = canonicalize(&address).unwrap();
        assert_eq!(leaf.as_bytes()[..12], [0u8; 12]);
        assert_eq!(leaf.as_bytes()[12..], address);
    }

    #[test]
    fn test_full_width_is_unchanged() {
        let raw = [7u8; 32];
        assert_eq!(*canonicalize(&raw).unwrap().as_bytes(), raw);
    }

    #[test]
    fn test_too_long_rejected() {
        assert_eq!(canonicalize(&[1u8; 33]), Err(GateError::InvalidAddressFormat));
    }

    #[test]
    fn test_different_lengths_same_value() {
        // leading zeros are not significant once padded
        let short = canonicalize(&[0x01, 0x02]).unwrap();
        let long = canonicalize(&[0x00, 0x00, 0x01, 0x02]).unwrap();
        assert_eq!(short, long);
    }

    #[test]
    fn test_parse_address_prefix_optional() {
        let a = parse_address("0x1234567890abcdef1234567890abcdef12345678").unwrap();
        let b = parse_address("1234567890abcdef1234567890abcdef12345678").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 20);
    }

    #[test]
    fn test_parse_address_invalid() {
        assert_eq!(parse_address(""), Err(GateError::InvalidAddressFormat));
        assert_eq!(parse_address("0x"), Err(GateError::InvalidAddressFormat));
        assert_eq!(parse_address("0x123"), Err(GateError::InvalidAddressFormat));
        assert_eq!(parse_address("0xzz"), Err(GateError::InvalidAddressFormat));
        let too_long = format!("0x{}", "ab".repeat(33));
        assert_eq!(parse_address(&too_long), Err(GateError::InvalidAddressFormat));
    }

    #[test]
    fn test_canonicalize_str_matches_bytes() {
        let leaf = canonicalize_str("0x0101010101010101010101010101010101010101").unwrap();
        assert_eq!(leaf, canonicalize(&[1u8; 20]).unwrap());
    }
}
