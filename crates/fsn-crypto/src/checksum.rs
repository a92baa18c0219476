//! EIP-55 mixed-case address checksums

use fsn_primitives::Address;

use crate::keccak256;

/// Render an address in EIP-55 mixed-case form
pub fn to_checksum_address(address: &Address) -> String {
    let lower = hex::encode(address.as_bytes());
    let hash = keccak256(lower.as_bytes());
    let hash = hash.as_bytes();

    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (hash[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Check that a `0x`-prefixed address string is checksum-valid.
///
/// Single-case strings carry no checksum and are accepted as long as they
/// are well-formed; mixed-case strings must match EIP-55 exactly.
pub fn is_valid_checksum(s: &str) -> bool {
    let Ok(address) = Address::from_prefixed_hex(s) else {
        return false;
    };
    let digits = &s[2..];
    let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return true;
    }
    to_checksum_address(&address) == s
}
