//! Lenient base64 decoding.
//!
//! Accepts both the standard and URL-safe alphabets, skips whitespace,
//! padding and any other non-alphabet character, and ignores an incomplete
//! trailing symbol. Never fails: undecodable input yields whatever bytes
//! could be recovered, possibly none, and the normalizer rejects it later.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

pub(crate) fn decode_lenient(input: &str) -> Vec<u8> {
    let mut symbols: Vec<u8> = input
        .bytes()
        .filter_map(|byte| match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'+' | b'/' => Some(byte),
            b'-' => Some(b'+'),
            b'_' => Some(b'/'),
            _ => None,
        })
        .collect();

    // A single leftover symbol carries fewer than 8 bits.
    if symbols.len() % 4 == 1 {
        symbols.pop();
    }

    LENIENT.decode(&symbols).unwrap_or_default()
}
