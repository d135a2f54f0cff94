//! Base58 and Base58Check codecs.

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

use bitcoin::hashes::{sha256d, Hash};

/// All alphanumeric characters except for "0", "I", "O", and "l".
const BASE58_CHARS: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

#[rustfmt::skip]
const BASE58_REV: [i8; 256] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1,  0,  1,  2,  3,  4,  5,  6,  7,  8, -1, -1, -1, -1, -1, -1,
    -1,  9, 10, 11, 12, 13, 14, 15, 16, -1, 17, 18, 19, 20, 21, -1,
    22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, -1, -1, -1, -1, -1,
    -1, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, -1, 44, 45, 46,
    47, 48, 49, 50, 51, 52, 53, 54, 55, 56, 57, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
];

fn is_space(c: u8) -> bool {
    matches!(c, b' ' | 0x0c | b'\n' | b'\r' | b'\t' | 0x0b)
}

/// Encodes `input` in base 58, mapping each leading zero byte to a
/// leading `'1'`.
pub fn encode_base58(input: &[u8]) -> String {
    // Skip and count leading zeroes.
    let mut input = input;
    let mut zeroes = 0usize;
    while let Some((&0, rest)) = input.split_first() {
        zeroes += 1;
        input = rest;
    }

    // Big-endian base-58 representation: log(256) / log(58), rounded up.
    let size = input.len() * 138 / 100 + 1;
    let mut b58 = vec![0u8; size];
    let mut length = 0usize;
    for &byte in input {
        let mut carry = byte as u32;
        let mut i = 0usize;
        for digit in b58.iter_mut().rev() {
            if carry == 0 && i >= length {
                break;
            }
            carry += 256 * (*digit as u32);
            *digit = (carry % 58) as u8;
            carry /= 58;
            i += 1;
        }
        debug_assert_eq!(carry, 0);
        length = i;
    }

    let mut digits = &b58[size - length..];
    while let Some((&0, rest)) = digits.split_first() {
        digits = rest;
    }

    let mut result = String::with_capacity(zeroes + digits.len());
    for _ in 0..zeroes {
        result.push('1');
    }
    for &digit in digits {
        result.push(BASE58_CHARS[digit as usize] as char);
    }
    result
}

/// Decodes a base-58 string, tolerating leading and trailing ASCII
/// whitespace.
///
/// Fails on any other non-alphabet character or when the decoded payload
/// would exceed `max_ret_len` bytes.
pub fn decode_base58(s: &str, max_ret_len: usize) -> Option<Vec<u8>> {
    let bytes = s.as_bytes();
    let mut pos = 0usize;

    // Skip leading spaces.
    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }

    // Skip and count leading '1's.
    let mut zeroes = 0usize;
    while pos < bytes.len() && bytes[pos] == b'1' {
        zeroes += 1;
        if zeroes > max_ret_len {
            return None;
        }
        pos += 1;
    }

    // Big-endian base-256 representation: log(58) / log(256), rounded up.
    let size = (bytes.len() - pos) * 733 / 1000 + 1;
    let mut b256 = vec![0u8; size];
    let mut length = 0usize;
    while pos < bytes.len() && !is_space(bytes[pos]) {
        let mut carry = match BASE58_REV[bytes[pos] as usize] {
            -1 => return None,
            digit => digit as u32,
        };
        let mut i = 0usize;
        for byte in b256.iter_mut().rev() {
            if carry == 0 && i >= length {
                break;
            }
            carry += 58 * (*byte as u32);
            *byte = (carry % 256) as u8;
            carry /= 256;
            i += 1;
        }
        debug_assert_eq!(carry, 0);
        length = i;
        if length + zeroes > max_ret_len {
            return None;
        }
        pos += 1;
    }

    // Only trailing spaces may remain.
    while pos < bytes.len() && is_space(bytes[pos]) {
        pos += 1;
    }
    if pos != bytes.len() {
        return None;
    }

    let mut result = Vec::with_capacity(zeroes + length);
    result.resize(zeroes, 0);
    result.extend_from_slice(&b256[size - length..]);
    Some(result)
}

/// Encodes `input` in base 58 with a trailing 4-byte double-SHA-256
/// checksum.
pub fn encode_base58_check(input: &[u8]) -> String {
    let mut data = input.to_vec();
    let hash = sha256d::Hash::hash(&data);
    data.extend_from_slice(&hash.to_byte_array()[..4]);
    encode_base58(&data)
}

/// Decodes a Base58Check string, verifying and stripping the trailing
/// 4-byte checksum. `max_ret_len` bounds the returned payload.
pub fn decode_base58_check(s: &str, max_ret_len: usize) -> Option<Vec<u8>> {
    let mut data = decode_base58(s, max_ret_len.saturating_add(4))?;
    if data.len() < 4 {
        return None;
    }
    let payload_len = data.len() - 4;
    let hash = sha256d::Hash::hash(&data[..payload_len]);
    if hash.to_byte_array()[..4] != data[payload_len..] {
        return None;
    }
    data.truncate(payload_len);
    Some(data)
}
