//! Bech32 and Bech32m codecs (BIP-173 / BIP-350).

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec::Vec};
#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

/// The two sibling checksum flavours, distinguished only by the constant
/// the checksum residue is XORed with.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    /// BIP-173, used for witness version 0.
    Bech32,
    /// BIP-350, used for witness versions 1 and up.
    Bech32m,
}

/// Outcome of a successful [`decode`]: the checksum flavour, the
/// lowercase HRP, and the 5-bit data symbols without the checksum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub encoding: Encoding,
    pub hrp: String,
    pub data: Vec<u8>,
}

/// Longest well-formed Bech32 string, checksum included.
const MAX_STRING_LEN: usize = 90;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

#[rustfmt::skip]
const CHARSET_REV: [i8; 128] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    15, -1, 10, 17, 21, 20, 26, 30,  7,  5, -1, -1, -1, -1, -1, -1,
    -1, 29, -1, 24, 13, 25,  9,  8, 23, -1, 18, 22, 31, 27, 19, -1,
     1,  0,  3, 16, 11, 28, 12, 14,  6,  4,  2, -1, -1, -1, -1, -1,
    -1, 29, -1, 24, 13, 25,  9,  8, 23, -1, 18, 22, 31, 27, 19, -1,
     1,  0,  3, 16, 11, 28, 12, 14,  6,  4,  2, -1, -1, -1, -1, -1,
];

const BECH32_CONST: u32 = 1;
const BECH32M_CONST: u32 = 0x2bc8_30a3;

fn encoding_constant(encoding: Encoding) -> u32 {
    match encoding {
        Encoding::Bech32 => BECH32_CONST,
        Encoding::Bech32m => BECH32M_CONST,
    }
}

/// BIP-173 checksum polynomial over GF(32), one step per 5-bit value.
fn polymod(values: &[u8]) -> u32 {
    let mut c = 1u32;
    for &value in values {
        let c0 = c >> 25;
        c = ((c & 0x1ff_ffff) << 5) ^ u32::from(value);
        if c0 & 1 != 0 {
            c ^= 0x3b6a_57b2;
        }
        if c0 & 2 != 0 {
            c ^= 0x2650_8e6d;
        }
        if c0 & 4 != 0 {
            c ^= 0x1ea1_19fa;
        }
        if c0 & 8 != 0 {
            c ^= 0x3d42_33dd;
        }
        if c0 & 16 != 0 {
            c ^= 0x2a14_62b3;
        }
    }
    c
}

/// Expands the HRP for checksum computation: the high bits of each
/// character, a zero separator, then the low bits.
fn expand_hrp(hrp: &str) -> Vec<u8> {
    let mut ret = Vec::with_capacity(hrp.len() * 2 + 1);
    for c in hrp.bytes() {
        ret.push(c >> 5);
    }
    ret.push(0);
    for c in hrp.bytes() {
        ret.push(c & 0x1f);
    }
    ret
}

/// Classifies the checksum carried by `values` (which include the six
/// checksum symbols), or `None` when it matches neither flavour.
fn verify_checksum(hrp: &str, values: &[u8]) -> Option<Encoding> {
    let mut enc = expand_hrp(hrp);
    enc.extend_from_slice(values);
    match polymod(&enc) {
        BECH32_CONST => Some(Encoding::Bech32),
        BECH32M_CONST => Some(Encoding::Bech32m),
        _ => None,
    }
}

fn create_checksum(encoding: Encoding, hrp: &str, values: &[u8]) -> [u8; 6] {
    let mut enc = expand_hrp(hrp);
    enc.extend_from_slice(values);
    enc.extend_from_slice(&[0u8; 6]);
    let residue = polymod(&enc) ^ encoding_constant(encoding);
    let mut checksum = [0u8; 6];
    for (i, symbol) in checksum.iter_mut().enumerate() {
        *symbol = ((residue >> (5 * (5 - i))) & 31) as u8;
    }
    checksum
}

/// Encodes `values` (5-bit symbols) under `hrp` with the checksum of the
/// requested flavour. The HRP must already be lowercase.
pub fn encode(encoding: Encoding, hrp: &str, values: &[u8]) -> String {
    debug_assert!(!hrp.bytes().any(|c| c.is_ascii_uppercase()));
    debug_assert!(values.iter().all(|&v| v >> 5 == 0));

    let checksum = create_checksum(encoding, hrp, values);
    let mut result = String::with_capacity(hrp.len() + 1 + values.len() + 6);
    result.push_str(hrp);
    result.push('1');
    for &value in values.iter().chain(checksum.iter()) {
        result.push(CHARSET[value as usize] as char);
    }
    result
}

/// Decodes a Bech32 or Bech32m string.
///
/// Rejects mixed case, characters outside the printable ASCII range,
/// strings longer than 90 characters, a missing or empty HRP, and a data
/// part too short to carry the checksum. The returned data excludes the
/// six checksum symbols.
pub fn decode(s: &str) -> Option<Decoded> {
    let bytes = s.as_bytes();
    let mut lower = false;
    let mut upper = false;
    for &c in bytes {
        if !(33..=126).contains(&c) {
            return None;
        }
        if c.is_ascii_lowercase() {
            lower = true;
        }
        if c.is_ascii_uppercase() {
            upper = true;
        }
    }
    if lower && upper {
        return None;
    }

    // The separator is the last '1'; earlier ones belong to the HRP.
    let pos = bytes.iter().rposition(|&c| c == b'1')?;
    if bytes.len() > MAX_STRING_LEN || pos == 0 || pos + 7 > bytes.len() {
        return None;
    }

    let mut values = Vec::with_capacity(bytes.len() - 1 - pos);
    for &c in &bytes[pos + 1..] {
        match CHARSET_REV[c as usize] {
            -1 => return None,
            value => values.push(value as u8),
        }
    }

    let mut hrp = String::with_capacity(pos);
    for &c in &bytes[..pos] {
        hrp.push(c.to_ascii_lowercase() as char);
    }

    let encoding = verify_checksum(&hrp, &values)?;
    values.truncate(values.len() - 6);
    Some(Decoded {
        encoding,
        hrp,
        data: values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_either_case_to_the_same_symbols() {
        let lower = decode("abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw").unwrap();
        let upper = decode("ABCDEF1QPZRY9X8GF2TVDW0S3JN54KHCE6MUA7LMQQQXW").unwrap();
        assert_eq!(lower, upper);
        assert_eq!(lower.encoding, Encoding::Bech32);
        assert_eq!(lower.hrp, "abcdef");
        assert_eq!(lower.data, (0u8..32).collect::<Vec<_>>());
    }

    #[test]
    fn rejects_mixed_case() {
        assert!(decode("abcdef1Qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw").is_none());
    }

    #[test]
    fn splits_on_the_last_separator() {
        let dec = decode("split1checkupstagehandshakeupstreamerranterredcaperred2y9e3w").unwrap();
        assert_eq!(dec.hrp, "split");
        assert_eq!(dec.encoding, Encoding::Bech32);
    }

    #[test]
    fn classifies_bech32m_checksums() {
        let dec = decode("abcdef1l7aum6echk45nj3s0wdvt2fg8x9yrzpqzd3ryx").unwrap();
        assert_eq!(dec.encoding, Encoding::Bech32m);
        assert_eq!(dec.data, (0u8..32).rev().collect::<Vec<_>>());
    }

    #[test]
    fn rejects_structural_damage() {
        // No separator, empty HRP, truncated checksum, over-long string.
        assert!(decode("pzry9x0s0muk").is_none());
        assert!(decode("1pzry9x0s0muk").is_none());
        assert!(decode("li1dgmt3").is_none());
        let long = "an84characterslonghumanreadablepartthatcontainsthenumber1andtheexcludedcharactersbio1569pvx";
        assert!(decode(long).is_none());
    }

    #[test]
    fn rejects_out_of_range_characters() {
        assert!(decode("\u{20}1nwldj5").is_none());
        assert!(decode("\u{7f}1axkwrx").is_none());
        assert!(decode("x1b4n0q5v").is_none());
    }

    #[test]
    fn encode_is_the_inverse_of_decode() {
        for case in [
            (Encoding::Bech32, "a12uel5l"),
            (Encoding::Bech32m, "a1lqfn3a"),
            (
                Encoding::Bech32m,
                "split1checkupstagehandshakeupstreamerranterredcaperredlc445v",
            ),
        ] {
            let (encoding, s) = case;
            let dec = decode(s).unwrap();
            assert_eq!(dec.encoding, encoding);
            assert_eq!(encode(encoding, &dec.hrp, &dec.data), s);
        }
    }
}
