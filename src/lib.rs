#![cfg_attr(not(feature = "std"), no_std)]
//! Pure-Rust implementation of the Bitcoin address codec.
//!
//! The goal of this crate is to faithfully reproduce the behaviour of
//! Bitcoin Core's address handling (`standard.cpp`, `key_io.cpp`,
//! `base58.cpp`, `bech32.cpp`): classifying output scripts into the
//! standard shapes, rendering them as Base58Check or Bech32/Bech32m
//! addresses, and parsing addresses back into output scripts, byte-exact
//! on every wire format.
//!
//! Everything here is a pure function of its inputs. The only
//! configuration is a per-network [`Params`] record passed by reference;
//! no routine blocks, performs I/O, or retains state between calls.

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod base58;
pub mod bech32;
mod script;

pub use script::{
    decode_op_n, encode_op_n, encode_push_bytes_n, get_script_op, is_pay_to_script_hash,
    is_pay_to_witness_script_hash, is_push_only, is_small_integer, is_witness_program, solver,
    valid_pubkey_size, TxoutType, PUBKEY_COMPRESSED_SIZE, PUBKEY_SIZE, WITNESS_PROG_MAX_LEN,
    WITNESS_V0_KEYHASH_SIZE, WITNESS_V0_SCRIPTHASH_SIZE, WITNESS_V1_TAPROOT_SIZE,
};

#[cfg(not(feature = "std"))]
use alloc::{string::String, vec, vec::Vec};
#[cfg(feature = "std")]
use std::{string::String, vec::Vec};

use core::fmt;

use bitcoin::opcodes::all;

/// The Bitcoin networks this crate carries parameters for.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Network {
    Bitcoin,
    Testnet,
    Signet,
    Regtest,
}

impl Network {
    /// The address parameters of this network.
    pub fn params(self) -> &'static Params {
        match self {
            Network::Bitcoin => &Params::MAINNET,
            Network::Testnet => &Params::TESTNET,
            Network::Signet => &Params::SIGNET,
            Network::Regtest => &Params::REGTEST,
        }
    }
}

/// Selector for the Base58Check address prefixes a network defines.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Base58Type {
    PubkeyAddress,
    ScriptAddress,
}

/// Address-relevant parameters of a Bitcoin network: the Base58Check
/// version prefixes and the Bech32 human-readable part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Params {
    pub network: Network,
    pubkey_address_prefix: &'static [u8],
    script_address_prefix: &'static [u8],
    pub bech32_hrp: &'static str,
}

impl Params {
    /// The "main" Bitcoin network.
    pub const MAINNET: Params = Params {
        network: Network::Bitcoin,
        pubkey_address_prefix: &[0x00],
        script_address_prefix: &[0x05],
        bech32_hrp: "bc",
    };

    /// The testnet3 test network.
    pub const TESTNET: Params = Params {
        network: Network::Testnet,
        pubkey_address_prefix: &[0x6f],
        script_address_prefix: &[0xc4],
        bech32_hrp: "tb",
    };

    /// The signet test network.
    pub const SIGNET: Params = Params {
        network: Network::Signet,
        pubkey_address_prefix: &[0x6f],
        script_address_prefix: &[0xc4],
        bech32_hrp: "tb",
    };

    /// The local regression-test network.
    pub const REGTEST: Params = Params {
        network: Network::Regtest,
        pubkey_address_prefix: &[0x6f],
        script_address_prefix: &[0xc4],
        bech32_hrp: "bcrt",
    };

    /// The version bytes prepended before Base58Check encoding.
    pub fn base58_prefix(&self, which: Base58Type) -> &'static [u8] {
        match which {
            Base58Type::PubkeyAddress => self.pubkey_address_prefix,
            Base58Type::ScriptAddress => self.script_address_prefix,
        }
    }
}

/// Why an address string failed to decode.
///
/// The `Display` form of every variant is stable: ecosystem tools match
/// on these exact diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// A known Base58 prefix with the wrong payload length.
    Base58InvalidLength,
    /// A well-formed Base58Check string with an unknown prefix.
    Base58Invalid,
    /// Base58 that parses but fails the checksum or the length cap.
    Base58BadChecksum,
    /// Neither a Bech32 string nor parseable Base58.
    UnknownEncoding,
    /// A Bech32 string whose data part holds only the checksum.
    Bech32EmptyData,
    /// A valid Bech32 string for some other network.
    Bech32WrongHrp { expected: &'static str, got: String },
    /// Witness version 0 encoded with the Bech32m checksum.
    Bech32V0NeedsBech32,
    /// Witness version 1+ encoded with the Bech32 checksum.
    Bech32V1NeedsBech32m,
    /// Residual bits after the 5-to-8 conversion were not zero padding.
    Bech32BadPadding,
    /// A version-0 program that is neither 20 nor 32 bytes.
    Bech32V0ProgramSize(usize),
    /// A witness version beyond 16.
    Bech32WitnessVersion,
    /// A version-1+ program outside the 2..=40 byte range.
    Bech32ProgramSize(usize),
    /// A string that is not a valid Bech32 encoding at all.
    Invalid,
}

fn byte_str(size: usize) -> &'static str {
    if size == 1 {
        "byte"
    } else {
        "bytes"
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DecodeError::*;

        match self {
            Base58InvalidLength => f.write_str("Invalid length for Base58 address (P2PKH or P2SH)"),
            Base58Invalid => f.write_str("Invalid or unsupported Base58-encoded address."),
            Base58BadChecksum => {
                f.write_str("Invalid checksum or length of Base58 address (P2PKH or P2SH)")
            }
            UnknownEncoding => {
                f.write_str("Invalid or unsupported Segwit (Bech32) or Base58 encoding.")
            }
            Bech32EmptyData => f.write_str("Empty Bech32 data section"),
            Bech32WrongHrp { expected, got } => write!(
                f,
                "Invalid or unsupported prefix for Segwit (Bech32) address (expected {}, got {}).",
                expected, got
            ),
            Bech32V0NeedsBech32 => {
                f.write_str("Version 0 witness address must use Bech32 checksum")
            }
            Bech32V1NeedsBech32m => {
                f.write_str("Version 1+ witness address must use Bech32m checksum")
            }
            Bech32BadPadding => f.write_str("Invalid padding in Bech32 data section"),
            Bech32V0ProgramSize(size) => write!(
                f,
                "Invalid Bech32 v0 address program size ({} {}), per BIP141",
                size,
                byte_str(*size)
            ),
            Bech32WitnessVersion => f.write_str("Invalid Bech32 address witness version"),
            Bech32ProgramSize(size) => write!(
                f,
                "Invalid Bech32 address program size ({} {})",
                size,
                byte_str(*size)
            ),
            Invalid => f.write_str("Invalid address"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodeError {}

/// Converts a symbol stream from one power-of-two base to another, for
/// `from_bits` and `to_bits` between 1 and 8.
///
/// With `pad` set, residual bits are flushed as a final zero-padded
/// symbol. Without it, the conversion fails when the residue is wide
/// enough to hold a whole input symbol or its padding bits are nonzero.
pub fn convert_bits(from_bits: u32, to_bits: u32, pad: bool, input: &[u8]) -> Option<Vec<u8>> {
    debug_assert!((1..=8).contains(&from_bits) && (1..=8).contains(&to_bits));

    let max_value = (1u32 << to_bits) - 1;
    let max_acc = (1u32 << (from_bits + to_bits - 1)) - 1;
    let mut acc = 0u32;
    let mut bits = 0u32;
    let mut ret = Vec::with_capacity(
        (input.len() * from_bits as usize + to_bits as usize - 1) / to_bits as usize,
    );
    for &value in input {
        acc = ((acc << from_bits) | u32::from(value)) & max_acc;
        bits += from_bits;
        while bits >= to_bits {
            bits -= to_bits;
            ret.push(((acc >> bits) & max_value) as u8);
        }
    }
    if pad {
        if bits > 0 {
            ret.push(((acc << (to_bits - bits)) & max_value) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & max_value) != 0 {
        return None;
    }
    Some(ret)
}

/// Renders the addresses a standard output script pays to into
/// `addresses`.
///
/// Returns `true` when the script resolves to exactly one address. Bare
/// multisig pushes one pubkey-prefix address per embedded key but still
/// returns `false`; callers interested in multisig must inspect the list.
/// Null-data and non-standard scripts leave the list untouched.
///
/// Pay-to-pubkey outputs encode the full serialized key under the
/// pubkey-address prefix, a legacy rendering no wallet recognizes as a
/// spendable address.
pub fn extract_destinations(
    script_pubkey: &[u8],
    params: &Params,
    addresses: &mut Vec<String>,
) -> bool {
    let (which, solutions) = solver(script_pubkey);

    match which {
        TxoutType::PubKey => {
            if solutions[0].is_empty() {
                return false;
            }
            let mut data = params.base58_prefix(Base58Type::PubkeyAddress).to_vec();
            data.extend_from_slice(&solutions[0]);
            addresses.push(base58::encode_base58_check(&data));
            true
        }
        TxoutType::PubKeyHash => {
            let mut data = params.base58_prefix(Base58Type::PubkeyAddress).to_vec();
            data.extend_from_slice(&solutions[0][..20]);
            addresses.push(base58::encode_base58_check(&data));
            true
        }
        TxoutType::ScriptHash => {
            let mut data = params.base58_prefix(Base58Type::ScriptAddress).to_vec();
            data.extend_from_slice(&solutions[0][..20]);
            addresses.push(base58::encode_base58_check(&data));
            true
        }
        TxoutType::WitnessV0KeyHash | TxoutType::WitnessV0ScriptHash => {
            let mut data = vec![0u8];
            match convert_bits(8, 5, true, &solutions[0]) {
                Some(converted) => data.extend_from_slice(&converted),
                None => return false,
            }
            addresses.push(bech32::encode(
                bech32::Encoding::Bech32,
                params.bech32_hrp,
                &data,
            ));
            true
        }
        TxoutType::WitnessV1Taproot => {
            let mut data = vec![1u8];
            match convert_bits(8, 5, true, &solutions[0]) {
                Some(converted) => data.extend_from_slice(&converted),
                None => return false,
            }
            addresses.push(bech32::encode(
                bech32::Encoding::Bech32m,
                params.bech32_hrp,
                &data,
            ));
            true
        }
        TxoutType::WitnessUnknown => {
            let version = solutions[0][0];
            let program = &solutions[1];
            if !(1..=16).contains(&version)
                || program.len() < 2
                || program.len() > WITNESS_PROG_MAX_LEN
            {
                return false;
            }
            let mut data = vec![version];
            match convert_bits(8, 5, true, program) {
                Some(converted) => data.extend_from_slice(&converted),
                None => return false,
            }
            addresses.push(bech32::encode(
                bech32::Encoding::Bech32m,
                params.bech32_hrp,
                &data,
            ));
            true
        }
        TxoutType::Multisig => {
            for pubkey in &solutions[1..solutions.len() - 1] {
                if pubkey.is_empty() {
                    continue;
                }
                let mut data = params.base58_prefix(Base58Type::PubkeyAddress).to_vec();
                data.extend_from_slice(pubkey);
                addresses.push(base58::encode_base58_check(&data));
            }
            // Multisig scripts resolve to more than one address; the
            // interface reports them through the list alone.
            false
        }
        TxoutType::NullData | TxoutType::NonStandard => false,
    }
}

/// Parses an address string into the output script it stands for.
///
/// The string is routed by a case-folded comparison of its leading
/// characters against the network HRP, so a valid Bech32 address for a
/// different network falls through to the Base58 branch and fails there.
///
/// Witness versions 2 through 16 reproduce the reference output exactly:
/// the program bytes follow the version opcode with no length push, so
/// those scripts do not round-trip through [`solver`].
pub fn decode_destination(s: &str, params: &Params) -> Result<Vec<u8>, DecodeError> {
    let hrp = params.bech32_hrp.as_bytes();
    let is_bech32 =
        s.len() >= hrp.len() && s.as_bytes()[..hrp.len()].eq_ignore_ascii_case(hrp);

    if !is_bech32 {
        if let Some(data) = base58::decode_base58_check(s, 21) {
            // Pubkey-hash addresses: the payload behind the prefix is
            // RIPEMD160(SHA256(pubkey)).
            let pubkey_prefix = params.base58_prefix(Base58Type::PubkeyAddress);
            if data.len() == 20 + pubkey_prefix.len() && data.starts_with(pubkey_prefix) {
                let mut script = Vec::with_capacity(25);
                script.push(all::OP_DUP.to_u8());
                script.push(all::OP_HASH160.to_u8());
                script.push(encode_push_bytes_n(20).to_u8());
                script.extend_from_slice(&data[pubkey_prefix.len()..]);
                script.push(all::OP_EQUALVERIFY.to_u8());
                script.push(all::OP_CHECKSIG.to_u8());
                return Ok(script);
            }
            // Script-hash addresses: the payload is the hash160 of the
            // serialized redemption script.
            let script_prefix = params.base58_prefix(Base58Type::ScriptAddress);
            if data.len() == 20 + script_prefix.len() && data.starts_with(script_prefix) {
                let mut script = Vec::with_capacity(23);
                script.push(all::OP_HASH160.to_u8());
                script.push(encode_push_bytes_n(20).to_u8());
                script.extend_from_slice(&data[script_prefix.len()..]);
                script.push(all::OP_EQUAL.to_u8());
                return Ok(script);
            }

            // A known prefix with any other payload length is reported
            // separately from a foreign prefix.
            return if data.starts_with(script_prefix) || data.starts_with(pubkey_prefix) {
                Err(DecodeError::Base58InvalidLength)
            } else {
                Err(DecodeError::Base58Invalid)
            };
        }
        // Diagnose with a plain Base58 parse at a much larger cap.
        return if base58::decode_base58(s, 100).is_some() {
            Err(DecodeError::Base58BadChecksum)
        } else {
            Err(DecodeError::UnknownEncoding)
        };
    }

    let dec = match bech32::decode(s) {
        Some(dec) => dec,
        None => return Err(DecodeError::Invalid),
    };
    if dec.data.is_empty() {
        return Err(DecodeError::Bech32EmptyData);
    }
    if dec.hrp != params.bech32_hrp {
        return Err(DecodeError::Bech32WrongHrp {
            expected: params.bech32_hrp,
            got: dec.hrp,
        });
    }

    // The first 5-bit symbol is the witness version (0-16).
    let version = dec.data[0];
    if version == 0 && dec.encoding != bech32::Encoding::Bech32 {
        return Err(DecodeError::Bech32V0NeedsBech32);
    }
    if version != 0 && dec.encoding != bech32::Encoding::Bech32m {
        return Err(DecodeError::Bech32V1NeedsBech32m);
    }

    // The remaining symbols are the converted witness program bytes.
    let program = match convert_bits(5, 8, false, &dec.data[1..]) {
        Some(program) => program,
        None => return Err(DecodeError::Bech32BadPadding),
    };

    if version == 0 {
        if program.len() == 20 {
            let mut script = Vec::with_capacity(22);
            script.push(all::OP_PUSHBYTES_0.to_u8());
            script.push(encode_push_bytes_n(20).to_u8());
            script.extend_from_slice(&program);
            return Ok(script);
        }
        if program.len() == 32 {
            let mut script = Vec::with_capacity(34);
            script.push(all::OP_PUSHBYTES_0.to_u8());
            script.push(encode_push_bytes_n(32).to_u8());
            script.extend_from_slice(&program);
            return Ok(script);
        }
        return Err(DecodeError::Bech32V0ProgramSize(program.len()));
    }

    if version == 1 && program.len() == WITNESS_V1_TAPROOT_SIZE {
        let mut script = Vec::with_capacity(34);
        script.push(all::OP_PUSHNUM_1.to_u8());
        script.push(encode_push_bytes_n(32).to_u8());
        script.extend_from_slice(&program);
        return Ok(script);
    }

    if version > 16 {
        return Err(DecodeError::Bech32WitnessVersion);
    }

    if program.len() < 2 || program.len() > WITNESS_PROG_MAX_LEN {
        return Err(DecodeError::Bech32ProgramSize(program.len()));
    }

    let mut script = Vec::with_capacity(program.len() + 1);
    script.push(encode_op_n(version).to_u8());
    script.extend_from_slice(&program);
    Ok(script)
}

/// Whether `s` is a valid address for the given network.
///
/// Accepts exactly the strings [`decode_destination`] accepts, without
/// constructing scripts.
pub fn is_valid_destination(s: &str, params: &Params) -> bool {
    if s.is_empty() {
        return false;
    }

    let hrp = params.bech32_hrp.as_bytes();
    let is_bech32 =
        s.len() >= hrp.len() && s.as_bytes()[..hrp.len()].eq_ignore_ascii_case(hrp);

    if !is_bech32 {
        let data = match base58::decode_base58_check(s, 21) {
            Some(data) => data,
            None => return false,
        };
        let pubkey_prefix = params.base58_prefix(Base58Type::PubkeyAddress);
        if data.len() == 20 + pubkey_prefix.len() && data.starts_with(pubkey_prefix) {
            return true;
        }
        let script_prefix = params.base58_prefix(Base58Type::ScriptAddress);
        return data.len() == 20 + script_prefix.len() && data.starts_with(script_prefix);
    }

    let dec = match bech32::decode(s) {
        Some(dec) => dec,
        None => return false,
    };
    if dec.data.is_empty() || dec.hrp != params.bech32_hrp {
        return false;
    }
    let version = dec.data[0];
    if version == 0 && dec.encoding != bech32::Encoding::Bech32 {
        return false;
    }
    if version != 0 && dec.encoding != bech32::Encoding::Bech32m {
        return false;
    }
    let program = match convert_bits(5, 8, false, &dec.data[1..]) {
        Some(program) => program,
        None => return false,
    };
    if version == 0 {
        return program.len() == 20 || program.len() == 32;
    }
    if version == 1 && program.len() == WITNESS_V1_TAPROOT_SIZE {
        return true;
    }
    !(version > 16 || program.len() < 2 || program.len() > WITNESS_PROG_MAX_LEN)
}
