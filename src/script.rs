//! Standard script classification.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};
#[cfg(feature = "std")]
use std::vec::Vec;

use core::fmt;

use bitcoin::opcodes::{all, Opcode};

/// Maximum length of the program in a witness output script.
pub const WITNESS_PROG_MAX_LEN: usize = 40;

pub const WITNESS_V0_KEYHASH_SIZE: usize = 20;
pub const WITNESS_V0_SCRIPTHASH_SIZE: usize = 32;
pub const WITNESS_V1_TAPROOT_SIZE: usize = 32;

/// Serialized size of an uncompressed or hybrid secp256k1 public key.
pub const PUBKEY_SIZE: usize = 65;
/// Serialized size of a compressed secp256k1 public key.
pub const PUBKEY_COMPRESSED_SIZE: usize = 33;

/// The shapes of output script this crate recognizes as standard.
///
/// The variants mirror Bitcoin Core's `TxoutType`; [`solver`] maps every
/// script to exactly one of them.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TxoutType {
    NonStandard,
    PubKey,
    PubKeyHash,
    ScriptHash,
    Multisig,
    /// Unspendable OP_RETURN script that carries data.
    NullData,
    WitnessV0KeyHash,
    WitnessV0ScriptHash,
    WitnessV1Taproot,
    /// Witness versions without dedicated handling above.
    WitnessUnknown,
}

impl fmt::Display for TxoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            TxoutType::NonStandard => "nonstandard",
            TxoutType::PubKey => "pubkey",
            TxoutType::PubKeyHash => "pubkeyhash",
            TxoutType::ScriptHash => "scripthash",
            TxoutType::Multisig => "multisig",
            TxoutType::NullData => "nulldata",
            TxoutType::WitnessV0KeyHash => "witness_v0_keyhash",
            TxoutType::WitnessV0ScriptHash => "witness_v0_scripthash",
            TxoutType::WitnessV1Taproot => "witness_v1_taproot",
            TxoutType::WitnessUnknown => "witness_unknown",
        };

        f.write_str(name)
    }
}

/// Serialized length a public key must have for its first byte, or 0 when
/// the byte is not a key header.
fn pubkey_len(header: u8) -> usize {
    match header {
        2 | 3 => PUBKEY_COMPRESSED_SIZE,
        4 | 6 | 7 => PUBKEY_SIZE,
        _ => 0,
    }
}

/// Whether `data` has the length its public-key header byte demands.
///
/// Only the size is checked; validity on the curve is out of scope.
pub fn valid_pubkey_size(data: &[u8]) -> bool {
    !data.is_empty() && pubkey_len(data[0]) == data.len()
}

/// Reads one opcode at `pc`, advancing the cursor past the opcode and any
/// push payload it carries.
///
/// Direct pushes (0x01..=0x4b) and `OP_PUSHDATA1/2/4` return the payload
/// slice; every other opcode returns `None` for the payload. Returns
/// `None` when the script ends mid-opcode or mid-payload.
pub fn get_script_op<'a>(script: &'a [u8], pc: &mut usize) -> Option<(Opcode, Option<&'a [u8]>)> {
    let opcode = *script.get(*pc)?;
    *pc += 1;

    if opcode > all::OP_PUSHDATA4.to_u8() {
        return Some((Opcode::from(opcode), None));
    }

    let push_len = if opcode < all::OP_PUSHDATA1.to_u8() {
        opcode as usize
    } else {
        let width = match opcode {
            x if x == all::OP_PUSHDATA1.to_u8() => 1,
            x if x == all::OP_PUSHDATA2.to_u8() => 2,
            _ => 4,
        };
        read_push_length(script, pc, width)?
    };

    let data = script.get(*pc..(*pc).checked_add(push_len)?)?;
    *pc += push_len;
    Some((Opcode::from(opcode), Some(data)))
}

fn read_push_length(bytes: &[u8], index: &mut usize, width: usize) -> Option<usize> {
    if bytes.len() < index.checked_add(width)? {
        return None;
    }
    let mut len: usize = 0;
    for i in 0..width {
        len |= (bytes[*index + i] as usize) << (8 * i);
    }
    *index += width;
    Some(len)
}

/// Test for "small positive integer" script opcodes - OP_1 through OP_16.
pub fn is_small_integer(opcode: Opcode) -> bool {
    opcode.to_u8() >= all::OP_PUSHNUM_1.to_u8() && opcode.to_u8() <= all::OP_PUSHNUM_16.to_u8()
}

/// The integer a small-integer opcode stands for; `OP_0` counts as 0.
pub fn decode_op_n(opcode: Opcode) -> Option<u8> {
    if opcode == all::OP_PUSHBYTES_0 {
        return Some(0);
    }
    if is_small_integer(opcode) {
        Some(opcode.to_u8() - all::OP_PUSHNUM_1.to_u8() + 1)
    } else {
        None
    }
}

/// The opcode standing for the small integer `n`, for `n` in 0..=16.
pub fn encode_op_n(n: u8) -> Opcode {
    debug_assert!(n <= 16);
    if n == 0 {
        all::OP_PUSHBYTES_0
    } else {
        Opcode::from(all::OP_PUSHNUM_1.to_u8() + n - 1)
    }
}

/// The direct-push opcode carrying exactly `n` bytes, for `n` in 1..=75.
pub fn encode_push_bytes_n(n: u8) -> Opcode {
    debug_assert!((1..=75).contains(&n));
    Opcode::from(n)
}

/// Whether every opcode in `script` is a push.
///
/// `OP_RESERVED` counts as a push opcode here even though executing it
/// fails; a failed read makes the whole script non-push.
pub fn is_push_only(script: &[u8]) -> bool {
    let mut pc = 0usize;
    while pc < script.len() {
        match get_script_op(script, &mut pc) {
            Some((opcode, _)) if opcode.to_u8() <= all::OP_PUSHNUM_16.to_u8() => {}
            _ => return false,
        }
    }
    true
}

/// Extra-fast test for pay-to-script-hash scripts.
pub fn is_pay_to_script_hash(script: &[u8]) -> bool {
    script.len() == 23
        && script[0] == all::OP_HASH160.to_u8()
        && script[1] == 0x14
        && script[22] == all::OP_EQUAL.to_u8()
}

/// Extra-fast test for pay-to-witness-script-hash scripts.
pub fn is_pay_to_witness_script_hash(script: &[u8]) -> bool {
    script.len() == 34 && script[0] == all::OP_PUSHBYTES_0.to_u8() && script[1] == 0x20
}

/// Detects the witness-program shape: a version opcode (`OP_0` or
/// `OP_1..OP_16`) followed by a single direct push of 2 to 40 bytes.
///
/// Returns the witness version and the program bytes.
pub fn is_witness_program(script: &[u8]) -> Option<(u8, &[u8])> {
    if script.len() < 4 || script.len() > 42 {
        return None;
    }
    if script[0] != all::OP_PUSHBYTES_0.to_u8()
        && (script[0] < all::OP_PUSHNUM_1.to_u8() || script[0] > all::OP_PUSHNUM_16.to_u8())
    {
        return None;
    }
    if script[1] as usize + 2 != script.len() {
        return None;
    }
    let version = decode_op_n(Opcode::from(script[0]))?;
    Some((version, &script[2..]))
}

fn match_pay_to_pubkey(script: &[u8]) -> Option<&[u8]> {
    if script.len() == PUBKEY_SIZE + 2
        && script[0] as usize == PUBKEY_SIZE
        && script[script.len() - 1] == all::OP_CHECKSIG.to_u8()
    {
        let pubkey = &script[1..1 + PUBKEY_SIZE];
        return valid_pubkey_size(pubkey).then_some(pubkey);
    }
    if script.len() == PUBKEY_COMPRESSED_SIZE + 2
        && script[0] as usize == PUBKEY_COMPRESSED_SIZE
        && script[script.len() - 1] == all::OP_CHECKSIG.to_u8()
    {
        let pubkey = &script[1..1 + PUBKEY_COMPRESSED_SIZE];
        return valid_pubkey_size(pubkey).then_some(pubkey);
    }
    None
}

fn match_pay_to_pubkey_hash(script: &[u8]) -> Option<&[u8]> {
    if script.len() == 25
        && script[0] == all::OP_DUP.to_u8()
        && script[1] == all::OP_HASH160.to_u8()
        && script[2] == 20
        && script[23] == all::OP_EQUALVERIFY.to_u8()
        && script[24] == all::OP_CHECKSIG.to_u8()
    {
        Some(&script[3..23])
    } else {
        None
    }
}

fn match_multisig(script: &[u8]) -> Option<(u8, Vec<Vec<u8>>)> {
    let (&last, _) = script.split_last()?;
    if last != all::OP_CHECKMULTISIG.to_u8() {
        return None;
    }

    let mut pc = 0usize;
    let (opcode, _) = get_script_op(script, &mut pc)?;
    if !is_small_integer(opcode) {
        return None;
    }
    let required = decode_op_n(opcode)?;

    let mut pubkeys: Vec<Vec<u8>> = Vec::new();
    let terminator = loop {
        match get_script_op(script, &mut pc) {
            Some((_, Some(data))) if valid_pubkey_size(data) => pubkeys.push(data.to_vec()),
            Some((opcode, _)) => break opcode,
            None => return None,
        }
    };
    if !is_small_integer(terminator) {
        return None;
    }
    let keys = decode_op_n(terminator)?;
    if pubkeys.len() != keys as usize || keys < required {
        return None;
    }

    (pc + 1 == script.len()).then_some((required, pubkeys))
}

/// Classifies an output script and extracts its semantic payload.
///
/// Earlier rules win; anything unrecognized is `NonStandard` with empty
/// solutions. The solutions vector holds, per kind: the pubkey for
/// `PubKey`; the 20-byte hash for `PubKeyHash` and `ScriptHash`; the
/// program for the witness kinds (preceded by a one-byte version for
/// `WitnessUnknown`); and `[m], key..., [n]` for `Multisig`.
///
/// Classification never fails and does not depend on any network
/// parameters.
pub fn solver(script_pubkey: &[u8]) -> (TxoutType, Vec<Vec<u8>>) {
    // Shortcut for pay-to-script-hash, which is more constrained than the
    // other shapes: always OP_HASH160 20 [20 byte hash] OP_EQUAL.
    if is_pay_to_script_hash(script_pubkey) {
        return (TxoutType::ScriptHash, vec![script_pubkey[2..22].to_vec()]);
    }

    if let Some((version, program)) = is_witness_program(script_pubkey) {
        if version == 0 && program.len() == WITNESS_V0_KEYHASH_SIZE {
            return (TxoutType::WitnessV0KeyHash, vec![program.to_vec()]);
        }
        if version == 0 && program.len() == WITNESS_V0_SCRIPTHASH_SIZE {
            return (TxoutType::WitnessV0ScriptHash, vec![program.to_vec()]);
        }
        if version == 1 && program.len() == WITNESS_V1_TAPROOT_SIZE {
            return (TxoutType::WitnessV1Taproot, vec![program.to_vec()]);
        }
        if version != 0 {
            return (
                TxoutType::WitnessUnknown,
                vec![vec![version], program.to_vec()],
            );
        }
        return (TxoutType::NonStandard, Vec::new());
    }

    // Provably prunable, data-carrying output. As long as the remainder
    // after OP_RETURN is push-only we don't care what exactly is in it.
    if !script_pubkey.is_empty()
        && script_pubkey[0] == all::OP_RETURN.to_u8()
        && is_push_only(&script_pubkey[1..])
    {
        return (TxoutType::NullData, Vec::new());
    }

    if let Some(pubkey) = match_pay_to_pubkey(script_pubkey) {
        return (TxoutType::PubKey, vec![pubkey.to_vec()]);
    }

    if let Some(hash) = match_pay_to_pubkey_hash(script_pubkey) {
        return (TxoutType::PubKeyHash, vec![hash.to_vec()]);
    }

    if let Some((required, pubkeys)) = match_multisig(script_pubkey) {
        let keys = pubkeys.len() as u8;
        let mut solutions = Vec::with_capacity(pubkeys.len() + 2);
        solutions.push(vec![required]);
        solutions.extend(pubkeys);
        solutions.push(vec![keys]);
        return (TxoutType::Multisig, solutions);
    }

    (TxoutType::NonStandard, Vec::new())
}
