//! Pre-flight checks applied before data is sent to, or accepted from, a
//! daemon.
//!
//! # Addresses
//!
//! Standard Kryptokrona addresses are 99 base58 characters starting with
//! `SEKR`. Integrated addresses carry an embedded payment ID and are 187
//! characters long. Fee addresses published by a daemon must be standard
//! addresses.
//!
//! Addresses use CryptoNote base58: the payload is split into 8 byte blocks,
//! each encoded as 11 characters, with a shorter final block. The decoded
//! payload is a varint network prefix, the public keys (preceded by the payment
//! ID for integrated addresses) and a 4 byte Keccak-256 checksum of everything
//! before it.

use sha3::{Digest, Keccak256};
use thiserror::Error;

/// Prefix every Kryptokrona address starts with.
pub const ADDRESS_PREFIX: &str = "SEKR";

/// Network prefix encoded at the start of a decoded address.
pub const ADDRESS_PREFIX_VALUE: u64 = 2_239_254;

/// Length of a standard address.
pub const STANDARD_ADDRESS_LENGTH: usize = 99;

/// Length of an integrated address (standard address plus payment ID).
pub const INTEGRATED_ADDRESS_LENGTH: usize = 187;

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

const FULL_BLOCK_SIZE: usize = 8;
const FULL_ENCODED_BLOCK_SIZE: usize = 11;
/// Encoded length of a block, indexed by its decoded length.
const ENCODED_BLOCK_SIZES: [usize; FULL_BLOCK_SIZE + 1] = [0, 2, 3, 5, 6, 7, 9, 10, 11];

const CHECKSUM_SIZE: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("Address must start with SEKR")]
    WrongPrefix,
    #[error("Address has length {got}, expected {expected}")]
    WrongLength { got: usize, expected: usize },
    #[error("Integrated addresses are not allowed here")]
    IntegratedNotAllowed,
    #[error("Address contains a character outside the base58 alphabet")]
    InvalidCharacter,
    #[error("Address is not valid base58")]
    InvalidEncoding,
    #[error("Address checksum does not match")]
    ChecksumMismatch,
    #[error("Address network prefix is {0}, expected 2239254")]
    WrongNetwork(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RawTransactionError {
    #[error("Raw transaction is empty")]
    Empty,
    #[error("Raw transaction is not valid hex: {0}")]
    InvalidHex(String),
}

/// Checks that `address` is a well-formed Kryptokrona address.
///
/// The address is decoded and its checksum and network prefix are verified,
/// so a mistyped address is rejected before it is shown to a user or used as
/// a payment destination.
///
/// # Example
///
/// ```rust,ignore
/// use kryptokrona::http::utils::validate_address;
///
/// assert!(validate_address("SEKRnope", false).is_err());
/// ```
pub fn validate_address(address: &str, integrated_allowed: bool) -> Result<(), AddressError> {
    if !address.starts_with(ADDRESS_PREFIX) {
        return Err(AddressError::WrongPrefix);
    }

    match address.len() {
        STANDARD_ADDRESS_LENGTH => {},
        INTEGRATED_ADDRESS_LENGTH if integrated_allowed => {},
        INTEGRATED_ADDRESS_LENGTH => return Err(AddressError::IntegratedNotAllowed),
        got => {
            return Err(AddressError::WrongLength {
                got,
                expected: STANDARD_ADDRESS_LENGTH,
            });
        },
    }

    let decoded = decode_base58(address)?;
    if decoded.len() <= CHECKSUM_SIZE {
        return Err(AddressError::InvalidEncoding);
    }

    let (payload, checksum) = decoded.split_at(decoded.len() - CHECKSUM_SIZE);
    if Keccak256::digest(payload)[..CHECKSUM_SIZE] != *checksum {
        return Err(AddressError::ChecksumMismatch);
    }

    let network = read_varint(payload).ok_or(AddressError::InvalidEncoding)?;
    if network != ADDRESS_PREFIX_VALUE {
        return Err(AddressError::WrongNetwork(network));
    }

    Ok(())
}

fn decode_base58(encoded: &str) -> Result<Vec<u8>, AddressError> {
    let encoded = encoded.as_bytes();
    let last_block_size = ENCODED_BLOCK_SIZES
        .iter()
        .position(|&size| size == encoded.len() % FULL_ENCODED_BLOCK_SIZE)
        .ok_or(AddressError::InvalidEncoding)?;

    let mut decoded = Vec::with_capacity(encoded.len() / FULL_ENCODED_BLOCK_SIZE * FULL_BLOCK_SIZE + last_block_size);
    for block in encoded.chunks(FULL_ENCODED_BLOCK_SIZE) {
        let size = if block.len() == FULL_ENCODED_BLOCK_SIZE {
            FULL_BLOCK_SIZE
        } else {
            last_block_size
        };
        decode_block(block, size, &mut decoded)?;
    }

    Ok(decoded)
}

fn decode_block(block: &[u8], size: usize, out: &mut Vec<u8>) -> Result<(), AddressError> {
    // 58^11 fits in a u128, so a full block cannot overflow here.
    let mut value: u128 = 0;
    for c in block {
        let digit = BASE58_ALPHABET
            .iter()
            .position(|a| a == c)
            .ok_or(AddressError::InvalidCharacter)?;
        value = value * 58 + digit as u128;
    }

    if value >> (8 * size) != 0 {
        return Err(AddressError::InvalidEncoding);
    }

    out.extend_from_slice(&value.to_be_bytes()[16 - size..]);
    Ok(())
}

/// Reads the little-endian base 128 varint at the start of `bytes`.
fn read_varint(bytes: &[u8]) -> Option<u64> {
    let mut value = 0u64;
    for (i, byte) in bytes.iter().take(10).enumerate() {
        value |= u64::from(byte & 0x7f) << (7 * i);
        if byte & 0x80 == 0 {
            return Some(value);
        }
    }
    None
}

/// Checks that a raw transaction blob is non-empty hex before it is relayed.
pub fn check_raw_transaction(raw_hex: &str) -> Result<(), RawTransactionError> {
    if raw_hex.is_empty() {
        return Err(RawTransactionError::Empty);
    }

    hex::decode(raw_hex).map_err(|e| RawTransactionError::InvalidHex(e.to_string()))?;
    Ok(())
}
