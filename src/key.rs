// Rust Coin Address Library
// Written by
//   The coinaddr developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication
// along with this software.
// If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.
//

//! # Public keys
//!
//! Uncompressed secp256k1 public keys and the ways chains hash them into a
//! 20-byte address payload.

use std::fmt;

use bitcoin::hashes::{hash160, Hash};
use bitcoin::secp256k1;
use tiny_keccak::{Hasher, Keccak};

use crate::error::impl_std_error;
use crate::hex::{self, ToHex};

/// Length of an uncompressed public key.
pub const UNCOMPRESSED_LEN: usize = 65;

/// Leading byte of an uncompressed public key.
pub const UNCOMPRESSED_TAG: u8 = 0x04;

/// Length of the address payload every strategy produces.
pub const PAYLOAD_LEN: usize = 20;

/// A byte string that is not an uncompressed public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicKeyFormatError {
    /// The key is not [`UNCOMPRESSED_LEN`] bytes long.
    Length(usize),
    /// The key does not start with [`UNCOMPRESSED_TAG`].
    Tag(u8),
}

impl fmt::Display for PublicKeyFormatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PublicKeyFormatError::Length(len) => {
                write!(f, "public key must be {} bytes, got {}", UNCOMPRESSED_LEN, len)
            }
            PublicKeyFormatError::Tag(tag) => {
                write!(f, "public key must start with 0x{:02x}, got 0x{:02x}", UNCOMPRESSED_TAG, tag)
            }
        }
    }
}

impl_std_error!(PublicKeyFormatError);

/// An uncompressed public key: the tag byte followed by the x and y coordinates.
///
/// Only the format is checked here. Whether the point is on the curve is checked by the
/// strategies that need the compressed form.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; UNCOMPRESSED_LEN]);

impl PublicKey {
    /// Checks the length and tag of `data`.
    pub fn from_slice(data: &[u8]) -> Result<PublicKey, PublicKeyFormatError> {
        if data.len() != UNCOMPRESSED_LEN {
            return Err(PublicKeyFormatError::Length(data.len()));
        }
        if data[0] != UNCOMPRESSED_TAG {
            return Err(PublicKeyFormatError::Tag(data[0]));
        }
        let mut key = [0; UNCOMPRESSED_LEN];
        key.copy_from_slice(data);
        Ok(PublicKey(key))
    }

    /// The full serialization, tag included.
    pub fn as_bytes(&self) -> &[u8; UNCOMPRESSED_LEN] {
        &self.0
    }

    /// The 64 coordinate bytes, `x || y`.
    pub fn coordinates(&self) -> &[u8] {
        &self.0[1..]
    }

    /// The 33-byte compressed serialization. Fails if the point is not on the curve.
    pub fn compressed(&self) -> Result<[u8; 33], secp256k1::Error> {
        let key = secp256k1::PublicKey::from_slice(&self.0)?;
        Ok(key.serialize())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PublicKey({})", self)
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        hex::format_hex(&self.0, f)
    }
}

/// How a key is hashed into the 20-byte payload.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum HashStrategy {
    /// RIPEMD160(SHA256(key)) over the 65-byte uncompressed serialization.
    Hash160Uncompressed,
    /// RIPEMD160(SHA256(key)) over the 33-byte compressed serialization.
    Hash160Compressed,
    /// The last 20 bytes of Keccak-256 over the 64 coordinate bytes.
    Keccak256Tail,
}

impl HashStrategy {
    /// Computes the payload of `key`.
    pub fn payload(self, key: &PublicKey) -> Result<[u8; PAYLOAD_LEN], secp256k1::Error> {
        match self {
            HashStrategy::Hash160Uncompressed => Ok(hash160::Hash::hash(key.as_bytes()).to_byte_array()),
            HashStrategy::Hash160Compressed => {
                let compressed = key.compressed()?;
                Ok(hash160::Hash::hash(&compressed).to_byte_array())
            }
            HashStrategy::Keccak256Tail => {
                let digest = keccak256(key.coordinates());
                let mut ret = [0; PAYLOAD_LEN];
                ret.copy_from_slice(&digest[32 - PAYLOAD_LEN..]);
                Ok(ret)
            }
        }
    }
}

/// Keccak-256, as used by Ethereum (not the padded SHA3-256).
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut ret = [0; 32];
    hasher.finalize(&mut ret);
    ret
}

/// Renders `payload` as hex whose letters are upper case where the matching nibble of the
/// Keccak-256 of the lower case rendering is 8 or more. No `0x` prefix is added.
pub fn to_checksum_case(payload: &[u8]) -> String {
    let lower = payload.to_hex();
    let digest = keccak256(lower.as_bytes());
    lower
        .chars()
        .zip(hex::nibbles(&digest))
        .map(|(c, nibble)| if nibble >= 8 { c.to_ascii_uppercase() } else { c })
        .collect()
}

/// Whether the letter case of `digits`, 40 hex digits without prefix, is the case
/// checksum of the payload they encode.
pub fn has_checksum_case(digits: &str) -> bool {
    match <Vec<u8> as hex::FromHex>::from_hex(digits) {
        Ok(payload) => to_checksum_case(&payload) == digits,
        Err(_) => false,
    }
}
