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

//! # CashAddr
//!
//! The `prefix:base32` address format of Bitcoin Cash. It shares the bech32
//! alphabet, but the checksum is a 40-bit BCH code over GF(32) with its own
//! generators, and the prefix is folded in using only the low 5 bits of
//! each character.
//!
//! The payload starts with a version byte: bits 3..7 carry the address type
//! and bits 0..2 encode the hash size.

use std::convert::TryFrom;
use std::fmt;

use bech32::Fe32;

use crate::error::write_err;
use crate::repack::{convert_bits, PaddingError};

/// Separator between the prefix and the data part.
pub const SEP: char = ':';

/// Number of 5-bit groups in the checksum.
pub const CHECKSUM_LENGTH: usize = 8;

/// Generator coefficients
const GEN: [u64; 5] = [0x98f2bc8e61, 0x79b76d99e2, 0xf33e5fb3c4, 0xae2eabe2a8, 0x1e4f43e470];

/// Hash sizes in bytes, indexed by the size code of the version byte.
const HASH_SIZES: [usize; 8] = [20, 24, 28, 32, 40, 48, 56, 64];

/// CashAddr encoding error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A character outside the base32 alphabet.
    InvalidCharacter {
        /// The offending character.
        ch: char,
        /// Its position in the data part.
        pos: usize,
    },
    /// Upper and lower case letters were mixed.
    MixedCase,
    /// The prefix is empty or contains something other than ASCII letters.
    InvalidPrefix(String),
    /// The data part is too short to hold a version byte and checksum.
    InvalidLength(usize),
    /// The polymod residue is not zero.
    ChecksumMismatch,
    /// The data part does not regroup into whole bytes.
    Padding(PaddingError),
    /// The version byte names an unknown address type.
    UnknownAddressType(u8),
    /// The hash does not have one of the sizes the version byte can express, or does not
    /// match the size the version byte declares.
    InvalidHashSize(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidCharacter { ch, pos } => {
                write!(f, "invalid cashaddr character {:?} at position {}", ch, pos)
            }
            Error::MixedCase => f.write_str("cashaddr string mixes upper and lower case"),
            Error::InvalidPrefix(ref p) => write!(f, "invalid cashaddr prefix {:?}", p),
            Error::InvalidLength(len) => write!(f, "cashaddr data part too short: {} characters", len),
            Error::ChecksumMismatch => f.write_str("cashaddr checksum mismatch"),
            Error::Padding(ref e) => write_err!(f, "cashaddr payload is not byte aligned"; e),
            Error::UnknownAddressType(t) => write!(f, "unknown cashaddr address type {}", t),
            Error::InvalidHashSize(len) => write!(f, "invalid cashaddr hash size {}", len),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Padding(ref e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<PaddingError> for Error {
    fn from(e: PaddingError) -> Error {
        Error::Padding(e)
    }
}

/// The address type carried in the version byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddressType {
    /// Pay to public key hash.
    PubkeyHash,
    /// Pay to script hash.
    ScriptHash,
}

impl AddressType {
    fn to_u8(self) -> u8 {
        match self {
            AddressType::PubkeyHash => 0,
            AddressType::ScriptHash => 1,
        }
    }

    fn from_u8(t: u8) -> Option<AddressType> {
        match t {
            0 => Some(AddressType::PubkeyHash),
            1 => Some(AddressType::ScriptHash),
            _ => None,
        }
    }
}

/// A decoded CashAddr address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// The prefix, in lower case. Either found in the string or the supplied default.
    pub prefix: String,
    /// Type from the version byte.
    pub address_type: AddressType,
    /// The hash, 20 to 64 bytes.
    pub hash: Vec<u8>,
}

fn polymod(values: &[u8]) -> u64 {
    let mut c: u64 = 1;
    for &d in values {
        let c0 = (c >> 35) as u8;
        c = ((c & 0x07_ffff_ffff) << 5) ^ u64::from(d);
        for (i, g) in GEN.iter().enumerate() {
            if (c0 >> i) & 1 == 1 {
                c ^= g;
            }
        }
    }
    c ^ 1
}

fn expand_prefix(prefix: &str) -> Vec<u8> {
    let mut v: Vec<u8> = prefix.bytes().map(|b| b & 0x1f).collect();
    v.push(0);
    v
}

/// Computes the eight 5-bit checksum groups binding `prefix` to the 5-bit `payload`.
pub fn create_checksum(prefix: &str, payload: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let mut values = expand_prefix(prefix);
    values.extend_from_slice(payload);
    values.extend_from_slice(&[0; CHECKSUM_LENGTH]);
    let plm = polymod(&values);

    let mut checksum = [0; CHECKSUM_LENGTH];
    for (i, group) in checksum.iter_mut().enumerate() {
        *group = ((plm >> (5 * (CHECKSUM_LENGTH - 1 - i))) & 0x1f) as u8;
    }
    checksum
}

/// Checks that `data`, 5-bit payload groups followed by the checksum, is bound to `prefix`.
pub fn verify_checksum(prefix: &str, data: &[u8]) -> bool {
    let mut values = expand_prefix(prefix);
    values.extend_from_slice(data);
    polymod(&values) == 0
}

/// Encodes 5-bit `data` as `prefix:base32(data || checksum)`.
///
/// # Panics
///
/// If a value in `data` does not fit in 5 bits.
pub fn encode(prefix: &str, data: &[u8]) -> String {
    let checksum = create_checksum(prefix, data);
    let mut ret = String::with_capacity(prefix.len() + 1 + data.len() + CHECKSUM_LENGTH);
    ret.push_str(prefix);
    ret.push(SEP);
    for &v in data.iter().chain(checksum.iter()) {
        ret.push(Fe32::try_from(v).expect("5-bit value").to_char());
    }
    ret
}

/// Decodes a CashAddr string into its lower-case prefix and the 5-bit data with the
/// checksum removed.
///
/// The prefix may be omitted from `s`, in which case `default_prefix` is used for the
/// checksum. The prefix must be ASCII letters only. Case is checked over the prefixed
/// string: upper case is accepted only with an explicit upper case prefix, since an
/// omitted prefix counts as the lower case default.
pub fn decode(s: &str, default_prefix: &str) -> Result<(String, Vec<u8>), Error> {
    let (prefix, raw_data) = match s.rfind(SEP) {
        Some(sep) => (&s[..sep], &s[sep + 1..]),
        None => (default_prefix, s),
    };
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::InvalidPrefix(prefix.to_owned()));
    }

    let has_lower = prefix.chars().chain(raw_data.chars()).any(|c| c.is_lowercase());
    let has_upper = prefix.chars().chain(raw_data.chars()).any(|c| c.is_uppercase());
    if has_lower && has_upper {
        return Err(Error::MixedCase);
    }
    let prefix = prefix.to_ascii_lowercase();
    let raw_data = raw_data.to_lowercase();

    // Version byte (two groups) plus checksum.
    if raw_data.len() < CHECKSUM_LENGTH + 2 {
        return Err(Error::InvalidLength(raw_data.len()));
    }

    let mut data = raw_data
        .chars()
        .enumerate()
        .map(|(pos, ch)| {
            Fe32::from_char(ch).map(Fe32::to_u8).map_err(|_| Error::InvalidCharacter { ch, pos })
        })
        .collect::<Result<Vec<u8>, Error>>()?;

    if !verify_checksum(&prefix, &data) {
        return Err(Error::ChecksumMismatch);
    }
    data.truncate(data.len() - CHECKSUM_LENGTH);
    Ok((prefix, data))
}

/// Builds the version byte and regroups `version || hash` into 5-bit values.
pub fn pack_address_data(address_type: AddressType, hash: &[u8]) -> Result<Vec<u8>, Error> {
    let size_code = HASH_SIZES
        .iter()
        .position(|&size| size == hash.len())
        .ok_or(Error::InvalidHashSize(hash.len()))?;

    let mut data = Vec::with_capacity(1 + hash.len());
    data.push((address_type.to_u8() << 3) | size_code as u8);
    data.extend_from_slice(hash);
    Ok(convert_bits(&data, 8, 5, true)?)
}

/// Encodes `hash` as a CashAddr address of the given type.
pub fn encode_address(prefix: &str, address_type: AddressType, hash: &[u8]) -> Result<String, Error> {
    let data = pack_address_data(address_type, hash)?;
    Ok(encode(prefix, &data))
}

/// Decodes a CashAddr address, checking the checksum, padding, type and hash size.
pub fn decode_address(s: &str, default_prefix: &str) -> Result<Decoded, Error> {
    let (prefix, data) = decode(s, default_prefix)?;
    let bytes = convert_bits(&data, 5, 8, false)?;

    // `decode` guarantees at least two groups, so at least one byte.
    let version = bytes[0];
    let hash = bytes[1..].to_vec();
    // Bit 7 is reserved, so it shows up here as an unknown type.
    let address_type = AddressType::from_u8(version >> 3).ok_or(Error::UnknownAddressType(version >> 3))?;
    if HASH_SIZES[usize::from(version & 0x07)] != hash.len() {
        return Err(Error::InvalidHashSize(hash.len()));
    }

    Ok(Decoded { prefix, address_type, hash })
}

#[cfg(test)]
mod test {
    use super::*;

    // hash160 of the uncompressed key 0478140...71fb
    const HASH: [u8; 20] = [
        0x6a, 0x05, 0xad, 0x65, 0xc8, 0xcb, 0x14, 0x3c, 0x0e, 0x02, 0xf3, 0xb1, 0x11, 0xc5, 0xd3,
        0x7c, 0x1a, 0x4b, 0x0a, 0xa0,
    ];

    #[test]
    fn expand_uses_low_five_bits() {
        assert_eq!(expand_prefix("bitcoincash"), vec![2, 9, 20, 3, 15, 9, 14, 3, 1, 19, 8, 0]);
        assert_eq!(expand_prefix(""), vec![0]);
    }

    #[test]
    fn encode_known_hash() {
        assert_eq!(
            encode_address("bitcoincash", AddressType::PubkeyHash, &HASH).unwrap(),
            "bitcoincash:qp4qttt9er93g0qwqtemzyw96d7p5jc25q4thz52r4",
        );
        assert_eq!(
            encode_address("bchtest", AddressType::PubkeyHash, &HASH).unwrap(),
            "bchtest:qp4qttt9er93g0qwqtemzyw96d7p5jc25q3en9kayf",
        );
    }

    #[test]
    fn checksum_verifies_after_append() {
        for _ in 0..20 {
            let hash: [u8; 20] = rand::random();
            let mut data = pack_address_data(AddressType::ScriptHash, &hash).unwrap();
            let checksum = create_checksum("bchreg", &data);
            data.extend_from_slice(&checksum);
            assert!(verify_checksum("bchreg", &data));
            assert!(!verify_checksum("bchtest", &data));
        }
    }

    #[test]
    fn decode_without_prefix() {
        let decoded = decode_address("qpcenuhjnwk0xw4st4x0pyn69vmra29nnvghrpm8jg", "bitcoincash").unwrap();
        assert_eq!(decoded.prefix, "bitcoincash");
        assert_eq!(decoded.address_type, AddressType::PubkeyHash);
        assert_eq!(
            decoded.hash,
            vec![
                0x71, 0x99, 0xf2, 0xf2, 0x9b, 0xac, 0xf3, 0x3a, 0xb0, 0x5d, 0x4c, 0xf0, 0x92, 0x7a,
                0x2b, 0x36, 0x3e, 0xa8, 0xb3, 0x9b,
            ],
        );

        assert_eq!(
            decode_address("qpcenuhjnwk0xw4st4x0pyn69vmra29nnvghrpm8jh", "bitcoincash"),
            Err(Error::ChecksumMismatch),
        );
        // Right data, wrong network.
        assert_eq!(
            decode_address("qpcenuhjnwk0xw4st4x0pyn69vmra29nnvghrpm8jg", "bchtest"),
            Err(Error::ChecksumMismatch),
        );
    }

    #[test]
    fn decode_case_rules() {
        let upper = "BITCOINCASH:QP4QTTT9ER93G0QWQTEMZYW96D7P5JC25Q4THZ52R4";
        let decoded = decode_address(upper, "bchtest").unwrap();
        assert_eq!(decoded.prefix, "bitcoincash");
        assert_eq!(decoded.hash, HASH.to_vec());

        assert_eq!(
            decode_address("bitcoincash:QP4QTTT9ER93G0QWQTEMZYW96D7P5JC25Q4THZ52R4", "bitcoincash"),
            Err(Error::MixedCase),
        );
        // The omitted prefix is the lower case default.
        assert_eq!(
            decode_address("QPCENUHJNWK0XW4ST4X0PYN69VMRA29NNVGHRPM8JG", "bitcoincash"),
            Err(Error::MixedCase),
        );
    }

    #[test]
    fn decode_checks_prefix() {
        let data = "qp4qttt9er93g0qwqtemzyw96d7p5jc25q4thz52r4";
        assert_eq!(
            decode(&format!("bitcoin2cash:{}", data), "bitcoincash"),
            Err(Error::InvalidPrefix("bitcoin2cash".to_owned())),
        );
        assert_eq!(decode(&format!(":{}", data), "bitcoincash"), Err(Error::InvalidPrefix(String::new())));
        assert_eq!(
            decode(&format!("bitcoincash:bitcoincash:{}", data), "bitcoincash"),
            Err(Error::InvalidPrefix("bitcoincash:bitcoincash".to_owned())),
        );
    }

    #[test]
    fn decode_rejects_garbage() {
        assert_eq!(decode("bitcoincash:qpzry", "bitcoincash"), Err(Error::InvalidLength(5)));
        assert_eq!(
            decode("bitcoincash:qp4qttt9er93g0qwqtemzyw96d7p5jc25q4thz52rb", "bitcoincash"),
            Err(Error::InvalidCharacter { ch: 'b', pos: 41 }),
        );
    }

    #[test]
    fn hash_sizes() {
        assert_eq!(encode_address("bitcoincash", AddressType::PubkeyHash, &[0; 21]), Err(Error::InvalidHashSize(21)));
        for &size in HASH_SIZES.iter() {
            let hash = vec![0xab; size];
            let s = encode_address("bitcoincash", AddressType::ScriptHash, &hash).unwrap();
            let decoded = decode_address(&s, "bitcoincash").unwrap();
            assert_eq!(decoded.address_type, AddressType::ScriptHash);
            assert_eq!(decoded.hash, hash);
        }
    }

    #[test]
    fn unknown_type_is_rejected() {
        // Version byte 0x10: type 2, size code 0.
        let mut bytes = vec![0x10];
        bytes.extend_from_slice(&HASH);
        let s = encode("bitcoincash", &convert_bits(&bytes, 8, 5, true).unwrap());
        assert_eq!(decode_address(&s, "bitcoincash"), Err(Error::UnknownAddressType(2)));
    }
}
