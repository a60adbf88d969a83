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

//! # Base58
//!
//! Big-integer base 58 codec with the Bitcoin alphabet. Each leading zero
//! byte is rendered as a leading `1` so the byte length survives a round
//! trip. The [`check`] submodule adds the 4-byte double-SHA256 checksum.

use std::fmt;

use crate::error::{impl_std_error, write_err};

pub mod check;

pub use self::check::{checksum, decode_check, encode_check};

/// Base58 alphabet, without `0`, `O`, `I` and `l`.
const ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

// Reverse alphabet. Maps ASCII byte -> digit value on [0,57]
#[rustfmt::skip]
const ALPHABET_REV: [i8; 128] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1,  0,  1,  2,  3,  4,  5,  6,  7,  8, -1, -1, -1, -1, -1, -1,
    -1,  9, 10, 11, 12, 13, 14, 15, 16, -1, 17, 18, 19, 20, 21, -1,
    22, 23, 24, 25, 26, 27, 28, 29, 30, 31, 32, -1, -1, -1, -1, -1,
    -1, 33, 34, 35, 36, 37, 38, 39, 40, 41, 42, 43, -1, 44, 45, 46,
    47, 48, 49, 50, 51, 52, 53, 54, 55, 56, 57, -1, -1, -1, -1, -1,
];

/// Errors from decoding base58 and base58check strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A character outside the base58 alphabet.
    InvalidCharacter(InvalidCharacterError),
    /// The decoded data does not have the length the address format requires.
    InvalidLength {
        /// Required number of bytes, including version and checksum.
        expected: usize,
        /// Number of bytes actually decoded, or of characters when the string was
        /// rejected as too long to decode.
        actual: usize,
    },
    /// The decoded data is too short to carry a checksum.
    TooShort(usize),
    /// The carried checksum does not match the recomputed one.
    ChecksumMismatch {
        /// Checksum computed over the decoded body.
        expected: [u8; 4],
        /// Checksum found at the end of the string.
        actual: [u8; 4],
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidCharacter(ref e) => write_err!(f, "invalid base58 string"; e),
            Error::InvalidLength { expected, actual } => {
                write!(f, "decoded length {} does not match the required {} bytes", actual, expected)
            }
            Error::TooShort(len) => write!(f, "base58check data too short: {} bytes", len),
            Error::ChecksumMismatch { ref expected, ref actual } => write!(
                f,
                "base58ck checksum {:02x?} does not match computed checksum {:02x?}",
                actual, expected
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::InvalidCharacter(ref e) => Some(e),
            Error::InvalidLength { .. } | Error::TooShort(_) | Error::ChecksumMismatch { .. } => None,
        }
    }
}

#[doc(hidden)]
impl From<InvalidCharacterError> for Error {
    fn from(e: InvalidCharacterError) -> Self {
        Error::InvalidCharacter(e)
    }
}

/// A character that is not part of the base58 alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCharacterError {
    /// The offending character.
    pub invalid: char,
    /// Its position (in characters) in the input string.
    pub pos: usize,
}

impl fmt::Display for InvalidCharacterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid base58 character {:?} at position {}", self.invalid, self.pos)
    }
}

impl_std_error!(InvalidCharacterError);

/// Encodes `data` as a base58 string.
pub fn encode(data: &[u8]) -> String {
    let zeros = data.iter().take_while(|&&b| b == 0).count();
    // log(256) / log(58), rounded up.
    let mut digits: Vec<u8> = Vec::with_capacity((data.len() - zeros) * 138 / 100 + 1);

    // `digits` is little-endian: index 0 is the least significant base58 digit.
    for &byte in &data[zeros..] {
        let mut carry = u32::from(byte);
        for digit in digits.iter_mut() {
            carry += u32::from(*digit) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let mut ret = String::with_capacity(zeros + digits.len());
    ret.extend(std::iter::repeat(ALPHABET[0] as char).take(zeros));
    ret.extend(digits.iter().rev().map(|&d| ALPHABET[usize::from(d)] as char));
    ret
}

/// Decodes a base58 string into bytes.
pub fn decode(s: &str) -> Result<Vec<u8>, InvalidCharacterError> {
    let mut zeros = 0;
    let mut leading = true;
    // Little-endian base256 accumulator, see `encode`.
    let mut bytes: Vec<u8> = Vec::with_capacity(s.len() * 733 / 1000 + 1);

    for (pos, c) in s.chars().enumerate() {
        let value = digit_value(c).ok_or(InvalidCharacterError { invalid: c, pos })?;
        if leading && value == 0 {
            zeros += 1;
            continue;
        }
        leading = false;

        let mut carry = u32::from(value);
        for byte in bytes.iter_mut() {
            carry += u32::from(*byte) * 58;
            *byte = (carry & 0xff) as u8;
            carry >>= 8;
        }
        while carry > 0 {
            bytes.push((carry & 0xff) as u8);
            carry >>= 8;
        }
    }

    let mut ret = vec![0u8; zeros];
    ret.extend(bytes.iter().rev());
    Ok(ret)
}

fn digit_value(c: char) -> Option<u8> {
    if !c.is_ascii() {
        return None;
    }
    match ALPHABET_REV[c as usize] {
        v if v < 0 => None,
        v => Some(v as u8),
    }
}
