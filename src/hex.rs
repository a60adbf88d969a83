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

//! Hex Encoding and Decoding
//!
//! Thin traits over the `hex-conservative` crate re-exported by `bitcoin`,
//! so callers do not have to name the crate version.

use std::fmt;

use bitcoin::hex::DisplayHex;

pub use bitcoin::hex::HexToBytesError;

/// Trait for objects that can be serialized as hex strings.
pub trait ToHex {
    /// Converts to a lower case hexadecimal representation of the object.
    fn to_hex(&self) -> String;
}

/// Trait for objects that can be deserialized from hex strings.
pub trait FromHex: Sized {
    /// Error returned by [`FromHex::from_hex`].
    type Err;

    /// Produces an object from a hex string.
    fn from_hex(s: &str) -> Result<Self, Self::Err>;
}

impl ToHex for [u8] {
    fn to_hex(&self) -> String {
        self.to_lower_hex_string()
    }
}

impl FromHex for Vec<u8> {
    type Err = HexToBytesError;

    /// Accepts upper and lower case digits. The input must have an even length.
    fn from_hex(s: &str) -> Result<Self, Self::Err> {
        bitcoin::hex::FromHex::from_hex(s)
    }
}

/// Outputs `data` as lower case hex into a formatter, honouring its width (zero padded on
/// the left) and precision (number of digits).
pub fn format_hex(data: &[u8], f: &mut fmt::Formatter) -> fmt::Result {
    let prec = f.precision().unwrap_or(2 * data.len());
    let width = f.width().unwrap_or(2 * data.len());
    for _ in (2 * data.len())..width {
        f.write_str("0")?;
    }
    for ch in data.iter().take(prec / 2) {
        write!(f, "{:02x}", *ch)?;
    }
    if prec < 2 * data.len() && prec % 2 == 1 {
        write!(f, "{:x}", data[prec / 2] / 16)?;
    }
    Ok(())
}

/// Returns the value of every nibble of `data`, most significant first.
pub fn nibbles(data: &[u8]) -> impl Iterator<Item = u8> + '_ {
    data.iter().flat_map(|&b| [b >> 4, b & 0x0f])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_roundtrip() {
        let expected = "0123456789abcdef";
        let expected_up = "0123456789ABCDEF";

        let parse: Vec<u8> = FromHex::from_hex(expected).expect("parse lowercase string");
        assert_eq!(parse, vec![0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef]);
        assert_eq!(parse.to_hex(), expected);

        let parse: Vec<u8> = FromHex::from_hex(expected_up).expect("parse uppercase string");
        assert_eq!(parse.to_hex(), expected);
    }

    #[test]
    fn hex_truncate() {
        struct HexBytes(Vec<u8>);
        impl fmt::LowerHex for HexBytes {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                format_hex(&self.0, f)
            }
        }

        let bytes = HexBytes(vec![1u8, 2, 3, 4, 5, 6, 7, 8, 9, 10]);

        assert_eq!(format!("{:x}", bytes), "0102030405060708090a");
        for i in 0..20 {
            assert_eq!(format!("{:.prec$x}", bytes, prec = i), &"0102030405060708090a"[0..i]);
        }
        assert_eq!(format!("{:25x}", bytes), "000000102030405060708090a");
    }

    #[test]
    fn hex_error() {
        assert!(<Vec<u8> as FromHex>::from_hex("123").is_err());
        assert!(<Vec<u8> as FromHex>::from_hex("0g").is_err());
        assert!(<Vec<u8> as FromHex>::from_hex("").unwrap().is_empty());
    }

    #[test]
    fn nibble_order() {
        assert_eq!(nibbles(&[0xab, 0x01]).collect::<Vec<_>>(), vec![0xa, 0xb, 0x0, 0x1]);
    }
}
