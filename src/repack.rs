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

//! # Bit repacking
//!
//! Regroups a stream of big-endian `from`-bit values into `to`-bit values.
//! Used 8→5 when rendering base32 text and 5→8 when decoding it.

use std::fmt;

use crate::error::impl_std_error;

/// Leftover bits after an unpadded conversion could not be dropped silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingError {
    /// Number of bits left in the accumulator.
    pub leftover_bits: u32,
}

impl fmt::Display for PaddingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "encoding padding error: {} leftover bits", self.leftover_bits)
    }
}

impl_std_error!(PaddingError);

/// Converts `data`, a sequence of `from`-bit values, into `to`-bit values.
///
/// With `pad` set, a trailing partial group is left-aligned and emitted. Without it the
/// input must be consumed exactly: fewer than `from` bits may be left over and those must
/// all be zero.
///
/// # Panics
///
/// If `from` or `to` is not in `1..=8`, or an input value does not fit in `from` bits.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, PaddingError> {
    assert!((1..=8).contains(&from) && (1..=8).contains(&to), "bit widths must be in 1..=8");

    let max_value: u32 = (1 << to) - 1;
    // Enough room for one pending input value plus a partial output group.
    let max_acc: u32 = (1 << (from + to - 1)) - 1;
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut ret = Vec::with_capacity(data.len() * from as usize / to as usize + 1);

    for &value in data {
        debug_assert!(u32::from(value) >> from == 0, "value {} wider than {} bits", value, from);
        acc = ((acc << from) | u32::from(value)) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            ret.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            ret.push(((acc << (to - bits)) & max_value) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & max_value) != 0 {
        return Err(PaddingError { leftover_bits: bits });
    }

    Ok(ret)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn eight_to_five_pads_last_group() {
        // 0xff 0x01 = 11111 11100 00000 1 -> last bit padded to 10000
        assert_eq!(convert_bits(&[0xff, 0x01], 8, 5, true).unwrap(), vec![31, 28, 0, 16]);
        assert_eq!(convert_bits(&[], 8, 5, true).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn unpadded_rejects_nonzero_leftover() {
        assert_eq!(convert_bits(&[31, 28, 0, 16], 5, 8, false).unwrap(), vec![0xff, 0x01]);
        // Last group carries a set bit that does not fit into a whole byte.
        assert_eq!(
            convert_bits(&[31, 28, 0, 17], 5, 8, false),
            Err(PaddingError { leftover_bits: 4 }),
        );
    }

    #[test]
    fn unpadded_rejects_whole_leftover_group() {
        // Two 5-bit groups leave 2 bits, one more group would leave 7 >= 5 bits.
        assert!(convert_bits(&[0, 0], 5, 8, false).is_ok());
        assert_eq!(convert_bits(&[0, 0, 0], 5, 8, false), Err(PaddingError { leftover_bits: 7 }));
    }

    #[test]
    fn five_eight_round_trip() {
        for _ in 0..64 {
            let len = rand::random::<usize>() % 70;
            let data: Vec<u8> = (0..len).map(|_| rand::random()).collect();
            let five = convert_bits(&data, 8, 5, true).unwrap();
            assert!(five.iter().all(|&v| v < 32));
            assert_eq!(convert_bits(&five, 5, 8, false).unwrap(), data);
        }
    }

    #[test]
    fn odd_widths() {
        // 0b101_011 as two 3-bit values -> one 6-bit value
        assert_eq!(convert_bits(&[0b101, 0b011], 3, 6, false).unwrap(), vec![0b101011]);
        assert_eq!(convert_bits(&[0b101011], 6, 1, false).unwrap(), vec![1, 0, 1, 0, 1, 1]);
    }
}
