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

//! Base58Check: `base58(version || payload || sha256d(version || payload)[..4])`.

use bitcoin::hashes::{sha256d, Hash};

use super::Error;

/// Length of the trailing checksum.
pub const CHECKSUM_LEN: usize = 4;

/// The first four bytes of the double SHA256 of `body`.
pub fn checksum(body: &[u8]) -> [u8; CHECKSUM_LEN] {
    let hash = sha256d::Hash::hash(body).to_byte_array();
    let mut ret = [0; CHECKSUM_LEN];
    ret.copy_from_slice(&hash[..CHECKSUM_LEN]);
    ret
}

/// Encodes an already versioned body with its checksum appended.
pub fn encode_check_slice(body: &[u8]) -> String {
    let mut data = Vec::with_capacity(body.len() + CHECKSUM_LEN);
    data.extend_from_slice(body);
    data.extend_from_slice(&checksum(body));
    super::encode(&data)
}

/// Encodes `payload` behind the (one or more byte) `version` prefix.
pub fn encode_check(version: &[u8], payload: &[u8]) -> String {
    let mut body = Vec::with_capacity(version.len() + payload.len());
    body.extend_from_slice(version);
    body.extend_from_slice(payload);
    encode_check_slice(&body)
}

/// Decodes a base58check string of any length and returns the body with the checksum
/// removed.
pub fn decode_check_slice(s: &str) -> Result<Vec<u8>, Error> {
    let data = super::decode(s)?;
    if data.len() < CHECKSUM_LEN {
        return Err(Error::TooShort(data.len()));
    }
    strip_checksum(data)
}

/// Decodes a base58check string that must carry exactly `version_len` version bytes and a
/// `payload_len` byte payload. Returns `(version, payload)`.
///
/// The length is checked before the checksum, so a string of the wrong shape reports
/// [`Error::InvalidLength`] even when its checksum would also fail. A string too long to
/// decode to `expected` bytes is rejected before decoding, with `actual` set to its
/// length in characters.
pub fn decode_check(
    s: &str,
    version_len: usize,
    payload_len: usize,
) -> Result<(Vec<u8>, Vec<u8>), Error> {
    let expected_len = version_len + payload_len + CHECKSUM_LEN;
    if s.len() > max_encoded_len(expected_len) {
        return Err(Error::InvalidLength { expected: expected_len, actual: s.len() });
    }

    let data = super::decode(s)?;
    if data.len() != expected_len {
        return Err(Error::InvalidLength { expected: expected_len, actual: data.len() });
    }

    let mut body = strip_checksum(data)?;
    let payload = body.split_off(version_len);
    Ok((body, payload))
}

// Upper bound on the characters encoding `len` bytes: one '1' per leading zero byte,
// and log(256) / log(58) < 1.38 digits per remaining byte.
fn max_encoded_len(len: usize) -> usize {
    len + len * 138 / 100 + 1
}

// `data` must be at least CHECKSUM_LEN long.
fn strip_checksum(mut data: Vec<u8>) -> Result<Vec<u8>, Error> {
    let body_len = data.len() - CHECKSUM_LEN;
    let expected = checksum(&data[..body_len]);
    let mut actual = [0; CHECKSUM_LEN];
    actual.copy_from_slice(&data[body_len..]);
    if expected != actual {
        return Err(Error::ChecksumMismatch { expected, actual });
    }
    data.truncate(body_len);
    Ok(data)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::base58::InvalidCharacterError;

    #[test]
    fn legacy_vectors() {
        // Version 0x00, hash160 of the uncompressed key 0478140...71fb
        let payload = [
            0x6a, 0x05, 0xad, 0x65, 0xc8, 0xcb, 0x14, 0x3c, 0x0e, 0x02, 0xf3, 0xb1, 0x11, 0xc5,
            0xd3, 0x7c, 0x1a, 0x4b, 0x0a, 0xa0,
        ];
        let s = encode_check(&[0x00], &payload);
        assert_eq!(s, "1AfbRoXNPUymQ5VoVGoWjoayLnUSqyQm3n");
        assert_eq!(decode_check(&s, 1, 20).unwrap(), (vec![0x00], payload.to_vec()));

        let (version, _) = decode_check("1BMfnF2h2absXr4JjNMzFeB1XP97NnNXfs", 1, 20).unwrap();
        assert_eq!(version, vec![0x00]);
        let (version, _) = decode_check("37JY6K2gw5rRSkahvCC6maDjRKeMdGSC51", 1, 20).unwrap();
        assert_eq!(version, vec![0x05]);
    }

    #[test]
    fn altered_last_character_fails_checksum() {
        match decode_check("1BMfnF2h2absXr4JjNMzFeB1XP97NnNXft", 1, 20) {
            Err(Error::ChecksumMismatch { .. }) => {}
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn wrong_length_is_reported_before_checksum() {
        let s = encode_check(&[0x10, 0x1c], &[7; 20]);
        assert_eq!(decode_check(&s, 1, 20), Err(Error::InvalidLength { expected: 25, actual: 26 }));
        let (version, payload) = decode_check(&s, 2, 20).unwrap();
        assert_eq!(version, vec![0x10, 0x1c]);
        assert_eq!(payload, vec![7; 20]);
    }

    #[test]
    fn overlong_string_is_rejected_before_decoding() {
        let s = "z".repeat(100_000);
        assert_eq!(decode_check(&s, 1, 20), Err(Error::InvalidLength { expected: 25, actual: 100_000 }));

        // The longest strings of the right length still decode.
        let zeros = encode_check(&[0x00], &[0x00; 20]);
        assert!(zeros.starts_with(&"1".repeat(21)));
        assert_eq!(decode_check(&zeros, 1, 20).unwrap(), (vec![0x00], vec![0x00; 20]));
        let ones = encode_check(&[0xff], &[0xff; 20]);
        assert_eq!(decode_check(&ones, 1, 20).unwrap(), (vec![0xff], vec![0xff; 20]));
        assert!(max_encoded_len(25) >= zeros.len() && max_encoded_len(25) >= ones.len());
    }

    #[test]
    fn decode_errors() {
        assert_eq!(decode_check_slice("111"), Err(Error::TooShort(3)));
        assert_eq!(
            decode_check_slice("1BMfnF2h2absXr4JjNMzFeB1XP97NnNXf0"),
            Err(Error::InvalidCharacter(InvalidCharacterError { invalid: '0', pos: 33 })),
        );
    }

    #[test]
    fn random_round_trip() {
        for _ in 0..50 {
            let version: u8 = rand::random();
            let payload: [u8; 20] = rand::random();
            let s = encode_check(&[version], &payload);
            assert_eq!(decode_check(&s, 1, 20).unwrap(), (vec![version], payload.to_vec()));
        }
    }

    #[test]
    fn single_bit_flip_is_detected() {
        let payload: [u8; 20] = rand::random();
        let mut body = vec![0x00];
        body.extend_from_slice(&payload);
        body.extend_from_slice(&checksum(&body));

        for byte in 0..body.len() {
            for bit in 0..8 {
                let mut flipped = body.clone();
                flipped[byte] ^= 1 << bit;
                let s = crate::base58::encode(&flipped);
                assert!(
                    matches!(decode_check(&s, 1, 20), Err(Error::ChecksumMismatch { .. })),
                    "flip of bit {} in byte {}",
                    bit,
                    byte,
                );
            }
        }
    }
}
