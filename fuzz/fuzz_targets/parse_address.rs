extern crate coinaddr;

use coinaddr::network::{NetworkProfile, BUILTIN_PROFILES};
use coinaddr::{base58, cashaddr, validate, Address};

fn do_test(data: &[u8]) {
    // Any 65 bytes tagged 0x04 derive an address that validates under its own profile.
    if data.len() == 65 {
        for &profile in BUILTIN_PROFILES.iter() {
            if let Ok(addr) = Address::new(data, profile) {
                assert_eq!(validate::validate(addr.as_str(), profile), Ok(()), "{}", addr);
            }
        }
    }

    let s = match std::str::from_utf8(data) {
        Ok(s) => s,
        Err(_) => return,
    };

    if let Ok(bytes) = base58::decode(s) {
        assert_eq!(base58::encode(&bytes), s);
    }
    if let Ok(decoded) = cashaddr::decode_address(s, "bitcoincash") {
        let reser = cashaddr::encode_address(&decoded.prefix, decoded.address_type, &decoded.hash).unwrap();
        let lower = s.to_lowercase();
        assert!(reser.ends_with(&lower[lower.rfind(':').map_or(0, |i| i + 1)..]));
    }
    let profiles: &[&NetworkProfile] = &BUILTIN_PROFILES;
    for profile in profiles {
        let _ = validate::validate(s, profile);
    }
}

#[cfg(feature = "afl")]
extern crate afl;
#[cfg(feature = "afl")]
fn main() {
    afl::read_stdio_bytes(|data| {
        do_test(&data);
    });
}

#[cfg(feature = "honggfuzz")]
#[macro_use] extern crate honggfuzz;
#[cfg(feature = "honggfuzz")]
fn main() {
    loop {
        fuzz!(|data| {
            do_test(data);
        });
    }
}

#[cfg(not(any(feature = "afl", feature = "honggfuzz")))]
fn main() {}

#[cfg(test)]
mod tests {
    #[test]
    fn legacy_and_cashaddr_inputs() {
        super::do_test(b"1BMfnF2h2absXr4JjNMzFeB1XP97NnNXfs");
        super::do_test(b"bitcoincash:qp4qttt9er93g0qwqtemzyw96d7p5jc25q4thz52r4");
        super::do_test(b"QPCENUHJNWK0XW4ST4X0PYN69VMRA29NNVGHRPM8JG");
    }

    #[test]
    fn key_input() {
        let mut key = vec![0x04];
        key.extend_from_slice(&[0x11; 64]);
        super::do_test(&key);
    }
}
