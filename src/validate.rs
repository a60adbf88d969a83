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

//! # Address validation
//!
//! [`validate`] decodes a string with the scheme of a profile and reports
//! why it was rejected. The `check_*` functions fold every rejection into
//! `false`, logging the reason at debug level.

use std::error;
use std::fmt;

use bech32::segwit;
use bitcoin::secp256k1;

use crate::account;
use crate::base58;
use crate::cashaddr::{self, AddressType};
use crate::hex::{FromHex, HexToBytesError};
use crate::key::{self, PAYLOAD_LEN};
use crate::network::{self, Base58Versions, Chain, Network, NetworkProfile, Scheme};

/// Length in hex digits of a case-checksummed address without its `0x` prefix.
const HEX_ADDRESS_LEN: usize = 2 * PAYLOAD_LEN;

/// Why a string is not an address of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Base58Check decoding failed.
    Base58(base58::Error),
    /// CashAddr decoding failed.
    CashAddr(cashaddr::Error),
    /// Segwit decoding failed.
    Segwit(segwit::DecodeError),
    /// Hex decoding failed.
    Hex(HexToBytesError),
    /// A hex public key that is not a curve point.
    PublicKey(secp256k1::Error),
    /// The version bytes belong to another chain or network.
    UnexpectedVersion(Vec<u8>),
    /// The human-readable prefix belongs to another chain or network.
    UnexpectedPrefix(String),
    /// The CashAddr type is not accepted.
    UnexpectedAddressType(AddressType),
    /// The string has the wrong number of characters.
    InvalidLength(usize),
    /// Mixed-case hex whose case is not the checksum of its digits.
    ChecksumCase,
    /// Not a valid account name for the chain.
    InvalidAccountName,
    /// No profile is registered for the chain and network.
    UnknownNetwork(Chain, Network),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ValidationError::Base58(ref e) => write!(f, "base58 error: {}", e),
            ValidationError::CashAddr(ref e) => write!(f, "cashaddr error: {}", e),
            ValidationError::Segwit(ref e) => write!(f, "segwit error: {}", e),
            ValidationError::Hex(ref e) => write!(f, "hex error: {}", e),
            ValidationError::PublicKey(ref e) => write!(f, "invalid public key: {}", e),
            ValidationError::UnexpectedVersion(ref v) => {
                write!(f, "address version {:02x?} is not for this network", v)
            }
            ValidationError::UnexpectedPrefix(ref p) => {
                write!(f, "address prefix {:?} is not for this network", p)
            }
            ValidationError::UnexpectedAddressType(t) => {
                write!(f, "address type {:?} is not accepted", t)
            }
            ValidationError::InvalidLength(len) => write!(f, "invalid address length {}", len),
            ValidationError::ChecksumCase => f.write_str("letter case does not match the checksum"),
            ValidationError::InvalidAccountName => f.write_str("invalid account name"),
            ValidationError::UnknownNetwork(chain, network) => {
                write!(f, "no network profile registered for {} {}", chain, network)
            }
        }
    }
}

impl error::Error for ValidationError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            ValidationError::Base58(ref e) => Some(e),
            ValidationError::CashAddr(ref e) => Some(e),
            ValidationError::Segwit(ref e) => Some(e),
            ValidationError::Hex(ref e) => Some(e),
            ValidationError::PublicKey(ref e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<base58::Error> for ValidationError {
    fn from(e: base58::Error) -> ValidationError {
        ValidationError::Base58(e)
    }
}

#[doc(hidden)]
impl From<cashaddr::Error> for ValidationError {
    fn from(e: cashaddr::Error) -> ValidationError {
        ValidationError::CashAddr(e)
    }
}

#[doc(hidden)]
impl From<segwit::DecodeError> for ValidationError {
    fn from(e: segwit::DecodeError) -> ValidationError {
        ValidationError::Segwit(e)
    }
}

#[doc(hidden)]
impl From<HexToBytesError> for ValidationError {
    fn from(e: HexToBytesError) -> ValidationError {
        ValidationError::Hex(e)
    }
}

#[doc(hidden)]
impl From<secp256k1::Error> for ValidationError {
    fn from(e: secp256k1::Error) -> ValidationError {
        ValidationError::PublicKey(e)
    }
}

/// Checks that `text` is an address of `profile`.
pub fn validate(text: &str, profile: &NetworkProfile) -> Result<(), ValidationError> {
    match profile.scheme {
        Scheme::Base58Check { versions, segwit_hrp, .. } => match segwit_hrp {
            Some(hrp) if has_segwit_hrp(text, hrp) => validate_segwit(text, hrp),
            _ => validate_base58(text, versions),
        },
        Scheme::CashAddr { prefix, legacy, .. } => validate_cashaddr(text, prefix, legacy),
        Scheme::CaseChecksumHex { .. } => validate_case_checksum_hex(text),
        Scheme::AccountName => {
            let valid = match profile.chain {
                Chain::Eos => account::is_eos_account(text),
                Chain::Iost => account::is_iost_account(text),
                _ => false,
            };
            if valid {
                Ok(())
            } else {
                Err(ValidationError::InvalidAccountName)
            }
        }
    }
}

/// Whether `text` is an address of `chain` on `network`, using the process-wide registry.
pub fn check_address(text: &str, chain: Chain, network: Network) -> bool {
    let result = match network::registry().lookup(chain, network) {
        Some(profile) => validate(text, profile),
        None => Err(ValidationError::UnknownNetwork(chain, network)),
    };
    match result {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!(%chain, %network, address = text, error = %e, "address rejected");
            false
        }
    }
}

/// Like [`check_address`], with the chain given by its ticker. Unknown tickers are
/// rejected.
pub fn check_address_str(text: &str, chain: &str, main: bool) -> bool {
    match chain.parse::<Chain>() {
        Ok(chain) => check_address(text, chain, Network::from_main(main)),
        Err(e) => {
            tracing::debug!(address = text, error = %e, "address rejected");
            false
        }
    }
}

fn validate_base58(text: &str, versions: Base58Versions) -> Result<(), ValidationError> {
    let (version, _) = base58::decode_check(text, versions.p2pkh.len(), PAYLOAD_LEN)?;
    if !versions.matches(&version) {
        return Err(ValidationError::UnexpectedVersion(version));
    }
    Ok(())
}

// Only a string that starts with `hrp1` is tried as segwit, like the reference clients do.
fn has_segwit_hrp(text: &str, hrp: &str) -> bool {
    match text.rfind('1') {
        Some(sep) => text[..sep].eq_ignore_ascii_case(hrp),
        None => false,
    }
}

fn validate_segwit(text: &str, hrp: &str) -> Result<(), ValidationError> {
    let (found, _, _) = segwit::decode(text)?;
    let found = found.to_lowercase();
    if found != hrp {
        return Err(ValidationError::UnexpectedPrefix(found));
    }
    Ok(())
}

// CashAddr first, then a serialized public key, then the legacy form. Every failure of
// one form falls through to the next; the error of the last form tried is reported.
fn validate_cashaddr(
    text: &str,
    prefix: &str,
    legacy: Base58Versions,
) -> Result<(), ValidationError> {
    let cash_err = match validate_cashaddr_only(text, prefix) {
        Ok(()) => return Ok(()),
        Err(e) => e,
    };
    tracing::trace!(address = text, error = %cash_err, "not a cashaddr, trying other forms");

    if text.len() == 130 || text.len() == 66 {
        let bytes = Vec::<u8>::from_hex(text)?;
        secp256k1::PublicKey::from_slice(&bytes)?;
        return Ok(());
    }

    validate_base58(text, legacy)
}

fn validate_cashaddr_only(text: &str, prefix: &str) -> Result<(), ValidationError> {
    let decoded = cashaddr::decode_address(text, prefix)?;
    if decoded.prefix != prefix {
        return Err(ValidationError::UnexpectedPrefix(decoded.prefix));
    }
    if decoded.address_type != AddressType::PubkeyHash {
        return Err(ValidationError::UnexpectedAddressType(decoded.address_type));
    }
    if decoded.hash.len() != PAYLOAD_LEN {
        return Err(ValidationError::InvalidLength(decoded.hash.len()));
    }
    Ok(())
}

fn validate_case_checksum_hex(text: &str) -> Result<(), ValidationError> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    if digits.len() != HEX_ADDRESS_LEN {
        return Err(ValidationError::InvalidLength(digits.len()));
    }
    Vec::<u8>::from_hex(digits)?;

    let has_lower = digits.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = digits.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper && !key::has_checksum_case(digits) {
        return Err(ValidationError::ChecksumCase);
    }
    Ok(())
}
