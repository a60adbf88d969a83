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

//! # Rust Coin Address Library
//!
//! Derivation of chain-specific textual addresses from secp256k1 public
//! keys, and validation of addresses produced elsewhere.
//!
//! Supported are the Base58Check addresses of Bitcoin, Omni, Litecoin,
//! Tron and Vds, the CashAddr addresses of Bitcoin Cash, the
//! case-checksummed hex addresses of Ethereum and Ethereum Classic, and
//! the account names of EOS and IOST.
//!
//! ```
//! use coinaddr::hex::FromHex;
//! use coinaddr::{check_address, new_address, Chain, Network};
//!
//! let key = Vec::<u8>::from_hex(
//!     "047814049cd323b2f7074c94edc0f961db62be35687c2424b2ad29f7f2837e0395\
//!      e8ebbee04f8198a91cd9c8acbd97aad76851957f3e6362f4dd4192f3431a71fb",
//! )
//! .unwrap();
//! let addr = new_address(Chain::Bch, &key, Network::Main).unwrap();
//! assert_eq!(addr.as_str(), "bitcoincash:qp4qttt9er93g0qwqtemzyw96d7p5jc25q4thz52r4");
//! assert!(check_address(addr.as_str(), Chain::Bch, Network::Main));
//! ```
//!

// Coding conventions
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(missing_docs)]

#[cfg(feature = "serde")]
extern crate actual_serde as serde;

mod error;
pub mod account;
pub mod address;
pub mod base58;
pub mod cashaddr;
pub mod hex;
pub mod key;
pub mod network;
pub mod repack;
pub mod validate;

pub use bitcoin::hashes;
pub use bitcoin::secp256k1;

// export everything at the top level so it can be used as `coinaddr::Address` etc.
pub use crate::address::{new_address, to_cashaddr, Address, AddressError};
pub use crate::key::{PublicKey, PublicKeyFormatError};
pub use crate::network::{Chain, Network, NetworkProfile, NetworkRegistry, RegistryError, UnsupportedChainError};
pub use crate::validate::{check_address, check_address_str, validate, ValidationError};
