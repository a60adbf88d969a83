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

//! # Addresses
//!
//! Deriving the textual address of a public key on a given chain and network.
//!
//! An [`Address`] is built from a key and a [`NetworkProfile`]. The key is
//! checked and hashed when the address is built; the text is rendered the
//! first time it is asked for and kept from then on.

use std::error;
use std::fmt;
use std::sync::OnceLock;

use bitcoin::secp256k1;

use crate::base58;
use crate::cashaddr::{self, AddressType};
use crate::key::{self, PublicKey, PublicKeyFormatError, PAYLOAD_LEN};
use crate::network::{self, Chain, Network, NetworkProfile, Scheme};

/// Address derivation and conversion error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// The key is not an uncompressed public key.
    PublicKeyFormat(PublicKeyFormatError),
    /// The key is well formed but not a valid curve point.
    InvalidPublicKey(secp256k1::Error),
    /// The chain has no key-derived addresses.
    UnsupportedChain(Chain),
    /// No profile is registered for the chain and network.
    UnknownNetwork(Chain, Network),
    /// Base58 decoding error
    Base58(base58::Error),
    /// CashAddr encoding error
    CashAddr(cashaddr::Error),
    /// A legacy address whose version belongs to no Bitcoin Cash network.
    UnknownLegacyVersion(Vec<u8>),
}

impl fmt::Display for AddressError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            AddressError::PublicKeyFormat(ref e) => write!(f, "public key format error: {}", e),
            AddressError::InvalidPublicKey(ref e) => write!(f, "invalid public key: {}", e),
            AddressError::UnsupportedChain(chain) => {
                write!(f, "chain {} has no addresses derived from public keys", chain)
            }
            AddressError::UnknownNetwork(chain, network) => {
                write!(f, "no network profile registered for {} {}", chain, network)
            }
            AddressError::Base58(ref e) => write!(f, "base58 error: {}", e),
            AddressError::CashAddr(ref e) => write!(f, "cashaddr error: {}", e),
            AddressError::UnknownLegacyVersion(ref v) => {
                write!(f, "unknown legacy address version {:02x?}", v)
            }
        }
    }
}

impl error::Error for AddressError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            AddressError::PublicKeyFormat(ref e) => Some(e),
            AddressError::InvalidPublicKey(ref e) => Some(e),
            AddressError::Base58(ref e) => Some(e),
            AddressError::CashAddr(ref e) => Some(e),
            _ => None,
        }
    }
}

#[doc(hidden)]
impl From<PublicKeyFormatError> for AddressError {
    fn from(e: PublicKeyFormatError) -> AddressError {
        AddressError::PublicKeyFormat(e)
    }
}

#[doc(hidden)]
impl From<secp256k1::Error> for AddressError {
    fn from(e: secp256k1::Error) -> AddressError {
        AddressError::InvalidPublicKey(e)
    }
}

#[doc(hidden)]
impl From<base58::Error> for AddressError {
    fn from(e: base58::Error) -> AddressError {
        AddressError::Base58(e)
    }
}

#[doc(hidden)]
impl From<cashaddr::Error> for AddressError {
    fn from(e: cashaddr::Error) -> AddressError {
        AddressError::CashAddr(e)
    }
}

/// The address of a public key on one chain and network.
///
/// The text is rendered on first use of [`Address::as_str`] (or `Display`) and cached.
/// Rendering is a pure function of the key and profile, so two threads racing on the
/// first use both compute the same string and whichever stores it first wins.
#[derive(Clone, Debug)]
pub struct Address {
    profile: &'static NetworkProfile,
    key: PublicKey,
    payload: [u8; PAYLOAD_LEN],
    text: OnceLock<String>,
}

impl Address {
    /// Builds the address of the uncompressed public key `key` under `profile`.
    pub fn new(key: &[u8], profile: &'static NetworkProfile) -> Result<Address, AddressError> {
        let key = PublicKey::from_slice(key)?;
        Address::from_public_key(key, profile)
    }

    /// Builds the address of an already checked public key under `profile`.
    pub fn from_public_key(
        key: PublicKey,
        profile: &'static NetworkProfile,
    ) -> Result<Address, AddressError> {
        let strategy = profile.scheme.key_hash().ok_or(AddressError::UnsupportedChain(profile.chain))?;
        let payload = strategy.payload(&key)?;
        Ok(Address { profile, key, payload, text: OnceLock::new() })
    }

    /// The profile the address is rendered for.
    pub fn profile(&self) -> &'static NetworkProfile {
        self.profile
    }

    /// The chain of the address.
    pub fn chain(&self) -> Chain {
        self.profile.chain
    }

    /// The network of the address.
    pub fn network(&self) -> Network {
        self.profile.network
    }

    /// The public key the address was derived from.
    pub fn public_key(&self) -> &PublicKey {
        &self.key
    }

    /// The 20-byte hash of the key that the address encodes.
    pub fn payload(&self) -> &[u8; PAYLOAD_LEN] {
        &self.payload
    }

    /// Whether the text has been rendered yet.
    pub fn is_materialized(&self) -> bool {
        self.text.get().is_some()
    }

    /// The textual address, rendered on first call.
    pub fn as_str(&self) -> &str {
        if let Some(text) = self.text.get() {
            return text;
        }
        let rendered = self.render();
        // A racing thread may have stored the same string already.
        let _ = self.text.set(rendered);
        self.text.get().expect("text was just set")
    }

    fn render(&self) -> String {
        let text = match self.profile.scheme {
            Scheme::Base58Check { versions, .. } => {
                base58::encode_check(versions.p2pkh, &self.payload)
            }
            Scheme::CashAddr { prefix, .. } => {
                cashaddr::encode_address(prefix, AddressType::PubkeyHash, &self.payload)
                    .expect("20-byte hashes have a size code")
            }
            Scheme::CaseChecksumHex { .. } => format!("0x{}", key::to_checksum_case(&self.payload)),
            // `from_public_key` only builds addresses for schemes with a key hash.
            Scheme::AccountName => unreachable!("account names have no key hash"),
        };
        tracing::trace!(chain = %self.profile.chain, network = %self.profile.network, address = %text, "rendered address");
        text
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Address) -> bool {
        self.profile == other.profile && self.key == other.key
    }
}

impl Eq for Address {}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Derives the address of `key` on `chain` and `network`, using the process-wide
/// registry.
pub fn new_address(chain: Chain, key: &[u8], network: Network) -> Result<Address, AddressError> {
    let profile = network::registry()
        .lookup(chain, network)
        .ok_or(AddressError::UnknownNetwork(chain, network))?;
    Address::new(key, profile)
}

/// Converts a legacy Base58Check Bitcoin Cash address into its CashAddr form, keeping
/// the network and the pay-to-pubkey-hash or pay-to-script-hash type.
pub fn to_cashaddr(legacy: &str) -> Result<String, AddressError> {
    let (version, hash) = base58::decode_check(legacy, 1, PAYLOAD_LEN)?;
    let registry = network::registry();
    for &network in [Network::Main, Network::Test].iter() {
        let (prefix, versions) = match registry.lookup(Chain::Bch, network).map(|p| p.scheme) {
            Some(Scheme::CashAddr { prefix, legacy, .. }) => (prefix, legacy),
            _ => continue,
        };
        let address_type = if versions.p2pkh == &version[..] {
            AddressType::PubkeyHash
        } else if versions.p2sh == Some(&version[..]) {
            AddressType::ScriptHash
        } else {
            continue;
        };
        return Ok(cashaddr::encode_address(prefix, address_type, &hash)?);
    }
    Err(AddressError::UnknownLegacyVersion(version))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hex::FromHex;

    const KEY: &str = "047814049cd323b2f7074c94edc0f961db62be35687c2424b2ad29f7f2837e0395e8ebbee04f8198a91cd9c8acbd97aad76851957f3e6362f4dd4192f3431a71fb";

    fn key() -> Vec<u8> {
        Vec::<u8>::from_hex(KEY).unwrap()
    }

    #[test]
    fn derives_every_scheme() {
        let cases: [(&'static NetworkProfile, &str); 9] = [
            (&NetworkProfile::BTC_MAIN, "1AfbRoXNPUymQ5VoVGoWjoayLnUSqyQm3n"),
            (&NetworkProfile::BTC_TEST, "mqBYircMCWR2BByRCqmtZioJCn59qfGy4Z"),
            (&NetworkProfile::OMNI_MAIN, "1AfbRoXNPUymQ5VoVGoWjoayLnUSqyQm3n"),
            (&NetworkProfile::LTC_MAIN, "LUtYh1qCU9DpetBxfQnp1pejYzqiysYa8u"),
            (&NetworkProfile::BCH_MAIN, "bitcoincash:qp4qttt9er93g0qwqtemzyw96d7p5jc25q4thz52r4"),
            (&NetworkProfile::BCH_TEST, "bchtest:qp4qttt9er93g0qwqtemzyw96d7p5jc25q3en9kayf"),
            (&NetworkProfile::ETH_MAIN, "0x80f6628384E4aDc3C22ACB05c6D96d299D3Fec1B"),
            (&NetworkProfile::TRON_MAIN, "TMj6ejLBniPv5QFtUDqkm9jP1tTvUiBJn2"),
            (&NetworkProfile::VDS_MAIN, "VcnRhhCNkQ33rg6WN4YCkKKLKkvvhEMj2G1"),
        ];
        for &(profile, expected) in cases.iter() {
            let addr = Address::new(&key(), profile).unwrap();
            assert_eq!(addr.to_string(), expected, "{:?}", profile);
        }
    }

    #[test]
    fn text_is_materialized_once() {
        let addr = Address::new(&key(), &NetworkProfile::BTC_MAIN).unwrap();
        assert!(!addr.is_materialized());
        let first = addr.as_str().as_ptr();
        assert!(addr.is_materialized());
        assert_eq!(addr.as_str().as_ptr(), first);

        // Equality ignores the cache.
        let fresh = Address::new(&key(), &NetworkProfile::BTC_MAIN).unwrap();
        assert_eq!(addr, fresh);
        assert!(!fresh.is_materialized());
    }

    #[test]
    fn concurrent_first_use() {
        let addr = Address::new(&key(), &NetworkProfile::BCH_MAIN).unwrap();
        let texts: Vec<String> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| addr.as_str().to_owned())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(texts.iter().all(|t| t == addr.as_str()));
    }

    #[test]
    fn rejects_bad_keys() {
        let mut bytes = key();
        assert_eq!(
            Address::new(&bytes[1..], &NetworkProfile::BTC_MAIN),
            Err(AddressError::PublicKeyFormat(PublicKeyFormatError::Length(64))),
        );
        bytes[0] = 0x03;
        assert_eq!(
            Address::new(&bytes, &NetworkProfile::ETH_MAIN),
            Err(AddressError::PublicKeyFormat(PublicKeyFormatError::Tag(0x03))),
        );

        let mut off_curve = [0u8; 65];
        off_curve[0] = 0x04;
        off_curve[64] = 1;
        assert!(matches!(
            Address::new(&off_curve, &NetworkProfile::VDS_MAIN),
            Err(AddressError::InvalidPublicKey(_)),
        ));
    }

    #[test]
    fn account_chains_have_no_derived_address() {
        assert_eq!(
            Address::new(&key(), &NetworkProfile::EOS_MAIN),
            Err(AddressError::UnsupportedChain(Chain::Eos)),
        );
        assert_eq!(
            new_address(Chain::Iost, &key(), Network::Test),
            Err(AddressError::UnsupportedChain(Chain::Iost)),
        );
    }

    #[test]
    fn new_address_uses_registry() {
        let addr = new_address(Chain::Ltc, &key(), Network::Main).unwrap();
        assert_eq!(addr.chain(), Chain::Ltc);
        assert_eq!(addr.network(), Network::Main);
        assert_eq!(addr.as_str(), "LUtYh1qCU9DpetBxfQnp1pejYzqiysYa8u");
    }

    #[test]
    fn legacy_to_cashaddr() {
        assert_eq!(
            to_cashaddr("1AfbRoXNPUymQ5VoVGoWjoayLnUSqyQm3n").unwrap(),
            "bitcoincash:qp4qttt9er93g0qwqtemzyw96d7p5jc25q4thz52r4",
        );
        assert_eq!(
            to_cashaddr("mqBYircMCWR2BByRCqmtZioJCn59qfGy4Z").unwrap(),
            "bchtest:qp4qttt9er93g0qwqtemzyw96d7p5jc25q3en9kayf",
        );
        assert_eq!(
            to_cashaddr("37JY6K2gw5rRSkahvCC6maDjRKeMdGSC51").unwrap(),
            "bitcoincash:pq7eqhhn3kxmyaa90uc520n299umtqnje5dy2wtvp3",
        );

        assert_eq!(
            to_cashaddr("LUtYh1qCU9DpetBxfQnp1pejYzqiysYa8u"),
            Err(AddressError::UnknownLegacyVersion(vec![0x30])),
        );
        assert!(matches!(
            to_cashaddr("1BMfnF2h2absXr4JjNMzFeB1XP97NnNXft"),
            Err(AddressError::Base58(base58::Error::ChecksumMismatch { .. })),
        ));
    }

    #[test]
    #[cfg(feature = "serde")]
    fn serialize_as_text() {
        let addr = Address::new(&key(), &NetworkProfile::TRON_MAIN).unwrap();
        assert_eq!(serde_json::to_string(&addr).unwrap(), "\"TMj6ejLBniPv5QFtUDqkm9jP1tTvUiBJn2\"");
    }
}
