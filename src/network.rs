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

//! # Networks
//!
//! The closed set of supported chains, the parameters each (chain, network)
//! pair uses to render addresses, and the process-wide registry holding
//! them.
//!
//! The registry is filled once. A host that wants to control the set of
//! profiles calls [`init`] before deriving or validating anything; a host
//! that does not care gets the built-in table on first use.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::impl_std_error;
use crate::key::HashStrategy;

/// A supported chain.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "actual_serde", rename_all = "UPPERCASE")
)]
pub enum Chain {
    /// Bitcoin.
    Btc,
    /// Omni layer, which uses Bitcoin addresses.
    Omni,
    /// Litecoin.
    Ltc,
    /// Bitcoin Cash.
    Bch,
    /// Ethereum.
    Eth,
    /// Ethereum Classic.
    Etc,
    /// Tron.
    Tron,
    /// Vds.
    Vds,
    /// EOS, which uses account names instead of addresses.
    Eos,
    /// IOST, which uses account names instead of addresses.
    Iost,
}

impl Chain {
    /// Every supported chain.
    pub const ALL: [Chain; 10] = [
        Chain::Btc,
        Chain::Omni,
        Chain::Ltc,
        Chain::Bch,
        Chain::Eth,
        Chain::Etc,
        Chain::Tron,
        Chain::Vds,
        Chain::Eos,
        Chain::Iost,
    ];

    /// The ticker used to name the chain, e.g. `"BTC"`.
    pub fn ticker(self) -> &'static str {
        match self {
            Chain::Btc => "BTC",
            Chain::Omni => "OMNI",
            Chain::Ltc => "LTC",
            Chain::Bch => "BCH",
            Chain::Eth => "ETH",
            Chain::Etc => "ETC",
            Chain::Tron => "TRON",
            Chain::Vds => "VDS",
            Chain::Eos => "EOS",
            Chain::Iost => "IOST",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

impl FromStr for Chain {
    type Err = UnsupportedChainError;

    /// Parses a ticker, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chain::ALL
            .iter()
            .copied()
            .find(|chain| chain.ticker().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnsupportedChainError(s.to_owned()))
    }
}

/// A chain identifier that is not one of [`Chain::ALL`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedChainError(pub String);

impl fmt::Display for UnsupportedChainError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unsupported chain identifier {:?}", self.0)
    }
}

impl_std_error!(UnsupportedChainError);

/// Main or test network.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "actual_serde", rename_all = "lowercase")
)]
pub enum Network {
    /// The production network.
    Main,
    /// The public test network.
    Test,
}

impl Network {
    /// [`Network::Main`] if `main` is set, [`Network::Test`] otherwise.
    pub fn from_main(main: bool) -> Network {
        if main {
            Network::Main
        } else {
            Network::Test
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Network::Main => f.write_str("main"),
            Network::Test => f.write_str("test"),
        }
    }
}

/// Version prefixes of a Base58Check address family.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct Base58Versions {
    /// Version of pay-to-pubkey-hash addresses. One or more bytes.
    pub p2pkh: &'static [u8],
    /// Version of pay-to-script-hash addresses, if the chain has them.
    pub p2sh: Option<&'static [u8]>,
}

impl Base58Versions {
    /// Whether `version` is one of the versions of this family.
    pub fn matches(&self, version: &[u8]) -> bool {
        self.p2pkh == version || self.p2sh == Some(version)
    }
}

/// How a profile renders addresses, with the parameters of that rendering.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Scheme {
    /// `base58(version || hash || checksum)`, optionally also accepting segwit addresses.
    Base58Check {
        /// Version prefixes.
        versions: Base58Versions,
        /// Human-readable part of segwit addresses, if the chain has them.
        segwit_hrp: Option<&'static str>,
        /// How the hash is computed from a public key.
        key_hash: HashStrategy,
    },
    /// `prefix:base32(version || hash || polymod checksum)`, also accepting the legacy
    /// Base58Check form.
    CashAddr {
        /// The human-readable prefix.
        prefix: &'static str,
        /// Versions of the legacy form.
        legacy: Base58Versions,
        /// How the hash is computed from a public key.
        key_hash: HashStrategy,
    },
    /// `0x` followed by 40 hex digits whose letter case carries the checksum.
    CaseChecksumHex {
        /// How the 20 bytes are computed from a public key.
        key_hash: HashStrategy,
    },
    /// Human-chosen account names; no address is derived from a key.
    AccountName,
}

impl Scheme {
    /// How the 20-byte payload is computed from a public key. `None` for account names,
    /// which are not derived from keys.
    pub fn key_hash(&self) -> Option<HashStrategy> {
        match *self {
            Scheme::Base58Check { key_hash, .. }
            | Scheme::CashAddr { key_hash, .. }
            | Scheme::CaseChecksumHex { key_hash } => Some(key_hash),
            Scheme::AccountName => None,
        }
    }
}

/// Everything needed to derive and validate the addresses of one chain on one network.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct NetworkProfile {
    /// The chain.
    pub chain: Chain,
    /// The network.
    pub network: Network,
    /// How addresses are rendered and which hash they carry.
    pub scheme: Scheme,
}

const BTC_MAIN_VERSIONS: Base58Versions = Base58Versions { p2pkh: &[0x00], p2sh: Some(&[0x05]) };
const BTC_TEST_VERSIONS: Base58Versions = Base58Versions { p2pkh: &[0x6f], p2sh: Some(&[0xc4]) };

impl NetworkProfile {
    /// Bitcoin mainnet.
    pub const BTC_MAIN: NetworkProfile = NetworkProfile {
        chain: Chain::Btc,
        network: Network::Main,
        scheme: Scheme::Base58Check {
            versions: BTC_MAIN_VERSIONS,
            segwit_hrp: Some("bc"),
            key_hash: HashStrategy::Hash160Uncompressed,
        },
    };

    /// Bitcoin testnet.
    pub const BTC_TEST: NetworkProfile = NetworkProfile {
        chain: Chain::Btc,
        network: Network::Test,
        scheme: Scheme::Base58Check {
            versions: BTC_TEST_VERSIONS,
            segwit_hrp: Some("tb"),
            key_hash: HashStrategy::Hash160Uncompressed,
        },
    };

    /// Omni on Bitcoin mainnet.
    pub const OMNI_MAIN: NetworkProfile =
        NetworkProfile { chain: Chain::Omni, ..NetworkProfile::BTC_MAIN };

    /// Omni on Bitcoin testnet.
    pub const OMNI_TEST: NetworkProfile =
        NetworkProfile { chain: Chain::Omni, ..NetworkProfile::BTC_TEST };

    /// Litecoin mainnet.
    pub const LTC_MAIN: NetworkProfile = NetworkProfile {
        chain: Chain::Ltc,
        network: Network::Main,
        scheme: Scheme::Base58Check {
            versions: Base58Versions { p2pkh: &[0x30], p2sh: Some(&[0x32]) },
            segwit_hrp: Some("ltc"),
            key_hash: HashStrategy::Hash160Uncompressed,
        },
    };

    /// Litecoin testnet.
    pub const LTC_TEST: NetworkProfile = NetworkProfile {
        chain: Chain::Ltc,
        network: Network::Test,
        scheme: Scheme::Base58Check {
            versions: Base58Versions { p2pkh: &[0x6f], p2sh: Some(&[0x3a]) },
            segwit_hrp: Some("tltc"),
            key_hash: HashStrategy::Hash160Uncompressed,
        },
    };

    /// Bitcoin Cash mainnet.
    pub const BCH_MAIN: NetworkProfile = NetworkProfile {
        chain: Chain::Bch,
        network: Network::Main,
        scheme: Scheme::CashAddr {
            prefix: "bitcoincash",
            legacy: BTC_MAIN_VERSIONS,
            key_hash: HashStrategy::Hash160Uncompressed,
        },
    };

    /// Bitcoin Cash testnet.
    pub const BCH_TEST: NetworkProfile = NetworkProfile {
        chain: Chain::Bch,
        network: Network::Test,
        scheme: Scheme::CashAddr {
            prefix: "bchtest",
            legacy: BTC_TEST_VERSIONS,
            key_hash: HashStrategy::Hash160Uncompressed,
        },
    };

    /// Ethereum mainnet.
    pub const ETH_MAIN: NetworkProfile = NetworkProfile {
        chain: Chain::Eth,
        network: Network::Main,
        scheme: Scheme::CaseChecksumHex { key_hash: HashStrategy::Keccak256Tail },
    };

    /// Ethereum testnets share the mainnet format.
    pub const ETH_TEST: NetworkProfile =
        NetworkProfile { network: Network::Test, ..NetworkProfile::ETH_MAIN };

    /// Ethereum Classic mainnet.
    pub const ETC_MAIN: NetworkProfile =
        NetworkProfile { chain: Chain::Etc, ..NetworkProfile::ETH_MAIN };

    /// Ethereum Classic testnet.
    pub const ETC_TEST: NetworkProfile =
        NetworkProfile { chain: Chain::Etc, ..NetworkProfile::ETH_TEST };

    /// Tron mainnet.
    pub const TRON_MAIN: NetworkProfile = NetworkProfile {
        chain: Chain::Tron,
        network: Network::Main,
        scheme: Scheme::Base58Check {
            versions: Base58Versions { p2pkh: &[0x41], p2sh: None },
            segwit_hrp: None,
            key_hash: HashStrategy::Keccak256Tail,
        },
    };

    /// Tron testnets share the mainnet version byte.
    pub const TRON_TEST: NetworkProfile =
        NetworkProfile { network: Network::Test, ..NetworkProfile::TRON_MAIN };

    /// Vds mainnet, with a two byte version prefix.
    pub const VDS_MAIN: NetworkProfile = NetworkProfile {
        chain: Chain::Vds,
        network: Network::Main,
        scheme: Scheme::Base58Check {
            versions: Base58Versions { p2pkh: &[0x10, 0x1c], p2sh: None },
            segwit_hrp: None,
            key_hash: HashStrategy::Hash160Compressed,
        },
    };

    /// Vds testnet shares the mainnet version prefix.
    pub const VDS_TEST: NetworkProfile =
        NetworkProfile { network: Network::Test, ..NetworkProfile::VDS_MAIN };

    /// EOS mainnet.
    pub const EOS_MAIN: NetworkProfile = NetworkProfile {
        chain: Chain::Eos,
        network: Network::Main,
        scheme: Scheme::AccountName,
    };

    /// EOS testnet.
    pub const EOS_TEST: NetworkProfile =
        NetworkProfile { network: Network::Test, ..NetworkProfile::EOS_MAIN };

    /// IOST mainnet.
    pub const IOST_MAIN: NetworkProfile =
        NetworkProfile { chain: Chain::Iost, ..NetworkProfile::EOS_MAIN };

    /// IOST testnet.
    pub const IOST_TEST: NetworkProfile =
        NetworkProfile { chain: Chain::Iost, ..NetworkProfile::EOS_TEST };
}

/// The built-in profile of every (chain, network) pair.
pub static BUILTIN_PROFILES: [&NetworkProfile; 20] = [
    &NetworkProfile::BTC_MAIN,
    &NetworkProfile::BTC_TEST,
    &NetworkProfile::OMNI_MAIN,
    &NetworkProfile::OMNI_TEST,
    &NetworkProfile::LTC_MAIN,
    &NetworkProfile::LTC_TEST,
    &NetworkProfile::BCH_MAIN,
    &NetworkProfile::BCH_TEST,
    &NetworkProfile::ETH_MAIN,
    &NetworkProfile::ETH_TEST,
    &NetworkProfile::ETC_MAIN,
    &NetworkProfile::ETC_TEST,
    &NetworkProfile::TRON_MAIN,
    &NetworkProfile::TRON_TEST,
    &NetworkProfile::VDS_MAIN,
    &NetworkProfile::VDS_TEST,
    &NetworkProfile::EOS_MAIN,
    &NetworkProfile::EOS_TEST,
    &NetworkProfile::IOST_MAIN,
    &NetworkProfile::IOST_TEST,
];

/// Registry errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// A profile for this chain and network is already registered.
    Duplicate {
        /// Chain of the rejected profile.
        chain: Chain,
        /// Network of the rejected profile.
        network: Network,
    },
    /// The process-wide registry was already initialized.
    AlreadyInitialized,
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RegistryError::Duplicate { chain, network } => {
                write!(f, "duplicate network registration for {} {}", chain, network)
            }
            RegistryError::AlreadyInitialized => f.write_str("network registry already initialized"),
        }
    }
}

impl_std_error!(RegistryError);

/// A set of profiles, at most one per (chain, network).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NetworkRegistry {
    profiles: BTreeMap<(Chain, Network), &'static NetworkProfile>,
}

impl NetworkRegistry {
    /// An empty registry.
    pub fn new() -> NetworkRegistry {
        NetworkRegistry::default()
    }

    /// A registry holding [`BUILTIN_PROFILES`].
    pub fn builtin() -> NetworkRegistry {
        let mut registry = NetworkRegistry::new();
        for &profile in BUILTIN_PROFILES.iter() {
            registry.profiles.insert((profile.chain, profile.network), profile);
        }
        registry
    }

    /// Adds `profile`. A registered profile is never replaced.
    pub fn register(&mut self, profile: &'static NetworkProfile) -> Result<(), RegistryError> {
        let key = (profile.chain, profile.network);
        if self.profiles.contains_key(&key) {
            tracing::warn!(chain = %profile.chain, network = %profile.network, "duplicate network registration");
            return Err(RegistryError::Duplicate { chain: profile.chain, network: profile.network });
        }
        tracing::debug!(chain = %profile.chain, network = %profile.network, "registered network profile");
        self.profiles.insert(key, profile);
        Ok(())
    }

    /// The profile of `chain` on `network`, if registered.
    pub fn lookup(&self, chain: Chain, network: Network) -> Option<&'static NetworkProfile> {
        self.profiles.get(&(chain, network)).copied()
    }

    /// Iterates the registered profiles in (chain, network) order.
    pub fn profiles(&self) -> impl Iterator<Item = &'static NetworkProfile> + '_ {
        self.profiles.values().copied()
    }

    /// Number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no profile is registered.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

static REGISTRY: OnceLock<NetworkRegistry> = OnceLock::new();

/// Initializes the process-wide registry with `profiles`.
///
/// Fails without installing anything if two profiles share a chain and network, or if the
/// registry is already installed (including lazily by [`registry`]). Either failure is a
/// programming error in the host, which will usually want to abort on it.
pub fn init<I>(profiles: I) -> Result<(), RegistryError>
where
    I: IntoIterator<Item = &'static NetworkProfile>,
{
    let mut registry = NetworkRegistry::new();
    for profile in profiles {
        registry.register(profile)?;
    }
    let len = registry.len();
    REGISTRY.set(registry).map_err(|_| {
        tracing::warn!("network registry already initialized");
        RegistryError::AlreadyInitialized
    })?;
    tracing::debug!(profiles = len, "network registry initialized");
    Ok(())
}

/// Initializes the process-wide registry with [`BUILTIN_PROFILES`].
pub fn init_default() -> Result<(), RegistryError> {
    init(BUILTIN_PROFILES.iter().copied())
}

/// The process-wide registry. Installs [`BUILTIN_PROFILES`] if [`init`] was never called.
pub fn registry() -> &'static NetworkRegistry {
    REGISTRY.get_or_init(|| {
        tracing::debug!("network registry not initialized, installing built-in profiles");
        NetworkRegistry::builtin()
    })
}
