//! Network selection and the invoice currency it implies.

use std::fmt;
use std::str::FromStr;

use bitcoin::constants::ChainHash;
use bitcoin::BlockHash;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The chain a node operates on.
///
/// Chosen once, when the channel manager is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Regtest,
}

impl Network {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
            Network::Regtest => "regtest",
        }
    }

    #[must_use]
    pub const fn to_bitcoin(self) -> bitcoin::Network {
        match self {
            Network::Mainnet => bitcoin::Network::Bitcoin,
            Network::Testnet => bitcoin::Network::Testnet,
            Network::Regtest => bitcoin::Network::Regtest,
        }
    }

    #[must_use]
    pub const fn currency(self) -> Currency {
        match self {
            Network::Mainnet => Currency::Bitcoin,
            Network::Testnet => Currency::BitcoinTestnet,
            Network::Regtest => Currency::Regtest,
        }
    }

    /// Chain hash of this network's genesis block.
    #[must_use]
    pub const fn chain_hash(self) -> ChainHash {
        ChainHash::using_genesis_block_const(self.to_bitcoin())
    }

    /// Whether `genesis` is the genesis block hash of this network.
    #[must_use]
    pub fn matches_genesis(self, genesis: &BlockHash) -> bool {
        ChainHash::from_genesis_block_hash(*genesis) == self.chain_hash()
    }
}

impl FromStr for Network {
    type Err = Error;

    /// Accepts exactly `mainnet`, `testnet` or `regtest`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Network::Mainnet),
            "testnet" => Ok(Network::Testnet),
            "regtest" => Ok(Network::Regtest),
            other => Err(Error::InvalidNetwork(format!(
                "'{other}' is not one of mainnet, testnet, regtest"
            ))),
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency an invoice is denominated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Currency {
    Bitcoin,
    BitcoinTestnet,
    Regtest,
}

impl Currency {
    /// Human-readable invoice prefix.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Currency::Bitcoin => "lnbc",
            Currency::BitcoinTestnet => "lntb",
            Currency::Regtest => "lnbcrt",
        }
    }

    #[must_use]
    pub const fn network(self) -> Network {
        match self {
            Currency::Bitcoin => Network::Mainnet,
            Currency::BitcoinTestnet => Network::Testnet,
            Currency::Regtest => Network::Regtest,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::constants::genesis_block;

    #[test]
    fn test_parse_supported_literals() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Testnet);
        assert_eq!("regtest".parse::<Network>().unwrap(), Network::Regtest);
    }

    #[test]
    fn test_parse_rejects_other_literals() {
        for literal in ["signet", "Mainnet", "bitcoin", "", " regtest"] {
            let err = literal.parse::<Network>().unwrap_err();
            assert_eq!(err.code(), "invalid_network");
        }
    }

    #[test]
    fn test_genesis_matching() {
        let regtest = genesis_block(bitcoin::Network::Regtest).block_hash();
        assert!(Network::Regtest.matches_genesis(&regtest));
        assert!(!Network::Mainnet.matches_genesis(&regtest));
    }

    #[test]
    fn test_currency_maps_back_to_network() {
        for network in [Network::Mainnet, Network::Testnet, Network::Regtest] {
            assert_eq!(network.currency().network(), network);
        }
    }
}
