use bitcoin::Network;
use serde::{Deserialize, Serialize};

/// Supported Bitcoin networks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BtcNetwork {
    #[default]
    Mainnet,
    Testnet,
}

impl BtcNetwork {
    /// Every network, mainnet first.
    pub const ALL: [BtcNetwork; 2] = [BtcNetwork::Mainnet, BtcNetwork::Testnet];

    /// Convert to the `bitcoin` crate's `Network` type.
    pub fn to_bitcoin_network(self) -> Network {
        match self {
            BtcNetwork::Mainnet => Network::Bitcoin,
            BtcNetwork::Testnet => Network::Testnet,
        }
    }

    /// BIP-44 coin type used at the second level of derivation paths.
    pub fn coin_type(self) -> u32 {
        match self {
            BtcNetwork::Mainnet => 0,
            BtcNetwork::Testnet => 1,
        }
    }

    /// Coin type 0 is mainnet; every other coin type is treated as testnet.
    pub fn from_coin_type(coin: u32) -> Self {
        if coin == 0 {
            BtcNetwork::Mainnet
        } else {
            BtcNetwork::Testnet
        }
    }

    /// Base58check version byte for pay-to-pubkey-hash addresses.
    pub fn p2pkh_version(self) -> u8 {
        match self {
            BtcNetwork::Mainnet => 0x00,
            BtcNetwork::Testnet => 0x6f,
        }
    }

    /// Base58check version byte for pay-to-script-hash addresses.
    pub fn p2sh_version(self) -> u8 {
        match self {
            BtcNetwork::Mainnet => 0x05,
            BtcNetwork::Testnet => 0xc4,
        }
    }

    /// Human-readable part of native segwit addresses on this network.
    pub fn bech32_hrp(self) -> &'static str {
        match self {
            BtcNetwork::Mainnet => "bc",
            BtcNetwork::Testnet => "tb",
        }
    }

    pub fn is_p2pkh_version(version: u8) -> bool {
        Self::ALL.iter().any(|n| n.p2pkh_version() == version)
    }

    pub fn is_p2sh_version(version: u8) -> bool {
        Self::ALL.iter().any(|n| n.p2sh_version() == version)
    }
}

impl std::fmt::Display for BtcNetwork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BtcNetwork::Mainnet => write!(f, "mainnet"),
            BtcNetwork::Testnet => write!(f, "testnet"),
        }
    }
}
