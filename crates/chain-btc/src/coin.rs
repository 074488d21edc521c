use serde::{Deserialize, Serialize};

use crate::network::BtcNetwork;
use crate::path::DerivationPath;

/// BIP-43 purpose values understood by the wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Purpose {
    Bip32,
    Bip39,
    Bip44,
    #[default]
    Bip49,
    Bip84,
}

impl Purpose {
    pub fn value(self) -> u32 {
        match self {
            Purpose::Bip32 => 32,
            Purpose::Bip39 => 39,
            Purpose::Bip44 => 44,
            Purpose::Bip49 => 49,
            Purpose::Bip84 => 84,
        }
    }
}

impl TryFrom<u32> for Purpose {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            32 => Ok(Purpose::Bip32),
            39 => Ok(Purpose::Bip39),
            44 => Ok(Purpose::Bip44),
            49 => Ok(Purpose::Bip49),
            84 => Ok(Purpose::Bip84),
            other => Err(other),
        }
    }
}

/// Output/input script family a purpose implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressKind {
    /// BIP-49: P2WPKH nested in P2SH.
    P2shSegwit,
    /// BIP-84: bech32 P2WPKH.
    NativeSegwit,
    /// Anything else. Not spendable or receivable by this wallet.
    Legacy,
}

impl AddressKind {
    pub fn from_purpose(purpose: u32) -> Self {
        match Purpose::try_from(purpose) {
            Ok(Purpose::Bip49) => AddressKind::P2shSegwit,
            Ok(Purpose::Bip84) => AddressKind::NativeSegwit,
            _ => AddressKind::Legacy,
        }
    }
}

/// Immutable descriptor of derivation purpose, network and account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CoinProfile {
    purpose: Purpose,
    network: BtcNetwork,
    account: u32,
}

impl CoinProfile {
    pub fn new(purpose: Purpose, network: BtcNetwork, account: u32) -> Self {
        Self {
            purpose,
            network,
            account,
        }
    }

    /// Recover the profile a path was derived under.
    ///
    /// Unknown purposes fall back to the default (BIP-49) and an unset coin
    /// level is treated as mainnet. An unset account is account 0.
    pub fn from_path(path: &DerivationPath) -> Self {
        let purpose = Purpose::try_from(path.purpose()).unwrap_or_default();
        let network = path.network();
        let account = path.account().unwrap_or(0);
        Self::new(purpose, network, account)
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn network(&self) -> BtcNetwork {
        self.network
    }

    pub fn account(&self) -> u32 {
        self.account
    }

    pub fn coin_type(&self) -> u32 {
        self.network.coin_type()
    }

    pub fn address_kind(&self) -> AddressKind {
        AddressKind::from_purpose(self.purpose.value())
    }

    /// Bech32 prefix for native segwit profiles, empty for everything else.
    pub fn bech32_hrp(&self) -> &'static str {
        match self.address_kind() {
            AddressKind::NativeSegwit => self.network.bech32_hrp(),
            _ => "",
        }
    }

    /// Path to an address under this profile.
    pub fn path(&self, change: u32, index: u32) -> DerivationPath {
        DerivationPath::new(
            self.purpose.value(),
            self.coin_type(),
            self.account,
            change,
            index,
        )
    }
}
