use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coin::AddressKind;
use crate::config::HARDENED_OFFSET;
use crate::network::BtcNetwork;

/// Five-level BIP-32 path `m / purpose' / coin' / account' / change / index`.
///
/// Purpose, coin and account are always derived hardened; change and index
/// are always derived non-hardened. Levels after the purpose may be unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DerivationPath {
    purpose: u32,
    coin: Option<u32>,
    account: Option<u32>,
    change: Option<u32>,
    index: Option<u32>,
}

impl DerivationPath {
    pub fn new(purpose: u32, coin: u32, account: u32, change: u32, index: u32) -> Self {
        Self {
            purpose,
            coin: Some(coin),
            account: Some(account),
            change: Some(change),
            index: Some(index),
        }
    }

    /// A path with only the purpose level set.
    pub fn purpose_only(purpose: u32) -> Self {
        Self {
            purpose,
            coin: None,
            account: None,
            change: None,
            index: None,
        }
    }

    pub fn purpose(&self) -> u32 {
        self.purpose
    }

    pub fn coin(&self) -> Option<u32> {
        self.coin
    }

    pub fn account(&self) -> Option<u32> {
        self.account
    }

    pub fn change(&self) -> Option<u32> {
        self.change
    }

    pub fn index(&self) -> Option<u32> {
        self.index
    }

    /// `purpose + 2^31`, or `None` when the purpose is already at or above
    /// the hardened offset.
    pub fn hardened_purpose(&self) -> Option<u32> {
        self.purpose.checked_add(HARDENED_OFFSET)
    }

    /// `None` when the coin level is unset or out of range.
    pub fn hardened_coin(&self) -> Option<u32> {
        self.coin.and_then(|c| c.checked_add(HARDENED_OFFSET))
    }

    /// `None` when the account level is unset or out of range.
    pub fn hardened_account(&self) -> Option<u32> {
        self.account.and_then(|a| a.checked_add(HARDENED_OFFSET))
    }

    pub fn has_coin(&self) -> bool {
        self.coin.is_some()
    }

    /// Coin type 0 is mainnet, any other set coin is testnet. Unset is mainnet.
    pub fn network(&self) -> BtcNetwork {
        self.coin
            .map(BtcNetwork::from_coin_type)
            .unwrap_or(BtcNetwork::Mainnet)
    }

    pub fn address_kind(&self) -> AddressKind {
        AddressKind::from_purpose(self.purpose)
    }

    pub fn is_change(&self) -> bool {
        self.change == Some(1)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m/{}'", self.purpose)?;
        let hardened = [self.coin, self.account];
        let normal = [self.change, self.index];
        for level in hardened.into_iter().map_while(|l| l) {
            write!(f, "/{level}'")?;
        }
        if self.coin.is_some() && self.account.is_some() {
            for level in normal.into_iter().map_while(|l| l) {
                write!(f, "/{level}")?;
            }
        }
        Ok(())
    }
}
