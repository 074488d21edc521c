//! HD wallet core: mnemonic to master key, address construction, and
//! signing of Bitcoin transaction plans.
//!
//! Coin selection and the wire-level transaction live in `chain-btc`; this
//! crate supplies the keys.

pub mod address;
pub mod cipher_keys;
pub mod error;
pub mod hd_derivation;
pub mod mnemonic;
pub mod signing;
pub mod transaction;
pub mod types;

pub use address::UsableAddress;
pub use error::WalletError;
pub use hd_derivation::{DerivedKey, MasterKey};
pub use transaction::TransactionBuilder;
pub use types::{ChangeInfo, MetaAddress, SignedTransactionResult};

use chain_btc::{CoinProfile, DerivationPath, TransactionPlan};

// ─── Mnemonic-driven entry points ───────────────────────────────────
// These take the phrase directly so a host never has to hold the seed.

/// Receive address at `path` for the wallet behind `mnemonic_phrase`.
pub fn receive_address_from_mnemonic(
    mnemonic_phrase: &str,
    passphrase: &str,
    path: DerivationPath,
) -> Result<MetaAddress, WalletError> {
    let master = MasterKey::from_mnemonic(mnemonic_phrase, passphrase)?;
    UsableAddress::new(&master, path).build_receive_address()
}

/// Change address at `path` for the wallet behind `mnemonic_phrase`.
pub fn change_address_from_mnemonic(
    mnemonic_phrase: &str,
    passphrase: &str,
    path: DerivationPath,
) -> Result<MetaAddress, WalletError> {
    let master = MasterKey::from_mnemonic(mnemonic_phrase, passphrase)?;
    UsableAddress::new(&master, path).build_change_address()
}

/// Sign `plan` with the wallet behind `mnemonic_phrase`.
pub fn sign_btc_transaction(
    mnemonic_phrase: &str,
    passphrase: &str,
    plan: &TransactionPlan,
) -> Result<SignedTransactionResult, WalletError> {
    let master = MasterKey::from_mnemonic(mnemonic_phrase, passphrase)?;
    let coin: CoinProfile = *plan.coin();
    TransactionBuilder::new(&master, coin).generate_tx_metadata(plan)
}
