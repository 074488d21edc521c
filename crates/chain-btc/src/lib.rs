//! Bitcoin chain support for the HD wallet.
//!
//! Provides derivation-path and coin descriptors, the bech32 witness codec,
//! P2SH-wrapped and native segwit addresses, fee estimation with UTXO
//! selection, and transaction assembly and signing.

pub mod address;
pub mod base58;
pub mod bech32;
pub mod coin;
pub mod config;
pub mod ecdsa;
pub mod error;
pub mod fee;
pub mod hash;
pub mod network;
pub mod path;
pub mod plan;
pub mod segwit;
pub mod transaction;
pub mod utxo;

pub use coin::{AddressKind, CoinProfile, Purpose};
pub use error::BtcError;
pub use network::BtcNetwork;
pub use path::DerivationPath;
pub use plan::{PaymentTarget, ReplaceabilityPolicy, TransactionPlan};
pub use utxo::UnspentOutput;
