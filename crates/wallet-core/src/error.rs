use chain_btc::BtcError;
use crypto_utils::CryptoError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Key derivation failed: {0}")]
    DerivationFailed(String),

    #[error("Invalid seed: {0}")]
    InvalidSeed(String),

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid witness encoding: {0}")]
    InvalidWitnessEncoding(String),

    #[error("Insufficient funds: have {available} sat, need {required} sat")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("Signing failed: {0}")]
    SigningFailed(String),

    #[error("Transaction build failed: {0}")]
    TransactionFailed(String),

    #[error("Cipher key derivation failed: {0}")]
    CipherKeys(String),

    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),
}

impl WalletError {
    /// Fatal errors abort the operation; nothing partial may be returned.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WalletError::DerivationFailed(_) | WalletError::InternalConsistency(_)
        )
    }
}

impl From<CryptoError> for WalletError {
    fn from(e: CryptoError) -> Self {
        WalletError::CipherKeys(e.to_string())
    }
}

impl From<BtcError> for WalletError {
    fn from(e: BtcError) -> Self {
        match e {
            BtcError::InsufficientFunds {
                available,
                required,
            } => WalletError::InsufficientFunds {
                available,
                required,
            },
            BtcError::InvalidAddress(m) => WalletError::InvalidAddress(m),
            BtcError::InvalidWitnessEncoding(m) => WalletError::InvalidWitnessEncoding(m),
            BtcError::KeyDerivationFailure(m) => WalletError::DerivationFailed(m),
            BtcError::InternalConsistency(m) => WalletError::InternalConsistency(m),
            BtcError::InvalidPrivateKey(m) => WalletError::InvalidPrivateKey(m),
            BtcError::InvalidPublicKey(m) => WalletError::InvalidPublicKey(m),
            BtcError::TransactionBuildError(m) => WalletError::TransactionFailed(m),
            BtcError::SigningError(m) => WalletError::SigningFailed(m),
        }
    }
}

impl From<bip32::Error> for WalletError {
    fn from(e: bip32::Error) -> Self {
        WalletError::DerivationFailed(e.to_string())
    }
}
