use thiserror::Error;

/// Bitcoin chain operation errors.
#[derive(Debug, Error)]
pub enum BtcError {
    #[error("insufficient funds: have {available} sat, need {required} sat")]
    InsufficientFunds { available: u64, required: u64 },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid witness encoding: {0}")]
    InvalidWitnessEncoding(String),

    #[error("key derivation failed: {0}")]
    KeyDerivationFailure(String),

    #[error("internal consistency error: {0}")]
    InternalConsistency(String),

    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),

    #[error("signing error: {0}")]
    SigningError(String),
}

impl BtcError {
    /// Fatal errors indicate a broken primitive or a logic defect; the
    /// operation must be aborted rather than retried with different input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            BtcError::KeyDerivationFailure(_) | BtcError::InternalConsistency(_)
        )
    }
}
