use chain_btc::DerivationPath;
use serde::{Deserialize, Serialize};

/// An address together with the path that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaAddress {
    pub address: String,
    pub path: DerivationPath,
    /// Uncompressed (65-byte) public key as hex. Only set on receive
    /// addresses, for external key exchange.
    pub uncompressed_public_key: Option<String>,
}

/// Where the change of a signed transaction went.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeInfo {
    pub address: String,
    pub path: DerivationPath,
    pub vout_index: u32,
}

/// Output of the transaction builder: ready to broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransactionResult {
    pub txid: String,
    pub raw_tx_hex: String,
    /// Present exactly when the plan carried change.
    pub change: Option<ChangeInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_round_trips_through_json() {
        let result = SignedTransactionResult {
            txid: "ab".repeat(32),
            raw_tx_hex: "0100".into(),
            change: Some(ChangeInfo {
                address: "3NBJnvo9U5YbJnr1pALFqQEur1wXWJrjoM".into(),
                path: DerivationPath::new(49, 0, 0, 1, 56),
                vout_index: 1,
            }),
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: SignedTransactionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn change_address_has_no_public_key() {
        let meta = MetaAddress {
            address: "bc1qcr8te4kr609gcawutmrza0j4xv80jy8z306fyu".into(),
            path: DerivationPath::new(84, 0, 0, 1, 0),
            uncompressed_public_key: None,
        };
        let json = serde_json::to_value(&meta).unwrap();
        assert!(json["uncompressed_public_key"].is_null());
    }
}
