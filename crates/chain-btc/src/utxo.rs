use serde::{Deserialize, Serialize};

use crate::path::DerivationPath;

/// A spendable output owned by the wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    /// Previous transaction ID as a hex string (display order).
    pub txid: String,
    /// Output index within the previous transaction.
    pub vout: u32,
    /// Value in satoshis.
    pub amount_sat: u64,
    /// Path of the key that controls this output.
    pub path: DerivationPath,
    pub is_confirmed: bool,
}

impl UnspentOutput {
    pub fn new(
        txid: impl Into<String>,
        vout: u32,
        amount_sat: u64,
        path: DerivationPath,
        is_confirmed: bool,
    ) -> Self {
        Self {
            txid: txid.into(),
            vout,
            amount_sat,
            path,
            is_confirmed,
        }
    }
}

/// Sum of output values, or `None` on overflow.
pub fn total_value<'a>(utxos: impl IntoIterator<Item = &'a UnspentOutput>) -> Option<u64> {
    utxos
        .into_iter()
        .try_fold(0u64, |acc, u| acc.checked_add(u.amount_sat))
}
