use chain_btc::address::script_pubkey_for_address;
use chain_btc::transaction::{
    build_unsigned_transaction, find_output_index, sign_transaction, InputSigningKey,
};
use chain_btc::{CoinProfile, TransactionPlan};

use crate::address::UsableAddress;
use crate::error::WalletError;
use crate::hd_derivation::MasterKey;
use crate::types::{ChangeInfo, SignedTransactionResult};

/// Turns transaction plans into signed transactions for one wallet.
pub struct TransactionBuilder<'a> {
    master: &'a MasterKey,
    coin: CoinProfile,
}

impl<'a> TransactionBuilder<'a> {
    pub fn new(master: &'a MasterKey, coin: CoinProfile) -> Self {
        Self { master, coin }
    }

    pub fn coin(&self) -> &CoinProfile {
        &self.coin
    }

    /// Build, sign and serialize `plan`.
    ///
    /// The plan must have been made for this builder's coin. Every input is
    /// signed with the key at its own UTXO's path. When the plan carries
    /// change, the change output must be found again in the built
    /// transaction; a miss aborts with an internal-consistency error.
    pub fn generate_tx_metadata(
        &self,
        plan: &TransactionPlan,
    ) -> Result<SignedTransactionResult, WalletError> {
        if plan.coin() != &self.coin {
            return Err(WalletError::TransactionFailed(format!(
                "plan is for {:?} but builder signs for {:?}",
                plan.coin(),
                self.coin
            )));
        }

        let change_address = match plan.change_path() {
            Some(path) if plan.should_add_change() => {
                let address = UsableAddress::new(self.master, *path).build_payment_address()?;
                Some((address, *path))
            }
            _ => None,
        };

        let unsigned = build_unsigned_transaction(
            plan,
            change_address.as_ref().map(|(address, _)| address.as_str()),
        )?;

        let keys = plan
            .utxos()
            .iter()
            .map(|utxo| {
                let key = self.master.derive(&utxo.path)?;
                Ok(InputSigningKey::new(key.private_key, utxo.path.address_kind()))
            })
            .collect::<Result<Vec<_>, WalletError>>()?;

        let signed = sign_transaction(&unsigned, &keys)?;

        let change = match change_address {
            Some((address, path)) => {
                let script = script_pubkey_for_address(&address)?;
                let vout_index = find_output_index(&signed.tx, &script).ok_or_else(|| {
                    WalletError::InternalConsistency(format!(
                        "change output to {address} not found in transaction {}",
                        signed.txid
                    ))
                })?;
                tracing::debug!(txid = %signed.txid, vout_index, "change output located");
                Some(ChangeInfo {
                    address,
                    path,
                    vout_index,
                })
            }
            None => None,
        };

        Ok(SignedTransactionResult {
            txid: signed.txid,
            raw_tx_hex: signed.raw_tx_hex,
            change,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::consensus::encode::deserialize;
    use bitcoin::Transaction;
    use chain_btc::plan::create_send_max_plan;
    use chain_btc::{BtcNetwork, DerivationPath, PaymentTarget, Purpose, UnspentOutput};

    const TEST_MNEMONIC: &str =
        "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
    const PREV_TXID: &str = "1a08dafe993fdc17fdc661988c88f97a9974013291e759b9b5766b8e97c78f87";

    fn master() -> MasterKey {
        MasterKey::from_mnemonic(TEST_MNEMONIC, "").unwrap()
    }

    #[test]
    fn send_max_has_no_change() {
        let master = master();
        let coin = CoinProfile::new(Purpose::Bip84, BtcNetwork::Mainnet, 0);
        let utxos = vec![UnspentOutput::new(
            PREV_TXID,
            0,
            100_000,
            DerivationPath::new(84, 0, 0, 0, 0),
            true,
        )];
        let plan = create_send_max_plan(
            coin,
            "bc1qnjg0jd8228aq7egyzacy8cys3knf9xvrerkf9g",
            &utxos,
            5,
            600_000,
        )
        .unwrap();

        let result = TransactionBuilder::new(&master, coin)
            .generate_tx_metadata(&plan)
            .unwrap();
        assert!(result.change.is_none());

        let bytes = hex::decode(&result.raw_tx_hex).unwrap();
        let tx: Transaction = deserialize(&bytes).unwrap();
        assert_eq!(tx.compute_txid().to_string(), result.txid);
        assert_eq!(tx.output.len(), 1);
        assert!(tx.input[0].script_sig.is_empty());
        assert_eq!(tx.input[0].witness.len(), 2);
        assert_eq!(tx.lock_time.to_consensus_u32(), 600_001);
    }

    #[test]
    fn native_segwit_change_is_found() {
        let master = master();
        let coin = CoinProfile::new(Purpose::Bip84, BtcNetwork::Mainnet, 0);
        let utxos = vec![UnspentOutput::new(
            PREV_TXID,
            1,
            500_000,
            DerivationPath::new(84, 0, 0, 0, 3),
            true,
        )];
        let target = PaymentTarget::new(coin, "37VucYSaXLCAsxYyAPfbSi9eh4iEcbShgf", 100_000);
        let plan = TransactionPlan::new(
            target,
            utxos,
            2_000,
            398_000,
            Some(DerivationPath::new(84, 0, 0, 1, 0)),
            600_001,
        )
        .unwrap();

        let result = TransactionBuilder::new(&master, coin)
            .generate_tx_metadata(&plan)
            .unwrap();
        let change = result.change.unwrap();
        assert_eq!(change.address, "bc1q8c6fshw2dlwun7ekn9qwf37cu2rn755upcp6el");
        assert_eq!(change.vout_index, 1);
        assert_eq!(change.path.index(), Some(0));
    }

    #[test]
    fn plan_for_another_coin_is_refused() {
        let master = master();
        let plan_coin = CoinProfile::new(Purpose::Bip49, BtcNetwork::Mainnet, 0);
        let utxos = vec![UnspentOutput::new(
            PREV_TXID,
            0,
            50_000,
            DerivationPath::new(49, 0, 0, 0, 0),
            true,
        )];
        let target = PaymentTarget::new(plan_coin, "37VucYSaXLCAsxYyAPfbSi9eh4iEcbShgf", 40_000);
        let plan = TransactionPlan::new(target, utxos, 10_000, 0, None, 1).unwrap();

        let other_coin = CoinProfile::new(Purpose::Bip84, BtcNetwork::Mainnet, 0);
        let err = TransactionBuilder::new(&master, other_coin)
            .generate_tx_metadata(&plan)
            .unwrap_err();
        assert!(matches!(err, WalletError::TransactionFailed(_)));

        assert!(TransactionBuilder::new(&master, plan_coin)
            .generate_tx_metadata(&plan)
            .is_ok());
    }

    #[test]
    fn legacy_utxo_cannot_be_signed() {
        let master = master();
        let coin = CoinProfile::default();
        let utxos = vec![UnspentOutput::new(
            PREV_TXID,
            0,
            50_000,
            DerivationPath::new(44, 0, 0, 0, 0),
            true,
        )];
        let target = PaymentTarget::new(coin, "37VucYSaXLCAsxYyAPfbSi9eh4iEcbShgf", 40_000);
        let plan = TransactionPlan::new(target, utxos, 10_000, 0, None, 1).unwrap();

        let err = TransactionBuilder::new(&master, coin)
            .generate_tx_metadata(&plan)
            .unwrap_err();
        assert!(matches!(err, WalletError::InvalidAddress(_)));
    }
}
