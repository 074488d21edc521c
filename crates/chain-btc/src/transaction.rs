use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode::serialize_hex;
use bitcoin::hashes::Hash;
use bitcoin::script::{Builder, PushBytes, ScriptBuf};
use bitcoin::secp256k1::{Message, Secp256k1, SecretKey};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::transaction::Version;
use bitcoin::{
    Amount, CompressedPublicKey, OutPoint, Sequence, Transaction, TxIn, TxOut, Txid, Witness,
};
use zeroize::Zeroizing;

use crate::address::script_pubkey_for_address;
use crate::coin::AddressKind;
use crate::config::TRANSACTION_VERSION;
use crate::error::BtcError;
use crate::plan::TransactionPlan;

/// An unsigned Bitcoin transaction ready for signing.
#[derive(Debug, Clone)]
pub struct UnsignedBtcTx {
    /// The bitcoin transaction with empty scriptSigs and witnesses.
    pub tx: Transaction,
    /// Value of each spent output, in input order. Needed for BIP-143 sighashes.
    pub input_amounts: Vec<Amount>,
}

/// Private key for one input, plus how that input's output was locked.
pub struct InputSigningKey {
    pub secret: Zeroizing<[u8; 32]>,
    pub kind: AddressKind,
}

impl InputSigningKey {
    pub fn new(secret: [u8; 32], kind: AddressKind) -> Self {
        Self {
            secret: Zeroizing::new(secret),
            kind,
        }
    }
}

impl std::fmt::Debug for InputSigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputSigningKey")
            .field("secret", &"[REDACTED]")
            .field("kind", &self.kind)
            .finish()
    }
}

/// A signed transaction, serialized with witness data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedBtcTx {
    pub txid: String,
    pub raw_tx_hex: String,
    pub tx: Transaction,
}

/// Lay out outputs then inputs for `plan`.
///
/// Outputs are the destination followed by change. `change_address` must be
/// given exactly when the plan carries change.
pub fn build_unsigned_transaction(
    plan: &TransactionPlan,
    change_address: Option<&str>,
) -> Result<UnsignedBtcTx, BtcError> {
    let mut outputs = Vec::with_capacity(2);
    outputs.push(TxOut {
        value: Amount::from_sat(plan.amount_sat()),
        script_pubkey: script_pubkey_for_address(plan.destination())?,
    });
    match (plan.should_add_change(), change_address) {
        (true, Some(address)) => outputs.push(TxOut {
            value: Amount::from_sat(plan.change_sat()),
            script_pubkey: script_pubkey_for_address(address)?,
        }),
        (false, None) => {}
        (true, None) => {
            return Err(BtcError::InternalConsistency(
                "plan has change but no change address was given".into(),
            ))
        }
        (false, Some(_)) => {
            return Err(BtcError::InternalConsistency(
                "change address given for a plan without change".into(),
            ))
        }
    }

    let mut inputs = Vec::with_capacity(plan.utxos().len());
    let mut input_amounts = Vec::with_capacity(plan.utxos().len());
    for utxo in plan.utxos() {
        let txid: Txid = utxo
            .txid
            .parse()
            .map_err(|e| BtcError::TransactionBuildError(format!("invalid txid: {e}")))?;
        inputs.push(TxIn {
            previous_output: OutPoint::new(txid, utxo.vout),
            script_sig: ScriptBuf::new(),
            sequence: Sequence(plan.sequence_for(utxo)),
            witness: Witness::default(),
        });
        input_amounts.push(Amount::from_sat(utxo.amount_sat));
    }

    let tx = Transaction {
        version: Version(TRANSACTION_VERSION),
        lock_time: LockTime::from_consensus(plan.locktime()),
        input: inputs,
        output: outputs,
    };

    Ok(UnsignedBtcTx { tx, input_amounts })
}

/// Sign every input with its own key, in input order.
///
/// Each input gets a BIP-143 signature over the P2WPKH script code of its
/// key. P2SH-wrapped inputs also get the witness program as their scriptSig.
pub fn sign_transaction(
    unsigned_tx: &UnsignedBtcTx,
    keys: &[InputSigningKey],
) -> Result<SignedBtcTx, BtcError> {
    let input_count = unsigned_tx.tx.input.len();
    if keys.len() != input_count || unsigned_tx.input_amounts.len() != input_count {
        return Err(BtcError::InternalConsistency(format!(
            "{input_count} inputs but {} keys and {} amounts",
            keys.len(),
            unsigned_tx.input_amounts.len()
        )));
    }

    let secp = Secp256k1::new();
    let mut signed_tx = unsigned_tx.tx.clone();
    let mut sighash_cache = SighashCache::new(&unsigned_tx.tx);

    for (input_index, key) in keys.iter().enumerate() {
        let secret_key = SecretKey::from_slice(key.secret.as_ref())
            .map_err(|e| BtcError::InvalidPrivateKey(format!("invalid secret key: {e}")))?;
        let public_key = bitcoin::secp256k1::PublicKey::from_secret_key(&secp, &secret_key);
        let compressed_pk = CompressedPublicKey(public_key);
        let witness_program = ScriptBuf::new_p2wpkh(&compressed_pk.wpubkey_hash());

        let sighash = sighash_cache
            .p2wpkh_signature_hash(
                input_index,
                &witness_program,
                unsigned_tx.input_amounts[input_index],
                EcdsaSighashType::All,
            )
            .map_err(|e| BtcError::SigningError(format!("sighash computation failed: {e}")))?;

        let msg = Message::from_digest(sighash.to_byte_array());
        let signature = secp.sign_ecdsa(&msg, &secret_key);

        let mut sig_bytes = signature.serialize_der().to_vec();
        sig_bytes.push(EcdsaSighashType::All as u8);

        let mut witness = Witness::new();
        witness.push(&sig_bytes);
        witness.push(public_key.serialize());

        let input = &mut signed_tx.input[input_index];
        input.witness = witness;
        input.script_sig = match key.kind {
            AddressKind::P2shSegwit => {
                let push: &PushBytes = witness_program.as_bytes().try_into().map_err(|e| {
                    BtcError::SigningError(format!("redeem script too large: {e}"))
                })?;
                Builder::new().push_slice(push).into_script()
            }
            AddressKind::NativeSegwit => ScriptBuf::new(),
            AddressKind::Legacy => {
                return Err(BtcError::InvalidAddress(format!(
                    "input {input_index} is not a segwit output"
                )))
            }
        };
    }

    let txid = signed_tx.compute_txid().to_string();
    let raw_tx_hex = serialize_hex(&signed_tx);
    tracing::info!(
        %txid,
        inputs = signed_tx.input.len(),
        outputs = signed_tx.output.len(),
        "transaction signed"
    );
    Ok(SignedBtcTx {
        txid,
        raw_tx_hex,
        tx: signed_tx,
    })
}

/// Index of the first output locked by `script_pubkey`.
pub fn find_output_index(tx: &Transaction, script_pubkey: &ScriptBuf) -> Option<u32> {
    tx.output
        .iter()
        .position(|out| out.script_pubkey == *script_pubkey)
        .and_then(|i| u32::try_from(i).ok())
}
