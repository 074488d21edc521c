//! Coin selection and fee accounting.
//!
//! Every successful plan satisfies `sum(inputs) == amount + fee + change`.
//! Change that is not worth an output is folded into the fee, never dropped.

use serde::{Deserialize, Serialize};

use crate::coin::CoinProfile;
use crate::config::{DUST_THRESHOLD_SAT, MAX_INPUT_SEQUENCE, REPLACEABLE_SEQUENCE};
use crate::error::BtcError;
use crate::fee::{bytes_per_input, total_bytes};
use crate::path::DerivationPath;
use crate::utxo::{total_value, UnspentOutput};

/// How input sequence numbers signal replace-by-fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReplaceabilityPolicy {
    MustBeReplaceable,
    #[default]
    MustNotBeReplaceable,
    /// Replaceable only where an input's parent is unconfirmed.
    AllowedByConfirmation,
}

/// What the caller wants to pay, and to whom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTarget {
    pub coin: CoinProfile,
    pub destination: String,
    pub amount_sat: u64,
}

impl PaymentTarget {
    pub fn new(coin: CoinProfile, destination: impl Into<String>, amount_sat: u64) -> Self {
        Self {
            coin,
            destination: destination.into(),
            amount_sat,
        }
    }
}

/// Inputs, outputs and fee for one transaction, ready for assembly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPlan {
    coin: CoinProfile,
    destination: String,
    utxos: Vec<UnspentOutput>,
    amount_sat: u64,
    fee_sat: u64,
    change_sat: u64,
    change_path: Option<DerivationPath>,
    locktime: u32,
    replaceability: ReplaceabilityPolicy,
}

impl TransactionPlan {
    /// Build a plan from already-chosen parts.
    ///
    /// The locktime is taken verbatim and the policy defaults to
    /// [`ReplaceabilityPolicy::MustNotBeReplaceable`]. A `change_path` is
    /// discarded when `change_sat` is zero.
    pub fn new(
        target: PaymentTarget,
        utxos: Vec<UnspentOutput>,
        fee_sat: u64,
        change_sat: u64,
        change_path: Option<DerivationPath>,
        locktime: u32,
    ) -> Result<Self, BtcError> {
        if utxos.is_empty() {
            return Err(BtcError::TransactionBuildError("no UTXOs selected".into()));
        }
        let change_path = match (change_sat, change_path) {
            (0, _) => None,
            (c, _) if c < DUST_THRESHOLD_SAT => {
                return Err(BtcError::TransactionBuildError(format!(
                    "change of {c} sat is below the dust threshold"
                )))
            }
            (_, Some(path)) => Some(path),
            (c, None) => {
                return Err(BtcError::TransactionBuildError(format!(
                    "change of {c} sat has no change path"
                )))
            }
        };

        let available = total_value(&utxos)
            .ok_or_else(|| BtcError::TransactionBuildError("input value overflow".into()))?;
        let spent = target
            .amount_sat
            .checked_add(fee_sat)
            .and_then(|v| v.checked_add(change_sat))
            .ok_or_else(|| BtcError::TransactionBuildError("output value overflow".into()))?;
        if available != spent {
            return Err(BtcError::TransactionBuildError(format!(
                "inputs total {available} sat but amount + fee + change is {spent} sat"
            )));
        }

        Ok(Self {
            coin: target.coin,
            destination: target.destination,
            utxos,
            amount_sat: target.amount_sat,
            fee_sat,
            change_sat,
            change_path,
            locktime,
            replaceability: ReplaceabilityPolicy::default(),
        })
    }

    pub fn with_replaceability(mut self, policy: ReplaceabilityPolicy) -> Self {
        self.replaceability = policy;
        self
    }

    pub fn coin(&self) -> &CoinProfile {
        &self.coin
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Selected inputs in selection order.
    pub fn utxos(&self) -> &[UnspentOutput] {
        &self.utxos
    }

    pub fn amount_sat(&self) -> u64 {
        self.amount_sat
    }

    pub fn fee_sat(&self) -> u64 {
        self.fee_sat
    }

    pub fn change_sat(&self) -> u64 {
        self.change_sat
    }

    pub fn change_path(&self) -> Option<&DerivationPath> {
        self.change_path.as_ref()
    }

    pub fn locktime(&self) -> u32 {
        self.locktime
    }

    pub fn replaceability(&self) -> ReplaceabilityPolicy {
        self.replaceability
    }

    pub fn should_add_change(&self) -> bool {
        self.change_sat > 0
    }

    pub fn total_input_value(&self) -> u64 {
        // Checked in `new`.
        self.amount_sat + self.fee_sat + self.change_sat
    }

    /// Sequence number for one input under this plan's policy.
    pub fn sequence_for(&self, utxo: &UnspentOutput) -> u32 {
        match self.replaceability {
            ReplaceabilityPolicy::MustBeReplaceable => REPLACEABLE_SEQUENCE,
            ReplaceabilityPolicy::MustNotBeReplaceable => MAX_INPUT_SEQUENCE,
            ReplaceabilityPolicy::AllowedByConfirmation if utxo.is_confirmed => MAX_INPUT_SEQUENCE,
            ReplaceabilityPolicy::AllowedByConfirmation => REPLACEABLE_SEQUENCE,
        }
    }

    /// Plan-level summary: replaceable if any input would signal it.
    pub fn suggested_sequence(&self) -> u32 {
        if self
            .utxos
            .iter()
            .any(|u| self.sequence_for(u) == REPLACEABLE_SEQUENCE)
        {
            REPLACEABLE_SEQUENCE
        } else {
            MAX_INPUT_SEQUENCE
        }
    }

    pub fn is_replaceable(&self) -> bool {
        self.suggested_sequence() == REPLACEABLE_SEQUENCE
    }
}

fn fee_at_rate(fee_rate: u64, bytes: u64) -> Result<u64, BtcError> {
    fee_rate
        .checked_mul(bytes)
        .ok_or_else(|| BtcError::TransactionBuildError("fee overflow".into()))
}

fn next_block_locktime(block_height: u32) -> Result<u32, BtcError> {
    block_height
        .checked_add(1)
        .ok_or_else(|| BtcError::TransactionBuildError("block height overflow".into()))
}

fn add_value(total: u64, utxo: &UnspentOutput) -> Result<u64, BtcError> {
    total
        .checked_add(utxo.amount_sat)
        .ok_or_else(|| BtcError::TransactionBuildError("input value overflow".into()))
}

fn insufficient(available: u64, amount: u64, fee: u64) -> BtcError {
    let required = amount.saturating_add(fee);
    tracing::warn!(available, required, "insufficient funds for payment");
    BtcError::InsufficientFunds {
        available,
        required,
    }
}

/// Select inputs greedily, in the order given, paying `fee_rate` sat per byte.
///
/// A change output is added only when the leftover covers the cost of
/// spending it later plus the dust threshold; otherwise the leftover goes to
/// the fee. Locktime is set to `block_height + 1` and input sequences follow
/// `replaceability`.
pub fn create_transaction_plan(
    target: &PaymentTarget,
    utxos: &[UnspentOutput],
    fee_rate: u64,
    change_path: DerivationPath,
    block_height: u32,
    replaceability: ReplaceabilityPolicy,
) -> Result<TransactionPlan, BtcError> {
    let coin = &target.coin;
    let amount = target.amount_sat;
    let locktime = next_block_locktime(block_height)?;
    let input_cost = fee_at_rate(fee_rate, bytes_per_input(coin.address_kind()))?;
    let mut selected: Vec<UnspentOutput> = Vec::new();
    let mut total: u64 = 0;
    let mut fee: u64 = 0;

    for utxo in utxos {
        selected.push(utxo.clone());
        total = add_value(total, utxo)?;
        fee = fee_at_rate(
            fee_rate,
            total_bytes(coin, selected.len(), &target.destination, false)?,
        )?;

        let Some(change_value) = amount.checked_add(fee).and_then(|need| total.checked_sub(need))
        else {
            continue;
        };

        let (fee, change, path) = if change_value == 0 {
            (fee, 0, None)
        } else if change_value < input_cost.saturating_add(DUST_THRESHOLD_SAT) {
            tracing::debug!(change_value, "change not worth an output, folding into fee");
            (fee + change_value, 0, None)
        } else {
            let fee_with_change = fee_at_rate(
                fee_rate,
                total_bytes(coin, selected.len(), &target.destination, true)?,
            )?;
            let change = total - amount - fee_with_change;
            (fee_with_change, change, Some(change_path))
        };

        tracing::debug!(inputs = selected.len(), fee, change, "inputs cover payment");
        let plan = TransactionPlan::new(target.clone(), selected, fee, change, path, locktime)?
            .with_replaceability(replaceability);
        tracing::info!(
            inputs = plan.utxos().len(),
            amount = plan.amount_sat(),
            fee = plan.fee_sat(),
            change = plan.change_sat(),
            "rate-based plan created"
        );
        return Ok(plan);
    }

    Err(insufficient(total, amount, fee))
}

/// Select inputs in the order given until they cover `amount + flat_fee`.
///
/// Change below the dust threshold is added to the fee. Flat-fee plans are
/// always replaceable.
pub fn create_flat_fee_plan(
    target: &PaymentTarget,
    utxos: &[UnspentOutput],
    flat_fee: u64,
    change_path: DerivationPath,
    block_height: u32,
) -> Result<TransactionPlan, BtcError> {
    let amount = target.amount_sat;
    let locktime = next_block_locktime(block_height)?;
    let need = amount
        .checked_add(flat_fee)
        .ok_or_else(|| BtcError::TransactionBuildError("payment overflow".into()))?;
    let mut selected: Vec<UnspentOutput> = Vec::new();
    let mut total: u64 = 0;

    for utxo in utxos {
        selected.push(utxo.clone());
        total = add_value(total, utxo)?;
        if total < need {
            continue;
        }

        let leftover = total - need;
        let (fee, change, path) = if leftover == 0 {
            (flat_fee, 0, None)
        } else if leftover < DUST_THRESHOLD_SAT {
            tracing::debug!(leftover, "dust change folded into flat fee");
            (flat_fee + leftover, 0, None)
        } else {
            (flat_fee, leftover, Some(change_path))
        };

        let plan = TransactionPlan::new(target.clone(), selected, fee, change, path, locktime)?
            .with_replaceability(ReplaceabilityPolicy::MustBeReplaceable);
        tracing::info!(
            inputs = plan.utxos().len(),
            amount = plan.amount_sat(),
            fee = plan.fee_sat(),
            change = plan.change_sat(),
            "flat-fee plan created"
        );
        return Ok(plan);
    }

    Err(insufficient(total, amount, flat_fee))
}

/// Spend every input to `destination`, less the fee. Never produces change.
pub fn create_send_max_plan(
    coin: CoinProfile,
    destination: &str,
    utxos: &[UnspentOutput],
    fee_rate: u64,
    block_height: u32,
) -> Result<TransactionPlan, BtcError> {
    let locktime = next_block_locktime(block_height)?;
    let total = total_value(utxos)
        .ok_or_else(|| BtcError::TransactionBuildError("input value overflow".into()))?;
    let fee = fee_at_rate(fee_rate, total_bytes(&coin, utxos.len(), destination, false)?)?;
    let amount = total
        .checked_sub(fee)
        .ok_or_else(|| insufficient(total, 0, fee))?;

    let target = PaymentTarget::new(coin, destination, amount);
    let plan = TransactionPlan::new(target, utxos.to_vec(), fee, 0, None, locktime)?
        .with_replaceability(ReplaceabilityPolicy::MustNotBeReplaceable);
    tracing::info!(
        inputs = plan.utxos().len(),
        amount = plan.amount_sat(),
        fee = plan.fee_sat(),
        "send-max plan created"
    );
    Ok(plan)
}
