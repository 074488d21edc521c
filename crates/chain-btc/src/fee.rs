//! Byte-size estimates used for fee calculation.
//!
//! Sizes are fixed per item rather than measured, since witness length varies
//! slightly with signature encoding.

use crate::address::{payment_output_type, PaymentOutputType};
use crate::base58;
use crate::coin::{AddressKind, CoinProfile};
use crate::config::{
    BASE_TX_BYTES, DEFAULT_OUTPUT_BYTES, NATIVE_SEGWIT_INPUT_BYTES, P2PKH_OUTPUT_BYTES,
    P2SH_OUTPUT_BYTES, P2SH_SEGWIT_INPUT_BYTES, SEGWIT_OUTPUT_BYTES,
};
use crate::error::BtcError;

/// Estimated size of one input spent by a wallet of this kind.
pub fn bytes_per_input(kind: AddressKind) -> u64 {
    match kind {
        AddressKind::NativeSegwit => NATIVE_SEGWIT_INPUT_BYTES,
        AddressKind::P2shSegwit | AddressKind::Legacy => P2SH_SEGWIT_INPUT_BYTES,
    }
}

/// Size of the wallet's own change output.
pub fn bytes_per_change_output(kind: AddressKind) -> u64 {
    match kind {
        AddressKind::NativeSegwit => SEGWIT_OUTPUT_BYTES,
        AddressKind::P2shSegwit | AddressKind::Legacy => P2SH_OUTPUT_BYTES,
    }
}

/// Size of an output paying to `address`.
///
/// A base58check address with an unrecognised version byte is sized as
/// [`DEFAULT_OUTPUT_BYTES`]; an address that does not decode at all is rejected.
pub fn bytes_per_output_address(address: &str) -> Result<u64, BtcError> {
    match payment_output_type(address) {
        Ok(PaymentOutputType::P2wpkh | PaymentOutputType::P2wsh) => Ok(SEGWIT_OUTPUT_BYTES),
        Ok(PaymentOutputType::P2pkh) => Ok(P2PKH_OUTPUT_BYTES),
        Ok(PaymentOutputType::P2sh) => Ok(P2SH_OUTPUT_BYTES),
        Err(e) => {
            base58::decode_payment_address(address).map_err(|_| e)?;
            Ok(DEFAULT_OUTPUT_BYTES)
        }
    }
}

/// Estimated size of a transaction spending `num_inputs` wallet inputs to
/// `destination`, optionally with a change output.
pub fn total_bytes(
    coin: &CoinProfile,
    num_inputs: usize,
    destination: &str,
    include_change: bool,
) -> Result<u64, BtcError> {
    let kind = coin.address_kind();
    let inputs = num_inputs as u64 * bytes_per_input(kind);
    let destination = bytes_per_output_address(destination)?;
    let change = if include_change {
        bytes_per_change_output(kind)
    } else {
        0
    };
    Ok(inputs + destination + change + BASE_TX_BYTES)
}
