use bitcoin::hashes::Hash;
use bitcoin::script::ScriptBuf;
use bitcoin::{CompressedPublicKey, PubkeyHash, ScriptHash, WitnessProgram, WitnessVersion};
use serde::{Deserialize, Serialize};

use crate::base58;
use crate::error::BtcError;
use crate::hash::hash160;
use crate::network::BtcNetwork;
use crate::segwit;

/// Output type a destination address pays to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentOutputType {
    P2pkh,
    P2sh,
    P2wpkh,
    P2wsh,
}

/// Classify a destination address.
///
/// Segwit forms are tried first, then the base58check version byte decides
/// between P2PKH and P2SH.
pub fn payment_output_type(address: &str) -> Result<PaymentOutputType, BtcError> {
    if segwit::is_valid_p2wpkh(address) {
        return Ok(PaymentOutputType::P2wpkh);
    }
    if segwit::is_valid_p2wsh(address) {
        return Ok(PaymentOutputType::P2wsh);
    }
    let (version, _) = base58::decode_payment_address(address)?;
    if BtcNetwork::is_p2pkh_version(version) {
        Ok(PaymentOutputType::P2pkh)
    } else if BtcNetwork::is_p2sh_version(version) {
        Ok(PaymentOutputType::P2sh)
    } else {
        Err(BtcError::InvalidAddress(format!(
            "{address}: unknown version byte {version:#04x}"
        )))
    }
}

fn parse_compressed(pubkey: &[u8; 33]) -> Result<CompressedPublicKey, BtcError> {
    CompressedPublicKey::from_slice(pubkey).map_err(|e| {
        BtcError::InvalidPublicKey(format!("failed to parse compressed public key: {e}"))
    })
}

/// The P2WPKH witness program `OP_0 <hash160(pubkey)>`.
///
/// This is the redeem script of a P2SH-wrapped address and the scriptSig
/// payload when spending one.
pub fn p2wpkh_witness_program(pubkey: &[u8; 33]) -> Result<ScriptBuf, BtcError> {
    let pk = parse_compressed(pubkey)?;
    Ok(ScriptBuf::new_p2wpkh(&pk.wpubkey_hash()))
}

/// P2SH address wrapping the P2WPKH program of a compressed public key.
pub fn p2sh_p2wpkh_address(pubkey: &[u8; 33], network: BtcNetwork) -> Result<String, BtcError> {
    let redeem = p2wpkh_witness_program(pubkey)?;
    Ok(base58::encode_payment_address(
        network.p2sh_version(),
        &hash160(redeem.as_bytes()),
    ))
}

/// Native segwit (bech32, version 0) address of a compressed public key.
pub fn p2wpkh_address(pubkey: &[u8; 33], network: BtcNetwork) -> Result<String, BtcError> {
    let pk = parse_compressed(pubkey)?;
    segwit::encode(
        network.bech32_hrp(),
        0,
        pk.wpubkey_hash().as_byte_array(),
    )
}

/// Locking script paying to `address`.
pub fn script_pubkey_for_address(address: &str) -> Result<ScriptBuf, BtcError> {
    if let Ok((_, version, program)) = segwit::decode_any(address) {
        let version = WitnessVersion::try_from(version)
            .map_err(|e| BtcError::InvalidAddress(format!("{address}: {e}")))?;
        let program = WitnessProgram::new(version, &program)
            .map_err(|e| BtcError::InvalidAddress(format!("{address}: {e}")))?;
        return Ok(ScriptBuf::new_witness_program(&program));
    }

    match payment_output_type(address)? {
        PaymentOutputType::P2pkh => {
            let (_, hash) = base58::decode_payment_address(address)?;
            Ok(ScriptBuf::new_p2pkh(&PubkeyHash::from_byte_array(hash)))
        }
        PaymentOutputType::P2sh => {
            let (_, hash) = base58::decode_payment_address(address)?;
            Ok(ScriptBuf::new_p2sh(&ScriptHash::from_byte_array(hash)))
        }
        PaymentOutputType::P2wpkh | PaymentOutputType::P2wsh => Err(
            BtcError::InternalConsistency(format!("{address}: segwit address failed to decode")),
        ),
    }
}
