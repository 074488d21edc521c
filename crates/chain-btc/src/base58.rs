//! Base58check payment addresses (P2PKH and P2SH).

use crate::error::BtcError;

const HASH_LEN: usize = 20;

/// True iff `address` is base58 with a valid double SHA-256 checksum over a
/// non-empty payload.
pub fn verify_base58check(address: &str) -> bool {
    bs58::decode(address)
        .with_check(None)
        .into_vec()
        .is_ok_and(|payload| !payload.is_empty())
}

/// Split a base58check address into its version byte and 20-byte hash.
pub fn decode_payment_address(address: &str) -> Result<(u8, [u8; HASH_LEN]), BtcError> {
    let payload = bs58::decode(address)
        .with_check(None)
        .into_vec()
        .map_err(|e| BtcError::InvalidAddress(format!("{address}: {e}")))?;
    let (&version, hash) = payload
        .split_first()
        .ok_or_else(|| BtcError::InvalidAddress(format!("{address}: empty payload")))?;
    let hash: [u8; HASH_LEN] = hash.try_into().map_err(|_| {
        BtcError::InvalidAddress(format!(
            "{address}: expected {HASH_LEN}-byte hash, got {}",
            hash.len()
        ))
    })?;
    Ok((version, hash))
}

/// Encode a version byte and 20-byte hash as a base58check address.
pub fn encode_payment_address(version: u8, hash: &[u8; HASH_LEN]) -> String {
    let mut payload = Vec::with_capacity(1 + HASH_LEN);
    payload.push(version);
    payload.extend_from_slice(hash);
    bs58::encode(payload).with_check().into_string()
}
