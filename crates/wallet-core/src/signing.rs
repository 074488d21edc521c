//! Signing of arbitrary data with the wallet's signing key.
//!
//! The signing key is the non-hardened child `m/42` of the master key. Data
//! is signed as a DER ECDSA signature over its double-SHA256.

use bip32::{Prefix, XPrv};
use chain_btc::ecdsa::{sign_digest_der, verify_digest_der};
use chain_btc::hash::sha256d;
use zeroize::Zeroizing;

use crate::error::WalletError;
use crate::hd_derivation::MasterKey;

/// Child index of the signing key under the master key.
pub const SIGNING_KEY_INDEX: u32 = 42;

pub fn signing_key(master: &MasterKey) -> Result<XPrv, WalletError> {
    master.derive_child(SIGNING_KEY_INDEX)
}

/// `xprv...` serialization of the signing key.
pub fn signing_key_encoded(master: &MasterKey) -> Result<Zeroizing<String>, WalletError> {
    Ok(signing_key(master)?.to_string(Prefix::XPRV))
}

/// Hex of the compressed signing public key, shared with the service that
/// verifies signed data.
pub fn verification_key_hex(master: &MasterKey) -> Result<String, WalletError> {
    Ok(hex::encode(signing_key(master)?.public_key().to_bytes()))
}

pub fn sign_data(data: &[u8], master: &MasterKey) -> Result<Vec<u8>, WalletError> {
    let secret = Zeroizing::new(signing_key(master)?.to_bytes());
    sign_digest_der(&secret, sha256d(data)).map_err(|e| WalletError::SigningFailed(e.to_string()))
}

/// Hex-encoded [`sign_data`].
pub fn signature_signing_data(data: &[u8], master: &MasterKey) -> Result<String, WalletError> {
    Ok(hex::encode(sign_data(data, master)?))
}

pub fn verify_signed_data(
    data: &[u8],
    signature: &[u8],
    master: &MasterKey,
) -> Result<bool, WalletError> {
    let public_key = signing_key(master)?.public_key().to_bytes();
    Ok(verify_digest_der(&public_key, sha256d(data), signature))
}
