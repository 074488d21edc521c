//! DER ECDSA over arbitrary 32-byte digests, for signing data outside
//! transactions.

use bitcoin::secp256k1::ecdsa::Signature;
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, SecretKey};

use crate::error::BtcError;

/// Deterministic (RFC 6979) DER signature of `digest`.
pub fn sign_digest_der(secret: &[u8; 32], digest: [u8; 32]) -> Result<Vec<u8>, BtcError> {
    let secp = Secp256k1::signing_only();
    let secret_key = SecretKey::from_slice(secret)
        .map_err(|e| BtcError::InvalidPrivateKey(format!("invalid secret key: {e}")))?;
    let signature = secp.sign_ecdsa(&Message::from_digest(digest), &secret_key);
    Ok(signature.serialize_der().to_vec())
}

/// Check a DER signature of `digest` against a compressed or uncompressed key.
/// Malformed keys or signatures verify as false.
pub fn verify_digest_der(public_key: &[u8], digest: [u8; 32], der: &[u8]) -> bool {
    let Ok(public_key) = PublicKey::from_slice(public_key) else {
        return false;
    };
    let Ok(signature) = Signature::from_der(der) else {
        return false;
    };
    Secp256k1::verification_only()
        .verify_ecdsa(&Message::from_digest(digest), &signature, &public_key)
        .is_ok()
}
