//! ECDH key agreement for payload encryption.
//!
//! The shared secret is the full uncompressed product point (65 bytes). Its
//! SHA-512 digest splits into a 32-byte encryption key and a 32-byte HMAC key.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{FieldBytes, PublicKey, SecretKey};
use sha2::{Digest, Sha512};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::CryptoError;

/// Entropy bytes that make up an ephemeral secret. Anything beyond is ignored.
pub const MAX_ENTROPY_LEN: usize = 32;

/// Symmetric keys derived from an ECDH exchange.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CipherKeyMaterial {
    pub encryption_key: [u8; 32],
    pub hmac_key: [u8; 32],
    /// Ephemeral public key (uncompressed) the recipient needs to rebuild the
    /// secret. Only set on the encrypting side.
    pub associated_public_key: Option<Vec<u8>>,
}

impl std::fmt::Debug for CipherKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKeyMaterial")
            .field("encryption_key", &"[REDACTED]")
            .field("hmac_key", &"[REDACTED]")
            .field(
                "associated_public_key",
                &self.associated_public_key.as_ref().map(hex::encode),
            )
            .finish()
    }
}

fn parse_public_key(bytes: &[u8]) -> Result<PublicKey, CryptoError> {
    PublicKey::from_sec1_bytes(bytes)
        .map_err(|e| CryptoError::InvalidPublicKey(format!("failed to parse SEC1 key: {e}")))
}

fn parse_secret_key(bytes: &[u8; 32]) -> Result<SecretKey, CryptoError> {
    SecretKey::from_bytes(FieldBytes::from_slice(bytes))
        .map_err(|e| CryptoError::InvalidSecretKey(format!("scalar out of range: {e}")))
}

fn derive(secret: &SecretKey, counterparty: &PublicKey) -> ([u8; 32], [u8; 32]) {
    let shared = (counterparty.to_projective() * *secret.to_nonzero_scalar()).to_affine();
    let point = shared.to_encoded_point(false);
    let mut digest = Sha512::digest(point.as_bytes());

    let mut encryption_key = [0u8; 32];
    let mut hmac_key = [0u8; 32];
    encryption_key.copy_from_slice(&digest[..32]);
    hmac_key.copy_from_slice(&digest[32..]);
    digest.as_mut_slice().zeroize();
    (encryption_key, hmac_key)
}

/// Keys for decrypting a payload sent to `secret`'s owner by the holder of
/// `counterparty_public_key` (compressed or uncompressed SEC1).
pub fn decryption_cipher_keys(
    secret: &[u8; 32],
    counterparty_public_key: &[u8],
) -> Result<CipherKeyMaterial, CryptoError> {
    let secret = parse_secret_key(secret)?;
    let counterparty = parse_public_key(counterparty_public_key)?;
    let (encryption_key, hmac_key) = derive(&secret, &counterparty);
    Ok(CipherKeyMaterial {
        encryption_key,
        hmac_key,
        associated_public_key: None,
    })
}

/// Keys for encrypting a payload to `recipient_public_key`.
///
/// The first 32 bytes of `entropy` (caller supplied) form the ephemeral
/// secret, zero-padded on the right when shorter. The ephemeral public key is
/// returned alongside the keys.
pub fn encryption_cipher_keys(
    recipient_public_key: &[u8],
    entropy: &[u8],
) -> Result<CipherKeyMaterial, CryptoError> {
    if entropy.is_empty() {
        return Err(CryptoError::InvalidEntropy("no entropy supplied".into()));
    }
    let recipient = parse_public_key(recipient_public_key)?;

    let used = entropy.len().min(MAX_ENTROPY_LEN);
    let mut scalar = Zeroizing::new([0u8; 32]);
    scalar[..used].copy_from_slice(&entropy[..used]);
    let ephemeral = parse_secret_key(&scalar)
        .map_err(|_| CryptoError::InvalidEntropy("entropy is not a valid scalar".into()))?;

    let (encryption_key, hmac_key) = derive(&ephemeral, &recipient);
    let ephemeral_public = ephemeral.public_key().to_encoded_point(false);
    tracing::debug!("derived encryption keys with fresh ephemeral key");
    Ok(CipherKeyMaterial {
        encryption_key,
        hmac_key,
        associated_public_key: Some(ephemeral_public.as_bytes().to_vec()),
    })
}
