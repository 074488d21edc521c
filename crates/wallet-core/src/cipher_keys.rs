use crypto_utils::CipherKeyMaterial;

use crate::error::WalletError;
use crate::hd_derivation::MasterKey;

/// Keys for decrypting a payload the holder of `public_key` encrypted to
/// this wallet. The master secret is the ECDH scalar.
pub fn decryption_cipher_keys(
    master: &MasterKey,
    public_key: &[u8],
) -> Result<CipherKeyMaterial, WalletError> {
    let secret = master.secret_bytes();
    Ok(crypto_utils::decryption_cipher_keys(&secret, public_key)?)
}

/// Keys for encrypting a payload to `public_key`, using caller entropy for
/// the ephemeral key. The ephemeral public key travels with the payload.
pub fn encryption_cipher_keys_for_public_key(
    public_key: &[u8],
    entropy: &[u8],
) -> Result<CipherKeyMaterial, WalletError> {
    Ok(crypto_utils::encryption_cipher_keys(public_key, entropy)?)
}

/// The public half matching [`decryption_cipher_keys`], uncompressed.
pub fn cipher_public_key(master: &MasterKey) -> Result<Vec<u8>, WalletError> {
    let secret = master.secret_bytes();
    let signing_key = k256::ecdsa::SigningKey::from_bytes(&(*secret).into())
        .map_err(|e| WalletError::InvalidPrivateKey(e.to_string()))?;
    Ok(signing_key
        .verifying_key()
        .to_encoded_point(false)
        .as_bytes()
        .to_vec())
}
