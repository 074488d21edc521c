use bip32::{ChildNumber, Prefix, XPrv};
use chain_btc::DerivationPath;
use k256::ecdsa::SigningKey;
use zeroize::{Zeroize, Zeroizing};

use crate::error::WalletError;
use crate::mnemonic::mnemonic_to_seed;

/// BIP-32 master extended private key of a wallet.
#[derive(Clone)]
pub struct MasterKey {
    xprv: XPrv,
}

impl MasterKey {
    pub fn from_seed(seed: &[u8]) -> Result<Self, WalletError> {
        let xprv = XPrv::new(seed).map_err(|e| WalletError::InvalidSeed(e.to_string()))?;
        Ok(Self { xprv })
    }

    pub fn from_mnemonic(phrase: &str, passphrase: &str) -> Result<Self, WalletError> {
        let seed = mnemonic_to_seed(phrase, passphrase)?;
        Self::from_seed(&seed[..])
    }

    /// Walk `path`: hardened purpose, coin and account, then non-hardened
    /// change and index. Every level must be set.
    pub fn derive(&self, path: &DerivationPath) -> Result<DerivedKey, WalletError> {
        let levels = [
            (Some(path.purpose()), true, "purpose"),
            (path.coin(), true, "coin"),
            (path.account(), true, "account"),
            (path.change(), false, "change"),
            (path.index(), false, "index"),
        ];

        let mut xprv = self.xprv.clone();
        for (value, hardened, name) in levels {
            let value = value.ok_or_else(|| {
                WalletError::DerivationFailed(format!("{path}: {name} level is unset"))
            })?;
            xprv = xprv.derive_child(ChildNumber::new(value, hardened)?)?;
        }
        DerivedKey::from_xprv(&xprv, path.to_string())
    }

    /// Non-hardened child `m/index` of the master key.
    pub fn derive_child(&self, index: u32) -> Result<XPrv, WalletError> {
        Ok(self.xprv.derive_child(ChildNumber::new(index, false)?)?)
    }

    /// Raw 32-byte master secret.
    pub fn secret_bytes(&self) -> Zeroizing<[u8; 32]> {
        Zeroizing::new(self.xprv.to_bytes())
    }

    /// Base58 `xprv...` serialization.
    pub fn to_xprv_string(&self) -> Zeroizing<String> {
        self.xprv.to_string(Prefix::XPRV)
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey").finish_non_exhaustive()
    }
}

/// Derived secp256k1 key
pub struct DerivedKey {
    pub private_key: [u8; 32],
    pub public_key_compressed: [u8; 33],
    pub public_key_uncompressed: [u8; 65],
    pub derivation_path: String,
}

impl DerivedKey {
    pub(crate) fn from_xprv(xprv: &XPrv, derivation_path: String) -> Result<Self, WalletError> {
        let private_key: [u8; 32] = xprv.to_bytes();
        let signing_key = SigningKey::from_bytes(&private_key.into())
            .map_err(|e| WalletError::DerivationFailed(e.to_string()))?;

        let verifying_key = signing_key.verifying_key();
        let public_key_compressed: [u8; 33] = verifying_key
            .to_sec1_bytes()
            .as_ref()
            .try_into()
            .map_err(|_| WalletError::DerivationFailed("Invalid public key length".into()))?;

        let public_key_uncompressed: [u8; 65] = verifying_key
            .to_encoded_point(false)
            .as_bytes()
            .try_into()
            .map_err(|_| WalletError::DerivationFailed("Invalid uncompressed public key".into()))?;

        Ok(Self {
            private_key,
            public_key_compressed,
            public_key_uncompressed,
            derivation_path,
        })
    }
}

impl Drop for DerivedKey {
    fn drop(&mut self) {
        self.private_key.zeroize();
    }
}
