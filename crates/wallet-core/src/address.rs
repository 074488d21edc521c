use bitcoin::ScriptBuf;
use chain_btc::address::{p2sh_p2wpkh_address, p2wpkh_address, p2wpkh_witness_program};
use chain_btc::{AddressKind, DerivationPath};

use crate::error::WalletError;
use crate::hd_derivation::{DerivedKey, MasterKey};
use crate::types::MetaAddress;

/// Address construction for one derivation path of a wallet.
///
/// The path's purpose alone picks the address type: 49 gives a P2SH-wrapped
/// P2WPKH address, 84 a native segwit bech32 address. Any other purpose is
/// rejected.
pub struct UsableAddress<'a> {
    master: &'a MasterKey,
    path: DerivationPath,
}

impl<'a> UsableAddress<'a> {
    pub fn new(master: &'a MasterKey, path: DerivationPath) -> Self {
        Self { master, path }
    }

    pub fn path(&self) -> &DerivationPath {
        &self.path
    }

    /// The child key at this path.
    pub fn build_index_private_key(&self) -> Result<DerivedKey, WalletError> {
        self.master.derive(&self.path)
    }

    pub fn build_compressed_public_key(&self) -> Result<[u8; 33], WalletError> {
        Ok(self.build_index_private_key()?.public_key_compressed)
    }

    /// `OP_0 <hash160(pubkey)>` for this path's key.
    pub fn build_p2wpkh_script(&self) -> Result<ScriptBuf, WalletError> {
        let pubkey = self.build_compressed_public_key()?;
        Ok(p2wpkh_witness_program(&pubkey)?)
    }

    pub fn build_payment_address(&self) -> Result<String, WalletError> {
        let pubkey = self.build_compressed_public_key()?;
        self.encode(&pubkey)
    }

    /// Receive address, carrying the uncompressed public key.
    pub fn build_receive_address(&self) -> Result<MetaAddress, WalletError> {
        let key = self.build_index_private_key()?;
        Ok(MetaAddress {
            address: self.encode(&key.public_key_compressed)?,
            path: self.path,
            uncompressed_public_key: Some(hex::encode(key.public_key_uncompressed)),
        })
    }

    pub fn build_change_address(&self) -> Result<MetaAddress, WalletError> {
        Ok(MetaAddress {
            address: self.build_payment_address()?,
            path: self.path,
            uncompressed_public_key: None,
        })
    }

    fn encode(&self, pubkey: &[u8; 33]) -> Result<String, WalletError> {
        let network = self.path.network();
        match self.path.address_kind() {
            AddressKind::P2shSegwit => Ok(p2sh_p2wpkh_address(pubkey, network)?),
            AddressKind::NativeSegwit => Ok(p2wpkh_address(pubkey, network)?),
            AddressKind::Legacy => Err(WalletError::InvalidAddress(format!(
                "no spendable address type for purpose {}",
                self.path.purpose()
            ))),
        }
    }
}
