//! # crypto-utils
//!
//! ECDH-based symmetric key agreement for encrypting payloads between
//! wallet holders.

pub mod cipher_keys;
pub mod error;

pub use cipher_keys::{decryption_cipher_keys, encryption_cipher_keys, CipherKeyMaterial};
pub use error::CryptoError;
