//! Fixed policy constants for fee estimation, change handling and input
//! sequencing.

/// Fixed transaction overhead: version, locktime, segwit marker/flag and counts.
pub const BASE_TX_BYTES: u64 = 11;

/// Estimated size of a P2SH-wrapped P2WPKH input.
pub const P2SH_SEGWIT_INPUT_BYTES: u64 = 91;

/// Estimated size of a native P2WPKH input.
pub const NATIVE_SEGWIT_INPUT_BYTES: u64 = 68;

/// Size of a legacy pay-to-pubkey-hash output.
pub const P2PKH_OUTPUT_BYTES: u64 = 34;

/// Size of a pay-to-script-hash output.
pub const P2SH_OUTPUT_BYTES: u64 = 32;

/// Size of a native segwit (P2WPKH / P2WSH) output.
pub const SEGWIT_OUTPUT_BYTES: u64 = 31;

/// Size assumed for an output whose type could not be determined.
pub const DEFAULT_OUTPUT_BYTES: u64 = 32;

/// Change below this value is folded into the fee instead of creating an output.
pub const DUST_THRESHOLD_SAT: u64 = 1_000;

/// Final sequence number: input opts out of replace-by-fee.
pub const MAX_INPUT_SEQUENCE: u32 = 0xFFFF_FFFF;

/// Sequence number signalling replace-by-fee (BIP-125).
pub const REPLACEABLE_SEQUENCE: u32 = MAX_INPUT_SEQUENCE - 2;

/// Version written into every transaction this crate assembles.
pub const TRANSACTION_VERSION: i32 = 1;

/// BIP-32 hardened index offset.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;
