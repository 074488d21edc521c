//! BIP-173 bech32 string encoding.
//!
//! Works on 5-bit values; [`crate::segwit`] layers witness-program rules on
//! top of this.

use crate::error::BtcError;

const CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const GENERATOR: [u32; 5] = [0x3b6a_57b2, 0x2650_8e6d, 0x1ea1_19fa, 0x3d42_33dd, 0x2a14_62b3];
const CHECKSUM_CONST: u32 = 1;
const CHECKSUM_LEN: usize = 6;
const MAX_LEN: usize = 90;
const SEPARATOR: char = '1';

fn polymod(values: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &v in values {
        let top = chk >> 25;
        chk = ((chk & 0x01ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let bytes = hrp.as_bytes();
    let mut out = Vec::with_capacity(bytes.len() * 2 + 1);
    out.extend(bytes.iter().map(|b| b >> 5));
    out.push(0);
    out.extend(bytes.iter().map(|b| b & 0x1f));
    out
}

fn create_checksum(hrp: &str, values: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut enc = hrp_expand(hrp);
    enc.extend_from_slice(values);
    enc.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let m = polymod(&enc) ^ CHECKSUM_CONST;
    let mut out = [0u8; CHECKSUM_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = ((m >> (5 * (5 - i))) & 0x1f) as u8;
    }
    out
}

fn verify_checksum(hrp: &str, values: &[u8]) -> bool {
    let mut enc = hrp_expand(hrp);
    enc.extend_from_slice(values);
    polymod(&enc) == CHECKSUM_CONST
}

/// Encode 5-bit `values` under `hrp`. The hrp is case-folded to lowercase.
pub fn encode(hrp: &str, values: &[u8]) -> Result<String, BtcError> {
    if hrp.is_empty() {
        return Err(BtcError::InvalidWitnessEncoding("empty hrp".into()));
    }
    if hrp.bytes().any(|b| !(33..=126).contains(&b)) {
        return Err(BtcError::InvalidWitnessEncoding(
            "hrp contains invalid character".into(),
        ));
    }
    if let Some(v) = values.iter().find(|v| **v > 31) {
        return Err(BtcError::InvalidWitnessEncoding(format!(
            "value {v} is not a 5-bit group"
        )));
    }
    let hrp = hrp.to_ascii_lowercase();
    let checksum = create_checksum(&hrp, values);

    let mut out = String::with_capacity(hrp.len() + 1 + values.len() + CHECKSUM_LEN);
    out.push_str(&hrp);
    out.push(SEPARATOR);
    for &v in values.iter().chain(checksum.iter()) {
        out.push(CHARSET[usize::from(v)] as char);
    }
    if out.len() > MAX_LEN {
        return Err(BtcError::InvalidWitnessEncoding(format!(
            "encoded length {} exceeds {MAX_LEN}",
            out.len()
        )));
    }
    Ok(out)
}

/// Decode a bech32 string into its lowercase hrp and 5-bit data values
/// (checksum stripped).
pub fn decode(s: &str) -> Result<(String, Vec<u8>), BtcError> {
    if s.len() > MAX_LEN {
        return Err(BtcError::InvalidWitnessEncoding(format!(
            "length {} exceeds {MAX_LEN}",
            s.len()
        )));
    }
    let mut has_lower = false;
    let mut has_upper = false;
    for b in s.bytes() {
        if !(33..=126).contains(&b) {
            return Err(BtcError::InvalidWitnessEncoding(
                "character out of range".into(),
            ));
        }
        has_lower |= b.is_ascii_lowercase();
        has_upper |= b.is_ascii_uppercase();
    }
    if has_lower && has_upper {
        return Err(BtcError::InvalidWitnessEncoding("mixed case".into()));
    }

    let lower = s.to_ascii_lowercase();
    let pos = lower
        .rfind(SEPARATOR)
        .ok_or_else(|| BtcError::InvalidWitnessEncoding("missing separator".into()))?;
    if pos < 1 || pos + CHECKSUM_LEN + 1 > lower.len() {
        return Err(BtcError::InvalidWitnessEncoding(
            "separator misplaced".into(),
        ));
    }

    let hrp = &lower[..pos];
    let mut values = Vec::with_capacity(lower.len() - pos - 1);
    for c in lower[pos + 1..].bytes() {
        let v = CHARSET
            .iter()
            .position(|&x| x == c)
            .ok_or_else(|| {
                BtcError::InvalidWitnessEncoding(format!("invalid character '{}'", c as char))
            })?;
        values.push(v as u8);
    }

    if !verify_checksum(hrp, &values) {
        return Err(BtcError::InvalidWitnessEncoding("bad checksum".into()));
    }
    values.truncate(values.len() - CHECKSUM_LEN);
    Ok((hrp.to_string(), values))
}

/// Regroup bits from `from`-bit values into `to`-bit values.
///
/// With `pad`, a trailing partial group is zero-padded; without it, a
/// non-zero remainder or a full-width leftover is rejected.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, BtcError> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let maxv: u32 = (1 << to) - 1;
    let max_acc: u32 = (1 << (from + to - 1)) - 1;
    let mut out = Vec::with_capacity(data.len() * from as usize / to as usize + 1);
    for &value in data {
        let v = u32::from(value);
        if v >> from != 0 {
            return Err(BtcError::InvalidWitnessEncoding(format!(
                "value {v} wider than {from} bits"
            )));
        }
        acc = ((acc << from) | v) & max_acc;
        bits += from;
        while bits >= to {
            bits -= to;
            out.push(((acc >> bits) & maxv) as u8);
        }
    }
    if pad {
        if bits > 0 {
            out.push(((acc << (to - bits)) & maxv) as u8);
        }
    } else if bits >= from || ((acc << (to - bits)) & maxv) != 0 {
        return Err(BtcError::InvalidWitnessEncoding("invalid padding".into()));
    }
    Ok(out)
}
