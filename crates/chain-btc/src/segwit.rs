//! Segwit witness-program addresses on top of [`crate::bech32`].

use crate::bech32;
use crate::error::BtcError;
use crate::network::BtcNetwork;

const MAX_WITNESS_VERSION: u8 = 16;
const P2WPKH_PROGRAM_LEN: usize = 20;
const P2WSH_PROGRAM_LEN: usize = 32;

fn check_program(version: u8, program: &[u8]) -> Result<(), BtcError> {
    if version > MAX_WITNESS_VERSION {
        return Err(BtcError::InvalidWitnessEncoding(format!(
            "witness version {version} above {MAX_WITNESS_VERSION}"
        )));
    }
    if !(2..=40).contains(&program.len()) {
        return Err(BtcError::InvalidWitnessEncoding(format!(
            "witness program length {} outside 2..=40",
            program.len()
        )));
    }
    if version == 0 && program.len() != P2WPKH_PROGRAM_LEN && program.len() != P2WSH_PROGRAM_LEN {
        return Err(BtcError::InvalidWitnessEncoding(format!(
            "version 0 program must be 20 or 32 bytes, got {}",
            program.len()
        )));
    }
    Ok(())
}

/// Decode a segwit address, requiring its hrp to equal `hrp` (case-insensitive).
pub fn decode(hrp: &str, address: &str) -> Result<(u8, Vec<u8>), BtcError> {
    let (found_hrp, data) = bech32::decode(address)?;
    if !found_hrp.eq_ignore_ascii_case(hrp) {
        return Err(BtcError::InvalidWitnessEncoding(format!(
            "hrp mismatch: expected {hrp}, found {found_hrp}"
        )));
    }
    let (&version, rest) = data
        .split_first()
        .ok_or_else(|| BtcError::InvalidWitnessEncoding("empty data part".into()))?;
    let program = bech32::convert_bits(rest, 5, 8, false)?;
    check_program(version, &program)?;
    Ok((version, program))
}

/// Encode a witness program as a segwit address.
///
/// The result is decoded again before being returned so an encoding that
/// would not round-trip is never handed out.
pub fn encode(hrp: &str, version: u8, program: &[u8]) -> Result<String, BtcError> {
    check_program(version, program)?;
    let mut data = Vec::with_capacity(1 + (program.len() * 8).div_ceil(5));
    data.push(version);
    data.extend(bech32::convert_bits(program, 8, 5, true)?);
    let address = bech32::encode(hrp, &data)?;
    decode(hrp, &address)?;
    Ok(address)
}

/// Decode against every known network's hrp.
pub fn decode_any(address: &str) -> Result<(BtcNetwork, u8, Vec<u8>), BtcError> {
    let mut last_err = None;
    for network in BtcNetwork::ALL {
        match decode(network.bech32_hrp(), address) {
            Ok((version, program)) => return Ok((network, version, program)),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err
        .unwrap_or_else(|| BtcError::InvalidWitnessEncoding("no known hrp".into())))
}

/// True for a decodable segwit address with a 20-byte program.
pub fn is_valid_p2wpkh(address: &str) -> bool {
    matches!(decode_any(address), Ok((_, _, p)) if p.len() == P2WPKH_PROGRAM_LEN)
}

/// True for a decodable segwit address with a 32-byte program.
pub fn is_valid_p2wsh(address: &str) -> bool {
    matches!(decode_any(address), Ok((_, _, p)) if p.len() == P2WSH_PROGRAM_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// (address, expected scriptPubKey hex)
    const VALID_ADDRESSES: &[(&str, &str)] = &[
        (
            "BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4",
            "0014751e76e8199196d454941c45d1b3a323f1433bd6",
        ),
        (
            "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sl5k7",
            "00201863143c14c5166804bd19203356da136c985678cd4d27a1b8c6329604903262",
        ),
        ("BC1SW50QA3JX3S", "6002751e"),
        (
            "bc1zw508d6qejxtdg4y5r3zarvaryvg6kdaj",
            "5210751e76e8199196d454941c45d1b3a323",
        ),
        (
            "tb1qqqqqp399et2xygdj5xreqhjjvcmzhxw4aywxecjdzew6hylgvsesrxh6hy",
            "0020000000c4a5cad46221b2a187905e5266362b99d5e91c6ce24d165dab93e86433",
        ),
    ];

    const INVALID_ADDRESSES: &[&str] = &[
        "tc1qw508d6qejxtdg4y5r3zarvary0c5xw7kg3g4ty",
        "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5",
        "BC13W508D6QEJXTDG4Y5R3ZARVARY0C5XW7KN40WF2",
        "bc1rw5uspcuh",
        "bc10w508d6qejxtdg4y5r3zarvary0c5xw7kw508d6qejxtdg4y5r3zarvary0c5xw7kw5rljs90",
        "BC1QR508D6QEJXTDG4Y5R3ZARVARYV98GJ9P",
        "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3q0sL5k7",
        "bc1zw508d6qejxtdg4y5r3zarvaryvqyzf3du",
        "tb1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3pjxtptv",
        "bc1gmk9yu",
    ];

    fn script_pubkey(version: u8, program: &[u8]) -> Vec<u8> {
        let mut out = vec![if version == 0 { 0 } else { version + 0x50 }, program.len() as u8];
        out.extend_from_slice(program);
        out
    }

    #[test]
    fn valid_addresses_decode_to_expected_scripts() {
        for (address, script_hex) in VALID_ADDRESSES {
            let (network, version, program) = decode_any(address).unwrap();
            assert_eq!(hex::encode(script_pubkey(version, &program)), *script_hex);

            let reencoded = encode(network.bech32_hrp(), version, &program).unwrap();
            assert_eq!(reencoded, address.to_ascii_lowercase());
        }
    }

    #[test]
    fn invalid_addresses_rejected() {
        for address in INVALID_ADDRESSES {
            assert!(decode("bc", address).is_err(), "{address} decoded as bc");
            assert!(decode("tb", address).is_err(), "{address} decoded as tb");
        }
    }

    #[test]
    fn encode_rejects_invalid_programs() {
        assert!(encode("bc", 0, &[0u8; 21]).is_err());
        assert!(encode("bc", 17, &[0u8; 32]).is_err());
        assert!(encode("bc", 1, &[0u8; 1]).is_err());
        assert!(encode("bc", 16, &[0u8; 41]).is_err());
    }

    #[test]
    fn encode_accepts_boundary_programs() {
        assert!(encode("bc", 0, &[0u8; 20]).is_ok());
        assert!(encode("bc", 0, &[0u8; 32]).is_ok());
        assert!(encode("bc", 1, &[0u8; 2]).is_ok());
        assert!(encode("bc", 16, &[0u8; 40]).is_ok());
    }

    #[test]
    fn hrp_mismatch_rejected() {
        let address = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
        assert!(decode("tb", address).is_err());
        assert!(decode("BC", address).is_ok());
    }

    #[test]
    fn uppercase_and_lowercase_decode_alike() {
        let lower = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
        let upper = lower.to_ascii_uppercase();
        assert_eq!(decode("bc", lower).unwrap(), decode("bc", &upper).unwrap());
    }

    #[test]
    fn program_type_detection() {
        assert!(is_valid_p2wpkh("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"));
        assert!(!is_valid_p2wsh("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"));
        assert!(is_valid_p2wsh(
            "bc1qrp33g0q5c5txsp9arysrx4k6zdkfs4nce4xj0gdcccefvpysxf3qccfmv3"
        ));
        assert!(is_valid_p2wpkh("tb1q6rz28mcfaxtmd6v789l9rrlrusdprr9pqcpvkl"));
        assert!(!is_valid_p2wpkh("3BgxxADLtnoKu9oytQiiVzYUqvo8weCVy9"));
        assert!(!is_valid_p2wsh("1LqBGSKuX5yYUonjxT5qGfpUsXKYYWeabA"));
    }
}
