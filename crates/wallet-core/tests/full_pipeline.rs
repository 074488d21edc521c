//! Cross-crate integration tests exercising the full pipeline:
//! mnemonic -> master key -> plan -> signed transaction.
//!
//! These drive the public APIs of wallet_core and chain_btc together to
//! catch regressions at crate boundaries.

use bitcoin::consensus::encode::deserialize;
use bitcoin::Transaction;
use chain_btc::config::{MAX_INPUT_SEQUENCE, REPLACEABLE_SEQUENCE};
use chain_btc::plan::{create_flat_fee_plan, create_send_max_plan, create_transaction_plan};
use chain_btc::{
    BtcError, BtcNetwork, CoinProfile, DerivationPath, PaymentTarget, Purpose,
    ReplaceabilityPolicy, TransactionPlan, UnspentOutput,
};
use wallet_core::cipher_keys::{
    cipher_public_key, decryption_cipher_keys, encryption_cipher_keys_for_public_key,
};
use wallet_core::mnemonic::{mnemonic_from_entropy, validate_mnemonic};
use wallet_core::signing::{signature_signing_data, verification_key_hex, verify_signed_data};
use wallet_core::*;

const TEST_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

const PREV_TXID: &str = "1a08dafe993fdc17fdc661988c88f97a9974013291e759b9b5766b8e97c78f87";

fn master() -> MasterKey {
    MasterKey::from_mnemonic(TEST_MNEMONIC, "").unwrap()
}

fn bip49() -> CoinProfile {
    CoinProfile::new(Purpose::Bip49, BtcNetwork::Mainnet, 0)
}

fn decode_tx(raw_tx_hex: &str) -> Transaction {
    deserialize(&hex::decode(raw_tx_hex).unwrap()).unwrap()
}

// ─── BTC: pinned P2SH-segwit transaction ───────────────────────────

#[test]
fn btc_p2sh_segwit_transaction_is_reproducible() {
    let master = master();
    let coin = bip49();
    let utxo = UnspentOutput::new(
        PREV_TXID,
        1,
        2_788_424,
        DerivationPath::new(49, 0, 0, 1, 53),
        true,
    );
    let target = PaymentTarget::new(coin, "3BgxxADLtnoKu9oytQiiVzYUqvo8weCVy9", 13_584);
    let plan = TransactionPlan::new(
        target,
        vec![utxo],
        3_000,
        2_771_840,
        Some(DerivationPath::new(49, 0, 0, 1, 56)),
        539_943,
    )
    .unwrap();

    let result = TransactionBuilder::new(&master, coin)
        .generate_tx_metadata(&plan)
        .unwrap();

    assert_eq!(
        result.raw_tx_hex,
        "01000000000101878fc7978e6b76b5b959e791320174997af9888c9861c6fd17dc3f99feda081a0100000017160014509060a6bedf13087124c0aeafc6e3db4e1e9a08ffffffff02103500000000000017a9146daec6ddb6faaf01f83f515045822a94d0c2331e87804b2a000000000017a914e0bc3e6f5f4080b4f007c6307ba579595e459a06870247304402205b2d50ca2b20fa290323687c3e60bfd4702f9082544afeeb62d849437d04092002204d6dbdef48a992e20700452eff01966d08dcc767b4e7a205c78617d8b5faa1f7012103d447f34dd13359a8fc64ed3977fcecea3f6802f842f9a9f857de07453b715735273d0800"
    );
    assert_eq!(
        result.txid,
        "9ea15d4a60c33a1be64da5805c399663831f7aee13724bfa702db2c3cfafd5bb"
    );

    let change = result.change.unwrap();
    assert_eq!(change.address, "3NBJnvo9U5YbJnr1pALFqQEur1wXWJrjoM");
    assert_eq!(change.vout_index, 1);
    assert_eq!(change.path.index(), Some(56));
}

// ─── BTC: selection -> signing ──────────────────────────────────────

#[test]
fn btc_rate_based_plan_signs_with_per_input_keys() {
    let master = master();
    let coin = bip49();
    let utxos = vec![
        UnspentOutput::new(PREV_TXID, 0, 40_000, DerivationPath::new(49, 0, 0, 0, 0), true),
        UnspentOutput::new(PREV_TXID, 2, 60_000, DerivationPath::new(49, 0, 0, 1, 4), false),
    ];
    let target = PaymentTarget::new(coin, "bc1qnjg0jd8228aq7egyzacy8cys3knf9xvrerkf9g", 70_000);
    let plan = create_transaction_plan(
        &target,
        &utxos,
        10,
        DerivationPath::new(49, 0, 0, 1, 5),
        600_000,
        ReplaceabilityPolicy::AllowedByConfirmation,
    )
    .unwrap();

    assert_eq!(plan.utxos().len(), 2);
    assert_eq!(
        plan.total_input_value(),
        plan.amount_sat() + plan.fee_sat() + plan.change_sat()
    );
    assert!(plan.should_add_change());

    let result = TransactionBuilder::new(&master, coin)
        .generate_tx_metadata(&plan)
        .unwrap();
    let tx = decode_tx(&result.raw_tx_hex);

    assert_eq!(tx.compute_txid().to_string(), result.txid);
    assert_eq!(tx.lock_time.to_consensus_u32(), 600_001);
    assert_eq!(tx.input[0].sequence.0, MAX_INPUT_SEQUENCE);
    assert_eq!(tx.input[1].sequence.0, REPLACEABLE_SEQUENCE);
    for input in &tx.input {
        // P2SH-wrapped: scriptSig pushes the 22-byte witness program.
        assert_eq!(input.script_sig.len(), 23);
        assert_eq!(input.witness.len(), 2);
    }

    let change = result.change.unwrap();
    assert_eq!(tx.output[change.vout_index as usize].value.to_sat(), plan.change_sat());
    assert_eq!(
        change.address,
        UsableAddress::new(&master, DerivationPath::new(49, 0, 0, 1, 5))
            .build_payment_address()
            .unwrap()
    );
}

#[test]
fn btc_flat_fee_plan_is_replaceable() {
    let coin = CoinProfile::new(Purpose::Bip84, BtcNetwork::Mainnet, 0);
    let utxos = vec![UnspentOutput::new(
        PREV_TXID,
        0,
        250_000,
        DerivationPath::new(84, 0, 0, 0, 2),
        true,
    )];
    let target = PaymentTarget::new(coin, "3LtMnn87fqUeHBUG414p9CWwnoV6E2pNKS", 100_000);
    let plan =
        create_flat_fee_plan(&target, &utxos, 5_000, DerivationPath::new(84, 0, 0, 1, 1), 700_000)
            .unwrap();
    assert!(plan.is_replaceable());

    let result = sign_btc_transaction(TEST_MNEMONIC, "", &plan).unwrap();
    let tx = decode_tx(&result.raw_tx_hex);
    assert!(tx.input.iter().all(|i| i.sequence.0 == REPLACEABLE_SEQUENCE));
    assert!(tx.input[0].script_sig.is_empty());

    let change = result.change.unwrap();
    assert_eq!(change.address, "bc1qggnasd834t54yulsep6fta8lpjekv4zj6gv5rf");
    assert_eq!(tx.output[change.vout_index as usize].value.to_sat(), 145_000);
}

#[test]
fn btc_send_max_spends_everything() {
    let coin = CoinProfile::new(Purpose::Bip84, BtcNetwork::Testnet, 0);
    let utxos = vec![
        UnspentOutput::new(PREV_TXID, 0, 30_000, DerivationPath::new(84, 1, 0, 0, 0), true),
        UnspentOutput::new(PREV_TXID, 1, 20_000, DerivationPath::new(84, 1, 0, 0, 1), true),
    ];
    let plan = create_send_max_plan(
        coin,
        "tb1qxdyjf6h5d6qxap4n2dap97q4j5ps6ua8sll0ct",
        &utxos,
        3,
        2_000_000,
    )
    .unwrap();
    assert_eq!(plan.amount_sat() + plan.fee_sat(), 50_000);

    let result = sign_btc_transaction(TEST_MNEMONIC, "", &plan).unwrap();
    assert!(result.change.is_none());
    let tx = decode_tx(&result.raw_tx_hex);
    assert_eq!(tx.output.len(), 1);
    assert_eq!(tx.output[0].value.to_sat(), plan.amount_sat());
}

#[test]
fn btc_insufficient_funds_produces_no_plan() {
    let coin = bip49();
    let utxos = vec![
        UnspentOutput::new(PREV_TXID, 0, 20_000_000, DerivationPath::new(49, 0, 0, 0, 0), true),
        UnspentOutput::new(PREV_TXID, 1, 10_000_000, DerivationPath::new(49, 0, 0, 0, 1), true),
    ];
    let target = PaymentTarget::new(coin, "3BgxxADLtnoKu9oytQiiVzYUqvo8weCVy9", 50_000_000);
    let err = create_transaction_plan(
        &target,
        &utxos,
        30,
        DerivationPath::new(49, 0, 0, 1, 0),
        600_000,
        ReplaceabilityPolicy::AllowedByConfirmation,
    )
    .unwrap_err();
    match err {
        BtcError::InsufficientFunds { available, required } => {
            assert_eq!(available, 30_000_000);
            assert!(required > 50_000_000);
        }
        other => panic!("expected insufficient funds, got {other:?}"),
    }
}

// ─── Wallet identity: mnemonic -> signing key ──────────────────────

#[test]
fn fresh_mnemonic_drives_addresses() {
    let phrase = mnemonic_from_entropy(&[0x42; 32]).unwrap();
    assert!(validate_mnemonic(&phrase));
    let meta = receive_address_from_mnemonic(&phrase, "", DerivationPath::new(84, 0, 0, 0, 0))
        .unwrap();
    assert!(meta.address.starts_with("bc1q"));
}

#[test]
fn data_signing_round_trip() {
    let master = master();
    assert_eq!(
        verification_key_hex(&master).unwrap(),
        "024458596b5c97e716e82015a72c37b5d3fe0c5dc70a4b83d72e7d2eb65920633e"
    );
    let signature = signature_signing_data(b"Hello World", &master).unwrap();
    let der = hex::decode(&signature).unwrap();
    assert!(verify_signed_data(b"Hello World", &der, &master).unwrap());
    assert!(!verify_signed_data(b"dlroW olleH", &der, &master).unwrap());
}

// ─── Cipher keys ───────────────────────────────────────────────────

#[test]
fn encryption_keys_differ_per_entropy() {
    let recipient = hex::decode(
        "04904240a0aaec6af6f9b6c331f71feea2a4ed1549c06e5a6409fe92c5824dc4c54e26c2b2e27cfc224a6b782b35a2872b666f568cf37456262fbb065601b4d73a",
    )
    .unwrap();
    let keys1 = encryption_cipher_keys_for_public_key(&recipient, &[0x11; 16]).unwrap();
    let keys2 = encryption_cipher_keys_for_public_key(&recipient, &[0x22; 16]).unwrap();
    assert_ne!(keys1.encryption_key, keys2.encryption_key);
    assert_ne!(keys1.hmac_key, keys2.hmac_key);
}

#[test]
fn wallet_to_wallet_cipher_keys_agree() {
    let alice = master();
    let bob = MasterKey::from_mnemonic(TEST_MNEMONIC, "bob").unwrap();

    let bob_public = cipher_public_key(&bob).unwrap();
    let sent = encryption_cipher_keys_for_public_key(&bob_public, &[0x5a; 32]).unwrap();
    let received =
        decryption_cipher_keys(&bob, sent.associated_public_key.as_deref().unwrap()).unwrap();
    assert_eq!(sent.encryption_key, received.encryption_key);

    let eavesdropper =
        decryption_cipher_keys(&alice, sent.associated_public_key.as_deref().unwrap()).unwrap();
    assert_ne!(sent.encryption_key, eavesdropper.encryption_key);
}
