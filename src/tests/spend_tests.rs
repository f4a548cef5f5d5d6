use crate::*;
use crate::interactive::create_address::create_lock_address;
use crate::keys::{parse_private_key, RecipientKey};
use bitcoin::hashes::Hash;
use bitcoin::script::Instruction;
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};
use bitcoin::{PrivateKey, ScriptBuf, Sequence, Txid};
use std::str::FromStr;

fn test_secret_key() -> SecretKey {
    SecretKey::from_slice(&[0x01; 32]).unwrap()
}

fn test_utxos() -> Vec<LockedUtxo> {
    let txid = Txid::from_str("fd2105607605d2302994ffea703b09f66b6351816ee737a93e42a841ea20bbad").unwrap();
    vec![
        LockedUtxo { txid, vout: 0, amount_sat: 100_000 },
        LockedUtxo { txid, vout: 1, amount_sat: 50_000 },
    ]
}

fn destination() -> ScriptBuf {
    let secp_ctx = Secp256k1::new();
    let pubkey = bitcoin::PublicKey::new(PublicKey::from_secret_key(&secp_ctx, &test_secret_key()));
    ScriptBuf::new_p2pkh(&pubkey.pubkey_hash())
}

#[test]
fn test_estimate_spend_tx_size() {
    assert_eq!(estimate_spend_tx_size(1), Some(180 + 34 + 10 + 1));
    assert_eq!(estimate_spend_tx_size(3), Some(3 * 180 + 34 + 10 + 3));
    assert_eq!(estimate_spend_tx_size(usize::MAX), None, "size overflows instead of wrapping");
}

#[test]
fn test_calculate_fee() {
    assert_eq!(calculate_fee(225, 10_000), Some(2_250));
    assert_eq!(calculate_fee(225, 0), Some(0));
    // truncates like the other fee helpers
    assert_eq!(calculate_fee(225, 1_001), Some(225));
    assert_eq!(calculate_spend_fee(2, 20_000), Some((2 * 180 + 34 + 10 + 2) * 20));
}

#[test]
fn test_calculate_fee_overflow() {
    assert_eq!(calculate_fee(225, u64::MAX / 100), None);
    assert_eq!(calculate_spend_fee(1, u64::MAX / 100), None);
    assert_eq!(calculate_spend_fee(1, u64::MAX), None);
}

#[test]
fn test_create_spending_transaction_fee_overflow() {
    let result = create_spending_transaction(&test_utxos(), UnlockTime::new(650), destination(), u64::MAX / 100);

    match result {
        Err(SpendError::FeeOverflow { fee_per_kb, num_inputs }) => {
            assert_eq!(fee_per_kb, u64::MAX / 100);
            assert_eq!(num_inputs, 2);
        }
        other => panic!("expected FeeOverflow, got {:?}", other),
    }
}

#[test]
fn test_total_amount() {
    assert_eq!(total_amount(&test_utxos()), Some(150_000));
    assert_eq!(total_amount(&[]), Some(0));

    let huge = vec![
        LockedUtxo { amount_sat: u64::MAX, ..test_utxos()[0].clone() },
        LockedUtxo { amount_sat: 1, ..test_utxos()[1].clone() },
    ];
    assert_eq!(total_amount(&huge), None);
}

#[test]
fn test_btc_per_kb_to_sat_per_kb() {
    assert_eq!(btc_per_kb_to_sat_per_kb(0.0001), Some(10_000));
    assert_eq!(btc_per_kb_to_sat_per_kb(-1.0), None);
}

#[test]
fn test_create_spending_transaction() {
    let unlock_time = UnlockTime::new(650);
    let plan = create_spending_transaction(&test_utxos(), unlock_time, destination(), 10_000).unwrap();

    let expected_fee = calculate_spend_fee(2, 10_000).unwrap();
    assert_eq!(plan.total_in_sat, 150_000);
    assert_eq!(plan.fee_sat, expected_fee);
    assert_eq!(plan.tx.output.len(), 1);
    assert_eq!(plan.tx.output[0].value.to_sat(), 150_000 - expected_fee);
    assert_eq!(plan.tx.output[0].script_pubkey, destination());
    assert_eq!(plan.tx.lock_time.to_consensus_u32(), 650, "nLockTime is the unlock time");

    for txin in &plan.tx.input {
        assert_eq!(txin.sequence, Sequence::ENABLE_LOCKTIME_NO_RBF);
        assert!(txin.script_sig.is_empty(), "unsigned inputs have empty scriptSig");
    }
    assert_eq!(plan.tx.input[1].previous_output.vout, 1);
}

#[test]
fn test_create_spending_transaction_epoch_locktime() {
    let unlock_time = UnlockTime::new(1_700_000_000);
    let plan = create_spending_transaction(&test_utxos(), unlock_time, destination(), 1_000).unwrap();

    assert!(plan.tx.lock_time.is_block_time());
    assert_eq!(plan.tx.input[0].sequence, encode_for_sequence(LockTimeKind::UnixEpoch));
}

#[test]
fn test_create_spending_transaction_insufficient_funds() {
    let utxos = vec![LockedUtxo { amount_sat: 1_000, ..test_utxos()[0].clone() }];
    let result = create_spending_transaction(&utxos, UnlockTime::new(650), destination(), 10_000);

    match result {
        Err(SpendError::InsufficientFunds { available, fee }) => {
            assert_eq!(available, 1_000);
            assert_eq!(fee, calculate_spend_fee(1, 10_000).unwrap());
        }
        other => panic!("expected InsufficientFunds, got {:?}", other),
    }
}

#[test]
fn test_sign_all_inputs_produces_valid_script_sigs() {
    let secp_ctx = Secp256k1::new();
    let secret_key = test_secret_key();
    let pubkey = PublicKey::from_secret_key(&secp_ctx, &secret_key);
    let bitcoin_pubkey = bitcoin::PublicKey::new(pubkey);

    let redeem_script = build_redeem_script(650, bitcoin_pubkey.pubkey_hash().as_byte_array()).unwrap();
    let plan = create_spending_transaction(&test_utxos(), UnlockTime::new(650), destination(), 10_000).unwrap();
    let unsigned_tx = plan.tx.clone();
    let mut tx = plan.tx;

    sign_all_inputs(&mut tx, &redeem_script, &secret_key, &secp_ctx).unwrap();

    for (input_index, txin) in tx.input.iter().enumerate() {
        let pushes: Vec<Vec<u8>> = txin
            .script_sig
            .instructions()
            .map(|instruction| match instruction.unwrap() {
                Instruction::PushBytes(bytes) => bytes.as_bytes().to_vec(),
                Instruction::Op(op) => panic!("unexpected opcode {:?}", op),
            })
            .collect();
        assert_eq!(pushes.len(), 3, "scriptSig is <sig> <pubkey> <redeem script>");
        assert_eq!(*pushes[0].last().unwrap(), 0x01, "SIGHASH_ALL");
        assert_eq!(pushes[1], bitcoin_pubkey.to_bytes());
        assert_eq!(pushes[2], redeem_script.as_bytes());

        // signatures commit to the transaction without scriptSigs
        assert!(
            verify_p2sh_signature(&unsigned_tx, input_index, &redeem_script, &pushes[0], &pubkey, &secp_ctx).unwrap(),
            "signature for input {} should verify",
            input_index
        );
        assert!(
            verify_p2sh_signature(&tx, input_index, &redeem_script, &pushes[0], &pubkey, &secp_ctx).unwrap(),
            "legacy sighash ignores installed scriptSigs"
        );
    }

    // signing does not touch anything but the scriptSigs
    assert_eq!(tx.output, unsigned_tx.output);
    assert_eq!(tx.lock_time, unsigned_tx.lock_time);
}

#[test]
fn test_verify_rejects_signature_for_other_input() {
    let secp_ctx = Secp256k1::new();
    let secret_key = test_secret_key();
    let pubkey = PublicKey::from_secret_key(&secp_ctx, &secret_key);
    let redeem_script = build_redeem_script(650, &[0x11; 20]).unwrap();
    let plan = create_spending_transaction(&test_utxos(), UnlockTime::new(650), destination(), 10_000).unwrap();

    let sig = sign_p2sh_input(&plan.tx, 0, &redeem_script, &secret_key, &secp_ctx).unwrap();

    assert!(verify_p2sh_signature(&plan.tx, 0, &redeem_script, &sig, &pubkey, &secp_ctx).unwrap());
    assert!(!verify_p2sh_signature(&plan.tx, 1, &redeem_script, &sig, &pubkey, &secp_ctx).unwrap());
    assert!(!verify_p2sh_signature(&plan.tx, 0, &redeem_script, &[], &pubkey, &secp_ctx).unwrap());
}

#[test]
fn test_sign_rejects_out_of_range_input() {
    let secp_ctx = Secp256k1::new();
    let redeem_script = build_redeem_script(650, &[0x11; 20]).unwrap();
    let plan = create_spending_transaction(&test_utxos(), UnlockTime::new(650), destination(), 10_000).unwrap();

    let result = sign_p2sh_input(&plan.tx, 5, &redeem_script, &test_secret_key(), &secp_ctx);
    assert!(matches!(result, Err(SpendError::Signing(_))));
}

#[test]
fn test_create_lock_address_same_for_public_and_private_key() {
    let secp_ctx = Secp256k1::new();
    let privkey = PrivateKey::new(test_secret_key(), Network::Regtest);
    let pubkey = privkey.public_key(&secp_ctx);

    let from_pub = RecipientKey::from_args(Some(pubkey.to_string().as_str()), None).unwrap();
    let from_priv = RecipientKey::from_args(None, Some(privkey.to_wif().as_str())).unwrap();

    let lock_pub = create_lock_address(&from_pub, 650, Network::Regtest).unwrap();
    let lock_priv = create_lock_address(&from_priv, 650, Network::Regtest).unwrap();

    assert_eq!(lock_pub.address, lock_priv.address);
    assert_eq!(lock_pub.redeem_script_hex, lock_priv.redeem_script_hex);

    // the spend side rebuilds the identical script from the private key
    let rebuilt = build_redeem_script(650, parse_private_key(&privkey.to_wif()).unwrap()
        .public_key(&secp_ctx).pubkey_hash().as_byte_array()).unwrap();
    assert_eq!(rebuilt.to_hex(), lock_priv.redeem_script_hex);
    assert_eq!(hex::encode(derive_lock_address(&rebuilt).as_byte_array()), lock_priv.script_hash_hex);
}

#[test]
fn test_create_lock_address_errors() {
    let recipient = RecipientKey::from_args(None, Some(PrivateKey::new(test_secret_key(), Network::Regtest).to_wif().as_str())).unwrap();

    assert!(matches!(
        create_lock_address(&recipient, 0, Network::Regtest),
        Err(SpendError::Timelock(TimelockError::InvalidLockTime(0)))
    ));
    assert!(matches!(RecipientKey::from_args(None, None), Err(SpendError::MissingArgument(_))));
    assert!(matches!(RecipientKey::from_args(Some("zz"), None), Err(SpendError::InvalidKey(_))));
}
