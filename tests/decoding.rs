//! Decoding tests for block envelopes and operation contents
//!
//! Uses the sample block under `tests/fixtures/block.json`.

use serde_json::{json, Value};
use tezblock::block::{Block, NonceHash};
use tezblock::operation::{Contents, OperationKind, OperationStatus, Vote};

const BLOCK_JSON: &str = include_str!("fixtures/block.json");

fn sample_block() -> Block {
    serde_json::from_str(BLOCK_JSON).expect("fixture block should decode")
}

#[test]
fn test_block_round_trip_is_lossless() {
    let original: Value = serde_json::from_str(BLOCK_JSON).unwrap();
    let block = sample_block();

    let encoded = serde_json::to_value(&block).unwrap();
    assert_eq!(encoded, original);

    // Decoding the re-encoded form gives the same value again.
    let again: Block = serde_json::from_value(encoded).unwrap();
    assert_eq!(again, block);
}

#[test]
fn test_header_and_metadata_fields() {
    let block = sample_block();

    assert_eq!(block.level(), 458752);
    assert_eq!(block.header.proto, 4);
    assert_eq!(block.header.fitness, vec!["00", "000000000071f5d2"]);
    assert_eq!(block.header.priority, Some(0));
    assert_eq!(block.header.timestamp.to_rfc3339(), "2019-06-04T13:24:48+00:00");
    assert!(block.header.seed_nonce_hash.is_none());

    let metadata = &block.metadata;
    let level = metadata.level.as_ref().unwrap();
    assert_eq!(level.cycle, 111);
    assert!(level.expected_commitment);
    assert_eq!(
        metadata.nonce_hash.as_ref().and_then(NonceHash::as_hash),
        Some("nceVSbP3hcecWHY1dYoNUMfyB7gH9S7KbC4hEz3XZK5QCrc5DfFGm")
    );
    assert_eq!(metadata.consumed_gas.as_ref().unwrap().as_str(), "20607");
    assert_eq!(metadata.max_operation_list_length.as_ref().unwrap()[1].max_op, None);

    let updates = metadata.balance_updates.as_ref().unwrap();
    let rewards = &updates[2];
    assert_eq!(rewards.category.as_deref(), Some("rewards"));
    assert_eq!(rewards.cycle, Some(111));
    assert!(rewards.contract.is_none());
    assert!(updates[0].change.is_negative());
    assert!(block.header.extra.is_empty());
    assert!(metadata.extra.is_empty());
}

#[test]
fn test_validation_pass_order_is_preserved() {
    let block = sample_block();

    assert_eq!(block.operations.len(), 4);
    let kinds: Vec<Vec<OperationKind>> = block
        .operations
        .iter()
        .map(|pass| {
            pass.iter()
                .flat_map(|group| group.contents.iter().map(Contents::kind))
                .collect()
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            vec![OperationKind::Endorsement, OperationKind::Endorsement],
            vec![OperationKind::Proposals, OperationKind::Ballot],
            vec![OperationKind::SeedNonceRevelation, OperationKind::ActivateAccount],
            vec![
                OperationKind::Reveal,
                OperationKind::Transaction,
                OperationKind::Origination,
                OperationKind::Delegation,
            ],
        ]
    );

    assert_eq!(
        block.operation_hashes(),
        vec![
            "ooTrm5fMe7XGvyYV5hJ1rWdS9hGK4eVdUzLfeXiWnGdk14dzW2K",
            "onq8TfgDWS3hCH1TGHvMwZ8Ad7fqHbaCCy5e9B8jx6UaZzJtYdL",
            "opHzdrfixKqBmzLQe3sRGp3M6Pno7A4rMvq7zJfm8NQVRcU8Yd7",
            "ooGLhTkdsS5gsHcGNxfdZRdnq8J3c5RNwEpB5V8H1kkMy6oqJiG",
            "ooYSnSz7WLqYPUAoBKF6DZvzPL4AJUWAKMzQtLCvQXeWXqxB4P4",
            "opMUmy1jxjLJB8QRuBZ5LxMQnKgWk9iYdWAjNyu3YiR66GDQzsz",
            "oo3fCRmFqGd1QNCMFsPu9ehTrH2bAfUvJkVRuuQGKxRF4rJf5kQ",
            "opEU7nRQrpVWPBvJRcD8RjtT9pKqhz2EbCQ5uxaXGuGMoyQYqp4",
            "oogmV3Y3Bn8pXMdxjTVd6V7pGV6HzVQKoU5ZCRCzVxWnX5z6jVe",
        ]
    );
    assert_eq!(block.contents().count(), 10);
    assert!(block.operations[2][0].signature.is_none());
}

#[test]
fn test_operation_results() {
    let block = sample_block();
    let manager_pass = &block.operations[3];

    let reveal = &manager_pass[0].contents[0];
    assert_eq!(reveal.operation_result().unwrap().status, OperationStatus::Applied);

    let transfer = &manager_pass[0].contents[1];
    let result = transfer.operation_result().unwrap();
    assert_eq!(result.consumed_gas.as_ref().unwrap().as_str(), "10207");
    assert_eq!(result.balance_updates.as_ref().unwrap().len(), 2);
    assert!(result.errors.is_none());

    let origination = manager_pass[1].contents[0].operation_result().unwrap();
    assert_eq!(
        origination.originated_contracts.as_deref(),
        Some(&["KT1Hkg5qeNhfwpKW4fXvq7HGZB9z2EnmCCA9".to_string()][..])
    );

    let delegation = manager_pass[2].contents[0].operation_result().unwrap();
    assert_eq!(delegation.status, OperationStatus::Failed);
    let errors = delegation.errors.as_ref().unwrap();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].id, "proto.004-Pt24m4xi.delegate.no_deletion");
    assert_eq!(
        errors[0].details.get("delegate"),
        Some(&json!("tz1NortRftucvAkD1J58L32EhSVrQEWJCEnB"))
    );
}

fn manager(kind: &str, extra: Value) -> Value {
    let mut value = json!({
        "kind": kind,
        "source": "tz1KqTpEZ7Yob7QbPE4Hy4Wo8fHG8LhKxZSx",
        "fee": "1500",
        "counter": "77",
        "gas_limit": "1040000",
        "storage_limit": "60000"
    });
    if let (Some(target), Value::Object(fields)) = (value.as_object_mut(), extra) {
        target.extend(fields);
    }
    value
}

/// Decodes `wire`, checks the kind and checks that re-encoding yields exactly
/// the same keys.
fn check_kind(wire: Value, expected: OperationKind) -> Contents {
    let contents: Contents = serde_json::from_value(wire.clone())
        .unwrap_or_else(|e| panic!("{} failed to decode: {}", expected, e));
    assert_eq!(contents.kind(), expected);

    let encoded = serde_json::to_value(&contents).unwrap();
    let mut wire_keys: Vec<_> = wire.as_object().unwrap().keys().cloned().collect();
    let mut encoded_keys: Vec<_> = encoded.as_object().unwrap().keys().cloned().collect();
    wire_keys.sort();
    encoded_keys.sort();
    assert_eq!(encoded_keys, wire_keys, "unexpected fields for {}", expected);
    contents
}

#[test]
fn test_every_kind_is_discriminated() {
    let cases = vec![
        (json!({"kind": "endorsement", "level": 10}), OperationKind::Endorsement),
        (
            json!({
                "kind": "endorsement_with_slot",
                "endorsement": {
                    "branch": "BLc7tKfzia9hnaY1YTMS6RkDniQBoApM4EjKFRLucsuHbiy3eqt",
                    "operations": {"kind": "endorsement", "level": 10},
                    "signature": "sigPjnEBthNTMXyD7dhwTfLBhu5e8HDZiC9WqZyWDjhGr2sSyNBXfw5ZpFwY3Qe3FRuJ4b7H4oSN7KmXfmhwR8gFzk4mXLGL"
                },
                "slot": 3
            }),
            OperationKind::EndorsementWithSlot,
        ),
        (
            json!({"kind": "seed_nonce_revelation", "level": 32, "nonce": "aa"}),
            OperationKind::SeedNonceRevelation,
        ),
        (
            json!({"kind": "double_endorsement_evidence", "op1": {"branch": "B1"}, "op2": {"branch": "B2"}}),
            OperationKind::DoubleEndorsementEvidence,
        ),
        (
            json!({"kind": "double_baking_evidence", "bh1": {"level": 5}, "bh2": {"level": 5}}),
            OperationKind::DoubleBakingEvidence,
        ),
        (
            json!({"kind": "activate_account", "pkh": "tz1LskbGUjgSgj4D5ij9oWUEZGxyzrm1kqbh", "secret": "41f9"}),
            OperationKind::ActivateAccount,
        ),
        (
            json!({"kind": "proposals", "source": "tz1a", "period": 13, "proposals": ["P1"]}),
            OperationKind::Proposals,
        ),
        (
            json!({"kind": "ballot", "source": "tz1a", "period": 14, "proposal": "P1", "ballot": "pass"}),
            OperationKind::Ballot,
        ),
        (
            json!({"kind": "failing_noop", "arbitrary": "48656c6c6f"}),
            OperationKind::FailingNoop,
        ),
        (
            manager("reveal", json!({"public_key": "edpkuBknW28nW72KG6RoHtYW7p12T6GKc7nAbwYX5m8Wd9sDVC9yav"})),
            OperationKind::Reveal,
        ),
        (
            manager(
                "transaction",
                json!({
                    "amount": "1",
                    "destination": "KT1Hkg5qeNhfwpKW4fXvq7HGZB9z2EnmCCA9",
                    "parameters": {"entrypoint": "default", "value": {"prim": "Unit"}}
                }),
            ),
            OperationKind::Transaction,
        ),
        (
            manager(
                "origination",
                json!({"balance": "0", "script": {"code": [], "storage": {"int": "0"}}}),
            ),
            OperationKind::Origination,
        ),
        (
            manager("delegation", json!({"delegate": "tz1NortRftucvAkD1J58L32EhSVrQEWJCEnB"})),
            OperationKind::Delegation,
        ),
        (
            manager("register_global_constant", json!({"value": {"int": "42"}})),
            OperationKind::RegisterGlobalConstant,
        ),
        (
            manager("set_deposits_limit", json!({"limit": "1000000"})),
            OperationKind::SetDepositsLimit,
        ),
    ];

    assert_eq!(cases.len(), OperationKind::ALL.len());
    for (wire, kind) in cases {
        check_kind(wire, kind);
    }
}

#[test]
fn test_kind_specific_fields_are_populated() {
    let ballot = check_kind(
        json!({"kind": "ballot", "source": "tz1a", "period": 14, "proposal": "P1", "ballot": "yay"}),
        OperationKind::Ballot,
    );
    match &ballot {
        Contents::Ballot(b) => {
            assert_eq!(b.period, 14);
            assert_eq!(b.proposal, "P1");
            assert_eq!(b.ballot, Vote::Yay);
        }
        other => panic!("expected ballot, got {:?}", other),
    }
    assert_eq!(ballot.source(), Some("tz1a"));
    assert!(ballot.fee().is_none());

    let origination = check_kind(manager("origination", json!({"balance": "0"})), OperationKind::Origination);
    match origination {
        Contents::Origination(o) => {
            assert!(o.balance.is_zero());
            assert!(o.manager_pubkey.is_none());
            assert!(o.delegate.is_none());
            assert!(o.script.is_none());
        }
        other => panic!("expected origination, got {:?}", other),
    }

    let unlimited = check_kind(manager("set_deposits_limit", json!({})), OperationKind::SetDepositsLimit);
    match unlimited {
        Contents::SetDepositsLimit(s) => assert!(s.limit.is_none()),
        other => panic!("expected set_deposits_limit, got {:?}", other),
    }
}

#[test]
fn test_missing_required_field_fails() {
    // A transaction without a destination is not a transaction.
    let wire = manager("transaction", json!({"amount": "5"}));
    assert!(serde_json::from_value::<Contents>(wire).is_err());

    // Numbers where decimal text is expected are rejected.
    let wire = manager("transaction", json!({"amount": 5, "destination": "tz1a"}));
    assert!(serde_json::from_value::<Contents>(wire).is_err());

    let wire = json!({"kind": "ballot", "source": "tz1a", "period": 14, "proposal": "P1", "ballot": "maybe"});
    assert!(serde_json::from_value::<Contents>(wire).is_err());
}

#[test]
fn test_truncated_block_fails_to_decode() {
    let truncated = &BLOCK_JSON[..BLOCK_JSON.len() / 2];
    assert!(serde_json::from_str::<Block>(truncated).is_err());

    let mut value: Value = serde_json::from_str(BLOCK_JSON).unwrap();
    value["header"].as_object_mut().unwrap().remove("level");
    assert!(serde_json::from_value::<Block>(value).is_err());
}

fn assert_round_trip<T>(wire: Value) -> T
where
    T: serde::de::DeserializeOwned + serde::Serialize,
{
    let decoded: T = serde_json::from_value(wire.clone()).unwrap();
    assert_eq!(serde_json::to_value(&decoded).unwrap(), wire);
    decoded
}

#[test]
fn test_sparse_metadata_round_trip() {
    // Genesis and activation blocks omit most metadata, lists included.
    let metadata: tezblock::block::Metadata = assert_round_trip(json!({
        "protocol": "PrihK96nBAFSxVL1GLJTVhu9YnzkMFiBeuJRPA8NwuZVZCE1L6i",
        "next_protocol": "PtYuensgYBb3G3x1hLLbCmcav8ue8Kyd2khADcL5LsT5R1hcXex"
    }));
    assert!(metadata.deactivated.is_none());
    assert!(metadata.balance_updates.is_none());

    // Present but empty lists stay present.
    let metadata: tezblock::block::Metadata = assert_round_trip(json!({
        "protocol": "PrihK96nBAFSxVL1GLJTVhu9YnzkMFiBeuJRPA8NwuZVZCE1L6i",
        "next_protocol": "PtYuensgYBb3G3x1hLLbCmcav8ue8Kyd2khADcL5LsT5R1hcXex",
        "deactivated": [],
        "balance_updates": []
    }));
    assert_eq!(metadata.deactivated.as_deref(), Some(&[][..]));

    let endorsement: Contents = assert_round_trip(json!({
        "kind": "endorsement",
        "level": 458751,
        "metadata": {
            "delegate": "tz1NortRftucvAkD1J58L32EhSVrQEWJCEnB",
            "slots": [4]
        }
    }));
    assert!(endorsement.metadata().unwrap().balance_updates.is_none());
}

#[test]
fn test_newer_protocol_keys_round_trip() {
    let endorsement: Contents = assert_round_trip(json!({
        "kind": "endorsement",
        "slot": 5,
        "level": 2244609,
        "round": 0,
        "block_payload_hash": "vh2s4Z6Q7pX8",
        "metadata": {
            "balance_updates": [],
            "delegate": "tz1NortRftucvAkD1J58L32EhSVrQEWJCEnB",
            "endorsement_power": 12
        }
    }));
    match &endorsement {
        Contents::Endorsement(e) => {
            assert_eq!(e.level, 2244609);
            assert_eq!(e.extra.get("slot"), Some(&json!(5)));
            assert_eq!(e.extra.get("block_payload_hash"), Some(&json!("vh2s4Z6Q7pX8")));
            assert_eq!(
                e.metadata.as_ref().unwrap().extra.get("endorsement_power"),
                Some(&json!(12))
            );
        }
        other => panic!("expected endorsement, got {:?}", other),
    }

    let transaction: Contents = assert_round_trip(manager(
        "transaction",
        json!({
            "amount": "1",
            "destination": "tz1gfArv665EUkSg2ojMBzcbfwuPxAvqPvjo",
            "metadata": {
                "balance_updates": [{
                    "kind": "contract",
                    "contract": "tz1KqTpEZ7Yob7QbPE4Hy4Wo8fHG8LhKxZSx",
                    "change": "-1",
                    "origin": "block"
                }],
                "operation_result": {
                    "status": "applied",
                    "consumed_gas": "1421",
                    "consumed_milligas": "1420040"
                }
            }
        }),
    ));
    let result = transaction.operation_result().unwrap();
    assert_eq!(result.extra.get("consumed_milligas"), Some(&json!("1420040")));
    assert!(transaction.manager().is_some());

    let mut wire: Value = serde_json::from_str(BLOCK_JSON).unwrap();
    wire["header"]["payload_hash"] = json!("vh2s4Z6Q7pX8");
    wire["header"]["payload_round"] = json!(0);
    wire["metadata"]["proposer"] = json!("tz1NortRftucvAkD1J58L32EhSVrQEWJCEnB");
    wire["metadata"]["level_info"] = json!({"level": 458752, "cycle": 111});
    wire["metadata"]["balance_updates"][0]["staker"] = json!({"delegate": "tz1a"});

    let block: Block = assert_round_trip(wire);
    assert_eq!(block.header.extra.get("payload_hash"), Some(&json!("vh2s4Z6Q7pX8")));
    assert_eq!(
        block.metadata.extra.get("proposer"),
        Some(&json!("tz1NortRftucvAkD1J58L32EhSVrQEWJCEnB"))
    );
    assert!(block.metadata.balance_updates.as_ref().unwrap()[0]
        .extra
        .contains_key("staker"));
}
