//! Golden vector tests. Replay the engine's recorded call sequences
//! through the built contract and compare every field.
//!
//! The vectors live with the engine tests; both paths must agree on them.

mod common;

use serde::Deserialize;

use securemsg_primitives::EntryPoint;

use common::*;

#[derive(Deserialize)]
struct GoldenVector {
    name: String,
    calls: Vec<GoldenCall>,
    expected_state: Vec<(String, String)>,
}

#[derive(Deserialize)]
struct GoldenCall {
    entry: String,
    payload: String,
    expected_code: u32,
    expected_text: Option<String>,
}

fn replay(json: &str) {
    let vector: GoldenVector = serde_json::from_str(json).expect("invalid golden vector");
    let sandbox = match load_contract() {
        Some(s) => s,
        None => return,
    };
    let store = empty_store();
    let mut session = sandbox.session(store.clone()).unwrap();

    for (i, call) in vector.calls.iter().enumerate() {
        let entry = EntryPoint::from_name(&call.entry)
            .unwrap_or_else(|| panic!("[{}] unknown entry {}", vector.name, call.entry));
        let receipt = session.call(entry, call.payload.as_bytes()).unwrap();

        assert_eq!(
            receipt.result_code, call.expected_code,
            "[{}] call {} code mismatch",
            vector.name, i
        );
        assert_eq!(receipt.success, call.expected_code == 0);
        if let Some(expected) = &call.expected_text {
            assert_eq!(
                receipt.return_text(),
                Some(expected.as_str()),
                "[{}] call {} text mismatch",
                vector.name,
                i
            );
        }
    }

    let state: Vec<(String, String)> = store
        .snapshot()
        .unwrap()
        .into_iter()
        .map(|(k, v)| (String::from_utf8(k).unwrap(), String::from_utf8(v).unwrap()))
        .collect();
    assert_eq!(state, vector.expected_state, "[{}] final state mismatch", vector.name);
}

#[test]
fn test_golden_create_then_get() {
    replay(include_str!("../../../ExecutionCore/engine/tests/vectors/create_then_get.json"));
}

#[test]
fn test_golden_decode_failures() {
    replay(include_str!("../../../ExecutionCore/engine/tests/vectors/decode_failures.json"));
}

#[test]
fn test_golden_missing_key() {
    replay(include_str!("../../../ExecutionCore/engine/tests/vectors/missing_key.json"));
}
