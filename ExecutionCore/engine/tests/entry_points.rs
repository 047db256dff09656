//! Behavioural tests of the three entry points through the dispatcher.

use serde_json::json;

use securemsg_engine::{ContractConfig, ContractExecutor, ContractScope, MockHost};
use securemsg_primitives::{EntryPoint, ErrorCode, ResultCode};

/// Run one call, commit on success, roll back on failure.
fn call(scope: &ContractScope, host: &mut MockHost, entry: EntryPoint, payload: &str) -> (ResultCode, String) {
    let code = ContractExecutor::call(entry, scope, payload.as_bytes(), host);
    if code.is_ok() {
        host.commit();
    } else {
        host.rollback();
    }
    let text = host.take_return_value().unwrap_or_default();
    (code, String::from_utf8(text).unwrap())
}

fn create(scope: &ContractScope, host: &mut MockHost, key: &str, msg: &str) -> (ResultCode, String) {
    let payload = json!({ "key": key, "msg": msg }).to_string();
    call(scope, host, EntryPoint::CreateMsg, &payload)
}

fn get(scope: &ContractScope, host: &mut MockHost, key: &str) -> (ResultCode, String) {
    call(scope, host, EntryPoint::GetMsg, &json!({ "key": key }).to_string())
}

#[test]
fn test_init_is_idempotent_and_stateless() {
    let scope = ContractScope::default();
    let mut host = MockHost::new();

    for _ in 0..3 {
        let (code, text) = call(&scope, &mut host, EntryPoint::Init, "");
        assert_eq!(code, ResultCode::Ok);
        assert_eq!(text, "Init Smart Contract");
    }
    assert!(host.committed_state().is_empty());
}

#[test]
fn test_create_then_get_round_trip() {
    let scope = ContractScope::default();
    let mut host = MockHost::new();

    assert_eq!(
        create(&scope, &mut host, "k1", "hello world"),
        (ResultCode::Ok, "Msg was created successfully".to_string())
    );
    assert_eq!(get(&scope, &mut host, "k1"), (ResultCode::Ok, "hello world".to_string()));
}

#[test]
fn test_last_write_wins() {
    let scope = ContractScope::default();
    let mut host = MockHost::new();

    create(&scope, &mut host, "k", "first");
    create(&scope, &mut host, "k", "second");
    assert_eq!(get(&scope, &mut host, "k").1, "second");
    assert_eq!(host.committed_state().len(), 1);
}

#[test]
fn test_keys_are_independent() {
    let scope = ContractScope::default();
    let mut host = MockHost::new();

    create(&scope, &mut host, "a", "alpha");
    create(&scope, &mut host, "b", "beta");
    assert_eq!(get(&scope, &mut host, "a").1, "alpha");
    assert_eq!(get(&scope, &mut host, "b").1, "beta");
}

#[test]
fn test_unicode_and_escapes_survive() {
    let scope = ContractScope::default();
    let mut host = MockHost::new();

    let msg = "héllo \"wörld\"\n\u{1F600}";
    create(&scope, &mut host, "ключ", msg);
    assert_eq!(get(&scope, &mut host, "ключ").1, msg);
    assert!(host
        .committed_state()
        .contains_key("secure_chain_msg/ключ".as_bytes()));
}

#[test]
fn test_failed_create_leaves_state_untouched() {
    let scope = ContractScope::default();
    let mut host = MockHost::new();
    create(&scope, &mut host, "k", "kept");

    let (code, text) = call(&scope, &mut host, EntryPoint::CreateMsg, r#"{"key":"k"}"#);
    assert_eq!(code, ResultCode::FieldMissing);
    assert_eq!(text, "missing field 'msg'");
    assert_eq!(get(&scope, &mut host, "k").1, "kept");
}

#[test]
fn test_store_rejection_is_reported() {
    let scope = ContractScope::default();
    let mut host = MockHost::new();
    host.fail_writes_with(ErrorCode::WriteLimit);

    let (code, text) = create(&scope, &mut host, "k", "v");
    assert_eq!(code, ResultCode::StoreWriteFailure);
    assert_eq!(text, "store write failed: host error: ERR_WRITE_LIMIT");
    assert!(host.committed_state().is_empty());
}

#[test]
fn test_oversized_message_is_rejected() {
    let scope = ContractScope::default();
    let mut host = MockHost::new();

    let big = "x".repeat(securemsg_primitives::MAX_VALUE_LEN + 1);
    let (code, text) = create(&scope, &mut host, "k", &big);
    assert_eq!(code, ResultCode::StoreWriteFailure);
    assert!(text.contains("ERR_VALUE_TOO_LARGE"), "{}", text);
}

#[test]
fn test_get_soft_failure_is_indistinguishable_by_code() {
    let scope = ContractScope::default();
    let mut host = MockHost::new();

    let (code, text) = get(&scope, &mut host, "never-written");
    assert_eq!(code, ResultCode::Ok);
    assert_eq!(text, "Error getting message: key not found: never-written");
}

#[test]
fn test_custom_namespace_isolates_records() {
    let default_scope = ContractScope::default();
    let other_scope = ContractScope::new(ContractConfig {
        namespace: "other_app".into(),
    });
    let mut host = MockHost::new();

    create(&other_scope, &mut host, "k", "from other");
    let (_, text) = get(&default_scope, &mut host, "k");
    assert!(text.starts_with("Error getting message"), "{}", text);
    assert_eq!(get(&other_scope, &mut host, "k").1, "from other");
    assert!(host.committed_state().contains_key(b"other_app/k".as_slice()));
}

#[test]
fn test_records_persist_across_scopes() {
    let mut host = MockHost::new();
    {
        let scope = ContractScope::default();
        create(&scope, &mut host, "k", "durable");
    }
    let fresh = ContractScope::default();
    assert_eq!(get(&fresh, &mut host, "k").1, "durable");
}
