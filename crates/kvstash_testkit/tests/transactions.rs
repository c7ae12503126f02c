//! Integration tests for transactional behavior across crates.

use kvstash_core::{CoreError, JsonStore, Operation, Storage, TransactionState};
use kvstash_testkit::prelude::*;
use serde_json::json;

fn abort_parts(err: CoreError) -> (usize, CoreError, kvstash_core::RollbackReport, usize) {
    match err {
        CoreError::TransactionAborted {
            step,
            cause,
            report,
            discarded,
        } => (step, *cause, report, discarded),
        other => panic!("expected TransactionAborted, got {other:?}"),
    }
}

#[test]
fn round_trip_across_instances() {
    let mut test_store = TestStore::file();
    test_store.insert("k", json!({"nested": [1, 2, 3]})).unwrap();

    let fresh = test_store.reopen();
    assert_eq!(fresh.select("k").unwrap(), json!({"nested": [1, 2, 3]}));
}

#[test]
fn file_store_writes_one_json_object() {
    with_file_store(|store, path| {
        store.insert("a", json!(1)).unwrap();
        store.insert("b", json!([true])).unwrap();

        let text = std::fs::read_to_string(path).unwrap();
        assert_eq!(text, r#"{"a":1,"b":[true]}"#);
    });
}

#[test]
fn duplicate_rejection_keeps_state() {
    let mut test_store = TestStore::file();
    test_store.insert("k", json!("v")).unwrap();
    let before = test_store.durable();

    let err = test_store.insert("k", json!("v2")).unwrap_err();
    assert!(matches!(err, CoreError::KeyAlreadyExists { .. }));
    assert_eq!(test_store.select("k").unwrap(), json!("v"));
    assert_eq!(test_store.durable(), before);
}

#[test]
fn deferred_visibility() {
    let mut test_store = TestStore::file();

    test_store.begin().unwrap();
    test_store.insert("a", json!(1)).unwrap();
    assert!(matches!(
        test_store.select("a"),
        Err(CoreError::KeyNotFound { .. })
    ));
    assert_eq!(test_store.durable(), serde_json::Value::Null);

    test_store.commit().unwrap();
    assert_eq!(test_store.select("a").unwrap(), json!(1));
    assert_eq!(test_store.reopen().select("a").unwrap(), json!(1));
}

#[test]
fn ordered_commit() {
    let mut test_store = TestStore::file();

    test_store.begin().unwrap();
    test_store.insert("a", json!(1)).unwrap();
    test_store.update("a", json!(2)).unwrap();
    test_store.commit().unwrap();

    assert_eq!(test_store.select("a").unwrap(), json!(2));
}

#[test]
fn commit_failure_rolls_back_and_drops_trailing_ops() {
    let mut test_store = TestStore::file();

    test_store.begin().unwrap();
    test_store.insert("a", json!(1)).unwrap();
    test_store.insert("a", json!(2)).unwrap();
    test_store.update("b", json!(9)).unwrap();

    let (step, cause, report, discarded) = abort_parts(test_store.commit().unwrap_err());
    assert_eq!(step, 2);
    assert!(matches!(cause, CoreError::KeyAlreadyExists { .. }));
    assert!(report.is_clean());
    assert_eq!(report.undone(), 1);
    assert_eq!(discarded, 1);

    assert!(!test_store.exists("a"));
    assert!(!test_store.exists("b"));
    assert_eq!(test_store.state(), TransactionState::Closed);
    assert_eq!(test_store.durable(), json!({}));
}

#[test]
fn pattern_search() {
    let test_store = scenarios::fruit_store();

    assert_eq!(test_store.keys(Some("an")).unwrap(), vec!["banana"]);
    assert_eq!(
        test_store.keys(None).unwrap(),
        vec!["apple", "banana", "grape"]
    );
}

#[test]
fn keys_hidden_until_commit() {
    let mut test_store = scenarios::populated_store(2);

    test_store.begin().unwrap();
    test_store.insert("key-2", json!(2)).unwrap();
    test_store.delete("key-0").unwrap();
    assert_eq!(test_store.keys(None).unwrap(), vec!["key-0", "key-1"]);

    test_store.commit().unwrap();
    assert_eq!(test_store.keys(None).unwrap(), vec!["key-1", "key-2"]);
}

#[test]
fn rollback_terminates_when_undo_keeps_failing() {
    let (mut test_store, faults) = TestStore::faulty();

    test_store.begin().unwrap();
    test_store.insert("a", json!(1)).unwrap();
    test_store.insert("b", json!(2)).unwrap();
    test_store.insert("b", json!(3)).unwrap();

    // steps 1 and 2 persist, every undo write afterwards fails
    faults.fail_writes_after(2);

    let (step, _, report, _) = abort_parts(test_store.commit().unwrap_err());
    assert_eq!(step, 3);
    assert_eq!(report.undone(), 0);
    assert_eq!(report.failed(), 2);
    assert_eq!(faults.failed_writes(), 2);

    let failed: Vec<_> = report.failed_undos().cloned().collect();
    assert_eq!(failed, vec![Operation::delete("b"), Operation::delete("a")]);
    assert!(report
        .failures()
        .iter()
        .all(|f| matches!(f, CoreError::RollbackStepFailed { .. })));

    // undo never landed, so mirror and durable image still hold both keys
    assert!(test_store.exists("a"));
    assert!(test_store.exists("b"));
    assert_eq!(test_store.durable(), json!({"a": 1, "b": 2}));
    assert_eq!(test_store.state(), TransactionState::Closed);
}

#[test]
fn write_failure_mid_commit_is_undone() {
    let (mut test_store, faults) = TestStore::faulty();
    test_store.insert("base", json!("v0")).unwrap();

    test_store.begin().unwrap();
    test_store.update("base", json!("v1")).unwrap();
    test_store.insert("x", json!(1)).unwrap();
    test_store.delete("base").unwrap();

    faults.fail_nth_write(2);

    let (step, cause, report, discarded) = abort_parts(test_store.commit().unwrap_err());
    assert_eq!(step, 2);
    assert!(matches!(cause, CoreError::Persistence(_)));
    assert!(report.is_clean());
    assert_eq!(report.undone(), 1);
    assert_eq!(discarded, 1);

    assert_eq!(test_store.select("base").unwrap(), json!("v0"));
    assert!(!test_store.exists("x"));
    assert_eq!(test_store.durable(), json!({"base": "v0"}));
}

#[test]
fn direct_write_failure_leaves_state_unchanged() {
    let (mut test_store, faults) = TestStore::faulty();
    test_store.insert("a", json!(1)).unwrap();

    faults.fail_all_writes();
    let err = test_store.update("a", json!(2)).unwrap_err();
    assert!(matches!(err, CoreError::Persistence(_)));

    assert_eq!(test_store.select("a").unwrap(), json!(1));
    assert_eq!(test_store.durable(), json!({"a": 1}));

    faults.reset();
    test_store.update("a", json!(2)).unwrap();
    assert_eq!(test_store.durable(), json!({"a": 2}));
}

#[test]
fn unreadable_store_at_commit_applies_nothing() {
    let (mut test_store, faults) = TestStore::faulty();

    test_store.begin().unwrap();
    test_store.insert("a", json!(1)).unwrap();

    faults.set_fail_reads(true);
    let err = test_store.commit().unwrap_err();
    assert!(matches!(err, CoreError::Persistence(_)));
    assert_eq!(faults.writes(), 0);
    assert_eq!(test_store.state(), TransactionState::Closed);
    assert!(test_store.pending().is_empty());
}

#[test]
fn commit_applies_against_latest_durable_state() {
    let mut test_store = TestStore::file();
    test_store.insert("counter", json!(1)).unwrap();

    test_store.begin().unwrap();
    test_store.delete("counter").unwrap();
    test_store.insert("counter", json!(100)).unwrap();

    // a second instance changes the file between begin and commit
    let mut other: JsonStore = test_store.reopen();
    other.update("counter", json!(2)).unwrap();
    other.insert("extra", json!(true)).unwrap();

    test_store.commit().unwrap();
    assert_eq!(test_store.select("counter").unwrap(), json!(100));
    assert_eq!(test_store.select("extra").unwrap(), json!(true));
}

#[test]
fn aborted_commit_restores_external_values() {
    let mut test_store = TestStore::file();
    test_store.insert("k", json!("original")).unwrap();

    test_store.begin().unwrap();
    test_store.update("k", json!("mine")).unwrap();
    test_store.delete("nope").unwrap();

    let mut other = test_store.reopen();
    other.update("k", json!("theirs")).unwrap();

    let (step, _, report, _) = abort_parts(test_store.commit().unwrap_err());
    assert_eq!(step, 2);
    assert!(report.is_clean());
    // the undo restores what was durable when the step ran
    assert_eq!(test_store.select("k").unwrap(), json!("theirs"));
}

#[test]
fn transaction_cycle_can_repeat() {
    let mut test_store = TestStore::memory();

    test_store.begin().unwrap();
    test_store.insert("a", json!(1)).unwrap();
    test_store.commit().unwrap();

    test_store.begin().unwrap();
    test_store.insert("a", json!(2)).unwrap();
    assert!(test_store.commit().is_err());

    test_store.begin().unwrap();
    test_store.update("a", json!(3)).unwrap();
    let report = test_store.rollback().unwrap();
    assert!(report.is_clean());

    assert_eq!(test_store.select("a").unwrap(), json!(1));
}
