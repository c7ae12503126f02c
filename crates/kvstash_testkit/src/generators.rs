//! Property-based test generators using proptest.
//!
//! Keys are drawn from a deliberately small alphabet so that generated
//! operation sequences collide often: duplicate inserts and updates or
//! deletes of missing keys are what exercise the rollback path.

use kvstash_core::{Operation, Value};
use proptest::prelude::*;

/// Strategy for keys from a small space (`a`..`f`, optionally suffixed).
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-f][0-9]?").expect("Invalid regex")
}

/// Strategy for JSON values: scalars and shallow containers.
pub fn value_strategy() -> impl Strategy<Value = Value> {
    let scalar = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i32>().prop_map(|n| Value::from(n)),
        prop::string::string_regex("[a-z ]{0,12}")
            .expect("Invalid regex")
            .prop_map(Value::String),
    ];

    scalar.prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect())),
        ]
    })
}

/// Strategy for a single store mutation.
pub fn operation_strategy() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(k, v)| Operation::insert(k, v)),
        (key_strategy(), value_strategy()).prop_map(|(k, v)| Operation::update(k, v)),
        key_strategy().prop_map(Operation::delete),
    ]
}

/// Strategy for an ordered batch of up to `max_len` mutations.
pub fn operations_strategy(max_len: usize) -> impl Strategy<Value = Vec<Operation>> {
    prop::collection::vec(operation_strategy(), 0..=max_len)
}

/// Strategy for initial store contents as unique key/value pairs.
pub fn initial_entries_strategy(max_len: usize) -> impl Strategy<Value = Vec<(String, Value)>> {
    prop::collection::btree_map(key_strategy(), value_strategy(), 0..=max_len)
        .prop_map(|map| map.into_iter().collect())
}
