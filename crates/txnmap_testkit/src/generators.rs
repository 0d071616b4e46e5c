//! Property-based test generators using proptest.
//!
//! Keys are drawn from a deliberately small space so random scripts collide
//! on the same keys and exercise overwrite, tombstone, and merge paths.

use proptest::prelude::*;

/// A single map mutation within a transaction script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapOp {
    /// Stage a put.
    Put(String, String),
    /// Stage a delete.
    Remove(String),
}

/// Strategy for generating keys from a small colliding keyspace.
pub fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-e]").expect("valid regex")
}

/// Strategy for generating short printable values.
pub fn value_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z0-9]{1,8}").expect("valid regex")
}

/// Strategy for generating a single mutation.
pub fn op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Put(k, v)),
        key_strategy().prop_map(MapOp::Remove),
    ]
}

/// Strategy for generating a transaction script of up to `max_len` mutations.
pub fn script_strategy(max_len: usize) -> impl Strategy<Value = Vec<MapOp>> {
    prop::collection::vec(op_strategy(), 0..=max_len)
}

/// Strategy for generating several transaction scripts.
pub fn scripts_strategy(
    max_scripts: usize,
    max_len: usize,
) -> impl Strategy<Value = Vec<Vec<MapOp>>> {
    prop::collection::vec(script_strategy(max_len), 1..=max_scripts)
}
