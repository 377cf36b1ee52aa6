//! Módulo de hashing y canonicalización JSON.

pub mod canonical_json;
pub mod hash;

pub use canonical_json::to_canonical_json;
pub use hash::{hash_bytes, hash_str};

/// Hash de un `Value` sobre su forma canónica.
pub fn hash_value(value: &serde_json::Value) -> String {
    hash_str(&to_canonical_json(value))
}
