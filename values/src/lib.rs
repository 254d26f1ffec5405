//! # Typed Value Store
//!
//! In-memory half of the configuration store.
//!
//! This crate provides:
//! - `ConfigValue`: the closed set of value shapes the store can hold
//! - Canonical string encoding of every shape (decimal text, fixed-point
//!   floats, `true`/`false`, JSON for lists and maps)
//! - `ValueStore`: a sharded concurrent map of encoded values with typed and
//!   bounded getters and a dirty flag tracking unreconciled local writes
//!
//! Getters never fail: a missing or malformed value yields the caller's
//! default, since the store carries no schema to validate against.

pub mod store;
pub mod value;

#[cfg(test)]
mod proptests;

pub use store::ValueStore;
pub use value::ConfigValue;
