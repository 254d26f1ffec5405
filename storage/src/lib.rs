//! # Storage Layer
//!
//! Remote hash backends holding one configuration namespace per hash.
//!
//! - `HashStore`: the contract the sync engine talks to
//! - `RedisHashStore`: Redis `HGETALL` / `HSET` over a connection manager
//! - `MemoryHashStore`: in-process backend for standalone use and tests

pub mod memory;
pub mod redis;
pub mod traits;

pub use memory::MemoryHashStore;
pub use redis::RedisHashStore;
pub use traits::HashStore;
