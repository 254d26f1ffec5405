//! Shared test fixtures for the configuration store workspace.
//!
//! - Redis (port 6379) as a lazily started testcontainer, shared by every
//!   test in the process; `None` when Docker is unavailable
//! - Unique namespace names so tests sharing one Redis don't collide
//! - `FlakyHashStore`: an in-memory hash backend whose reads and writes can be
//!   made to fail on demand

mod fixtures;
mod flaky;

pub use fixtures::*;
pub use flaky::FlakyHashStore;
