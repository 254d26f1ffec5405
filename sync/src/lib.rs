//! # Config Sync
//!
//! A local, typed key/value configuration store kept in sync with one hash of
//! a remote store.
//!
//! - `SyncEngine` reconciles compiled-in defaults with the remote hash on
//!   construction (remote wins on conflict)
//! - `set` writes through, `persist` pushes everything in one bulk write
//! - Optional auto-reload pulls remote changes periodically while no local
//!   changes are pending, publishing a `ReloadEvent` per tick

mod auto_reload;
pub mod engine;
pub mod events;

pub use engine::{DEFAULT_RELOAD_INTERVAL, SyncEngine};
pub use events::{ReloadEvent, ReloadOutcome};
