//! lbs-testkit
//!
//! In-process collaborators for driving the sync cycle without a network:
//! - [`FakeSource`]: scripted leaderboard payloads and fetch failures.
//! - [`FakeChannel`]: deterministic message ids, an operation log, and
//!   scripted create/update/delete failures.
//! - [`MemoryStore`]: [`lbs_reconcile::PublishedStore`] with a save history.
//!
//! The fakes are cheap `Clone` handles over shared state, so a test keeps one
//! handle for assertions while the engine owns another.

mod fake_channel;
mod fake_source;
mod fixtures;
mod memory_store;

pub use fake_channel::{ChannelOp, FakeChannel};
pub use fake_source::FakeSource;
pub use fixtures::{fixed_time, member, payload_with_members, render_fixture, FULL_PAGE};
pub use memory_store::MemoryStore;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock ignoring poisoning; a panicking test must not cascade into others.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}
