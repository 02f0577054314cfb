//! lbs-reconcile
//!
//! Keeps the published message sequence for one key equal to the freshly
//! rendered batch sequence.
//!
//! - `ports`: collaborator contracts (leaderboard source, message channel,
//!   published-id store) and the error taxonomy.
//! - `engine`: pure [`plan`] + async [`reconcile`] of create/update/delete.
//! - `cycle`: one full fetch -> render -> reconcile pass for a key.
//!
//! The published-id list is the only record of what exists on the channel.
//! It is persisted after each category of publish operation commits.

mod cycle;
mod engine;
mod ports;
mod types;

pub use cycle::{CycleReport, SyncEngine};
pub use engine::{plan, reconcile};
pub use ports::*;
pub use types::*;
