use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a message on the channel.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Partition under which a leaderboard and its messages are tracked (the
/// contest year).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoardKey(String);

impl BoardKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<u16> for BoardKey {
    fn from(year: u16) -> Self {
        Self(year.to_string())
    }
}

impl From<&str> for BoardKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl fmt::Display for BoardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operations needed to move from the existing id list to `target_len`
/// published messages.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Batch indices to publish as new messages, in order.
    pub creates: Range<usize>,
    /// `(batch index, existing id)` pairs, re-sent by position.
    pub updates: Vec<(usize, MessageId)>,
    /// Ids beyond the target length, ascending index order.
    pub deletes: Vec<MessageId>,
    pub target_len: usize,
}

impl ReconcilePlan {
    pub fn is_noop(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// What one reconciliation did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<MessageId>,
    pub updated: usize,
    pub deleted: usize,
    /// Deletes answered with "not found"; counted as success.
    pub already_gone: usize,
    /// Persisted id list after the run.
    pub published: Vec<MessageId>,
}
