//! Collaborator contracts and error taxonomy.
//!
//! The engine only talks to the outside world through these traits. Concrete
//! HTTP implementations live in `lbs-http`; the file-backed store lives in
//! `lbs-store`; in-process fakes live in `lbs-testkit`.

use std::fmt;

use lbs_board::{LeaderboardPayload, MessageBatch, PayloadError};

use crate::types::{BoardKey, MessageId};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The leaderboard could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Network or transport failure.
    Transport(String),
    /// The source answered with a non-success status.
    Status { status: u16, body: String },
    /// The response body was not a leaderboard document.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(msg) => write!(f, "leaderboard fetch transport error: {msg}"),
            FetchError::Status { status, body } => {
                write!(f, "leaderboard fetch failed: status={status} body={body}")
            }
            FetchError::Decode(msg) => write!(f, "leaderboard decode error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<PayloadError> for FetchError {
    fn from(e: PayloadError) -> Self {
        FetchError::Decode(e.message)
    }
}

/// Channel operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOp {
    Create,
    Update,
    Delete,
}

impl PublishOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublishOp::Create => "create",
            PublishOp::Update => "update",
            PublishOp::Delete => "delete",
        }
    }
}

/// A create/update/delete failed. A delete answered with "not found" is
/// never a `PublishError`; it is [`DeleteOutcome::AlreadyGone`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishError {
    Transport { op: PublishOp, message: String },
    Status { op: PublishOp, status: u16, body: String },
    /// The message no longer exists on the channel (stale id).
    NotFound { op: PublishOp, id: MessageId },
    /// The channel accepted the request but the response was unusable
    /// (e.g. create without an id).
    Decode { op: PublishOp, message: String },
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::Transport { op, message } => {
                write!(f, "message {} transport error: {message}", op.as_str())
            }
            PublishError::Status { op, status, body } => {
                write!(f, "message {} failed: status={status} body={body}", op.as_str())
            }
            PublishError::NotFound { op, id } => write!(
                f,
                "message {} failed: message {id} not found (stale id; clear the stored ids to republish)",
                op.as_str()
            ),
            PublishError::Decode { op, message } => {
                write!(f, "message {} response decode error: {message}", op.as_str())
            }
        }
    }
}

impl std::error::Error for PublishError {}

/// The published-id store could not be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistenceError {
    pub path: String,
    pub message: String,
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "state persist failed ({}): {}", self.path, self.message)
    }
}

impl std::error::Error for PersistenceError {}

/// Anything that ends one cycle for one key early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleError {
    Fetch(FetchError),
    Publish(PublishError),
    Persistence(PersistenceError),
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CycleError::Fetch(e) => e.fmt(f),
            CycleError::Publish(e) => e.fmt(f),
            CycleError::Persistence(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for CycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CycleError::Fetch(e) => Some(e),
            CycleError::Publish(e) => Some(e),
            CycleError::Persistence(e) => Some(e),
        }
    }
}

impl From<FetchError> for CycleError {
    fn from(e: FetchError) -> Self {
        CycleError::Fetch(e)
    }
}

impl From<PublishError> for CycleError {
    fn from(e: PublishError) -> Self {
        CycleError::Publish(e)
    }
}

impl From<PersistenceError> for CycleError {
    fn from(e: PersistenceError) -> Self {
        CycleError::Persistence(e)
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Remote leaderboard.
#[async_trait::async_trait]
pub trait LeaderboardSource: Send + Sync {
    /// Human-readable name (e.g. `"adventofcode"`).
    fn name(&self) -> &'static str;

    async fn fetch(&self, key: &BoardKey) -> Result<LeaderboardPayload, FetchError>;
}

/// Result of a delete that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The channel reported the message missing; treated as success.
    AlreadyGone,
}

/// Outbound channel holding the rendered messages.
#[async_trait::async_trait]
pub trait MessageChannel: Send + Sync {
    async fn create_message(&self, batch: &MessageBatch) -> Result<MessageId, PublishError>;

    async fn update_message(&self, id: &MessageId, batch: &MessageBatch)
        -> Result<(), PublishError>;

    async fn delete_message(&self, id: &MessageId) -> Result<DeleteOutcome, PublishError>;
}

/// Durable key -> ordered published ids.
///
/// `save` must be durable before it returns and must replace the stored list
/// for `key` wholesale.
pub trait PublishedStore: Send {
    /// Ids for `key`, empty when nothing was ever published.
    fn published(&self, key: &BoardKey) -> Vec<MessageId>;

    fn save(&mut self, key: &BoardKey, ids: &[MessageId]) -> Result<(), PersistenceError>;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
