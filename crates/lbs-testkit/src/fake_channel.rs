//! Deterministic in-memory message channel.
//!
//! Ids are `MSG-000001`, `MSG-000002`, ... in create order. The channel keeps
//! the set of live messages, so updating an unknown id answers `NotFound` and
//! deleting one answers `AlreadyGone`, exactly like the real webhook.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex};

use lbs_board::MessageBatch;
use lbs_reconcile::{DeleteOutcome, MessageChannel, MessageId, PublishError, PublishOp};

use crate::lock;

/// One call observed by the channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelOp {
    Create(MessageId),
    Update(MessageId),
    Delete(MessageId, DeleteOutcome),
    Failed(PublishOp, Option<MessageId>),
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    create_calls: usize,
    live: BTreeMap<MessageId, Option<MessageBatch>>,
    ops: Vec<ChannelOp>,
    failing_creates: BTreeSet<usize>,
    failing_updates: BTreeSet<MessageId>,
    failing_deletes: BTreeSet<MessageId>,
}

impl Inner {
    fn scripted_failure(&mut self, op: PublishOp, id: Option<&MessageId>) -> PublishError {
        self.ops.push(ChannelOp::Failed(op, id.cloned()));
        PublishError::Status {
            op,
            status: 500,
            body: "scripted failure".to_string(),
        }
    }
}

#[derive(Clone, Default)]
pub struct FakeChannel {
    inner: Arc<Mutex<Inner>>,
}

impl FakeChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register messages that already exist (published by an earlier run).
    pub fn seed<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut inner = lock(&self.inner);
        for id in ids {
            inner.live.insert(MessageId::new(id), None);
        }
    }

    /// The `nth` create call from now on (1-based) fails with status 500.
    pub fn fail_create_call(&self, nth: usize) {
        let mut inner = lock(&self.inner);
        let call = inner.create_calls + nth;
        inner.failing_creates.insert(call);
    }

    pub fn fail_update_of(&self, id: &str) {
        lock(&self.inner).failing_updates.insert(MessageId::new(id));
    }

    pub fn fail_delete_of(&self, id: &str) {
        lock(&self.inner).failing_deletes.insert(MessageId::new(id));
    }

    /// Drop every scripted failure.
    pub fn heal(&self) {
        let mut inner = lock(&self.inner);
        inner.failing_creates.clear();
        inner.failing_updates.clear();
        inner.failing_deletes.clear();
    }

    /// Remove a message behind the engine's back (e.g. deleted by a moderator).
    pub fn vanish(&self, id: &str) {
        lock(&self.inner).live.remove(&MessageId::new(id));
    }

    pub fn ops(&self) -> Vec<ChannelOp> {
        lock(&self.inner).ops.clone()
    }

    pub fn clear_ops(&self) {
        lock(&self.inner).ops.clear();
    }

    pub fn live_ids(&self) -> Vec<MessageId> {
        lock(&self.inner).live.keys().cloned().collect()
    }

    /// Last batch written to `id`, if it was written through this channel.
    pub fn content(&self, id: &str) -> Option<MessageBatch> {
        lock(&self.inner)
            .live
            .get(&MessageId::new(id))
            .cloned()
            .flatten()
    }

    pub fn count(&self, pred: impl Fn(&ChannelOp) -> bool) -> usize {
        lock(&self.inner).ops.iter().filter(|op| pred(op)).count()
    }
}

#[async_trait::async_trait]
impl MessageChannel for FakeChannel {
    async fn create_message(&self, batch: &MessageBatch) -> Result<MessageId, PublishError> {
        let mut inner = lock(&self.inner);
        inner.create_calls += 1;
        let call = inner.create_calls;
        if inner.failing_creates.contains(&call) {
            return Err(inner.scripted_failure(PublishOp::Create, None));
        }

        inner.next_id += 1;
        let id = MessageId::new(format!("MSG-{:06}", inner.next_id));
        inner.live.insert(id.clone(), Some(batch.clone()));
        inner.ops.push(ChannelOp::Create(id.clone()));
        Ok(id)
    }

    async fn update_message(
        &self,
        id: &MessageId,
        batch: &MessageBatch,
    ) -> Result<(), PublishError> {
        let mut inner = lock(&self.inner);
        if inner.failing_updates.contains(id) {
            return Err(inner.scripted_failure(PublishOp::Update, Some(id)));
        }
        match inner.live.get_mut(id) {
            Some(slot) => {
                *slot = Some(batch.clone());
                inner.ops.push(ChannelOp::Update(id.clone()));
                Ok(())
            }
            None => {
                inner.ops.push(ChannelOp::Failed(PublishOp::Update, Some(id.clone())));
                Err(PublishError::NotFound {
                    op: PublishOp::Update,
                    id: id.clone(),
                })
            }
        }
    }

    async fn delete_message(&self, id: &MessageId) -> Result<DeleteOutcome, PublishError> {
        let mut inner = lock(&self.inner);
        if inner.failing_deletes.contains(id) {
            return Err(inner.scripted_failure(PublishOp::Delete, Some(id)));
        }
        let outcome = match inner.live.remove(id) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::AlreadyGone,
        };
        inner.ops.push(ChannelOp::Delete(id.clone(), outcome));
        Ok(outcome)
    }
}
