use lbs_board::MessageBatch;
use tracing::{info, warn};

use crate::{
    BoardKey, CycleError, DeleteOutcome, MessageChannel, MessageId, PublishedStore,
    ReconcilePlan, ReconcileReport,
};

/// Positional diff of `existing` ids against `desired` batches:
/// - indices `existing.len()..desired` are created;
/// - indices `0..min(desired, existing.len())` are updated in place;
/// - ids at indices `desired..` are deleted, ascending.
///
/// Unchanged batches are still updated; there is no content comparison.
pub fn plan(existing: &[MessageId], desired: usize) -> ReconcilePlan {
    let m = existing.len();
    ReconcilePlan {
        creates: m.min(desired)..desired,
        updates: existing
            .iter()
            .take(desired)
            .cloned()
            .enumerate()
            .collect(),
        deletes: existing.iter().skip(desired).cloned().collect(),
        target_len: desired,
    }
}

/// Execute `plan` against the channel, persisting the id list as each step
/// commits.
///
/// Persistence points:
/// - after all creates: `existing ++ created`;
/// - on a failed create: `existing ++ creates confirmed so far`, then the error;
/// - on a failed delete: `first target_len ++ ids not yet deleted`, then the error;
/// - at the end: the first `target_len` ids.
///
/// A failed update returns immediately; the stored list is already correct.
///
/// `plan` must come from [`plan`] over `existing` and `batches.len()`;
/// [`reconcile`] is the entry point that guarantees this.
pub(crate) async fn apply<C, P>(
    key: &BoardKey,
    plan: &ReconcilePlan,
    existing: &[MessageId],
    batches: &[MessageBatch],
    channel: &C,
    store: &mut P,
) -> Result<ReconcileReport, CycleError>
where
    C: MessageChannel + ?Sized,
    P: PublishedStore + ?Sized,
{
    let mut report = ReconcileReport::default();
    let mut working: Vec<MessageId> = existing.to_vec();

    // 1) Creates, in index order.
    for idx in plan.creates.clone() {
        match channel.create_message(&batches[idx]).await {
            Ok(id) => {
                working.push(id.clone());
                report.created.push(id);
            }
            Err(err) => {
                if !report.created.is_empty() {
                    warn!(
                        key = %key,
                        confirmed = report.created.len(),
                        error = %err,
                        "create failed mid-sequence; keeping confirmed messages"
                    );
                    store.save(key, &working)?;
                }
                return Err(err.into());
            }
        }
    }
    if !plan.creates.is_empty() {
        store.save(key, &working)?;
    }

    // 2) Updates, by position.
    for (idx, id) in &plan.updates {
        channel.update_message(id, &batches[*idx]).await?;
        report.updated += 1;
    }

    // 3) Deletes, ascending index. "Not found" is success.
    for (pos, id) in plan.deletes.iter().enumerate() {
        match channel.delete_message(id).await {
            Ok(DeleteOutcome::Deleted) => report.deleted += 1,
            Ok(DeleteOutcome::AlreadyGone) => {
                warn!(key = %key, message_id = %id, "message not found on delete; already gone");
                report.already_gone += 1;
            }
            Err(err) => {
                let mut remaining = working[..plan.target_len].to_vec();
                remaining.extend(plan.deletes[pos..].iter().cloned());
                store.save(key, &remaining)?;
                return Err(err.into());
            }
        }
    }

    // 4) Persist the final list.
    working.truncate(plan.target_len);
    store.save(key, &working)?;
    report.published = working;

    info!(
        key = %key,
        created = report.created.len(),
        updated = report.updated,
        deleted = report.deleted,
        already_gone = report.already_gone,
        published = report.published.len(),
        "reconciled"
    );
    Ok(report)
}

/// Load the stored ids for `key`, plan against `batches`, and apply.
pub async fn reconcile<C, P>(
    key: &BoardKey,
    batches: &[MessageBatch],
    channel: &C,
    store: &mut P,
) -> Result<ReconcileReport, CycleError>
where
    C: MessageChannel + ?Sized,
    P: PublishedStore + ?Sized,
{
    let existing = store.published(key);
    let plan = plan(&existing, batches.len());
    apply(key, &plan, &existing, batches, channel, store).await
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
