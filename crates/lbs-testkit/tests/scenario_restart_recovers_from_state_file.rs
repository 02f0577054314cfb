//! Restart scenarios against the real state file
//!
//! GREEN when:
//! - A restarted engine loading the state file updates the messages it
//!   published before the restart instead of posting new ones.
//! - A corrupt state file is treated as "nothing published": a full fresh set
//!   of messages is created and the file is rewritten with their ids.

use std::fs;

use lbs_board::{BatchLimits, PageLayout};
use lbs_reconcile::{BoardKey, PublishedStore, SyncEngine};
use lbs_store::JsonFileStore;
use lbs_testkit::{fixed_time, payload_with_members, ChannelOp, FakeChannel, FakeSource, FULL_PAGE};

fn key() -> BoardKey {
    BoardKey::from(2024)
}

fn engine(
    channel: &FakeChannel,
    store: JsonFileStore,
) -> SyncEngine<FakeSource, FakeChannel, JsonFileStore> {
    SyncEngine::new(
        FakeSource::new(payload_with_members(2 * FULL_PAGE)),
        channel.clone(),
        store,
        PageLayout::default(),
        BatchLimits::default(),
    )
}

#[tokio::test]
async fn restart_reuses_persisted_ids() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("discord_messages.json");
    let channel = FakeChannel::new();

    let mut first = engine(&channel, JsonFileStore::load(&path));
    first.run_cycle_at(&key(), fixed_time()).await.unwrap();
    let published = first.store().published(&key());
    drop(first);

    channel.clear_ops();
    let mut second = engine(&channel, JsonFileStore::load(&path));
    second.run_cycle_at(&key(), fixed_time()).await.unwrap();

    assert_eq!(second.store().published(&key()), published);
    assert_eq!(channel.count(|op| matches!(op, ChannelOp::Create(_))), 0);
    assert_eq!(channel.count(|op| matches!(op, ChannelOp::Update(_))), 2);
}

#[tokio::test]
async fn corrupt_state_file_republishes_full_set() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("discord_messages.json");
    fs::write(&path, b"\x00\x01 definitely not json").unwrap();

    let channel = FakeChannel::new();
    let mut eng = engine(&channel, JsonFileStore::load(&path));
    let report = eng.run_cycle_at(&key(), fixed_time()).await.unwrap();

    assert_eq!(report.reconcile.created.len(), 2);
    assert_eq!(report.reconcile.updated, 0);

    let reloaded = JsonFileStore::load(&path);
    assert_eq!(reloaded.published(&key()), report.reconcile.created);
}
