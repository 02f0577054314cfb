//! State file scenarios
//!
//! GREEN when:
//! - Saved ids come back from a fresh load in the same order.
//! - Saving one key leaves other keys untouched; saving the same key twice
//!   keeps only the last list.
//! - A corrupt or wrong-shape file loads as empty instead of failing.
//! - A file written by hand in the plain `{"<key>": ["<id>", ...]}` shape
//!   loads as-is.

use std::fs;

use lbs_reconcile::{BoardKey, MessageId, PublishedStore};
use lbs_store::JsonFileStore;

fn ids(raw: &[&str]) -> Vec<MessageId> {
    raw.iter().map(|s| MessageId::new(*s)).collect()
}

#[test]
fn saved_ids_survive_reload_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("discord_messages.json");
    let key = BoardKey::from(2024);

    let mut store = JsonFileStore::load(&path);
    assert!(store.published(&key).is_empty());
    store.save(&key, &ids(&["30", "10", "20"])).unwrap();

    let reloaded = JsonFileStore::load(&path);
    assert_eq!(reloaded.published(&key), ids(&["30", "10", "20"]));
}

#[test]
fn saving_one_key_keeps_the_others() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");

    let mut store = JsonFileStore::load(&path);
    store.save(&BoardKey::from(2023), &ids(&["a"])).unwrap();
    store.save(&BoardKey::from(2024), &ids(&["b", "c"])).unwrap();
    store.save(&BoardKey::from(2024), &ids(&["d"])).unwrap();

    let reloaded = JsonFileStore::load(&path);
    assert_eq!(reloaded.published(&BoardKey::from(2023)), ids(&["a"]));
    assert_eq!(reloaded.published(&BoardKey::from(2024)), ids(&["d"]));
    assert_eq!(
        reloaded.keys(),
        vec![BoardKey::from(2023), BoardKey::from(2024)]
    );
}

#[test]
fn empty_list_is_persisted_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let key = BoardKey::from(2024);

    let mut store = JsonFileStore::load(&path);
    store.save(&key, &ids(&["1", "2"])).unwrap();
    store.save(&key, &[]).unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw, serde_json::json!({ "2024": [] }));
}

#[test]
fn corrupt_file_loads_as_empty_and_is_overwritten_on_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, b"{\"2024\": [\"1\", ").unwrap();
    let key = BoardKey::from(2024);

    let mut store = JsonFileStore::load(&path);
    assert!(store.published(&key).is_empty());

    store.save(&key, &ids(&["9"])).unwrap();
    assert_eq!(JsonFileStore::load(&path).published(&key), ids(&["9"]));
}

#[test]
fn wrong_shape_loads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, br#"["1", "2"]"#).unwrap();

    let store = JsonFileStore::load(&path);
    assert!(store.entries().is_empty());
}

#[test]
fn hand_written_file_is_read_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    fs::write(
        &path,
        br#"{"2024": ["1310014068022575144", "1310014070019330188"]}"#,
    )
    .unwrap();

    let store = JsonFileStore::load(&path);
    assert_eq!(
        store.published(&BoardKey::from(2024)),
        ids(&["1310014068022575144", "1310014070019330188"])
    );
}

#[test]
fn remove_drops_key_and_reports_presence() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("state.json");
    let key = BoardKey::from(2024);

    let mut store = JsonFileStore::load(&path);
    store.save(&key, &ids(&["1"])).unwrap();
    assert!(store.remove(&key).unwrap());
    assert!(!store.remove(&key).unwrap());

    assert!(JsonFileStore::load(&path).entries().is_empty());
}
