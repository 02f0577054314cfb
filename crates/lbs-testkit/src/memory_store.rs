use std::collections::BTreeMap;

use lbs_reconcile::{BoardKey, MessageId, PersistenceError, PublishedStore};

/// Volatile [`PublishedStore`] recording every successful save.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<BoardKey, Vec<MessageId>>,
    saves: Vec<(BoardKey, Vec<MessageId>)>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(key: impl Into<BoardKey>, ids: &[&str]) -> Self {
        let mut store = Self::new();
        store
            .entries
            .insert(key.into(), ids.iter().map(|s| MessageId::new(*s)).collect());
        store
    }

    /// Every save from now on fails.
    pub fn fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Successful saves, oldest first.
    pub fn saves(&self) -> &[(BoardKey, Vec<MessageId>)] {
        &self.saves
    }
}

impl PublishedStore for MemoryStore {
    fn published(&self, key: &BoardKey) -> Vec<MessageId> {
        self.entries.get(key).cloned().unwrap_or_default()
    }

    fn save(&mut self, key: &BoardKey, ids: &[MessageId]) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError {
                path: "<memory>".to_string(),
                message: "scripted save failure".to_string(),
            });
        }
        self.entries.insert(key.clone(), ids.to_vec());
        self.saves.push((key.clone(), ids.to_vec()));
        Ok(())
    }
}
