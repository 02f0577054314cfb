use std::sync::{Arc, Mutex};

use lbs_board::LeaderboardPayload;
use lbs_reconcile::{BoardKey, FetchError, LeaderboardSource};

use crate::lock;

struct Inner {
    next: Result<LeaderboardPayload, FetchError>,
    fetched: Vec<BoardKey>,
}

/// Leaderboard source answering with whatever was last scripted.
#[derive(Clone)]
pub struct FakeSource {
    inner: Arc<Mutex<Inner>>,
}

impl FakeSource {
    pub fn new(payload: LeaderboardPayload) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                next: Ok(payload),
                fetched: Vec::new(),
            })),
        }
    }

    pub fn set_payload(&self, payload: LeaderboardPayload) {
        lock(&self.inner).next = Ok(payload);
    }

    pub fn fail_with(&self, err: FetchError) {
        lock(&self.inner).next = Err(err);
    }

    /// Keys fetched so far, in call order.
    pub fn fetched(&self) -> Vec<BoardKey> {
        lock(&self.inner).fetched.clone()
    }
}

#[async_trait::async_trait]
impl LeaderboardSource for FakeSource {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn fetch(&self, key: &BoardKey) -> Result<LeaderboardPayload, FetchError> {
        let mut inner = lock(&self.inner);
        inner.fetched.push(key.clone());
        inner.next.clone()
    }
}
