use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use lightning_fill::messaging::protocol::{CaptureResponse, ChannelError, PageChannel, TabId};
use lightning_fill::profile::profile_model::Profile;
use lightning_fill::profile::store::{KeyValueStore, StoreError};
use serde_json::Value;

/// Storage whose every call is rejected.
pub struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("quota exceeded".into()))
    }
}

/// Page channel that records every message and replies with a canned capture.
pub struct RecordingChannel {
    pub tab: Option<TabId>,
    pub capture_reply: Option<Profile>,
    pub captures: AtomicUsize,
    pub autofills: Mutex<Vec<Profile>>,
}

impl RecordingChannel {
    pub fn new(capture_reply: Option<Profile>) -> Self {
        RecordingChannel {
            tab: Some(TabId(7)),
            capture_reply,
            captures: AtomicUsize::new(0),
            autofills: Mutex::new(Vec::new()),
        }
    }

    pub fn messages_sent(&self) -> usize {
        self.captures.load(Ordering::SeqCst) + self.autofills.lock().unwrap().len()
    }
}

#[async_trait]
impl PageChannel for RecordingChannel {
    async fn active_tab(&self) -> Result<Option<TabId>, ChannelError> {
        Ok(self.tab)
    }

    async fn capture(&self, _tab: TabId) -> Result<CaptureResponse, ChannelError> {
        self.captures.fetch_add(1, Ordering::SeqCst);
        Ok(CaptureResponse {
            profile: self.capture_reply.clone(),
        })
    }

    async fn autofill(&self, _tab: TabId, profile: &Profile) -> Result<(), ChannelError> {
        self.autofills.lock().unwrap().push(profile.clone());
        Ok(())
    }
}
