use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::controller::popup::{PopupAction, StatusMessage};

/// One journal line per controller action.
#[derive(Debug, Serialize)]
pub struct ActionEvent {
    pub timestamp_ms: u128,
    pub action: String,
    pub status: String,
    pub field_count: usize,

    pub error: Option<String>,
}

impl ActionEvent {
    pub fn now(action: PopupAction, status: StatusMessage) -> Self {
        Self {
            timestamp_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
            action: format!("{:?}", action).to_lowercase(),
            status: status.to_string(),
            field_count: 0,
            error: None,
        }
    }

    pub fn with_field_count(mut self, count: usize) -> Self {
        self.field_count = count;
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }
}
