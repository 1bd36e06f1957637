use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::profile_model::Profile;

pub const CAPTURE_MESSAGE: &str = "LIGHTNING_CAPTURE";
pub const AUTOFILL_MESSAGE: &str = "LIGHTNING_AUTOFILL";

/// Identifier of the page context a message is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TabId(pub u32);

/// Wire envelope exchanged with the page context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PageMessage {
    #[serde(rename = "LIGHTNING_CAPTURE")]
    Capture,
    #[serde(rename = "LIGHTNING_AUTOFILL")]
    Autofill {
        #[serde(default)]
        profile: Option<Profile>,
    },
}

impl PageMessage {
    pub fn autofill(profile: &Profile) -> Self {
        PageMessage::Autofill {
            profile: Some(profile.clone()),
        }
    }
}

/// Reply to a capture request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureResponse {
    #[serde(default)]
    pub profile: Option<Profile>,
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("Could not establish connection: receiving end does not exist (tab {0:?})")]
    NoListener(TabId),

    #[error("failed to encode {context}: {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to decode {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("message channel disconnected: {0}")]
    Disconnected(String),
}

// ============================================================================
// PageChannel: controller → page context
// ============================================================================

/// The controller's view of the page context.
///
/// Capture is request/response; autofill is fire-and-forget and yields
/// nothing about what the page did with it.
#[async_trait]
pub trait PageChannel: Send + Sync {
    /// Page the user is currently looking at, if any.
    async fn active_tab(&self) -> Result<Option<TabId>, ChannelError>;

    async fn capture(&self, tab: TabId) -> Result<CaptureResponse, ChannelError>;

    async fn autofill(&self, tab: TabId, profile: &Profile) -> Result<(), ChannelError>;
}
