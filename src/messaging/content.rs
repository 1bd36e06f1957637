use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::matcher::capture::collect_fields;
use crate::matcher::fill::{FillReport, NotifyPolicy, fill_inputs};
use crate::messaging::protocol::{CaptureResponse, ChannelError, PageChannel, PageMessage, TabId};
use crate::page::dom_model::Document;
use crate::profile::profile_model::Profile;

// ============================================================================
// ContentScript: the page-side listener
// ============================================================================

/// Listener living next to the page's DOM.
pub struct ContentScript<D> {
    page: D,
    policy: NotifyPolicy,
}

impl<D: Document> ContentScript<D> {
    pub fn new(page: D, policy: NotifyPolicy) -> Self {
        ContentScript { page, policy }
    }

    pub fn page(&self) -> &D {
        &self.page
    }

    pub fn into_page(self) -> D {
        self.page
    }

    pub fn on_capture(&self) -> CaptureResponse {
        CaptureResponse {
            profile: Some(collect_fields(&self.page)),
        }
    }

    pub fn on_autofill(&mut self, profile: &Profile) -> FillReport {
        let report = fill_inputs(&mut self.page, profile, self.policy);
        info!(matched = report.matched, changed = report.changed, "autofill applied");
        report
    }

    /// Handle one raw JSON message. Only capture requests get a reply;
    /// anything unrecognised is ignored.
    pub fn handle_raw(&mut self, raw: &str) -> Result<Option<String>, ChannelError> {
        let message: PageMessage = match serde_json::from_str(raw) {
            Ok(m) => m,
            Err(e) => {
                debug!(error = %e, "ignoring unrecognised page message");
                return Ok(None);
            }
        };

        match message {
            PageMessage::Capture => {
                let response = self.on_capture();
                serde_json::to_string(&response)
                    .map(Some)
                    .map_err(|e| ChannelError::Encode {
                        context: "capture response".into(),
                        source: e,
                    })
            }
            PageMessage::Autofill { profile: Some(profile) } => {
                self.on_autofill(&profile);
                Ok(None)
            }
            PageMessage::Autofill { profile: None } => {
                debug!("autofill message without profile ignored");
                Ok(None)
            }
        }
    }
}

// ============================================================================
// LocalChannel: in-process PageChannel
// ============================================================================

/// Delivers JSON-encoded messages to a `ContentScript` in the same process.
pub struct LocalChannel<D> {
    tab: Option<TabId>,
    listener: Option<Arc<Mutex<ContentScript<D>>>>,
}

impl<D: Document> LocalChannel<D> {
    /// An active tab with a listening content script.
    pub fn new(page: D, policy: NotifyPolicy) -> Self {
        LocalChannel {
            tab: Some(TabId(1)),
            listener: Some(Arc::new(Mutex::new(ContentScript::new(page, policy)))),
        }
    }

    /// No page is active.
    pub fn without_tab() -> Self {
        LocalChannel {
            tab: None,
            listener: None,
        }
    }

    /// An active tab whose content script never loaded.
    pub fn detached(tab: TabId) -> Self {
        LocalChannel {
            tab: Some(tab),
            listener: None,
        }
    }

    /// Inspect the listening page, if there is one.
    pub fn with_page<R>(&self, f: impl FnOnce(&D) -> R) -> Option<R> {
        let listener = self.listener.as_ref()?;
        let script = listener.lock().ok()?;
        Some(f(script.page()))
    }

    fn deliver(&self, tab: TabId, message: &PageMessage) -> Result<Option<String>, ChannelError> {
        let listener = match (&self.listener, self.tab) {
            (Some(listener), Some(active)) if active == tab => listener,
            _ => return Err(ChannelError::NoListener(tab)),
        };

        let raw = serde_json::to_string(message).map_err(|e| ChannelError::Encode {
            context: "page message".into(),
            source: e,
        })?;

        let mut script = listener
            .lock()
            .map_err(|e| ChannelError::Disconnected(e.to_string()))?;
        script.handle_raw(&raw)
    }
}

#[async_trait]
impl<D: Document + Send> PageChannel for LocalChannel<D> {
    async fn active_tab(&self) -> Result<Option<TabId>, ChannelError> {
        Ok(self.tab)
    }

    async fn capture(&self, tab: TabId) -> Result<CaptureResponse, ChannelError> {
        match self.deliver(tab, &PageMessage::Capture)? {
            Some(reply) => serde_json::from_str(&reply).map_err(|e| ChannelError::Decode {
                context: "capture response".into(),
                source: e,
            }),
            None => Ok(CaptureResponse::default()),
        }
    }

    async fn autofill(&self, tab: TabId, profile: &Profile) -> Result<(), ChannelError> {
        self.deliver(tab, &PageMessage::autofill(profile))?;
        Ok(())
    }
}
