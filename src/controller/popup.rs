use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::controller::status::{DEFAULT_STATUS_TIMEOUT, LOAD_FAILURE_STATUS_TIMEOUT, StatusLine};
use crate::messaging::protocol::{ChannelError, PageChannel};
use crate::profile::profile_model::{Profile, field_count_label};
use crate::profile::store::{KeyValueStore, ProfileStore, StoreError};
use crate::trace::logger::TraceLogger;
use crate::trace::trace::ActionEvent;

/// User-triggered controller actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupAction {
    Load,
    Capture,
    Fill,
    Clear,
}

/// Every status the controller can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusMessage {
    NoActiveTab,
    NoFieldsFound,
    FieldsSaved,
    CaptureFailed,
    SaveFirst,
    AutofillSent,
    AutofillFailed,
    Cleared,
    ClearFailed,
    LoadFailed,
}

impl fmt::Display for StatusMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            StatusMessage::NoActiveTab => "No active tab found",
            StatusMessage::NoFieldsFound => "No filled fields found",
            StatusMessage::FieldsSaved => "Fields saved from page!",
            StatusMessage::CaptureFailed => "Unable to capture fields",
            StatusMessage::SaveFirst => "Save fields first",
            StatusMessage::AutofillSent => "Autofill sent!",
            StatusMessage::AutofillFailed => "Unable to autofill page",
            StatusMessage::Cleared => "Saved fields cleared",
            StatusMessage::ClearFailed => "Unable to clear saved fields",
            StatusMessage::LoadFailed => "Unable to load profile",
        };
        f.write_str(text)
    }
}

impl StatusMessage {
    /// The action could not do what the user asked.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StatusMessage::NoActiveTab
                | StatusMessage::CaptureFailed
                | StatusMessage::AutofillFailed
                | StatusMessage::ClearFailed
                | StatusMessage::LoadFailed
        )
    }
}

/// Failure inside an action, before it is reduced to a `StatusMessage`.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupSettings {
    pub status_timeout: Duration,
    pub load_failure_timeout: Duration,
}

impl Default for PopupSettings {
    fn default() -> Self {
        Self {
            status_timeout: DEFAULT_STATUS_TIMEOUT,
            load_failure_timeout: LOAD_FAILURE_STATUS_TIMEOUT,
        }
    }
}

// ============================================================================
// Popup: capture / fill / clear controller
// ============================================================================

/// Sequences the store and the page channel behind the three triggers, and
/// owns the two passive displays (status text, field count).
pub struct Popup<S, C> {
    store: ProfileStore<S>,
    channel: C,
    status: StatusLine,
    field_count: usize,
    settings: PopupSettings,
    journal: TraceLogger,
}

impl<S: KeyValueStore, C: PageChannel> Popup<S, C> {
    pub fn new(store: ProfileStore<S>, channel: C) -> Self {
        Popup {
            store,
            channel,
            status: StatusLine::new(),
            field_count: 0,
            settings: PopupSettings::default(),
            journal: TraceLogger::disabled(),
        }
    }

    pub fn with_settings(mut self, settings: PopupSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_journal(mut self, journal: TraceLogger) -> Self {
        self.journal = journal;
        self
    }

    pub fn status_text(&self) -> String {
        self.status.text()
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    pub fn count_label(&self) -> String {
        field_count_label(self.field_count)
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn store(&self) -> &ProfileStore<S> {
        &self.store
    }

    fn update_count(&mut self, profile: Option<&Profile>) {
        self.field_count = profile.map_or(0, Profile::len);
    }

    async fn load_profile(&mut self) -> Result<Option<Profile>, StoreError> {
        let profile = self.store.load().await?;
        self.update_count(profile.as_ref());
        Ok(profile)
    }

    fn report(
        &mut self,
        action: PopupAction,
        result: Result<StatusMessage, ActionError>,
        failure: StatusMessage,
    ) -> StatusMessage {
        let (message, error) = match result {
            Ok(message) => (message, None),
            Err(e) => {
                warn!(action = ?action, error = %e, "action failed");
                (failure, Some(e))
            }
        };

        let timeout = if message == StatusMessage::LoadFailed {
            self.settings.load_failure_timeout
        } else {
            self.settings.status_timeout
        };
        self.status.set_status(message.to_string(), Some(timeout));

        let mut event = ActionEvent::now(action, message).with_field_count(self.field_count);
        if let Some(e) = error {
            event = event.with_error(e);
        }
        self.journal.log(&event);

        info!(action = ?action, status = %message, fields = self.field_count, "action finished");
        message
    }

    /// Show the stored profile's count. Returns a status only on failure.
    pub async fn load(&mut self) -> Option<StatusMessage> {
        match self.load_profile().await {
            Ok(_) => None,
            Err(e) => Some(self.report(
                PopupAction::Load,
                Err(e.into()),
                StatusMessage::LoadFailed,
            )),
        }
    }

    pub async fn capture(&mut self) -> StatusMessage {
        let result = self.try_capture().await;
        self.report(PopupAction::Capture, result, StatusMessage::CaptureFailed)
    }

    async fn try_capture(&mut self) -> Result<StatusMessage, ActionError> {
        let Some(tab) = self.channel.active_tab().await? else {
            return Ok(StatusMessage::NoActiveTab);
        };

        let response = self.channel.capture(tab).await?;
        let Some(profile) = response.profile.filter(|p| !p.is_empty()) else {
            return Ok(StatusMessage::NoFieldsFound);
        };

        self.store.save(&profile).await?;
        self.update_count(Some(&profile));
        Ok(StatusMessage::FieldsSaved)
    }

    /// Send the stored profile to the active page. What the page does with
    /// it is not observed.
    pub async fn fill(&mut self) -> StatusMessage {
        let result = self.try_fill().await;
        self.report(PopupAction::Fill, result, StatusMessage::AutofillFailed)
    }

    async fn try_fill(&mut self) -> Result<StatusMessage, ActionError> {
        let profile = match self.load_profile().await? {
            Some(profile) if !profile.is_empty() => profile,
            _ => return Ok(StatusMessage::SaveFirst),
        };

        let Some(tab) = self.channel.active_tab().await? else {
            return Ok(StatusMessage::NoActiveTab);
        };

        self.channel.autofill(tab, &profile).await?;
        Ok(StatusMessage::AutofillSent)
    }

    pub async fn clear(&mut self) -> StatusMessage {
        let result: Result<StatusMessage, ActionError> = match self.store.clear().await {
            Ok(()) => {
                self.update_count(None);
                Ok(StatusMessage::Cleared)
            }
            Err(e) => Err(e.into()),
        };
        self.report(PopupAction::Clear, result, StatusMessage::ClearFailed)
    }
}
