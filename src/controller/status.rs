use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::task::JoinHandle;

pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_millis(2000);
pub const LOAD_FAILURE_STATUS_TIMEOUT: Duration = Duration::from_millis(3000);

#[derive(Debug, Default)]
struct StatusState {
    text: String,
    generation: u64,
}

fn lock(state: &Mutex<StatusState>) -> MutexGuard<'_, StatusState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Transient status text with at most one pending auto-clear.
///
/// Every update bumps a generation counter; an auto-clear only fires if no
/// newer update happened since it was scheduled.
#[derive(Debug, Default)]
pub struct StatusLine {
    state: Arc<Mutex<StatusState>>,
    pending: Option<JoinHandle<()>>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> String {
        lock(&self.state).text.clone()
    }

    pub fn has_pending_clear(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Show `message`, clearing it after `timeout` (`None` or zero keeps it).
    ///
    /// Outside a tokio runtime the message is shown but never auto-cleared.
    pub fn set_status(&mut self, message: impl Into<String>, timeout: Option<Duration>) {
        self.cancel_pending();

        let generation = {
            let mut state = lock(&self.state);
            state.generation += 1;
            state.text = message.into();
            state.generation
        };

        let Some(timeout) = timeout.filter(|t| !t.is_zero()) else {
            return;
        };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let state = Arc::clone(&self.state);
        self.pending = Some(runtime.spawn(async move {
            tokio::time::sleep(timeout).await;
            let mut state = lock(&state);
            if state.generation == generation {
                state.text.clear();
            }
        }));
    }

    pub fn clear(&mut self) {
        self.cancel_pending();
        let mut state = lock(&self.state);
        state.generation += 1;
        state.text.clear();
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for StatusLine {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
