use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::Mutex;

use thiserror::Error;
use tracing::warn;

use crate::trace::trace::ActionEvent;

#[derive(Debug, Error)]
enum JournalError {
    #[error("could not encode event: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("could not write event: {0}")]
    Write(#[from] io::Error),

    #[error("journal lock poisoned")]
    Poisoned,
}

/// Append-only JSONL journal of controller actions.
///
/// Journaling never fails an action: a journal that cannot be opened is
/// disabled, and a line that cannot be written is dropped with a warning.
pub struct TraceLogger {
    sink: Option<Mutex<File>>,
}

impl TraceLogger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let sink = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .inspect_err(|e| warn!(path = %path.display(), error = %e, "action journal disabled"))
            .ok()
            .map(Mutex::new);
        Self { sink }
    }

    /// Journal to `path` when one is configured.
    pub fn open(path: Option<impl AsRef<Path>>) -> Self {
        path.map_or_else(Self::disabled, Self::new)
    }

    pub fn disabled() -> Self {
        Self { sink: None }
    }

    pub fn log(&self, event: &ActionEvent) {
        if let Err(e) = self.append(event) {
            warn!(action = %event.action, error = %e, "action not journaled");
        }
    }

    fn append(&self, event: &ActionEvent) -> Result<(), JournalError> {
        let Some(sink) = &self.sink else {
            return Ok(());
        };

        // Whole line in one write.
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        let mut file = sink.lock().map_err(|_| JournalError::Poisoned)?;
        file.write_all(&line)?;
        Ok(())
    }
}
