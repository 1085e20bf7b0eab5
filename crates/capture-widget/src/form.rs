use crate::ChangeEvent;
use tokio::sync::broadcast::{self, error::TryRecvError};

/// Message shown when leaving a form with unsaved changes.
pub const UNSAVED_CHANGES_MESSAGE: &str =
    "You have unsaved changes. Are you sure you want to leave?";

/// Dirty tracking for one form.
#[derive(Clone, Debug, Default)]
pub struct FormState {
    modified: bool,
}

impl FormState {
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// A field received user input.
    pub fn input(&mut self) {
        self.modified = true;
    }

    /// The form is being submitted; its changes are no longer at risk.
    pub fn submit(&mut self) {
        self.modified = false;
    }

    /// The confirmation to show before navigating away, if any.
    pub fn before_unload(&self) -> Option<&'static str> {
        self.modified.then_some(UNSAVED_CHANGES_MESSAGE)
    }

    /// Drain pending change events without waiting. Returns how many
    /// were seen; events lost to lag count as one.
    pub fn observe(&mut self, changes: &mut broadcast::Receiver<ChangeEvent>) -> usize {
        let mut seen = 0;
        loop {
            match changes.try_recv() {
                Ok(event) => {
                    log::debug!("form field {} changed", event.field);
                    seen += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    log::debug!("form missed {} change events", skipped);
                    seen += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        if seen > 0 {
            self.input();
        }
        seen
    }
}
