//! Recorder for edit brackets and deletions on the in-memory store

use std::sync::{Arc, Mutex};

use super::guard;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditHook {
    Begin,
    End,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditEvent {
    pub hook: EditHook,
    /// Node the hook ran on
    pub node_path: String,
    /// Selection the bracket was opened for, or the removed child on delete
    pub source_path: String,
    pub new: bool,
    pub edit_root: bool,
}

/// Shared, append-only event list
#[derive(Debug, Clone, Default)]
pub struct EditLog {
    events: Arc<Mutex<Vec<EditEvent>>>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn record(&self, event: EditEvent) {
        guard(&self.events).push(event);
    }

    pub fn events(&self) -> Vec<EditEvent> {
        guard(&self.events).clone()
    }

    /// Events of one hook kind, oldest first
    pub fn of(&self, hook: EditHook) -> Vec<EditEvent> {
        guard(&self.events)
            .iter()
            .filter(|e| e.hook == hook)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        guard(&self.events).clear();
    }
}
