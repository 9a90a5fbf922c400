//! Feedback Notifications
//!
//! Short messages shown after an action ("Volume 50%", "Paused").

use std::cell::RefCell;
use std::rc::Rc;

/// Receives user-facing feedback
pub trait Notifier {
    fn show(&mut self, message: &str);
}

/// Emits notifications as tracing events
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn show(&mut self, message: &str) {
        tracing::info!(target: "vidkeys::notify", "{}", message);
    }
}

/// Keeps every message; clones share the same log
#[derive(Debug, Default, Clone)]
pub struct RecordingNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages shown so far
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.messages.borrow().last().cloned()
    }

    pub fn clear(&self) {
        self.messages.borrow_mut().clear();
    }
}

impl Notifier for RecordingNotifier {
    fn show(&mut self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
