//! Page - document, window and event loop
//!
//! A single-threaded host: window listeners, mutation observer callbacks
//! and timers all run on the caller's thread. Mutation records are
//! delivered after every dispatched event and every timer task, and
//! work that is already due runs before the next input event.

use std::fmt;
use std::time::Duration;

use crate::events::EventListener;
use crate::timers::TimerCallback;
use crate::{
    Document, DomError, EventType, KeyboardEvent, Key, ListenerId, ListenerOptions,
    MutationObserverInit, MutationRecord, NodeId, ObserverId, TimerId, TimerQueue, Window, WindowEvent,
};

/// What callbacks may touch while they run
pub struct Scope<'a> {
    pub document: &'a mut Document,
    pub timers: &'a mut TimerQueue,
}

impl Scope<'_> {
    /// Current page time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    /// Schedule a task
    pub fn set_timeout(&mut self, delay: Duration, callback: TimerCallback) -> TimerId {
        self.timers.set_timeout(delay, callback)
    }
}

/// Mutation observer callback
pub type MutationCallback = Box<dyn FnMut(&[MutationRecord], &mut Scope<'_>)>;

/// A loaded page
pub struct Page {
    window: Window,
    document: Document,
    timers: TimerQueue,
    observers: Vec<(ObserverId, MutationCallback)>,
    unloaded: bool,
}

impl Page {
    pub fn new(document: Document) -> Self {
        Self {
            window: Window::new(),
            document,
            timers: TimerQueue::new(),
            observers: Vec::new(),
            unloaded: false,
        }
    }

    /// Create a page with an empty document at `url`
    pub fn parse(url: &str) -> Result<Self, DomError> {
        Ok(Self::new(Document::parse(url)?))
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Current page time
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn is_unloaded(&self) -> bool {
        self.unloaded
    }

    /// Register a window listener
    pub fn add_event_listener(
        &mut self,
        event_type: EventType,
        options: ListenerOptions,
        listener: EventListener,
    ) -> ListenerId {
        self.window.add_event_listener(event_type, options, listener)
    }

    /// Remove a window listener
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        self.window.remove_event_listener(id)
    }

    /// Observe mutations below `target`
    pub fn observe_mutations(
        &mut self,
        target: NodeId,
        options: MutationObserverInit,
        callback: MutationCallback,
    ) -> ObserverId {
        let id = self.document.observe(target, options);
        self.observers.push((id, callback));
        id
    }

    /// Stop an observer and drop its callback
    pub fn disconnect_observer(&mut self, id: ObserverId) -> bool {
        self.observers.retain(|(owner, _)| *owner != id);
        self.document.disconnect(id)
    }

    /// Schedule a task from outside any callback
    pub fn set_timeout(&mut self, delay: Duration, callback: TimerCallback) -> TimerId {
        self.timers.set_timeout(delay, callback)
    }

    fn dispatch(&mut self, event: &mut WindowEvent) {
        let mut scope = Scope {
            document: &mut self.document,
            timers: &mut self.timers,
        };
        self.window.dispatch(event, &mut scope);
        self.deliver_mutations();
    }

    /// Dispatch a keyboard event to window listeners and return it
    /// with its final propagation state.
    pub fn dispatch_key(&mut self, event: KeyboardEvent) -> KeyboardEvent {
        if self.unloaded {
            return event;
        }
        self.run_until_idle();
        let mut wrapped = WindowEvent::Keyboard(event.clone());
        self.dispatch(&mut wrapped);
        wrapped.as_keyboard().cloned().unwrap_or(event)
    }

    /// Press and release a key
    pub fn press(&mut self, key: Key) -> (KeyboardEvent, KeyboardEvent) {
        let down = self.dispatch_key(KeyboardEvent::key_down(key.clone()));
        let up = self.dispatch_key(KeyboardEvent::key_up(key));
        (down, up)
    }

    /// In-page navigation to `#fragment`
    pub fn navigate_hash(&mut self, fragment: &str) {
        if self.unloaded {
            return;
        }
        self.run_until_idle();
        let old_url = self.document.url().to_string();
        self.document.set_fragment(Some(fragment));
        let new_url = self.document.url().to_string();
        if old_url == new_url {
            return;
        }
        tracing::debug!("hashchange {} -> {}", old_url, new_url);
        self.dispatch(&mut WindowEvent::HashChange { old_url, new_url });
    }

    /// Fire `unload`; afterwards the page runs nothing
    pub fn unload(&mut self) {
        if self.unloaded {
            return;
        }
        self.dispatch(&mut WindowEvent::Unload);
        self.unloaded = true;
    }

    /// Hand queued mutation records to their observers.
    ///
    /// Returns false if nothing was queued.
    pub fn deliver_mutations(&mut self) -> bool {
        let records = self.document.take_records();
        if records.is_empty() {
            let document = &self.document;
            self.observers.retain(|(id, _)| document.is_observing(*id));
            return false;
        }

        for (id, callback) in self.observers.iter_mut() {
            if !self.document.is_observing(*id) {
                continue;
            }
            let batch: Vec<MutationRecord> = records
                .iter()
                .filter(|(owner, _)| *owner == *id)
                .map(|(_, record)| record.clone())
                .collect();
            if batch.is_empty() {
                continue;
            }
            let mut scope = Scope {
                document: &mut self.document,
                timers: &mut self.timers,
            };
            callback(&batch, &mut scope);
        }

        let document = &self.document;
        self.observers.retain(|(id, _)| document.is_observing(*id));
        true
    }

    fn run_next_timer(&mut self) -> bool {
        let Some(callback) = self.timers.pop_due() else {
            return false;
        };
        let mut scope = Scope {
            document: &mut self.document,
            timers: &mut self.timers,
        };
        callback(&mut scope);
        self.deliver_mutations();
        true
    }

    /// Run queued work until nothing is due at the current time
    pub fn run_until_idle(&mut self) {
        if self.unloaded {
            return;
        }
        loop {
            let delivered = self.deliver_mutations();
            let ran = self.run_next_timer();
            if !delivered && !ran {
                break;
            }
        }
    }

    /// Move the clock forward, running timers as they come due
    pub fn advance(&mut self, by: Duration) {
        if self.unloaded {
            return;
        }
        let target = self.timers.now() + by;
        loop {
            self.run_until_idle();
            match self.timers.next_due() {
                Some(due) if due <= target => self.timers.set_now(due),
                _ => break,
            }
        }
        self.timers.set_now(target);
        self.run_until_idle();
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.document.url().as_str())
            .field("window", &self.window)
            .field("timers", &self.timers)
            .field("observers", &self.observers.len())
            .field("unloaded", &self.unloaded)
            .finish()
    }
}
