//! Window Events
//!
//! KeyboardEvent with key values and modifiers, plus the window-level
//! listener registry with capture and bubble phases.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Scope;

/// Keyboard event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardEventType {
    KeyDown,
    KeyUp,
}

/// Key value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Printable character
    Character(char),

    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,

    // Editing
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,

    // Whitespace
    Space,

    // Other
    Unidentified(String),
}

impl Key {
    /// Parse from a DOM `key` string
    pub fn parse(s: &str) -> Self {
        match s {
            "ArrowUp" => Self::ArrowUp,
            "ArrowDown" => Self::ArrowDown,
            "ArrowLeft" => Self::ArrowLeft,
            "ArrowRight" => Self::ArrowRight,
            "Home" => Self::Home,
            "End" => Self::End,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Backspace" => Self::Backspace,
            "Delete" => Self::Delete,
            "Enter" => Self::Enter,
            "Tab" => Self::Tab,
            "Escape" => Self::Escape,
            " " | "Space" | "Spacebar" => Self::Space,
            s => {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Character(c),
                    _ => Self::Unidentified(s.to_string()),
                }
            }
        }
    }

    /// Whether two keys name the same key, ignoring letter case
    pub fn matches(&self, other: &Key) -> bool {
        match (self, other) {
            (Self::Character(a), Self::Character(b)) => {
                a == b || a.to_lowercase().eq(b.to_lowercase())
            }
            _ => self == other,
        }
    }
}

/// Key modifiers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool, // Cmd on Mac, Win on Windows
}

impl KeyModifiers {
    /// Check if any modifier is pressed
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }

    /// Control, Alt or Meta held: the key is part of a shortcut chord
    pub fn is_chord(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }

    /// Create from booleans
    pub fn from_flags(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Self {
        Self { shift, ctrl, alt, meta }
    }
}

/// Keyboard event
#[derive(Debug, Clone)]
pub struct KeyboardEvent {
    pub event_type: KeyboardEventType,
    pub key: Key,
    pub modifiers: KeyModifiers,

    // Event state
    pub cancelable: bool,
    default_prevented: bool,
    propagation_stopped: bool,
    immediate_propagation_stopped: bool,
}

impl KeyboardEvent {
    /// Create a new keyboard event
    pub fn new(event_type: KeyboardEventType, key: Key) -> Self {
        Self {
            event_type,
            key,
            modifiers: KeyModifiers::default(),
            cancelable: true,
            default_prevented: false,
            propagation_stopped: false,
            immediate_propagation_stopped: false,
        }
    }

    pub fn key_down(key: Key) -> Self {
        Self::new(KeyboardEventType::KeyDown, key)
    }

    pub fn key_up(key: Key) -> Self {
        Self::new(KeyboardEventType::KeyUp, key)
    }

    /// Add modifiers
    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Prevent default
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    /// Stop propagation to the next phase
    pub fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }

    /// Stop propagation to every remaining listener
    pub fn stop_immediate_propagation(&mut self) {
        self.propagation_stopped = true;
        self.immediate_propagation_stopped = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }

    pub fn is_propagation_stopped(&self) -> bool {
        self.propagation_stopped
    }

    pub fn is_immediate_propagation_stopped(&self) -> bool {
        self.immediate_propagation_stopped
    }
}

/// Window event types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    KeyDown,
    KeyUp,
    HashChange,
    Unload,
}

/// Event delivered to window listeners
#[derive(Debug, Clone)]
pub enum WindowEvent {
    Keyboard(KeyboardEvent),
    HashChange { old_url: String, new_url: String },
    Unload,
}

impl WindowEvent {
    pub fn event_type(&self) -> EventType {
        match self {
            Self::Keyboard(e) => match e.event_type {
                KeyboardEventType::KeyDown => EventType::KeyDown,
                KeyboardEventType::KeyUp => EventType::KeyUp,
            },
            Self::HashChange { .. } => EventType::HashChange,
            Self::Unload => EventType::Unload,
        }
    }

    pub fn as_keyboard(&self) -> Option<&KeyboardEvent> {
        match self {
            Self::Keyboard(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_keyboard_mut(&mut self) -> Option<&mut KeyboardEvent> {
        match self {
            Self::Keyboard(e) => Some(e),
            _ => None,
        }
    }

    fn propagation_stopped(&self) -> bool {
        self.as_keyboard().is_some_and(KeyboardEvent::is_propagation_stopped)
    }

    fn immediate_propagation_stopped(&self) -> bool {
        self.as_keyboard().is_some_and(KeyboardEvent::is_immediate_propagation_stopped)
    }
}

/// Event listener options
#[derive(Debug, Clone, Copy, Default)]
pub struct ListenerOptions {
    pub capture: bool,
}

impl ListenerOptions {
    pub fn capture() -> Self {
        Self { capture: true }
    }
}

/// Handle returned by `Window::add_event_listener`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Window event listener
pub type EventListener = Box<dyn FnMut(&mut WindowEvent, &mut Scope<'_>)>;

struct Registration {
    id: ListenerId,
    event_type: EventType,
    capture: bool,
    listener: EventListener,
}

/// Window listener registry
#[derive(Default)]
pub struct Window {
    listeners: Vec<Registration>,
    next_id: u64,
}

impl Window {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add event listener
    pub fn add_event_listener(
        &mut self,
        event_type: EventType,
        options: ListenerOptions,
        listener: EventListener,
    ) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.push(Registration {
            id,
            event_type,
            capture: options.capture,
            listener,
        });
        id
    }

    /// Remove event listener
    pub fn remove_event_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|r| r.id != id);
        self.listeners.len() < before
    }

    /// Number of listeners for an event type
    pub fn listener_count(&self, event_type: EventType) -> usize {
        self.listeners.iter().filter(|r| r.event_type == event_type).count()
    }

    /// Dispatch an event: capture listeners first, then bubble listeners,
    /// each phase in registration order.
    pub fn dispatch(&mut self, event: &mut WindowEvent, scope: &mut Scope<'_>) {
        let event_type = event.event_type();
        for capture_phase in [true, false] {
            for registration in self
                .listeners
                .iter_mut()
                .filter(|r| r.event_type == event_type && r.capture == capture_phase)
            {
                (registration.listener)(event, scope);
                if event.immediate_propagation_stopped() {
                    return;
                }
            }
            if event.propagation_stopped() {
                return;
            }
        }
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
