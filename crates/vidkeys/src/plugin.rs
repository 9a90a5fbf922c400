//! Key plugins.
//!
//! Each playback action lives in its own plugin. The router offers every
//! eligible keyboard event to every registered plugin; a plugin answers
//! whether the key is one of its own.
//!
//! # Design
//!
//! - Plugins act on key-down and only claim on key-up, so the host never
//!   sees a lone release for a key it never saw pressed.
//! - Plugins never fail: a stale video turns an action into a no-op.
//! - A plugin may keep state between keys (volume remembers its level
//!   before muting).
//!
//! # Example
//! ```rust,ignore
//! struct Restart(Key);
//!
//! impl Plugin for Restart {
//!     fn name(&self) -> &'static str { "restart" }
//!     fn handles(&self, key: &Key) -> bool { self.0.matches(key) }
//!     fn on_key_down(&mut self, ctx: &mut KeyContext<'_>) -> bool {
//!         if !self.handles(&ctx.event.key) { return false; }
//!         if let Some(video) = ctx.video.as_mut() { video.update(|m| m.seek(0.0)); }
//!         true
//!     }
//! }
//! ```

use vidkeys_dom::{Document, Key, KeyboardEvent, MediaState};

use crate::{Notifier, VideoHandle};

/// The selected video together with the page that owns it
pub struct ActiveVideo<'a> {
    handle: &'a VideoHandle,
    document: &'a mut Document,
}

impl<'a> ActiveVideo<'a> {
    pub fn new(handle: &'a VideoHandle, document: &'a mut Document) -> Self {
        Self { handle, document }
    }

    pub fn handle(&self) -> &VideoHandle {
        self.handle
    }

    /// Current media state, None if the video went away
    pub fn media(&self) -> Option<&MediaState> {
        self.handle.media(self.document)
    }

    /// Mutate the media state, None if the video went away
    pub fn update<R>(&mut self, f: impl FnOnce(&mut MediaState) -> R) -> Option<R> {
        self.handle.with_media(self.document, f)
    }

    pub fn toggle_fullscreen(&mut self) -> Option<bool> {
        self.handle.toggle_fullscreen(self.document)
    }

    pub fn toggle_picture_in_picture(&mut self) -> Option<bool> {
        self.handle.toggle_picture_in_picture(self.document)
    }
}

/// Everything a plugin sees for one key event
pub struct KeyContext<'a> {
    pub event: &'a KeyboardEvent,
    pub video: Option<ActiveVideo<'a>>,
    pub notifier: &'a mut dyn Notifier,
}

impl KeyContext<'_> {
    /// Show feedback to the user
    pub fn notify(&mut self, message: &str) {
        self.notifier.show(message);
    }
}

/// A keyboard-driven playback action
pub trait Plugin {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    /// Whether `key` is one of this plugin's keys
    fn handles(&self, key: &Key) -> bool;

    /// Act on a key press. Returns true if the key was claimed.
    fn on_key_down(&mut self, ctx: &mut KeyContext<'_>) -> bool;

    /// Claim the release of our own keys without acting
    fn on_key_up(&mut self, ctx: &mut KeyContext<'_>) -> bool {
        self.handles(&ctx.event.key)
    }
}

/// Strip float noise so repeated steps land on exact values
pub(crate) fn round_step(value: f64) -> f64 {
    (value * 1e9).round() / 1e9
}
