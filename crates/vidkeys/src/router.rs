//! Key Router
//!
//! Filters keyboard events, offers the survivors to every plugin and
//! suppresses the ones a plugin claimed.

use vidkeys_dom::{Document, KeyboardEvent, KeyboardEventType};

use crate::plugins::default_plugins;
use crate::{ActiveVideo, Config, KeyContext, Notifier, Plugin, VideoHandle};

/// Routes keys to plugins
pub struct KeyRouter {
    plugins: Vec<Box<dyn Plugin>>,
}

impl KeyRouter {
    pub fn new(plugins: Vec<Box<dyn Plugin>>) -> Self {
        Self { plugins }
    }

    /// Router with the built-in plugins
    pub fn from_config(config: &Config) -> Self {
        Self::new(default_plugins(config))
    }

    /// Add a plugin after the existing ones
    pub fn register(&mut self, plugin: Box<dyn Plugin>) {
        tracing::debug!("Registered plugin {}", plugin.name());
        self.plugins.push(plugin);
    }

    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// Whether the remote should look at this event at all.
    ///
    /// Keys typed into text fields, shortcut chords (Control, Alt, Meta)
    /// and keys pressed while no video is selected belong to the page.
    pub fn is_eligible(event: &KeyboardEvent, document: &Document, active: Option<&VideoHandle>) -> bool {
        if document.active_element().is_some_and(|node| document.is_text_entry(node)) {
            return false;
        }
        if event.modifiers.is_chord() {
            return false;
        }
        active.is_some()
    }

    /// Offer the event to every plugin.
    ///
    /// All plugins run even after one has claimed the key. Returns true
    /// if any of them claimed it.
    pub fn dispatch(
        &mut self,
        event: &KeyboardEvent,
        video: Option<ActiveVideo<'_>>,
        notifier: &mut dyn Notifier,
    ) -> bool {
        let mut ctx = KeyContext { event, video, notifier };
        let mut claimed = false;
        for plugin in self.plugins.iter_mut() {
            let handled = match event.event_type {
                KeyboardEventType::KeyDown => plugin.on_key_down(&mut ctx),
                KeyboardEventType::KeyUp => plugin.on_key_up(&mut ctx),
            };
            if handled {
                tracing::trace!("{} claimed {:?}", plugin.name(), event.key);
            }
            claimed |= handled;
        }
        claimed
    }

    /// Filter, dispatch and suppress. Returns true if the event was
    /// claimed and stopped.
    pub fn route(
        &mut self,
        event: &mut KeyboardEvent,
        document: &mut Document,
        active: Option<&VideoHandle>,
        notifier: &mut dyn Notifier,
    ) -> bool {
        if !Self::is_eligible(event, document, active) {
            tracing::trace!("Passing {:?} through to the page", event.key);
            return false;
        }
        let video = active.map(|handle| ActiveVideo::new(handle, document));
        if !self.dispatch(event, video, notifier) {
            return false;
        }
        event.prevent_default();
        event.stop_immediate_propagation();
        true
    }
}

impl std::fmt::Debug for KeyRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyRouter")
            .field("plugins", &self.plugin_names())
            .finish()
    }
}
