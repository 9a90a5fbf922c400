//! vidkeys - Keyboard remote control for page video
//!
//! Finds every playable video in a page (including same-origin frames),
//! keeps one of them selected, and routes dedicated keys to playback
//! plugins before the page's own handlers see them.
//!
//! ```no_run
//! use vidkeys::{Config, RemoteController, TracingNotifier};
//! use vidkeys_dom::Page;
//!
//! let mut page = Page::parse("https://example.com/watch").unwrap();
//! let mut remote = RemoteController::new(Config::default(), Box::new(TracingNotifier)).unwrap();
//! remote.start(&mut page).unwrap();
//! ```

pub mod config;
pub mod video;
pub mod discovery;
pub mod selection;
pub mod watcher;
pub mod notifier;
pub mod plugin;
pub mod plugins;
pub mod router;
pub mod picker;
pub mod controller;

pub use config::{Config, ConfigError, ImmersiveMode, KeyBindings};
pub use video::VideoHandle;
pub use discovery::{discover, VideoList};
pub use selection::SelectionState;
pub use watcher::MutationWatcher;
pub use notifier::{Notifier, RecordingNotifier, TracingNotifier};
pub use plugin::{ActiveVideo, KeyContext, Plugin};
pub use router::KeyRouter;
pub use picker::{Picker, PickerEntry};
pub use controller::RemoteController;

/// Remote control error
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("No video at index {index} ({len} available)")]
    SelectionOutOfRange { index: usize, len: usize },

    #[error("Remote control is already running on this page")]
    AlreadyStarted,

    #[error("Page has been unloaded")]
    PageUnloaded,
}
