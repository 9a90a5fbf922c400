//! Play/pause toggle

use vidkeys_dom::Key;

use crate::{Config, KeyContext, Plugin};

#[derive(Debug, Clone)]
pub struct PausePlugin {
    key: Key,
}

impl PausePlugin {
    pub fn new(key: Key) -> Self {
        Self { key }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.keys.toggle_pause.clone())
    }
}

impl Plugin for PausePlugin {
    fn name(&self) -> &'static str {
        "pause"
    }

    fn handles(&self, key: &Key) -> bool {
        self.key.matches(key)
    }

    fn on_key_down(&mut self, ctx: &mut KeyContext<'_>) -> bool {
        if !self.handles(&ctx.event.key) {
            return false;
        }
        let Some(video) = ctx.video.as_mut() else {
            return false;
        };
        let paused = video.update(|media| {
            if media.paused {
                media.play();
            } else {
                media.pause();
            }
            media.paused
        });
        if let Some(paused) = paused {
            ctx.notify(if paused { "Paused" } else { "Playing" });
        }
        true
    }
}
