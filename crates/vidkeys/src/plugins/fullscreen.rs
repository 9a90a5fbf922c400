//! Fullscreen or picture-in-picture toggle

use vidkeys_dom::Key;

use crate::{Config, ImmersiveMode, KeyContext, Plugin};

#[derive(Debug, Clone)]
pub struct FullscreenPlugin {
    key: Key,
    mode: ImmersiveMode,
}

impl FullscreenPlugin {
    pub fn new(key: Key, mode: ImmersiveMode) -> Self {
        Self { key, mode }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.keys.toggle_fullscreen.clone(), config.immersive_mode)
    }
}

impl Plugin for FullscreenPlugin {
    fn name(&self) -> &'static str {
        "fullscreen"
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
        let message = match self.mode {
            ImmersiveMode::Fullscreen => video
                .toggle_fullscreen()
                .map(|on| if on { "Fullscreen" } else { "Exit fullscreen" }),
            ImmersiveMode::PictureInPicture => video
                .toggle_picture_in_picture()
                .map(|on| if on { "Picture-in-picture" } else { "Exit picture-in-picture" }),
        };
        if let Some(message) = message {
            ctx.notify(message);
        }
        true
    }
}
