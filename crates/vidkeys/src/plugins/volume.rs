//! Volume steps and mute toggle
//!
//! Muting drops the volume to zero and remembers the previous level;
//! unmuting restores it (full volume if nothing was remembered).

use vidkeys_dom::{Key, MediaState};

use crate::plugin::round_step;
use crate::{Config, KeyContext, Plugin};

#[derive(Debug, Clone)]
pub struct VolumePlugin {
    up: Key,
    down: Key,
    mute: Key,
    step: f64,
    saved_volume: Option<f64>,
}

enum Action {
    Step(f64),
    ToggleMute,
}

impl VolumePlugin {
    pub fn new(up: Key, down: Key, mute: Key, step: f64) -> Self {
        Self {
            up,
            down,
            mute,
            step,
            saved_volume: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.keys.volume_up.clone(),
            config.keys.volume_down.clone(),
            config.keys.toggle_mute.clone(),
            config.volume_step,
        )
    }

    fn action(&self, key: &Key) -> Option<Action> {
        if self.up.matches(key) {
            Some(Action::Step(self.step))
        } else if self.down.matches(key) {
            Some(Action::Step(-self.step))
        } else if self.mute.matches(key) {
            Some(Action::ToggleMute)
        } else {
            None
        }
    }

    fn toggle_mute(&mut self, media: &mut MediaState) -> String {
        let audible = !media.muted && media.volume > 0.0;
        if audible {
            self.saved_volume = Some(media.volume);
            media.set_volume(0.0);
            return "Muted".to_string();
        }

        let restored = match self.saved_volume.take() {
            Some(volume) => volume,
            None if media.volume > 0.0 => media.volume,
            None => 1.0,
        };
        media.muted = false;
        media.set_volume(restored);
        volume_message(media.volume)
    }
}

fn volume_message(volume: f64) -> String {
    format!("Volume {}%", (volume * 100.0).round() as i64)
}

impl Plugin for VolumePlugin {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn handles(&self, key: &Key) -> bool {
        self.action(key).is_some()
    }

    fn on_key_down(&mut self, ctx: &mut KeyContext<'_>) -> bool {
        let Some(action) = self.action(&ctx.event.key) else {
            return false;
        };
        let Some(video) = ctx.video.as_mut() else {
            return false;
        };
        let message = video.update(|media| match action {
            Action::Step(delta) => {
                media.set_volume(round_step(media.volume + delta));
                volume_message(media.volume)
            }
            Action::ToggleMute => self.toggle_mute(media),
        });
        if let Some(message) = message {
            ctx.notify(&message);
        }
        true
    }
}
