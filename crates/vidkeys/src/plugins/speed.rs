//! Playback speed

use vidkeys_dom::Key;

use crate::plugin::round_step;
use crate::{Config, KeyContext, Plugin};

#[derive(Debug, Clone)]
pub struct SpeedPlugin {
    reset: Key,
    slower: Key,
    faster: Key,
    step: f64,
    min: f64,
    max: f64,
}

impl SpeedPlugin {
    pub fn from_config(config: &Config) -> Self {
        Self {
            reset: config.keys.speed_reset.clone(),
            slower: config.keys.speed_down.clone(),
            faster: config.keys.speed_up.clone(),
            step: config.speed_step,
            min: config.min_speed,
            max: config.max_speed,
        }
    }

    fn target(&self, key: &Key, current: f64) -> Option<f64> {
        if self.reset.matches(key) {
            Some(1.0)
        } else if self.slower.matches(key) {
            Some(round_step(current - self.step).clamp(self.min, self.max))
        } else if self.faster.matches(key) {
            Some(round_step(current + self.step).clamp(self.min, self.max))
        } else {
            None
        }
    }
}

impl Plugin for SpeedPlugin {
    fn name(&self) -> &'static str {
        "speed"
    }

    fn handles(&self, key: &Key) -> bool {
        self.target(key, 1.0).is_some()
    }

    fn on_key_down(&mut self, ctx: &mut KeyContext<'_>) -> bool {
        if !self.handles(&ctx.event.key) {
            return false;
        }
        let key = &ctx.event.key;
        let Some(video) = ctx.video.as_mut() else {
            return false;
        };
        let rate = video.update(|media| {
            if let Some(rate) = self.target(key, media.playback_rate) {
                media.set_playback_rate(rate);
            }
            media.playback_rate
        });
        if let Some(rate) = rate {
            ctx.notify(&format!("Speed {rate}x"));
        }
        true
    }
}
