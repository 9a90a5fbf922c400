//! Relative seeking

use vidkeys_dom::Key;

use crate::{Config, KeyContext, Plugin};

#[derive(Debug, Clone)]
pub struct SeekPlugin {
    backward: Key,
    forward: Key,
    step: f64,
}

impl SeekPlugin {
    pub fn new(backward: Key, forward: Key, step: f64) -> Self {
        Self { backward, forward, step }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.keys.seek_backward.clone(),
            config.keys.seek_forward.clone(),
            config.seek_step_secs,
        )
    }
}

impl Plugin for SeekPlugin {
    fn name(&self) -> &'static str {
        "seek"
    }

    fn handles(&self, key: &Key) -> bool {
        self.backward.matches(key) || self.forward.matches(key)
    }

    fn on_key_down(&mut self, ctx: &mut KeyContext<'_>) -> bool {
        let offset = if self.backward.matches(&ctx.event.key) {
            -self.step
        } else if self.forward.matches(&ctx.event.key) {
            self.step
        } else {
            return false;
        };
        let Some(video) = ctx.video.as_mut() else {
            return false;
        };
        if video.update(|media| media.seek(media.current_time + offset)).is_some() {
            let message = if offset < 0.0 {
                format!("Rewind {}s", self.step)
            } else {
                format!("Forward {}s", self.step)
            };
            ctx.notify(&message);
        }
        true
    }
}
