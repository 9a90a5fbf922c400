//! Remote Configuration
//!
//! Key bindings and step sizes. Embedders may deserialize overrides;
//! missing fields fall back to the defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vidkeys_dom::Key;

/// Which immersive mode the fullscreen key toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImmersiveMode {
    #[default]
    Fullscreen,
    PictureInPicture,
}

/// Dedicated key for every action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub toggle_pause: Key,
    pub seek_backward: Key,
    pub seek_forward: Key,
    pub volume_up: Key,
    pub volume_down: Key,
    pub toggle_mute: Key,
    pub speed_reset: Key,
    pub speed_down: Key,
    pub speed_up: Key,
    pub toggle_fullscreen: Key,
}

impl KeyBindings {
    /// Every binding with its action name
    pub fn entries(&self) -> [(&'static str, &Key); 10] {
        [
            ("toggle_pause", &self.toggle_pause),
            ("seek_backward", &self.seek_backward),
            ("seek_forward", &self.seek_forward),
            ("volume_up", &self.volume_up),
            ("volume_down", &self.volume_down),
            ("toggle_mute", &self.toggle_mute),
            ("speed_reset", &self.speed_reset),
            ("speed_down", &self.speed_down),
            ("speed_up", &self.speed_up),
            ("toggle_fullscreen", &self.toggle_fullscreen),
        ]
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            toggle_pause: Key::Space,
            seek_backward: Key::ArrowLeft,
            seek_forward: Key::ArrowRight,
            volume_up: Key::ArrowUp,
            volume_down: Key::ArrowDown,
            toggle_mute: Key::Character('m'),
            speed_reset: Key::Character('r'),
            speed_down: Key::Character('s'),
            speed_up: Key::Character('d'),
            toggle_fullscreen: Key::Character('f'),
        }
    }
}

/// Remote configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub keys: KeyBindings,

    /// Seconds moved per seek step
    pub seek_step_secs: f64,

    /// Volume change per step, in [0, 1] units
    pub volume_step: f64,

    /// Playback rate change per step
    pub speed_step: f64,
    pub min_speed: f64,
    pub max_speed: f64,

    pub immersive_mode: ImmersiveMode,

    /// Wait before re-scanning after a player-like node is added
    pub settle_delay_ms: u64,

    /// Class-name fragments that mark an added node as a likely player
    pub video_class_hints: Vec<String>,
}

impl Config {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Reject settings the plugins cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("seek_step_secs", self.seek_step_secs),
            ("volume_step", self.volume_step),
            ("speed_step", self.speed_step),
            ("min_speed", self.min_speed),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositiveStep { name, value });
            }
        }
        if !(self.max_speed.is_finite() && self.max_speed > self.min_speed) {
            return Err(ConfigError::InvalidSpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }

        let entries = self.keys.entries();
        for (i, &(first, key)) in entries.iter().enumerate() {
            if let Some(&(second, _)) = entries[i + 1..].iter().find(|(_, other)| key.matches(other)) {
                return Err(ConfigError::DuplicateBinding {
                    key: key.clone(),
                    first,
                    second,
                });
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keys: KeyBindings::default(),
            seek_step_secs: 5.0,
            volume_step: 0.1,
            speed_step: 0.25,
            min_speed: 0.25,
            max_speed: 4.0,
            immersive_mode: ImmersiveMode::Fullscreen,
            settle_delay_ms: 1000,
            video_class_hints: vec!["video".to_string(), "player".to_string()],
        }
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive number, got {value}")]
    NonPositiveStep { name: &'static str, value: f64 },

    #[error("max_speed ({max}) must be greater than min_speed ({min})")]
    InvalidSpeedRange { min: f64, max: f64 },

    #[error("Key {key:?} is bound to both {first} and {second}")]
    DuplicateBinding {
        key: Key,
        first: &'static str,
        second: &'static str,
    },
}
