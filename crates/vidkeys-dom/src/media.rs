//! Media Elements
//!
//! Playback state shared by `<video>` and `<audio>` elements.

/// Slowest playback rate the host accepts
pub const MIN_PLAYBACK_RATE: f64 = 0.0625;
/// Fastest playback rate the host accepts
pub const MAX_PLAYBACK_RATE: f64 = 16.0;

/// Media playback state
#[derive(Debug, Clone, PartialEq)]
pub struct MediaState {
    // Playback
    pub current_time: f64,
    pub duration: f64,
    pub paused: bool,
    pub ended: bool,

    // Volume
    pub volume: f64,
    pub muted: bool,

    // Playback rate
    pub playback_rate: f64,
}

impl MediaState {
    pub fn new() -> Self {
        Self {
            current_time: 0.0,
            duration: f64::NAN,
            paused: true,
            ended: false,
            volume: 1.0,
            muted: false,
            playback_rate: 1.0,
        }
    }

    /// Start playback
    pub fn play(&mut self) {
        if self.ended {
            self.current_time = 0.0;
        }
        self.paused = false;
        self.ended = false;
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Seek to a time, clamped to the known duration
    pub fn seek(&mut self, time: f64) {
        if !time.is_finite() {
            return;
        }
        let upper = if self.duration.is_finite() { self.duration } else { f64::MAX };
        self.current_time = time.clamp(0.0, upper);
        self.ended = self.duration.is_finite() && self.current_time >= self.duration;
    }

    /// Set volume, clamped to [0, 1]
    pub fn set_volume(&mut self, volume: f64) {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    /// Set playback rate, clamped to what the host supports
    pub fn set_playback_rate(&mut self, rate: f64) {
        if rate.is_finite() {
            self.playback_rate = rate.clamp(MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE);
        }
    }
}

impl Default for MediaState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let media = MediaState::new();
        assert!(media.paused);
        assert_eq!(media.volume, 1.0);
        assert_eq!(media.playback_rate, 1.0);
    }

    #[test]
    fn test_seek_clamps() {
        let mut media = MediaState::new();
        media.seek(30.0);
        assert_eq!(media.current_time, 30.0);

        media.duration = 20.0;
        media.seek(30.0);
        assert_eq!(media.current_time, 20.0);
        assert!(media.ended);

        media.seek(-4.0);
        assert_eq!(media.current_time, 0.0);
        assert!(!media.ended);
    }

    #[test]
    fn test_volume_and_rate_clamp() {
        let mut media = MediaState::new();
        media.set_volume(1.7);
        assert_eq!(media.volume, 1.0);
        media.set_volume(f64::NAN);
        assert_eq!(media.volume, 1.0);
        media.set_playback_rate(100.0);
        assert_eq!(media.playback_rate, MAX_PLAYBACK_RATE);
    }
}
