//! Built-in plugins

mod pause;
mod seek;
mod volume;
mod speed;
mod fullscreen;

pub use pause::PausePlugin;
pub use seek::SeekPlugin;
pub use volume::VolumePlugin;
pub use speed::SpeedPlugin;
pub use fullscreen::FullscreenPlugin;

use crate::{Config, Plugin};

/// The standard plugin set, in routing order
pub fn default_plugins(config: &Config) -> Vec<Box<dyn Plugin>> {
    vec![
        Box::new(PausePlugin::from_config(config)),
        Box::new(SeekPlugin::from_config(config)),
        Box::new(VolumePlugin::from_config(config)),
        Box::new(SpeedPlugin::from_config(config)),
        Box::new(FullscreenPlugin::from_config(config)),
    ]
}
