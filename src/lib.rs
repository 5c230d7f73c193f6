pub mod hardware;
pub use crate::hardware::{
    Flashlight,
    Logger,
    {DeviceId, FlashDevice, ToggleService, ToggleError, TorchPlatform, PlatformError},
};

pub mod channel;
pub use channel::{Channel, FlashlightHandler, MethodCall, MethodResponse};

pub mod plugin;
pub use plugin::{FlashlightPlugin, EventHandler, Lifetime};

mod config;
pub use config::{Config, ConfigError};

pub mod prelude {
    pub use crate::{Config, Flashlight, FlashlightPlugin, Lifetime, EventHandler, Logger, start};
}

/// Loads config, starts logging and probes the torch. The returned plugin
/// must receive `Lifetime::Close` when the hosting surface goes away.
pub fn start(config: &Config) -> Result<(hardware::Context, FlashlightPlugin), ConfigError> {
    Logger::start(config.level()?);
    let hardware = hardware::Context::new(config);
    let plugin = FlashlightPlugin::new(hardware.flashlight.clone(), config.channel.clone());
    log::info!(
        "{} ready, flash {}",
        plugin.name(),
        if hardware.flashlight.is_available() {"available"} else {"unavailable"}
    );
    Ok((hardware, plugin))
}
