pub mod flash;
mod logger;

use std::sync::{Arc, Mutex, MutexGuard};

pub use flash::{DeviceId, FlashDevice, NoTorch, PlatformError, ToggleError, ToggleService, TorchPlatform};
pub use logger::Logger;

use crate::Config;

/// Hardware context contains interfaces to the device hardware.
/// All interfaces are clonable and internally synchronized.
#[derive(Clone)]
pub struct Context {
    pub flashlight: Flashlight,
}

impl Context {
    pub fn new(config: &Config) -> Self {
        Self {
            flashlight: Flashlight::connect(config),
        }
    }
}

/// Shared handle to the torch. Calls from several threads are serialized so
/// the on/off flag always matches the last command sent to the platform.
#[derive(Clone)]
pub struct Flashlight(Arc<Mutex<ToggleService<Box<dyn TorchPlatform>>>>);

impl Flashlight {
    /// Probes `platform` for a flash unit and takes ownership of it.
    pub fn new(platform: impl TorchPlatform + 'static) -> Self {
        let platform: Box<dyn TorchPlatform> = Box::new(platform);
        Flashlight(Arc::new(Mutex::new(ToggleService::start(platform))))
    }

    /// Connects to the camera service of the current OS.
    pub fn connect(config: &Config) -> Self {
        #[cfg(target_os = "android")]
        {
            let _ = config;
            match flash::AndroidTorch::new() {
                Ok(torch) => Self::new(torch),
                Err(e) => {
                    log::warn!("Failed to initialize camera: {e}");
                    Self::new(NoTorch)
                }
            }
        }

        #[cfg(any(target_os = "ios", target_os = "macos"))]
        {
            let _ = config;
            Self::new(flash::AppleTorch::new())
        }

        #[cfg(target_os = "linux")]
        {
            Self::new(flash::SysfsTorch::new(&config.led_root))
        }

        #[cfg(not(any(target_os = "android", target_os = "ios", target_os = "macos", target_os = "linux")))]
        {
            let _ = config;
            Self::new(NoTorch)
        }
    }

    fn service(&self) -> MutexGuard<'_, ToggleService<Box<dyn TorchPlatform>>> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn toggle(&self) -> Result<bool, ToggleError> {
        self.service().toggle()
    }

    pub fn shutdown(&self) {
        self.service().shutdown()
    }

    pub fn is_on(&self) -> bool {
        self.service().is_on()
    }

    pub fn is_available(&self) -> bool {
        self.service().is_available()
    }

    pub fn device_id(&self) -> Option<DeviceId> {
        self.service().device().device_id().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::flash::tests::FakeTorch;

    #[test]
    fn clones_share_state() {
        let flashlight = Flashlight::new(FakeTorch::with_flash());
        let other = flashlight.clone();
        assert_eq!(flashlight.toggle(), Ok(true));
        assert!(other.is_on());
        assert_eq!(other.toggle(), Ok(false));
        assert!(!flashlight.is_on());
        assert_eq!(flashlight.device_id(), Some(DeviceId::new("0")));
    }

    #[test]
    fn toggles_from_many_threads() {
        let flashlight = Flashlight::new(FakeTorch::with_flash());
        let handles = (0..8).map(|_| {
            let flashlight = flashlight.clone();
            std::thread::spawn(move || {
                for _ in 0..25 {
                    flashlight.toggle().unwrap();
                }
            })
        }).collect::<Vec<_>>();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(!flashlight.is_on());
    }

    #[test]
    fn no_torch_is_unavailable() {
        let flashlight = Flashlight::new(NoTorch);
        assert!(!flashlight.is_available());
        assert_eq!(flashlight.toggle(), Err(ToggleError::Unavailable));
        flashlight.shutdown();
        assert!(!flashlight.is_on());
    }
}
