use std::fmt;

#[cfg(target_os = "android")]
mod android;
#[cfg(target_os = "android")]
pub use android::AndroidTorch;

#[cfg(any(target_os = "ios", target_os = "macos"))]
mod apple;
#[cfg(any(target_os = "ios", target_os = "macos"))]
pub use apple::AppleTorch;

/// Kernel LED class directory used by the sysfs torch backend.
pub const LED_CLASS_ROOT: &str = "/sys/class/leds";

#[cfg(any(target_os = "linux", test))]
mod linux;
#[cfg(any(target_os = "linux", test))]
pub use linux::SysfsTorch;

/// Identifier of a camera unit as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        DeviceId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Raw error text reported by the platform camera service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct PlatformError(pub String);

impl PlatformError {
    pub fn new(detail: impl fmt::Display) -> Self {
        PlatformError(detail.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToggleError {
    #[error("no flash-capable device present")]
    Unavailable,
    #[error("torch driver failure: {0}")]
    DriverFailure(String),
}

/// Camera service operations the flashlight needs from the host OS.
pub trait TorchPlatform: Send {
    /// Camera identifiers in platform enumeration order.
    fn camera_ids(&mut self) -> Result<Vec<String>, PlatformError>;
    /// Static capability flag: does this camera carry a flash unit.
    fn has_flash(&mut self, id: &str) -> Result<bool, PlatformError>;
    fn set_torch_mode(&mut self, id: &str, on: bool) -> Result<(), PlatformError>;
}

impl<T: TorchPlatform + ?Sized> TorchPlatform for Box<T> {
    fn camera_ids(&mut self) -> Result<Vec<String>, PlatformError> {
        (**self).camera_ids()
    }

    fn has_flash(&mut self, id: &str) -> Result<bool, PlatformError> {
        (**self).has_flash(id)
    }

    fn set_torch_mode(&mut self, id: &str, on: bool) -> Result<(), PlatformError> {
        (**self).set_torch_mode(id, on)
    }
}

/// Platform without any camera. Used on unsupported targets and when the
/// real camera service could not be reached.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTorch;

impl TorchPlatform for NoTorch {
    fn camera_ids(&mut self) -> Result<Vec<String>, PlatformError> {
        Ok(Vec::new())
    }

    fn has_flash(&mut self, _id: &str) -> Result<bool, PlatformError> {
        Ok(false)
    }

    fn set_torch_mode(&mut self, id: &str, _on: bool) -> Result<(), PlatformError> {
        Err(PlatformError(format!("no camera with id {id}")))
    }
}

/// Finds the first enumerated camera that reports a flash unit.
///
/// Failures are not fatal: they are logged and reported as `None`, the same
/// as a device without any flash.
pub fn probe<P: TorchPlatform + ?Sized>(platform: &mut P) -> Option<DeviceId> {
    match find_flash(platform) {
        Ok(Some(id)) => {
            log::info!("Using camera {id} for torch");
            Some(id)
        }
        Ok(None) => {
            log::info!("No camera with a flash unit found");
            None
        }
        Err(e) => {
            log::warn!("Failed to initialize camera: {e}");
            None
        }
    }
}

fn find_flash<P: TorchPlatform + ?Sized>(platform: &mut P) -> Result<Option<DeviceId>, PlatformError> {
    for id in platform.camera_ids()? {
        if platform.has_flash(&id)? {
            return Ok(Some(DeviceId(id)));
        }
    }
    Ok(None)
}

/// Probed torch device and its commanded state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlashDevice {
    device_id: Option<DeviceId>,
    is_on: bool,
}

impl FlashDevice {
    pub fn device_id(&self) -> Option<&DeviceId> {
        self.device_id.as_ref()
    }

    pub fn is_on(&self) -> bool {
        self.is_on
    }
}

/// Owns the camera service handle and the on/off flag.
///
/// The state is flipped before the platform call and is not rolled back when
/// the call fails, so after a `DriverFailure` the flag holds the attempted
/// state. Callers retry by toggling again.
pub struct ToggleService<P: TorchPlatform> {
    platform: P,
    device: FlashDevice,
}

impl<P: TorchPlatform> ToggleService<P> {
    /// Probes the platform once; the resolved device is fixed for the
    /// lifetime of the service.
    pub fn start(mut platform: P) -> Self {
        let device_id = probe(&mut platform);
        ToggleService{platform, device: FlashDevice{device_id, is_on: false}}
    }

    pub fn toggle(&mut self) -> Result<bool, ToggleError> {
        let Some(id) = self.device.device_id.as_ref() else {
            return Err(ToggleError::Unavailable);
        };
        self.device.is_on = !self.device.is_on;
        let on = self.device.is_on;
        match self.platform.set_torch_mode(id.as_str(), on) {
            Ok(()) => {
                log::debug!("Torch on {id} set to {on}");
                Ok(on)
            }
            Err(e) => {
                log::error!("Failed to set torch on {id} to {on}: {e}");
                Err(ToggleError::DriverFailure(e.0))
            }
        }
    }

    /// Forces the torch off if it was left on. Never fails.
    pub fn shutdown(&mut self) {
        if !self.device.is_on {
            return;
        }
        if let Some(id) = self.device.device_id.as_ref() {
            if let Err(e) = self.platform.set_torch_mode(id.as_str(), false) {
                log::warn!("Failed to turn off flashlight on shutdown: {e}");
            }
        }
        self.device.is_on = false;
    }

    pub fn is_on(&self) -> bool {
        self.device.is_on
    }

    pub fn is_available(&self) -> bool {
        self.device.device_id.is_some()
    }

    pub fn device(&self) -> &FlashDevice {
        &self.device
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }
}
