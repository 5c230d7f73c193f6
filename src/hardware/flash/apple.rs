use objc2::rc::Retained;
use objc2::msg_send;
use objc2_av_foundation::{AVCaptureDevice, AVCaptureTorchMode, AVMediaTypeVideo};
use objc2_foundation::NSString;

use super::{PlatformError, TorchPlatform};

/// AVFoundation capture devices, addressed by `uniqueID`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AppleTorch;

impl AppleTorch {
    pub fn new() -> Self {
        AppleTorch
    }

    fn device(id: &str) -> Result<Retained<AVCaptureDevice>, PlatformError> {
        let unique_id = NSString::from_str(id);
        unsafe { AVCaptureDevice::deviceWithUniqueID(&unique_id) }
            .ok_or_else(|| PlatformError(format!("No capture device with id {id}")))
    }
}

impl TorchPlatform for AppleTorch {
    #[allow(deprecated)]
    fn camera_ids(&mut self) -> Result<Vec<String>, PlatformError> {
        unsafe {
            let media_type = AVMediaTypeVideo
                .ok_or_else(|| PlatformError::new("AVMediaTypeVideo is not available"))?;
            let devices = AVCaptureDevice::devicesWithMediaType(media_type);
            Ok(devices.iter().map(|device| device.uniqueID().to_string()).collect())
        }
    }

    fn has_flash(&mut self, id: &str) -> Result<bool, PlatformError> {
        let device = Self::device(id)?;
        unsafe {
            Ok(device.hasTorch() && device.isTorchModeSupported(AVCaptureTorchMode::On))
        }
    }

    fn set_torch_mode(&mut self, id: &str, on: bool) -> Result<(), PlatformError> {
        let device = Self::device(id)?;
        unsafe {
            device.lockForConfiguration()
                .map_err(|e| PlatformError(e.localizedDescription().to_string()))?;

            let result = match on {
                true => device.setTorchModeOnWithLevel_error(1.0)
                    .map_err(|e| PlatformError(e.localizedDescription().to_string())),
                false => {
                    let _: () = msg_send![&*device, setTorchMode: AVCaptureTorchMode::Off];
                    Ok(())
                }
            };

            device.unlockForConfiguration();
            result
        }
    }
}
