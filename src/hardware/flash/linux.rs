use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{PlatformError, TorchPlatform, LED_CLASS_ROOT};

/// Torch control through the kernel LED class. Every LED is treated as a
/// camera unit; the ones named `<device>:<color>:flash` or `...:torch` count
/// as flash units.
#[derive(Debug, Clone)]
pub struct SysfsTorch {
    root: PathBuf,
}

impl SysfsTorch {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SysfsTorch{root: root.into()}
    }

    fn led(&self, id: &str) -> Result<PathBuf, PlatformError> {
        if id.is_empty() || id.contains('/') || id == "." || id == ".." {
            return Err(PlatformError(format!("invalid led name {id:?}")));
        }
        Ok(self.root.join(id))
    }

    fn read_number(path: &Path) -> io::Result<u32> {
        fs::read_to_string(path)?.trim().parse::<u32>()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{}: {e}", path.display())))
    }
}

impl Default for SysfsTorch {
    fn default() -> Self {
        SysfsTorch::new(LED_CLASS_ROOT)
    }
}

fn is_flash_name(name: &str) -> bool {
    name.rsplit(':').next()
        .is_some_and(|function| function.starts_with("flash") || function.starts_with("torch"))
}

impl TorchPlatform for SysfsTorch {
    fn camera_ids(&mut self) -> Result<Vec<String>, PlatformError> {
        let mut ids = fs::read_dir(&self.root)
            .map_err(|e| PlatformError(format!("{}: {e}", self.root.display())))?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect::<Vec<_>>();
        ids.sort();
        Ok(ids)
    }

    fn has_flash(&mut self, id: &str) -> Result<bool, PlatformError> {
        let led = self.led(id)?;
        Ok(is_flash_name(id) && led.join("brightness").exists())
    }

    fn set_torch_mode(&mut self, id: &str, on: bool) -> Result<(), PlatformError> {
        let led = self.led(id)?;
        let value = match on {
            true => Self::read_number(&led.join("max_brightness")).map_err(PlatformError::new)?,
            false => 0,
        };
        fs::write(led.join("brightness"), value.to_string()).map_err(PlatformError::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::flash::{probe, DeviceId, ToggleError, ToggleService};

    fn add_led(root: &Path, name: &str, max: &str) {
        let led = root.join(name);
        fs::create_dir_all(&led).unwrap();
        fs::write(led.join("brightness"), "0").unwrap();
        fs::write(led.join("max_brightness"), max).unwrap();
    }

    fn brightness(root: &Path, name: &str) -> String {
        fs::read_to_string(root.join(name).join("brightness")).unwrap()
    }

    #[test]
    fn flash_names() {
        assert!(is_flash_name("white:flash"));
        assert!(is_flash_name("led0::torch"));
        assert!(is_flash_name("qcom-flash:white:flash-0"));
        assert!(!is_flash_name("input3::capslock"));
        assert!(!is_flash_name("flash:white:status"));
    }

    #[test]
    fn probe_skips_non_flash_leds() {
        let dir = tempfile::tempdir().unwrap();
        add_led(dir.path(), "input3::capslock", "1");
        add_led(dir.path(), "white:torch", "255");
        add_led(dir.path(), "white:flash", "15");
        let mut torch = SysfsTorch::new(dir.path());
        assert_eq!(probe(&mut torch), Some(DeviceId::new("white:flash")));
    }

    #[test]
    fn missing_root_probes_none() {
        let dir = tempfile::tempdir().unwrap();
        let mut torch = SysfsTorch::new(dir.path().join("leds"));
        assert_eq!(probe(&mut torch), None);
    }

    #[test]
    fn toggle_writes_brightness() {
        let dir = tempfile::tempdir().unwrap();
        add_led(dir.path(), "white:torch", "255\n");
        let mut service = ToggleService::start(SysfsTorch::new(dir.path()));
        assert_eq!(service.toggle(), Ok(true));
        assert_eq!(brightness(dir.path(), "white:torch"), "255");
        service.shutdown();
        assert_eq!(brightness(dir.path(), "white:torch"), "0");
    }

    #[test]
    fn unreadable_max_brightness_is_driver_failure() {
        let dir = tempfile::tempdir().unwrap();
        add_led(dir.path(), "white:torch", "bright");
        let mut service = ToggleService::start(SysfsTorch::new(dir.path()));
        assert!(matches!(service.toggle(), Err(ToggleError::DriverFailure(_))));
        assert!(service.is_on());
    }

    #[test]
    fn rejects_path_ids() {
        let mut torch = SysfsTorch::default();
        assert!(torch.set_torch_mode("../power", true).is_err());
    }
}
