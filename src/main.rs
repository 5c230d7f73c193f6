use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use maverick_flash::prelude::*;
use maverick_flash::{Channel, ConfigError, MethodCall, MethodResponse};

#[derive(Parser, Debug)]
#[command(name = "flashlight-host")]
#[command(about = "Serve flashlight method calls over stdin/stdout")]
struct Args {
    /// JSON config file
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "FLASHLIGHT_LOG")]
    log_level: Option<String>,

    /// LED class directory for the sysfs torch
    #[arg(long, env = "FLASHLIGHT_LED_ROOT")]
    led_root: Option<PathBuf>,
}

impl Args {
    fn config(self) -> Result<Config, ConfigError> {
        Config::load(self.config.as_deref())?.merge(self.log_level, self.led_root)
    }
}

///Desktop stand-in for the application shell: one JSON method call per stdin
///line, one JSON response per stdout line. EOF closes the plugin.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Args::parse().config()?;
    let (_hardware, mut plugin) = start(&config)?;

    let (mut shell, mut end) = Channel::<MethodCall, MethodResponse>::new();
    let reader = std::thread::spawn(move || -> std::io::Result<()> {
        let stdout = std::io::stdout();
        for line in std::io::stdin().lock().lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let call = match serde_json::from_str::<MethodCall>(&line) {
                Ok(call) => call,
                Err(e) => {
                    log::warn!("Ignoring malformed call {line:?}: {e}");
                    continue;
                }
            };
            if !shell.send(&call) {
                break;
            }
            let Some(response) = shell.recv() else { break };
            let mut out = stdout.lock();
            serde_json::to_writer(&mut out, &response)?;
            writeln!(out)?;
            out.flush()?;
        }
        Ok(())
    });

    plugin.run(&mut end);
    reader.join().map_err(|_| "stdin reader panicked")??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flashlight.json");
        std::fs::write(&path, r#"{"log_level": "warn", "channel": "demo/torch"}"#).unwrap();
        let path = path.to_str().unwrap();
        let args = Args::try_parse_from([
            "flashlight-host", path, "--log-level", "debug", "--led-root", "/run/leds",
        ]).unwrap();
        let config = args.config().unwrap();
        assert_eq!(config.level().unwrap(), Some(log::Level::Debug));
        assert_eq!(config.led_root, PathBuf::from("/run/leds"));
        assert_eq!(config.channel, "demo/torch");
    }

    #[test]
    fn bad_level_flag_is_rejected() {
        let args = Args::try_parse_from(["flashlight-host", "--log-level", "loud"]).unwrap();
        assert!(matches!(args.config(), Err(ConfigError::LogLevel(_))));
    }
}
