// Cross platform logger to start logging with a specified level.

//<Android>>>: uses android_logger to log messages to logcat.

//<Linux, iOS and macOS>>> uses env_logger for std output logging.

// WASM builds carry no logger backend.

// Level defaults to Warn if None is used. Starting twice is a no-op.


pub struct Logger;


impl Logger {
    pub fn start(level: Option<log::Level>) {
        let level = level.unwrap_or(log::Level::Warn);
        #[cfg(target_os="android")]
        {
            android_logger::init_once(
                android_logger::Config::default()
                    .with_max_level(level.to_level_filter())
                    .with_tag("flashlight"),
            );
        }

        #[cfg(not(any(target_os="android", target_arch="wasm32")))]
        {
            let _ = env_logger::builder().filter_level(level.to_level_filter()).try_init();
        }
    }
}
