//! Logging utilities
//!
//! The bridge logs through the `log` facade. On native targets (tests, tools)
//! `env_logger` is installed; inside the browser records go to the developer
//! console and panics are reported there as well.

pub use log::{debug, info, warn, error, trace};

use crate::config::LoggingConfig;
use log::LevelFilter;
use std::str::FromStr;

/// Parse the configured level, falling back to `info` on unknown values
pub fn level_filter(config: &LoggingConfig) -> LevelFilter {
    LevelFilter::from_str(&config.level).unwrap_or(LevelFilter::Info)
}

/// Initialize the logging system
///
/// Returns `false` if a logger was already installed (which is not an error:
/// the host page or a test harness may have installed one first).
#[cfg(not(target_arch = "wasm32"))]
pub fn init(config: &LoggingConfig) -> bool {
    env_logger::Builder::new()
        .filter_level(level_filter(config))
        .parse_env("CANVAS_BRIDGE_LOG")
        .try_init()
        .is_ok()
}

/// Initialize the logging system
///
/// Returns `false` if a logger was already installed.
#[cfg(target_arch = "wasm32")]
pub fn init(config: &LoggingConfig) -> bool {
    console::install_panic_hook();
    let installed = log::set_logger(&console::CONSOLE_LOGGER).is_ok();
    if installed {
        log::set_max_level(level_filter(config));
    }
    installed
}

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};
    use wasm_bindgen::JsValue;

    pub(super) static CONSOLE_LOGGER: ConsoleLogger = ConsoleLogger;

    /// `log` sink writing to the browser developer console
    pub(super) struct ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata<'_>) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record<'_>) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = JsValue::from(format!("[{}] {}", record.target(), record.args()));
            match record.level() {
                Level::Error => web_sys::console::error_1(&line),
                Level::Warn => web_sys::console::warn_1(&line),
                Level::Info => web_sys::console::info_1(&line),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
            }
        }

        fn flush(&self) {}
    }

    pub(super) fn install_panic_hook() {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("canvas_bridge panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}
