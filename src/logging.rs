//! Routes `log` records from the core crate to the browser console.
//!
//! Initialization is idempotent: the logger is installed once, later calls
//! only adjust the max level.

use crate::error;
use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug => web_sys::console::debug_1(&line),
            Level::Trace => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}

fn normalize_level(level: &str) -> Option<LevelFilter> {
    match level.trim().to_ascii_lowercase().as_str() {
        "off" => Some(LevelFilter::Off),
        "error" => Some(LevelFilter::Error),
        "warn" | "warning" => Some(LevelFilter::Warn),
        "info" => Some(LevelFilter::Info),
        "debug" => Some(LevelFilter::Debug),
        "trace" => Some(LevelFilter::Trace),
        _ => None,
    }
}

/// Install the console logger at `level` (`off`, `error`, `warn`, `info`,
/// `debug`, `trace`). Returns `{ok:true}` or an `invalid_config` error.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> JsValue {
    let Some(filter) = normalize_level(level) else {
        return error::invalid_config(format!("unsupported log level '{}'", level));
    };
    // already installed: keep it, only the level changes
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(filter);
    error::ok(JsValue::from_str(filter.as_str()))
}
