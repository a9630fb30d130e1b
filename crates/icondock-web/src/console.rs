//! Browser console backend for the `log` facade
//!
//! Errors, warnings and info always go to the console. Debug and trace lines
//! only show in debug mode (`?debug=1` or `"debug": true` in the config).

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::atomic::{AtomicBool, Ordering};

const PREFIX: &str = "[IconDock]";

/// Global debug mode flag
static DEBUG_MODE: AtomicBool = AtomicBool::new(false);

static LOGGER: ConsoleLogger = ConsoleLogger;

pub fn is_debug() -> bool {
    DEBUG_MODE.load(Ordering::Relaxed)
}

/// Install the console logger; later calls only update the debug flag
pub fn init(debug: bool) {
    DEBUG_MODE.store(debug, Ordering::Relaxed);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Trace);
    }
    if debug {
        web_sys::console::log_1(&format!("{PREFIX} Debug mode enabled").into());
    }
}

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Info || is_debug()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line: wasm_bindgen::JsValue = format!("{PREFIX} {}", record.args()).into();
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::log_1(&line),
        }
    }

    fn flush(&self) {}
}
