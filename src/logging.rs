//! `log` facade wiring. In the browser records go to the devtools console;
//! elsewhere nothing is installed and the macros compile to no-ops.

use log::LevelFilter;

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};
    use wasm_bindgen::JsValue;

    pub(super) struct ConsoleLogger;

    impl Log for ConsoleLogger {
        fn enabled(&self, metadata: &Metadata) -> bool {
            metadata.level() <= log::max_level()
        }

        fn log(&self, record: &Record) {
            if !self.enabled(record.metadata()) {
                return;
            }
            let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
            match record.level() {
                Level::Error => web_sys::console::error_1(&line),
                Level::Warn => web_sys::console::warn_1(&line),
                Level::Info => web_sys::console::info_1(&line),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
            }
        }

        fn flush(&self) {}
    }

    pub(super) static LOGGER: ConsoleLogger = ConsoleLogger;
}

/// Installs the console logger once; later calls only adjust the level.
pub fn init(level: LevelFilter) {
    install();
    log::set_max_level(level);
}

#[cfg(target_arch = "wasm32")]
fn install() {
    if log::set_logger(&console::LOGGER).is_err() {
        log::debug!("logger already installed");
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn install() {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init(LevelFilter::Warn);
        init(LevelFilter::Info);
        assert_eq!(log::max_level(), LevelFilter::Info);
    }
}
