#[cfg(target_arch = "wasm32")]
use web_sys::console;

pub fn set_panic_hook() {
    // When the `console_error_panic_hook` feature is enabled, we can call the
    // `set_panic_hook` function at least once during initialization, and then
    // we will get better error messages if our code ever panics.
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

// Routes `log` records to the browser console. A second call finds the logger
// already installed and leaves it alone.
pub fn init_logging(level: log::Level) {
    if console_log::init_with_level(level).is_ok() {
        log::info!("console logging at {}", level);
    }
}

/// Brackets a scope with console.time / console.timeEnd. Does nothing off the
/// web.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        #[cfg(target_arch = "wasm32")]
        console::time_with_label(name);
        Timer { name }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        #[cfg(target_arch = "wasm32")]
        console::time_end_with_label(self.name);
    }
}
