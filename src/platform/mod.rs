//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging backend (console on web, env_logger natively)
//! - Storage (LocalStorage on web)

#[cfg(target_arch = "wasm32")]
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

/// Install the logging backend. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("Logger already initialized");
    }
}

/// Install the logging backend (honors `RUST_LOG`). Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    if env_logger::try_init().is_err() {
        log::debug!("Logger already initialized");
    }
}
