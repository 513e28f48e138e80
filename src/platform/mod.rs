//! Platform abstraction layer
//!
//! Browser/native differences live here: logging setup and the key-value
//! store backing high scores and settings (LocalStorage on web, no-op
//! stubs on native so tests and tools run unchanged).

/// Set up logging for the current platform. Safe to call once at startup.
#[cfg(target_arch = "wasm32")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

/// Persistent key-value storage
pub mod storage {
    /// Read a stored string, None when absent or storage is unavailable
    #[cfg(target_arch = "wasm32")]
    pub fn get(key: &str) -> Option<String> {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten()?;
        storage.get_item(key).ok().flatten()
    }

    /// Write a string; failures (quota, private mode) are logged and dropped
    #[cfg(target_arch = "wasm32")]
    pub fn set(key: &str, value: &str) {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok()).flatten();
        if let Some(storage) = storage {
            if storage.set_item(key, value).is_err() {
                log::warn!("storage write failed for {key}");
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn get(_key: &str) -> Option<String> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn set(_key: &str, _value: &str) {}
}

/// Current wall-clock time in Unix milliseconds (leaderboard timestamps)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}
