//! Platform abstraction layer
//!
//! Browser/native differences for storage and the wall clock. Storage is
//! LocalStorage-backed JSON on wasm; native builds fall back to defaults
//! (nothing is persisted).

pub mod storage {
    use serde::Serialize;
    use serde::de::DeserializeOwned;

    /// Load and deserialize a JSON value from LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn load<T: DeserializeOwned>(key: &str) -> Option<T> {
        let storage = web_sys::window()?.local_storage().ok()??;
        let json = storage.get_item(key).ok()??;
        match serde_json::from_str(&json) {
            Ok(value) => Some(value),
            Err(err) => {
                log::warn!("discarding corrupt entry under {key}: {err}");
                None
            }
        }
    }

    /// Serialize and store a JSON value under `key`
    #[cfg(target_arch = "wasm32")]
    pub fn save<T: Serialize>(key: &str, value: &T) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if let (Some(storage), Ok(json)) = (storage, serde_json::to_string(value)) {
            let _ = storage.set_item(key, &json);
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load<T: DeserializeOwned>(_key: &str) -> Option<T> {
        None
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save<T: Serialize>(_key: &str, _value: &T) {
        // No-op for native
    }
}

/// Milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Local calendar hour (0-23), the quest batch cache key
#[cfg(target_arch = "wasm32")]
pub fn current_hour() -> u32 {
    js_sys::Date::new_0().get_hours()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn current_hour() -> u32 {
    // UTC hour is fine for the native build; nothing persists there anyway
    ((now_ms() / 3_600_000.0) as u64 % 24) as u32
}
