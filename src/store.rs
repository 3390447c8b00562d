//! Process-wide persisted scalars
//!
//! A thin typed wrapper over LocalStorage with an explicit load-or-default
//! contract per key. Corrupt or absent values fall back to a safe default
//! and are logged, never surfaced to the player.

/// Keys for every persisted value. No schema versioning.
pub mod keys {
    pub const BALANCE: &str = "spike_run_balance";
    pub const BEST_RUN: &str = "spike_run_best_run";
    pub const SESSION_IDENTITY: &str = "spike_run_session";
}

#[cfg(target_arch = "wasm32")]
fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
}

/// Load a base-10 integer, defaulting to 0 if absent or unparsable
#[cfg(target_arch = "wasm32")]
pub fn load_u64(key: &str) -> u64 {
    let Some(storage) = storage() else { return 0 };
    match storage.get_item(key) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|_| {
            log::warn!("Corrupt value for {key:?} ({raw:?}), defaulting to 0");
            0
        }),
        _ => 0,
    }
}

#[cfg(target_arch = "wasm32")]
pub fn save_u64(key: &str, value: u64) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(key, &value.to_string());
    }
}

/// Load an opaque string value, `None` if absent or empty
#[cfg(target_arch = "wasm32")]
pub fn load_string(key: &str) -> Option<String> {
    let value = storage()?.get_item(key).ok()??;
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(target_arch = "wasm32")]
pub fn save_string(key: &str, value: &str) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(key, value);
    }
}

#[cfg(target_arch = "wasm32")]
pub fn remove(key: &str) {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(key);
    }
}

/// Load a JSON-encoded record, defaulting on absence or corruption
#[cfg(target_arch = "wasm32")]
pub fn load_json<T: serde::de::DeserializeOwned + Default>(key: &str) -> T {
    let Some(storage) = storage() else {
        return T::default();
    };
    match storage.get_item(key) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Corrupt record for {key:?} ({e}), using default");
            T::default()
        }),
        _ => T::default(),
    }
}

#[cfg(target_arch = "wasm32")]
pub fn save_json<T: serde::Serialize>(key: &str, value: &T) {
    if let (Some(storage), Ok(json)) = (storage(), serde_json::to_string(value)) {
        let _ = storage.set_item(key, &json);
    }
}

/// Native stubs: nothing persists outside the browser
#[cfg(not(target_arch = "wasm32"))]
pub fn load_u64(_key: &str) -> u64 {
    0
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_u64(_key: &str, _value: u64) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_string(_key: &str) -> Option<String> {
    None
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_string(_key: &str, _value: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn remove(_key: &str) {}

#[cfg(not(target_arch = "wasm32"))]
pub fn load_json<T: serde::de::DeserializeOwned + Default>(_key: &str) -> T {
    T::default()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn save_json<T: serde::Serialize>(_key: &str, _value: &T) {}
