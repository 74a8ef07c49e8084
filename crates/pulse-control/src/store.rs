//! Key/value settings store with change notification.
//!
//! The controller never touches a global: it is handed an
//! `Arc<dyn SettingsStore>` and subscribes to it. Every `set` notifies every
//! listener with the written key, whoever wrote it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{Map, Value};
use thiserror::Error;

/// Handle returned by [`SettingsStore::subscribe`].
pub type ListenerId = u64;

/// Change callback. Receives the key that was written.
pub type Listener = Arc<dyn Fn(&str) + Send + Sync>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("settings file {0} does not hold a JSON object")]
    NotAnObject(PathBuf),
}

pub trait SettingsStore: Send + Sync {
    /// Raw stored value, if any.
    fn get(&self, key: &str) -> Option<Value>;

    /// Write a value and notify every listener with `key`.
    fn set(&self, key: &str, value: Value);

    fn subscribe(&self, listener: Listener) -> ListenerId;

    /// Unknown ids are ignored.
    fn unsubscribe(&self, id: ListenerId);

    /// Numeric value for `key`, or `default` when it is missing or malformed.
    fn get_f64(&self, key: &str, default: f64) -> f64 {
        match self.get(key) {
            None => default,
            Some(value) => match value.as_f64() {
                Some(v) if v.is_finite() => v,
                _ => {
                    log::warn!("Setting `{}` holds {} (not a number), using default {}", key, value, default);
                    default
                }
            },
        }
    }

    /// String value for `key`, or `default` when it is missing or malformed.
    fn get_str(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            None => default.to_string(),
            Some(Value::String(s)) => s,
            Some(other) => {
                log::warn!("Setting `{}` holds {} (not a string), using default {:?}", key, other, default);
                default.to_string()
            }
        }
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Subscriber bookkeeping shared by the store implementations.
#[derive(Default)]
struct Listeners {
    next_id: AtomicU64,
    entries: Mutex<Vec<(ListenerId, Listener)>>,
}

impl Listeners {
    fn add(&self, listener: Listener) -> ListenerId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        lock(&self.entries).push((id, listener));
        id
    }

    fn remove(&self, id: ListenerId) {
        lock(&self.entries).retain(|(entry_id, _)| *entry_id != id);
    }

    fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    /// Callbacks run without any store lock held, so a listener may read or
    /// write the store (or unsubscribe) from inside the callback.
    fn notify(&self, key: &str) {
        let snapshot: Vec<Listener> = lock(&self.entries).iter().map(|(_, l)| l.clone()).collect();
        for listener in snapshot {
            listener(key);
        }
    }
}

/// In-process store. Used by tests and as the fallback when no settings file
/// can be opened.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, Value>>,
    listeners: Listeners,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let store = Self::new();
        {
            let mut map = lock(&store.values);
            for (k, v) in values {
                map.insert(k.into(), v);
            }
        }
        store
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Value> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        lock(&self.values).insert(key.to_string(), value);
        self.listeners.notify(key);
    }

    fn subscribe(&self, listener: Listener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

/// Store persisted as a pretty-printed JSON object. The whole object is
/// rewritten on every `set`; keys this crate does not know are kept.
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
    listeners: Listeners,
}

impl JsonFileStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(text) if text.trim().is_empty() => Map::new(),
            Ok(text) => match serde_json::from_str::<Value>(&text)? {
                Value::Object(map) => map,
                _ => return Err(StoreError::NotAnObject(path)),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("No settings file at {}, starting with defaults", path.display());
                Map::new()
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
            listeners: Listeners::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the current contents to disk.
    pub fn flush(&self) -> Result<(), StoreError> {
        let json = {
            let values = lock(&self.values);
            serde_json::to_string_pretty(&*values)?
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: Value) {
        lock(&self.values).insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            log::error!("Failed to save settings to {}: {}", self.path.display(), e);
        }
        self.listeners.notify(key);
    }

    fn subscribe(&self, listener: Listener) -> ListenerId {
        self.listeners.add(listener)
    }

    fn unsubscribe(&self, id: ListenerId) {
        self.listeners.remove(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("pulse-store-{}-{}.json", name, std::process::id()))
    }

    #[test]
    fn test_typed_getters_fall_back() {
        let store = MemoryStore::with_values([
            ("good", json!(2.5)),
            ("text", json!("abc")),
            ("num", json!(3)),
        ]);
        assert_eq!(store.get_f64("good", 1.0), 2.5);
        assert_eq!(store.get_f64("missing", 1.0), 1.0);
        assert_eq!(store.get_f64("text", 1.0), 1.0);
        assert_eq!(store.get_str("text", "x"), "abc");
        assert_eq!(store.get_str("num", "x"), "x");
    }

    #[test]
    fn test_set_notifies_every_listener() {
        let store = MemoryStore::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_a = seen.clone();
        let seen_b = seen.clone();
        store.subscribe(Arc::new(move |k: &str| seen_a.lock().unwrap().push(format!("a:{k}"))));
        let id = store.subscribe(Arc::new(move |k: &str| seen_b.lock().unwrap().push(format!("b:{k}"))));

        store.set("mode", json!("custom"));
        store.unsubscribe(id);
        store.set("mode", json!("custom"));

        assert_eq!(*seen.lock().unwrap(), vec!["a:mode", "b:mode", "a:mode"]);
    }

    #[test]
    fn test_listener_may_read_store() {
        let store = Arc::new(MemoryStore::new());
        let observed = Arc::new(Mutex::new(None));
        let weak = Arc::downgrade(&store);
        let observed_clone = observed.clone();
        store.subscribe(Arc::new(move |k: &str| {
            if let Some(s) = weak.upgrade() {
                *observed_clone.lock().unwrap() = s.get(k);
            }
        }));
        store.set("waveAmplitude", json!(4.0));
        assert_eq!(*observed.lock().unwrap(), Some(json!(4.0)));
    }

    #[test]
    fn test_json_file_roundtrip_keeps_unknown_keys() {
        let path = temp_path("roundtrip");
        fs::write(&path, r#"{ "mode": "random", "extra": [1, 2] }"#).unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get_str("mode", "default"), "random");
        store.set("densityFactor", json!(1.2));

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get_f64("densityFactor", 0.8), 1.2);
        assert_eq!(reopened.get("extra"), Some(json!([1, 2])));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_json_file_missing_starts_empty() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);
        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("mode"), None);
    }

    #[test]
    fn test_json_file_rejects_non_object() {
        let path = temp_path("array");
        fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::NotAnObject(_))));
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Json(_))));
        let _ = fs::remove_file(&path);
    }
}
