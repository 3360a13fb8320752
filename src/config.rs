//! Configuration Store
//!
//! Runtime-tunable parameters are read from an external typed key-value
//! store at session creation. Persistence is not this crate's concern;
//! [`ConfigStore`] only exposes lookups, and every consumer supplies its own
//! documented default at the call site (see
//! [`RuntimeSettings::refresh`](crate::settings::RuntimeSettings::refresh)).

use rustc_hash::FxHashMap;

/// A typed key-value configuration store.
pub trait ConfigStore {
    /// Looks up an integer setting. `None` means the key is unset and the
    /// caller's default applies.
    fn get_int(&self, key: &str) -> Option<i32>;
}

/// An in-memory [`ConfigStore`], used in tests and by embedders that manage
/// configuration themselves.
#[derive(Debug, Default, Clone)]
pub struct MemoryConfigStore {
    values: FxHashMap<String, i32>,
}

impl MemoryConfigStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an integer value, replacing any previous one.
    pub fn set_int(&mut self, key: impl Into<String>, value: i32) {
        self.values.insert(key.into(), value);
    }

    /// Removes a key, restoring default-fallback behavior for it.
    pub fn unset(&mut self, key: &str) {
        self.values.remove(key);
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get_int(&self, key: &str) -> Option<i32> {
        self.values.get(key).copied()
    }
}
