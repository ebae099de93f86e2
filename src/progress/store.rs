//! Key-value persistence seam.

use rustc_hash::FxHashMap;

use crate::core::StoreError;

/// Integer key-value storage supplied by the host.
///
/// Mirrors the small preferences stores most platforms provide. Writes may
/// be buffered until `flush`.
pub trait KeyValueStore {
    /// Read `key`, or `default` if it is absent.
    fn get_int(&self, key: &str, default: i64) -> Result<i64, StoreError>;

    /// Write `value` under `key`.
    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete_key(&mut self, key: &str) -> Result<(), StoreError>;

    /// Persist buffered writes.
    fn flush(&mut self) -> Result<(), StoreError>;
}

/// In-process store backed by a hash map.
///
/// Values are kept as text so a store can hold whatever a host wrote into
/// it; `get_int` parses on read. `set_available(false)` makes every call
/// fail, for exercising error paths.
#[derive(Clone, Debug)]
pub struct MemoryStore {
    values: FxHashMap<String, String>,
    available: bool,
    flushes: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            values: FxHashMap::default(),
            available: true,
            flushes: 0,
        }
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an integer value.
    #[must_use]
    pub fn with_int(mut self, key: &str, value: i64) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }

    /// Store raw text under `key`.
    pub fn set_text(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), value.into());
    }

    /// Toggle simulated availability.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Is `key` present?
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Number of successful flushes.
    #[must_use]
    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.available {
            Ok(())
        } else {
            Err(StoreError::Unavailable("memory store offline".to_string()))
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get_int(&self, key: &str, default: i64) -> Result<i64, StoreError> {
        self.check()?;
        match self.values.get(key) {
            None => Ok(default),
            Some(raw) => raw.trim().parse().map_err(|_| StoreError::NotAnInteger {
                key: key.to_string(),
            }),
        }
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), StoreError> {
        self.check()?;
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete_key(&mut self, key: &str) -> Result<(), StoreError> {
        self.check()?;
        self.values.remove(key);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StoreError> {
        self.check()?;
        self.flushes += 1;
        Ok(())
    }
}
