use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct CacheEntry {
    stored_at: Instant,
    value: serde_json::Value,
}

/// TTL cache for quote responses, constructed in `main` and injected into
/// handlers. Entries expire on read; a sweep runs opportunistically on
/// insert so abandoned keys do not accumulate. Keys are
/// `{property_id}:{check_in}:{check_out}:{guests}`.
pub struct QuoteCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        QuoteCache {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    pub fn quote_key(property_id: &str, check_in: &str, check_out: &str, guests: u32) -> String {
        format!("{property_id}:{check_in}:{check_out}:{guests}")
    }

    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() <= self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, value: serde_json::Value) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        let ttl = self.ttl;
        entries.retain(|_, e| e.stored_at.elapsed() <= ttl);
        entries.insert(
            key,
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Drop every cached quote for a property, called when its rules or
    /// calendars change.
    pub fn invalidate_property(&self, property_id: &str) {
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        let prefix = format!("{property_id}:");
        entries.retain(|key, _| !key.starts_with(&prefix));
    }
}
