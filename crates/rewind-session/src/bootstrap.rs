//! Latest-value-wins snapshot of the bootstrap whitelist.

use parking_lot::Mutex;
use rewind_core::EventPayload;
use rewind_wire::{BOOTSTRAP_PRIORITY, priority_rank};

/// One cached bootstrap message.
#[derive(Debug, Clone)]
pub struct BootstrapEntry {
    /// Message id, unique within the cache.
    pub id: String,
    /// Latest payload seen for this id.
    pub payload: EventPayload,
}

/// Holds at most one entry per whitelisted id and replays them in a
/// deterministic order: priority ids first (in their declared order), then
/// the rest in insertion order.
///
/// The cache performs no eviction and no whitelist check of its own:
/// producers only route whitelisted ids here (the emit facade enforces
/// that), and the whitelist is small and fixed.
pub struct BootstrapCache {
    entries: Mutex<Vec<BootstrapEntry>>,
}

impl BootstrapCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
        }
    }

    /// Record the latest payload for `id`.
    ///
    /// An existing entry is replaced in place, keeping its position in the
    /// replay sequence; a new id is appended. Updates must win on content
    /// without disturbing relative ordering.
    pub fn upsert(&self, id: &str, payload: EventPayload) {
        let mut entries = self.entries.lock();
        if let Some(existing) = entries.iter_mut().find(|e| e.id == id) {
            existing.payload = payload;
        } else {
            entries.push(BootstrapEntry {
                id: id.to_string(),
                payload,
            });
        }
    }

    /// The cache contents in replay order.
    pub fn ordered(&self) -> Vec<BootstrapEntry> {
        let entries = self.entries.lock();
        let mut out = Vec::with_capacity(entries.len());
        for priority_id in BOOTSTRAP_PRIORITY {
            if let Some(entry) = entries.iter().find(|e| e.id == priority_id) {
                out.push(entry.clone());
            }
        }
        for entry in entries.iter() {
            if priority_rank(&entry.id).is_none() {
                out.push(entry.clone());
            }
        }
        out
    }

    /// Synchronously invoke `emit` for every entry in replay order.
    ///
    /// One pass, no retries: a reconnecting client must be able to fully
    /// reconstruct its state from this single sweep.
    pub fn replay<F>(&self, mut emit: F)
    where
        F: FnMut(&str, &EventPayload),
    {
        for entry in self.ordered() {
            emit(&entry.id, &entry.payload);
        }
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl Default for BootstrapCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(entries: &[BootstrapEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn upsert_appends_new_ids_in_order() {
        let cache = BootstrapCache::new();
        cache.upsert("trace-loaded", json!(1));
        cache.upsert("filenames-loaded", json!(2));
        assert_eq!(
            ids(&cache.ordered()),
            vec!["trace-loaded", "filenames-loaded"]
        );
    }

    #[test]
    fn upsert_replaces_in_place() {
        let cache = BootstrapCache::new();
        cache.upsert("trace-loaded", json!(1));
        cache.upsert("filenames-loaded", json!(2));
        cache.upsert("trace-loaded", json!(3));

        let entries = cache.ordered();
        assert_eq!(ids(&entries), vec!["trace-loaded", "filenames-loaded"]);
        assert_eq!(entries[0].payload, json!(3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn priority_ids_replay_first_in_declared_order() {
        let cache = BootstrapCache::new();
        // Inserted deliberately out of priority order.
        cache.upsert("trace-loaded", json!(1));
        cache.upsert("welcome-screen", json!(2));
        cache.upsert("session-started", json!(3));
        cache.upsert("session-init", json!(4));

        assert_eq!(
            ids(&cache.ordered()),
            vec![
                "session-started",
                "session-init",
                "welcome-screen",
                "trace-loaded"
            ]
        );
    }

    #[test]
    fn stale_value_never_replays_and_handshake_leads() {
        // Upserts: trace-loaded v1, session-started, trace-loaded v2.
        let cache = BootstrapCache::new();
        cache.upsert("trace-loaded", json!({"v": 1}));
        cache.upsert("session-started", json!({"v": "s"}));
        cache.upsert("trace-loaded", json!({"v": 2}));

        let entries = cache.ordered();
        assert_eq!(ids(&entries), vec!["session-started", "trace-loaded"]);
        assert_eq!(entries[0].payload, json!({"v": "s"}));
        assert_eq!(entries[1].payload, json!({"v": 2}));
    }

    #[test]
    fn absent_priority_ids_are_skipped() {
        let cache = BootstrapCache::new();
        cache.upsert("symbols-loaded", json!(null));
        assert_eq!(ids(&cache.ordered()), vec!["symbols-loaded"]);
    }

    #[test]
    fn replay_visits_every_entry_once_in_order() {
        let cache = BootstrapCache::new();
        cache.upsert("filesystem-loaded", json!(1));
        cache.upsert("session-init", json!(2));
        cache.upsert("no-active-trace", json!(3));

        let mut seen = Vec::new();
        cache.replay(|id, payload| seen.push((id.to_string(), payload.clone())));

        assert_eq!(
            seen.iter().map(|(id, _)| id.as_str()).collect::<Vec<_>>(),
            vec!["session-init", "no-active-trace", "filesystem-loaded"]
        );
    }

    #[test]
    fn empty_cache_replays_nothing() {
        let cache = BootstrapCache::new();
        assert!(cache.is_empty());
        let mut calls = 0;
        cache.replay(|_, _| calls += 1);
        assert_eq!(calls, 0);
    }
}
