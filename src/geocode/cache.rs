//! In-process geocode cache.
//!
//! Keys are the full address query, case-insensitive and whitespace-collapsed.
//! Entries live for the process lifetime; there is no expiry.

use super::types::GeocodeOutcome;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct CacheEntry {
    outcome: GeocodeOutcome,
    stored_at: DateTime<Utc>,
}

/// The geocode cache.
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: HashMap<String, CacheEntry>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(address: &str) -> String {
        address
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase()
    }

    pub fn get(&self, address: &str) -> Option<GeocodeOutcome> {
        self.entries
            .get(&Self::key(address))
            .map(|entry| entry.outcome.clone())
    }

    /// When the entry for `address` was stored, if any.
    pub fn stored_at(&self, address: &str) -> Option<DateTime<Utc>> {
        self.entries.get(&Self::key(address)).map(|e| e.stored_at)
    }

    pub fn put(&mut self, address: &str, outcome: GeocodeOutcome) {
        self.entries.insert(
            Self::key(address),
            CacheEntry {
                outcome,
                stored_at: Utc::now(),
            },
        );
    }

    pub fn remove(&mut self, address: &str) -> Option<GeocodeOutcome> {
        self.entries.remove(&Self::key(address)).map(|e| e.outcome)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::types::UnresolvedReason;
    use crate::listing::Coordinate;

    fn herzl() -> GeocodeOutcome {
        GeocodeOutcome::resolved(Coordinate::new(32.81, 35.0).unwrap())
    }

    #[test]
    fn test_cache_put_get() {
        let mut cache = GeocodeCache::new();
        cache.put("Herzl 12, Haifa, Israel", herzl());
        assert_eq!(cache.get("Herzl 12, Haifa, Israel"), Some(herzl()));
        assert!(cache.stored_at("Herzl 12, Haifa, Israel").is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_case_and_space_insensitive() {
        let mut cache = GeocodeCache::new();
        cache.put("Herzl 12, Haifa, Israel", herzl());
        assert!(cache.get("HERZL 12, HAIFA, ISRAEL").is_some());
        assert!(cache.get("  herzl   12,  haifa, israel ").is_some());
    }

    #[test]
    fn test_stored_at_marks_insert_time() {
        let mut cache = GeocodeCache::new();
        let before = Utc::now();
        cache.put("Herzl 12", herzl());
        let stored = cache.stored_at("herzl 12").unwrap();
        assert!(stored >= before && stored <= Utc::now());
        assert!(cache.stored_at("Nowhere 1").is_none());
    }

    #[test]
    fn test_cache_miss() {
        let cache = GeocodeCache::new();
        assert!(cache.is_empty());
        assert!(cache.get("Nowhere 1").is_none());
    }

    #[test]
    fn test_cache_keeps_no_match() {
        let mut cache = GeocodeCache::new();
        let outcome = GeocodeOutcome::unresolved(UnresolvedReason::NoMatch);
        cache.put("Nowhere 1", outcome.clone());
        assert_eq!(cache.get("nowhere 1"), Some(outcome));
    }

    #[test]
    fn test_cache_remove() {
        let mut cache = GeocodeCache::new();
        cache.put("Herzl 12", herzl());
        assert_eq!(cache.remove("herzl 12"), Some(herzl()));
        assert!(cache.get("Herzl 12").is_none());
    }
}
