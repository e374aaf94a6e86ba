// In-memory holdings cache using DashMap
use crate::domain::model::Holding;
use dashmap::DashMap;
use std::time::Duration;

#[derive(Debug, Clone)]
struct CacheEntry {
    holdings: Vec<Holding>,
    fetched_at_ms: i64,
}

/// Thread-safe TTL cache for aggregated holdings, keyed by contract address
///
/// Entries are replaced wholesale and expire implicitly at read time; callers
/// pass the clock in so tests can control expiry.
pub struct HoldingsCache {
    entries: DashMap<String, CacheEntry>,
    ttl_ms: i64,
}

impl HoldingsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl_ms: ttl.as_millis() as i64,
        }
    }

    /// Return the cached holdings if the entry is younger than the TTL
    pub fn fresh(&self, contract: &str, now_ms: i64) -> Option<Vec<Holding>> {
        let key = contract.to_lowercase();
        let entry = self.entries.get(&key)?;
        if now_ms - entry.fetched_at_ms < self.ttl_ms {
            Some(entry.holdings.clone())
        } else {
            None
        }
    }

    /// Overwrite the entry for a contract with freshly aggregated holdings
    pub fn store(&self, contract: &str, holdings: Vec<Holding>, now_ms: i64) {
        self.entries.insert(
            contract.to_lowercase(),
            CacheEntry {
                holdings,
                fetched_at_ms: now_ms,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[allow(dead_code)]
    pub fn clear(&self) {
        self.entries.clear();
    }
}
