use crate::domain::error::BoardError;
use crate::domain::model::{normalize_address, Holding, HoldingsSource, MintCountReport};
use crate::domain::traits::NftIndex;
use crate::infrastructure::storage::cache::HoldingsCache;
use chrono::Utc;
use futures_util::future::join_all;
use std::collections::HashSet;

/// Aggregate per-wallet mint counts for a contract, read-through cached.
///
/// A fresh cache entry is returned without any network calls. On a miss the
/// owners list is fanned out into concurrent per-owner count queries; an
/// individual failure degrades that owner to a count of 1 rather than failing
/// the batch. If the owners query itself fails, a second owners-only pass
/// assigns every holder a count of 1. Only when both passes fail does the
/// call error, and nothing is cached so the next call retries from scratch.
pub async fn wallet_mint_counts(
    index: &dyn NftIndex,
    cache: &HoldingsCache,
    contract_address: &str,
    no_cache: bool,
) -> Result<MintCountReport, BoardError> {
    let now_ms = Utc::now().timestamp_millis();

    // 1. Cache
    if !no_cache {
        if let Some(holdings) = cache.fresh(contract_address, now_ms) {
            tracing::debug!("using cached wallet mint counts");
            return Ok(MintCountReport {
                holdings,
                source: HoldingsSource::Cache,
                fetched_at: None,
            });
        }
    }

    // 2. Full per-owner aggregation
    tracing::debug!("fetching fresh wallet mint counts");
    let primary = match aggregate_counts(index, contract_address).await {
        Ok(holdings) => {
            cache.store(contract_address, holdings.clone(), now_ms);
            return Ok(MintCountReport {
                holdings,
                source: HoldingsSource::Indexer,
                fetched_at: Some(now_ms),
            });
        }
        Err(e) => e,
    };

    // 3. Owners-only fallback: one pass, every holder counted once.
    // A degraded result is cached with the same TTL as an accurate one.
    tracing::warn!(
        "owner aggregation failed, falling back to owners list: {}",
        primary
    );
    match owners_only_counts(index, contract_address).await {
        Ok(holdings) => {
            cache.store(contract_address, holdings.clone(), now_ms);
            Ok(MintCountReport {
                holdings,
                source: HoldingsSource::OwnersOnly,
                fetched_at: Some(now_ms),
            })
        }
        Err(fallback) => {
            tracing::error!("owners fallback also failed: {}", fallback);
            Err(primary)
        }
    }
}

async fn aggregate_counts(
    index: &dyn NftIndex,
    contract: &str,
) -> Result<Vec<Holding>, BoardError> {
    let owners = dedupe_owners(index.owners_for_contract(contract).await?);

    // All per-owner queries in flight at once, join-all semantics
    let lookups = owners.iter().map(|owner| async move {
        match index.owned_token_count(owner, contract).await {
            Ok(count) => Holding {
                address: owner.clone(),
                count,
            },
            Err(e) => {
                // Can't get the exact count; the owner holds at least 1
                tracing::warn!("token count for {} failed, assuming 1: {}", owner, e);
                Holding {
                    address: owner.clone(),
                    count: 1,
                }
            }
        }
    });

    let mut holdings: Vec<Holding> = join_all(lookups)
        .await
        .into_iter()
        .filter(|h| h.count > 0)
        .collect();

    // Highest counts first; stable sort keeps the owners-query order for ties
    holdings.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(holdings)
}

async fn owners_only_counts(
    index: &dyn NftIndex,
    contract: &str,
) -> Result<Vec<Holding>, BoardError> {
    let owners = dedupe_owners(index.owners_for_contract(contract).await?);

    Ok(owners
        .into_iter()
        .map(|address| Holding { address, count: 1 })
        .collect())
}

// Normalize to lowercase and drop duplicates, keeping first occurrence
fn dedupe_owners(owners: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    owners
        .iter()
        .map(|o| normalize_address(o))
        .filter(|o| seen.insert(o.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ContractMetadata;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct StubIndex {
        owners: Vec<String>,
        counts: HashMap<String, u64>,
        failing_owners: Vec<String>,
        owners_failures: usize,
        yield_in_owners: bool,
        owners_calls: AtomicUsize,
        count_calls: AtomicUsize,
    }

    impl StubIndex {
        fn new(owners: &[&str]) -> Self {
            Self {
                owners: owners.iter().map(|o| o.to_string()).collect(),
                counts: HashMap::new(),
                failing_owners: Vec::new(),
                owners_failures: 0,
                yield_in_owners: false,
                owners_calls: AtomicUsize::new(0),
                count_calls: AtomicUsize::new(0),
            }
        }

        fn with_count(mut self, owner: &str, count: u64) -> Self {
            self.counts.insert(owner.to_string(), count);
            self
        }

        fn with_failing_owner(mut self, owner: &str) -> Self {
            self.failing_owners.push(owner.to_string());
            self
        }

        // Fail the first `n` owners queries, succeed afterwards
        fn with_owners_failures(mut self, n: usize) -> Self {
            self.owners_failures = n;
            self
        }

        // Suspend inside the owners query so concurrent callers interleave
        fn with_yield(mut self) -> Self {
            self.yield_in_owners = true;
            self
        }
    }

    #[async_trait]
    impl NftIndex for StubIndex {
        async fn owners_for_contract(&self, _contract: &str) -> Result<Vec<String>, BoardError> {
            let call = self.owners_calls.fetch_add(1, Ordering::SeqCst);
            if self.yield_in_owners {
                tokio::task::yield_now().await;
            }
            if call < self.owners_failures {
                return Err(BoardError::Api("owners query unavailable".to_string()));
            }
            Ok(self.owners.clone())
        }

        async fn owned_token_count(
            &self,
            owner: &str,
            _contract: &str,
        ) -> Result<u64, BoardError> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            if self.failing_owners.iter().any(|f| f == owner) {
                return Err(BoardError::Api("owner query unavailable".to_string()));
            }
            Ok(self.counts.get(owner).copied().unwrap_or(0))
        }

        async fn contract_metadata(&self, _contract: &str) -> Result<ContractMetadata, BoardError> {
            unreachable!("not exercised by the aggregator")
        }

        async fn token_ids_for_contract(
            &self,
            _contract: &str,
        ) -> Result<Vec<String>, BoardError> {
            unreachable!("not exercised by the aggregator")
        }
    }

    const CONTRACT: &str = "0xC049e891b0542414ead02223b1b70e0bc99d1511";

    fn cache() -> HoldingsCache {
        HoldingsCache::new(Duration::from_secs(3600))
    }

    fn now_ms() -> i64 {
        Utc::now().timestamp_millis()
    }

    #[tokio::test]
    async fn fresh_cache_entry_skips_network() {
        let index = StubIndex::new(&["0xaa"]);
        let cache = cache();
        cache.store(
            CONTRACT,
            vec![Holding {
                address: "0xaa".to_string(),
                count: 2,
            }],
            now_ms(),
        );

        let report = wallet_mint_counts(&index, &cache, CONTRACT, false)
            .await
            .unwrap();

        assert_eq!(report.source, HoldingsSource::Cache);
        assert_eq!(report.holdings[0].count, 2);
        assert_eq!(index.owners_calls.load(Ordering::SeqCst), 0);
        assert_eq!(index.count_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stale_cache_entry_is_refetched() {
        let index = StubIndex::new(&["0xaa"]).with_count("0xaa", 4);
        let cache = HoldingsCache::new(Duration::from_millis(10));
        cache.store(
            CONTRACT,
            vec![Holding {
                address: "0xaa".to_string(),
                count: 1,
            }],
            now_ms() - 60_000,
        );

        let report = wallet_mint_counts(&index, &cache, CONTRACT, false)
            .await
            .unwrap();

        assert_eq!(report.source, HoldingsSource::Indexer);
        assert_eq!(report.holdings[0].count, 4);
    }

    #[tokio::test]
    async fn nocache_bypasses_a_fresh_entry() {
        let index = StubIndex::new(&["0xaa"]).with_count("0xaa", 4);
        let cache = cache();
        cache.store(
            CONTRACT,
            vec![Holding {
                address: "0xaa".to_string(),
                count: 1,
            }],
            now_ms(),
        );

        let report = wallet_mint_counts(&index, &cache, CONTRACT, true)
            .await
            .unwrap();

        assert_eq!(report.source, HoldingsSource::Indexer);
        assert_eq!(index.owners_calls.load(Ordering::SeqCst), 1);
        // the refetch overwrote the old entry
        assert_eq!(
            cache.fresh(CONTRACT, now_ms()).unwrap()[0].count,
            4
        );
    }

    #[tokio::test]
    async fn sorts_descending_dedupes_and_lowercases() {
        let index = StubIndex::new(&["0xCC", "0xAA", "0xBB", "0xaa"])
            .with_count("0xcc", 1)
            .with_count("0xaa", 3)
            .with_count("0xbb", 2);
        let cache = cache();

        let report = wallet_mint_counts(&index, &cache, CONTRACT, false)
            .await
            .unwrap();

        let addresses: Vec<&str> = report.holdings.iter().map(|h| h.address.as_str()).collect();
        assert_eq!(addresses, vec!["0xaa", "0xbb", "0xcc"]);
        assert_eq!(report.holdings[0].count, 3);
        // the duplicate 0xAA/0xaa owner was queried once
        assert_eq!(index.count_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn ties_keep_owners_query_order() {
        let index = StubIndex::new(&["0xcc", "0xaa", "0xbb"])
            .with_count("0xcc", 2)
            .with_count("0xaa", 2)
            .with_count("0xbb", 2);
        let cache = cache();

        let report = wallet_mint_counts(&index, &cache, CONTRACT, false)
            .await
            .unwrap();

        let addresses: Vec<&str> = report.holdings.iter().map(|h| h.address.as_str()).collect();
        assert_eq!(addresses, vec!["0xcc", "0xaa", "0xbb"]);
    }

    #[tokio::test]
    async fn zero_count_owners_are_filtered() {
        let index = StubIndex::new(&["0xaa", "0xbb"])
            .with_count("0xaa", 0)
            .with_count("0xbb", 2);
        let cache = cache();

        let report = wallet_mint_counts(&index, &cache, CONTRACT, false)
            .await
            .unwrap();

        assert_eq!(report.holdings.len(), 1);
        assert_eq!(report.holdings[0].address, "0xbb");
    }

    #[tokio::test]
    async fn failed_owner_query_defaults_that_owner_to_one() {
        // owners query returns 0xAA and 0xBB; the count query for 0xBB throws
        let index = StubIndex::new(&["0xAA", "0xBB"])
            .with_count("0xaa", 3)
            .with_failing_owner("0xbb");
        let cache = cache();

        let report = wallet_mint_counts(&index, &cache, CONTRACT, false)
            .await
            .unwrap();

        assert_eq!(report.source, HoldingsSource::Indexer);
        assert_eq!(
            report.holdings,
            vec![
                Holding {
                    address: "0xaa".to_string(),
                    count: 3
                },
                Holding {
                    address: "0xbb".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[tokio::test]
    async fn owners_failure_falls_back_to_uniform_counts() {
        let index = StubIndex::new(&["0xaa", "0xbb", "0xcc"])
            .with_count("0xaa", 5)
            .with_owners_failures(1);
        let cache = cache();

        let report = wallet_mint_counts(&index, &cache, CONTRACT, false)
            .await
            .unwrap();

        assert_eq!(report.source, HoldingsSource::OwnersOnly);
        assert_eq!(report.holdings.len(), 3);
        assert!(report.holdings.iter().all(|h| h.count == 1));
        // the degraded result was cached like an accurate one
        assert!(cache.fresh(CONTRACT, now_ms()).is_some());
    }

    #[tokio::test]
    async fn concurrent_same_key_misses_both_fetch() {
        let index = StubIndex::new(&["0xaa"]).with_count("0xaa", 2).with_yield();
        let cache = cache();

        // no in-flight deduplication: two simultaneous misses both fetch,
        // and the last write wins with a consistent whole entry
        let (a, b) = tokio::join!(
            wallet_mint_counts(&index, &cache, CONTRACT, false),
            wallet_mint_counts(&index, &cache, CONTRACT, false)
        );

        assert_eq!(a.unwrap().source, HoldingsSource::Indexer);
        assert_eq!(b.unwrap().source, HoldingsSource::Indexer);
        assert_eq!(index.owners_calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.fresh(CONTRACT, now_ms()).unwrap()[0].count, 2);
    }

    #[tokio::test]
    async fn total_failure_returns_error_and_caches_nothing() {
        let index = StubIndex::new(&["0xaa"])
            .with_count("0xaa", 2)
            .with_owners_failures(2);
        let cache = cache();

        let result = wallet_mint_counts(&index, &cache, CONTRACT, false).await;

        assert!(result.is_err());
        assert!(cache.is_empty());

        // the next call retries from scratch instead of seeing a cached empty list
        let report = wallet_mint_counts(&index, &cache, CONTRACT, false)
            .await
            .unwrap();
        assert_eq!(report.source, HoldingsSource::Indexer);
        assert_eq!(report.holdings[0].count, 2);
    }
}
