use serde::{Deserialize, Serialize};

// One wallet's Access Pass count for the tracked contract
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Holding {
    pub address: String, // lowercase 0x-prefixed hex
    pub count: u64,
}

// Aggregation result plus where it came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MintCountReport {
    pub holdings: Vec<Holding>,
    pub source: HoldingsSource,
    pub fetched_at: Option<i64>, // epoch ms, None when served from cache
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum HoldingsSource {
    // served from the in-memory cache without network calls
    Cache,
    // full per-owner aggregation against the indexing API
    Indexer,
    // owners list only, every count defaulted to 1
    OwnersOnly,
}

// Campaign funding figures derived from chain state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignStats {
    pub contract_name: Option<String>,
    pub raised_eth: f64,
    pub raised_usd: f64,
    pub goal_eth: f64,
    pub total_mints: u64,
    pub eth_price_usd: f64,
    pub price_is_live: bool,
}

impl CampaignStats {
    pub fn progress_pct(&self) -> f64 {
        if self.goal_eth <= 0.0 {
            return 0.0;
        }
        (self.raised_eth / self.goal_eth) * 100.0
    }
}

// Linked Farcaster identity for a wallet; absence means "no linked identity"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FarcasterProfile {
    pub username: String,
    pub display_name: Option<String>,
    pub fid: u64,
}

// One leaderboard row: a holding with its optional identity overlay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackerRow {
    pub address: String,
    pub count: u64,
    pub profile: Option<FarcasterProfile>,
}

// Minimal contract metadata as reported by the indexing API
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractMetadata {
    pub name: Option<String>,
    pub total_supply: Option<u64>,
}

/// Normalize a wallet address for map keys and display: lowercase, 0x-prefixed.
pub fn normalize_address(address: &str) -> String {
    let lower = address.to_lowercase();
    if lower.starts_with("0x") {
        lower
    } else {
        format!("0x{}", lower)
    }
}
