use crate::domain::error::BoardError;
use crate::domain::model::{ContractMetadata, FarcasterProfile};
use async_trait::async_trait;
use std::collections::HashMap;

/// Trait for NFT indexing services
///
/// Abstracts the indexing API so the aggregation logic can be exercised
/// against in-memory doubles in tests and other providers later.
#[async_trait]
pub trait NftIndex: Send + Sync {
    /// List distinct owner addresses holding any token of the contract
    async fn owners_for_contract(&self, contract: &str) -> Result<Vec<String>, BoardError>;

    /// Number of tokens of `contract` held by `owner`
    async fn owned_token_count(&self, owner: &str, contract: &str) -> Result<u64, BoardError>;

    /// Contract-level metadata (name, symbol, total supply)
    async fn contract_metadata(&self, contract: &str) -> Result<ContractMetadata, BoardError>;

    /// Token ids minted by the contract
    async fn token_ids_for_contract(&self, contract: &str) -> Result<Vec<String>, BoardError>;
}

/// Trait for raw chain RPC queries
///
/// Used as the last-resort fallback when the indexing API is unavailable.
#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Native balance of an address in wei
    async fn native_balance(&self, address: &str) -> Result<u128, BoardError>;

    /// `totalSupply()` of an ERC-721 contract
    async fn total_supply(&self, contract: &str) -> Result<u64, BoardError>;
}

/// Trait for social identity lookups
///
/// Maps wallet addresses to linked Farcaster profiles. A missing entry in the
/// returned map means "no linked identity", not an error.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    async fn profiles_for_addresses(
        &self,
        addresses: &[String],
    ) -> Result<HashMap<String, FarcasterProfile>, BoardError>;
}
