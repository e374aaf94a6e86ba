// HTTP client utilities
use crate::domain::error::BoardError;
use reqwest::Client;

/// Create the shared HTTP client with pooling and a hard request timeout
///
/// The 30s timeout bounds every per-owner query, so a single hung request
/// cannot stall a whole aggregation batch.
pub fn create_client() -> Result<Client, BoardError> {
    Ok(Client::builder()
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(std::time::Duration::from_secs(30))
        .timeout(std::time::Duration::from_secs(30))
        .user_agent("mintboard/0.1.0")
        .build()?)
}
