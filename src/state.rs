use crate::domain::error::BoardError;
use crate::infrastructure::config::Config;
use crate::infrastructure::network::http::create_client;
use crate::infrastructure::storage::cache::HoldingsCache;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<HoldingsCache>,
    pub config: Arc<RwLock<Config>>,
    pub http_client: Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, BoardError> {
        let http_client = create_client()?;
        let cache = Arc::new(HoldingsCache::new(Duration::from_secs(
            config.cache_ttl_secs,
        )));

        Ok(Self {
            cache,
            config: Arc::new(RwLock::new(config)),
            http_client,
        })
    }
}
