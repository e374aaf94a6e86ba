use crate::domain::error::BoardError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Access Pass contract watched by default
    #[serde(default = "default_contract_address")]
    pub contract_address: String,
    #[serde(default = "default_goal_eth")]
    pub goal_eth: f64,
    /// Funds raised off-contract, added to the on-chain balance
    #[serde(default)]
    pub balance_offset_eth: f64,
    /// Price used when the live ETH price cannot be fetched
    #[serde(default = "default_eth_price_usd")]
    pub eth_price_usd: f64,
    /// Watch-mode refresh interval
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// Holder aggregation cache lifetime
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub clear_screen: bool,
    #[serde(default = "default_enable_emoji")]
    pub enable_emoji: bool,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub alchemy: AlchemyConfig,
    #[serde(default)]
    pub neynar: NeynarConfig,
    #[serde(default)]
    pub rpc: RpcConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct AlchemyConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_network")]
    pub network: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NeynarConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RpcConfig {
    #[serde(default = "default_rpc_url")]
    pub url: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: "WARN".to_string(),
        }
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: default_rpc_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contract_address: default_contract_address(),
            goal_eth: default_goal_eth(),
            balance_offset_eth: 0.0,
            eth_price_usd: default_eth_price_usd(),
            refresh_secs: default_refresh_secs(),
            cache_ttl_secs: default_cache_ttl_secs(),
            theme: default_theme(),
            clear_screen: false,
            enable_emoji: true,
            logging: Logging::default(),
            alchemy: AlchemyConfig {
                api_key: None,
                network: default_network(),
            },
            neynar: NeynarConfig::default(),
            rpc: RpcConfig::default(),
        }
    }
}

// Defaults
fn default_contract_address() -> String {
    "0xc049e891b0542414ead02223b1b70e0bc99d1511".to_string()
}
fn default_goal_eth() -> f64 {
    1.0
}
fn default_eth_price_usd() -> f64 {
    2000.0
}
fn default_refresh_secs() -> u64 {
    60
}
fn default_cache_ttl_secs() -> u64 {
    3600
}
fn default_theme() -> String {
    "base".to_string()
}
fn default_enable_emoji() -> bool {
    true
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "WARN".to_string()
}
fn default_network() -> String {
    "base-mainnet".to_string()
}
fn default_rpc_url() -> String {
    "https://mainnet.base.org".to_string()
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("mintboard").join("config.toml"))
}

pub fn load_config() -> Result<Config, BoardError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            match toml::from_str::<Config>(&content) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to parse config file: {}. Using defaults.",
                        e
                    );
                }
            }
        }
    }

    Ok(Config::default())
}

pub fn generate_config_sample() -> Result<(), BoardError> {
    let config_path = get_config_path();

    if let Some(path) = config_path {
        if path.exists() {
            eprintln!("Config file already exists at: {}", path.display());
            return Ok(());
        }

        // Create directory if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Generate sample config
        let sample = Config::default();
        let toml_content = toml::to_string_pretty(&sample)
            .map_err(|e| BoardError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(&path, toml_content)
            .map_err(|e| BoardError::Config(format!("Failed to write config file: {}", e)))?;
        println!("Generated config file at: {}", path.display());
    } else {
        return Err(BoardError::Config(
            "Cannot determine config directory".to_string(),
        ));
    }

    Ok(())
}
