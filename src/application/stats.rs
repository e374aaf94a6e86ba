use crate::domain::error::BoardError;
use crate::domain::model::{CampaignStats, ContractMetadata};
use crate::domain::traits::{ChainRpc, NftIndex};
use crate::infrastructure::config::Config;

const WEI_PER_ETH: f64 = 1e18;

pub fn wei_to_eth(wei: u128) -> f64 {
    wei as f64 / WEI_PER_ETH
}

/// Native balance of the contract, trying the index provider's RPC first
/// and a public endpoint second.
pub async fn contract_balance_wei(
    primary: &dyn ChainRpc,
    fallback: &dyn ChainRpc,
    address: &str,
) -> Result<u128, BoardError> {
    match primary.native_balance(address).await {
        Ok(balance) => Ok(balance),
        Err(e) => {
            tracing::warn!("balance query failed, using public RPC: {}", e);
            fallback.native_balance(address).await
        }
    }
}

/// Total mints for the contract.
///
/// Tries, in order: the metadata `totalSupply` (when already fetched), the
/// distinct-owner count, the token list length, and finally a direct
/// `totalSupply()` call on chain. The owner count undercounts multi-mint
/// wallets; it is kept as a cheap approximation when metadata is missing.
pub async fn total_mint_count(
    index: &dyn NftIndex,
    rpc: &dyn ChainRpc,
    contract: &str,
    metadata: Option<&ContractMetadata>,
) -> Result<u64, BoardError> {
    if let Some(total_supply) = metadata.and_then(|m| m.total_supply) {
        return Ok(total_supply);
    }

    match index.owners_for_contract(contract).await {
        Ok(owners) if !owners.is_empty() => return Ok(owners.len() as u64),
        Ok(_) => {}
        Err(e) => tracing::debug!("owners count unavailable: {}", e),
    }

    match index.token_ids_for_contract(contract).await {
        Ok(token_ids) => return Ok(token_ids.len() as u64),
        Err(e) => tracing::debug!("token list unavailable: {}", e),
    }

    // Last resort: ask the chain directly
    rpc.total_supply(contract).await
}

/// Assemble the campaign funding figures.
///
/// `live_price` is the fetched spot price when available; the configured
/// fixed price covers the degraded case. A failed mint-count chain degrades
/// to zero rather than failing the whole stats block.
pub async fn campaign_stats(
    index: &dyn NftIndex,
    primary_rpc: &dyn ChainRpc,
    fallback_rpc: &dyn ChainRpc,
    config: &Config,
    contract: &str,
    live_price: Option<f64>,
) -> Result<CampaignStats, BoardError> {
    let balance_wei = contract_balance_wei(primary_rpc, fallback_rpc, contract).await?;
    let raised_eth = wei_to_eth(balance_wei) + config.balance_offset_eth;

    let (eth_price_usd, price_is_live) = match live_price {
        Some(price) => (price, true),
        None => (config.eth_price_usd, false),
    };

    let metadata = match index.contract_metadata(contract).await {
        Ok(metadata) => Some(metadata),
        Err(e) => {
            tracing::debug!("contract metadata unavailable: {}", e);
            None
        }
    };

    let total_mints = match total_mint_count(index, primary_rpc, contract, metadata.as_ref()).await
    {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!("mint count unavailable: {}", e);
            0
        }
    };

    Ok(CampaignStats {
        contract_name: metadata.and_then(|m| m.name),
        raised_eth,
        raised_usd: raised_eth * eth_price_usd,
        goal_eth: config.goal_eth,
        total_mints,
        eth_price_usd,
        price_is_live,
    })
}
