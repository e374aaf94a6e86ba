use crate::domain::error::BoardError;
use crate::domain::model::ContractMetadata;
use crate::domain::traits::NftIndex;
use crate::infrastructure::config::AlchemyConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

// Alchemy NFT API v3 response structures
#[derive(Deserialize, Debug)]
struct OwnersResponse {
    owners: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct NftsForOwnerResponse {
    #[serde(rename = "ownedNfts", default)]
    owned_nfts: Vec<OwnedNft>,
}

#[derive(Deserialize, Debug)]
struct OwnedNft {
    #[serde(rename = "tokenId")]
    #[allow(dead_code)]
    token_id: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ContractMetadataResponse {
    name: Option<String>,
    #[serde(rename = "totalSupply")]
    total_supply: Option<String>,
}

#[derive(Deserialize, Debug)]
struct NftsForContractResponse {
    #[serde(default)]
    nfts: Vec<ContractNft>,
}

#[derive(Deserialize, Debug)]
struct ContractNft {
    #[serde(rename = "tokenId")]
    token_id: String,
}

/// NFT index provider backed by the Alchemy NFT REST API
pub struct AlchemyIndex {
    client: Client,
    base_url: String,
}

impl AlchemyIndex {
    pub fn new(client: Client, config: &AlchemyConfig) -> Result<Self, BoardError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| BoardError::Config("Alchemy API key not configured".to_string()))?;

        Ok(Self {
            client,
            base_url: format!(
                "https://{}.g.alchemy.com/nft/v3/{}",
                config.network, api_key
            ),
        })
    }

    /// The JSON-RPC endpoint sharing this provider's key, used for balance queries
    pub fn rpc_url(config: &AlchemyConfig) -> Result<String, BoardError> {
        let api_key = config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| BoardError::Config("Alchemy API key not configured".to_string()))?;

        Ok(format!("https://{}.g.alchemy.com/v2/{}", config.network, api_key))
    }
}

#[async_trait]
impl NftIndex for AlchemyIndex {
    async fn owners_for_contract(&self, contract: &str) -> Result<Vec<String>, BoardError> {
        let response = self
            .client
            .get(format!("{}/getOwnersForContract", self.base_url))
            .query(&[("contractAddress", contract)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| BoardError::Api(format!("getOwnersForContract failed: {}", e)))?
            .json::<OwnersResponse>()
            .await?;

        Ok(response.owners)
    }

    async fn owned_token_count(&self, owner: &str, contract: &str) -> Result<u64, BoardError> {
        let response = self
            .client
            .get(format!("{}/getNFTsForOwner", self.base_url))
            .query(&[
                ("owner", owner),
                ("contractAddresses[]", contract),
                ("withMetadata", "false"),
            ])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| BoardError::Api(format!("getNFTsForOwner failed: {}", e)))?
            .json::<NftsForOwnerResponse>()
            .await?;

        Ok(response.owned_nfts.len() as u64)
    }

    async fn contract_metadata(&self, contract: &str) -> Result<ContractMetadata, BoardError> {
        let response = self
            .client
            .get(format!("{}/getContractMetadata", self.base_url))
            .query(&[("contractAddress", contract)])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| BoardError::Api(format!("getContractMetadata failed: {}", e)))?
            .json::<ContractMetadataResponse>()
            .await?;

        Ok(ContractMetadata {
            name: response.name,
            total_supply: response
                .total_supply
                .and_then(|s| s.parse::<u64>().ok()),
        })
    }

    async fn token_ids_for_contract(&self, contract: &str) -> Result<Vec<String>, BoardError> {
        let response = self
            .client
            .get(format!("{}/getNFTsForContract", self.base_url))
            .query(&[("contractAddress", contract), ("withMetadata", "false")])
            .send()
            .await?
            .error_for_status()
            .map_err(|e| BoardError::Api(format!("getNFTsForContract failed: {}", e)))?
            .json::<NftsForContractResponse>()
            .await?;

        Ok(response.nfts.into_iter().map(|n| n.token_id).collect())
    }
}
