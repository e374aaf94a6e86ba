use crate::domain::error::BoardError;
use crate::domain::model::{normalize_address, FarcasterProfile};
use crate::domain::traits::IdentityDirectory;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

const BULK_BY_ADDRESS_URL: &str = "https://api.neynar.com/v2/farcaster/user/bulk-by-address";

// Neynar bulk-by-address response structures
#[derive(Deserialize, Debug)]
struct BulkResponse {
    #[serde(default)]
    users: Vec<NeynarUser>,
}

#[derive(Deserialize, Debug)]
struct NeynarUser {
    fid: u64,
    username: String,
    #[serde(rename = "display_name")]
    display_name: Option<String>,
    #[serde(rename = "custody_address")]
    custody_address: Option<String>,
    #[serde(rename = "verified_addresses")]
    verified_addresses: Option<VerifiedAddresses>,
}

#[derive(Deserialize, Debug)]
struct VerifiedAddresses {
    #[serde(rename = "eth_addresses", default)]
    eth_addresses: Vec<String>,
}

/// Identity provider backed by the Neynar Farcaster API
pub struct NeynarDirectory {
    client: Client,
    api_key: Option<String>,
}

impl NeynarDirectory {
    pub fn new(client: Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl IdentityDirectory for NeynarDirectory {
    /// Bulk-resolve Farcaster profiles for wallet addresses
    ///
    /// A profile is recorded under the custody address and every verified
    /// address. Addresses without a linked account are simply absent from
    /// the returned map. No key or no input means an empty map, not an error.
    async fn profiles_for_addresses(
        &self,
        addresses: &[String],
    ) -> Result<HashMap<String, FarcasterProfile>, BoardError> {
        let mut profiles = HashMap::new();

        let api_key = match self.api_key.as_deref().filter(|k| !k.is_empty()) {
            Some(key) => key,
            None => return Ok(profiles),
        };
        if addresses.is_empty() {
            return Ok(profiles);
        }

        let joined = addresses
            .iter()
            .map(|a| normalize_address(a))
            .collect::<Vec<_>>()
            .join(",");

        let response = self
            .client
            .get(BULK_BY_ADDRESS_URL)
            .query(&[("addresses", joined.as_str())])
            .header("x-api-key", api_key)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| BoardError::Api(format!("bulk-by-address failed: {}", e)))?
            .json::<BulkResponse>()
            .await?;

        for user in response.users {
            let profile = FarcasterProfile {
                username: user.username,
                display_name: user.display_name,
                fid: user.fid,
            };

            if let Some(custody) = &user.custody_address {
                profiles.insert(normalize_address(custody), profile.clone());
            }
            if let Some(verified) = &user.verified_addresses {
                for addr in &verified.eth_addresses {
                    profiles.insert(normalize_address(addr), profile.clone());
                }
            }
        }

        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_api_key_returns_empty_map() {
        let directory = NeynarDirectory::new(Client::new(), None);
        let profiles = directory
            .profiles_for_addresses(&["0xaa".to_string()])
            .await
            .unwrap();
        assert!(profiles.is_empty());
    }

    #[tokio::test]
    async fn empty_input_returns_empty_map() {
        let directory = NeynarDirectory::new(Client::new(), Some("key".to_string()));
        let profiles = directory.profiles_for_addresses(&[]).await.unwrap();
        assert!(profiles.is_empty());
    }

    #[test]
    fn user_maps_to_custody_and_verified_addresses() {
        let json = r#"{
            "users": [{
                "fid": 99,
                "username": "jessepollak",
                "display_name": "Jesse",
                "custody_address": "0x2211D1D0020DAEA8039E46CF1367962070D77DA9",
                "verified_addresses": {"eth_addresses": ["0xAbCd"]}
            }]
        }"#;
        let parsed: BulkResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.users.len(), 1);

        let user = &parsed.users[0];
        assert_eq!(user.fid, 99);
        assert_eq!(
            normalize_address(user.custody_address.as_deref().unwrap()),
            "0x2211d1d0020daea8039e46cf1367962070d77da9"
        );
        assert_eq!(
            user.verified_addresses.as_ref().unwrap().eth_addresses,
            vec!["0xAbCd"]
        );
    }
}
