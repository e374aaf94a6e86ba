use crate::domain::error::BoardError;
use reqwest::Client;
use serde::Deserialize;

const SIMPLE_PRICE_URL: &str =
    "https://api.coingecko.com/api/v3/simple/price?ids=ethereum&vs_currencies=usd";

#[derive(Deserialize, Debug)]
struct SimplePriceResponse {
    ethereum: Option<UsdPrice>,
}

#[derive(Deserialize, Debug)]
struct UsdPrice {
    usd: f64,
}

/// Fetch the current ETH price in USD from CoinGecko's public API
pub async fn eth_price_usd(client: &Client) -> Result<f64, BoardError> {
    let response = client
        .get(SIMPLE_PRICE_URL)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| BoardError::Api(format!("price query failed: {}", e)))?
        .json::<SimplePriceResponse>()
        .await?;

    response
        .ethereum
        .map(|p| p.usd)
        .ok_or_else(|| BoardError::Api("price response missing ethereum quote".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_response_deserializes() {
        let parsed: SimplePriceResponse =
            serde_json::from_str(r#"{"ethereum": {"usd": 2013.55}}"#).unwrap();
        assert_eq!(parsed.ethereum.unwrap().usd, 2013.55);
    }

    #[test]
    fn missing_quote_is_none() {
        let parsed: SimplePriceResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(parsed.ethereum.is_none());
    }
}
