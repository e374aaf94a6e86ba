use crate::domain::error::BoardError;
use crate::domain::traits::ChainRpc;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

// ERC-721 totalSupply() selector
const TOTAL_SUPPLY_SELECTOR: &str = "0x18160ddd";

#[derive(Deserialize, Debug)]
struct RpcResponse {
    result: Option<String>,
    error: Option<RpcErrorBody>,
}

#[derive(Deserialize, Debug)]
struct RpcErrorBody {
    code: i64,
    message: String,
}

/// Chain RPC provider speaking plain JSON-RPC to an Ethereum endpoint
///
/// Used against the index provider's RPC endpoint first and a public
/// endpoint as the degraded-path fallback.
pub struct JsonRpcEth {
    client: Client,
    url: String,
}

impl JsonRpcEth {
    pub fn new(client: Client, url: String) -> Self {
        Self { client, url }
    }

    async fn call(&self, method: &str, params: serde_json::Value) -> Result<String, BoardError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await?
            .json::<RpcResponse>()
            .await?;

        if let Some(error) = response.error {
            return Err(BoardError::Rpc(format!(
                "{} failed ({}): {}",
                method, error.code, error.message
            )));
        }

        response
            .result
            .ok_or_else(|| BoardError::Rpc(format!("{} returned no result", method)))
    }
}

#[async_trait]
impl ChainRpc for JsonRpcEth {
    async fn native_balance(&self, address: &str) -> Result<u128, BoardError> {
        let result = self
            .call("eth_getBalance", json!([address, "latest"]))
            .await?;
        parse_quantity(&result)
    }

    async fn total_supply(&self, contract: &str) -> Result<u64, BoardError> {
        let result = self
            .call(
                "eth_call",
                json!([{"to": contract, "data": TOTAL_SUPPLY_SELECTOR}, "latest"]),
            )
            .await?;
        parse_abi_word(&result)
    }
}

/// Parse a JSON-RPC hex quantity ("0x1b3...") into wei
fn parse_quantity(hex_value: &str) -> Result<u128, BoardError> {
    let digits = hex_value.trim_start_matches("0x");
    if digits.is_empty() {
        return Ok(0);
    }
    u128::from_str_radix(digits, 16)
        .map_err(|e| BoardError::Rpc(format!("bad quantity {}: {}", hex_value, e)))
}

/// Parse a single 32-byte ABI return word into a u64
fn parse_abi_word(hex_value: &str) -> Result<u64, BoardError> {
    let digits = hex_value.trim_start_matches("0x");
    let bytes = hex::decode(digits)
        .map_err(|e| BoardError::Rpc(format!("bad return data {}: {}", hex_value, e)))?;
    if bytes.len() != 32 {
        return Err(BoardError::Rpc(format!(
            "expected 32-byte word, got {} bytes",
            bytes.len()
        )));
    }
    // Values beyond u64 don't occur for token supplies; reject rather than wrap
    if bytes[..24].iter().any(|b| *b != 0) {
        return Err(BoardError::Rpc("return word exceeds u64".to_string()));
    }
    let mut tail = [0u8; 8];
    tail.copy_from_slice(&bytes[24..]);
    Ok(u64::from_be_bytes(tail))
}
