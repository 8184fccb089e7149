//! Raw JSON-RPC access to the node.
//!
//! Everything is kept in the node's hex-string form so the transaction
//! objects can be normalized by [`edge_tx_hash::RpcTransaction`] exactly as
//! the node sent them.

use std::sync::atomic::{
    AtomicU64,
    Ordering,
};

use alloy::primitives::{
    Address,
    B256,
    U256,
};
use edge_tx_hash::{
    AdapterError,
    RpcTransaction,
    hex::{
        encode_hex_prefixed,
        parse_b256,
        parse_u64,
        parse_u256,
    },
};
use reqwest::Client;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    de::DeserializeOwned,
};
use serde_json::{
    Value,
    json,
};
use tracing::trace;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum NodeClientError {
    #[error("HTTP client error: {0}")]
    ReqwestError(#[from] reqwest::Error),
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("JSON-RPC error code {code}: {message}")]
    JsonRpcError { code: i64, message: String },
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
    #[error("Invalid value in response: {0}")]
    InvalidValue(#[from] AdapterError),
}

/// JSON-RPC request structure
#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T> {
    jsonrpc: &'static str,
    method: &'a str,
    params: T,
    id: u64,
}

/// JSON-RPC response structure. `result` is `Some(Value::Null)` for an
/// explicit `null` and `None` when the key is missing.
#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    jsonrpc: String,
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    error: Option<JsonRpcError>,
    id: u64,
}

/// JSON-RPC error structure
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Block as returned by `eth_getBlockByNumber` with full transaction objects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcBlock {
    pub number: String,
    pub hash: String,
    pub parent_hash: String,
    #[serde(default)]
    pub transactions: Vec<RpcTransaction>,
}

impl RpcBlock {
    pub fn number(&self) -> Result<u64, AdapterError> {
        parse_u64("number", &self.number)
    }

    pub fn hash(&self) -> Result<B256, AdapterError> {
        parse_b256("hash", &self.hash)
    }

    pub fn parent_hash(&self) -> Result<B256, AdapterError> {
        parse_b256("parentHash", &self.parent_hash)
    }
}

/// Subset of `eth_getTransactionReceipt` the harness needs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_hash: Option<String>,
    #[serde(default)]
    pub block_number: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl RpcReceipt {
    /// `None` while the receipt is not attached to a block yet.
    pub fn block_number(&self) -> Result<Option<u64>, AdapterError> {
        self.block_number
            .as_deref()
            .map(|number| parse_u64("blockNumber", number))
            .transpose()
    }

    pub fn succeeded(&self) -> Result<bool, AdapterError> {
        match self.status.as_deref() {
            Some(status) => Ok(parse_u64("status", status)? == 1),
            None => Ok(true),
        }
    }
}

/// A JSON-RPC 2.0 client for a single node endpoint.
///
/// ``` no_run
/// use edge_harness::rpc::NodeClient;
///
/// #[tokio::main]
/// async fn main() {
///     let client = NodeClient::new("http://localhost:10002").unwrap();
///     let latest = client.block_number().await.unwrap();
///     let block = client.block_by_number(latest).await.unwrap();
/// }
/// ```
#[derive(Debug)]
pub struct NodeClient {
    client: Client,
    url: Url,
    request_id: AtomicU64,
}

impl NodeClient {
    pub fn new(url: &str) -> Result<Self, NodeClientError> {
        let url = Url::parse(url)?;
        let client = Client::builder().use_rustls_tls().build()?;

        Ok(Self {
            client,
            url,
            request_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn next_request_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Perform an arbitrary JSON-RPC call.
    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R, NodeClientError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let request_id = self.next_request_id();
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method,
            params,
            id: request_id,
        };
        trace!(method, id = request_id, "sending JSON-RPC request");

        let response = self
            .client
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NodeClientError::InvalidResponse(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let response_body: JsonRpcResponse = response.json().await?;

        if response_body.jsonrpc != "2.0" {
            return Err(NodeClientError::InvalidResponse(format!(
                "Invalid JSON-RPC version: expected '2.0', got '{}'",
                response_body.jsonrpc
            )));
        }

        if response_body.id != request_id {
            return Err(NodeClientError::InvalidResponse(format!(
                "Request/response ID mismatch: expected {}, got {}",
                request_id, response_body.id
            )));
        }

        if let Some(error) = response_body.error {
            return Err(NodeClientError::JsonRpcError {
                code: error.code,
                message: error.message,
            });
        }

        let result = response_body.result.ok_or_else(|| {
            NodeClientError::InvalidResponse("Missing result in successful response".to_string())
        })?;
        Ok(serde_json::from_value(result)?)
    }

    pub async fn block_number(&self) -> Result<u64, NodeClientError> {
        let number: String = self.request("eth_blockNumber", json!([])).await?;
        Ok(parse_u64("blockNumber", &number)?)
    }

    pub async fn chain_id(&self) -> Result<u64, NodeClientError> {
        let chain_id: String = self.request("eth_chainId", json!([])).await?;
        Ok(parse_u64("chainId", &chain_id)?)
    }

    pub async fn gas_price(&self) -> Result<U256, NodeClientError> {
        let gas_price: String = self.request("eth_gasPrice", json!([])).await?;
        Ok(parse_u256("gasPrice", &gas_price)?)
    }

    /// Next nonce for `address`, counting transactions still in the pool.
    pub async fn pending_nonce(&self, address: Address) -> Result<u64, NodeClientError> {
        let nonce: String = self
            .request(
                "eth_getTransactionCount",
                json!([encode_hex_prefixed(address), "pending"]),
            )
            .await?;
        Ok(parse_u64("nonce", &nonce)?)
    }

    /// Block `number` with full transaction objects, `None` if the node does
    /// not have it.
    pub async fn block_by_number(&self, number: u64) -> Result<Option<RpcBlock>, NodeClientError> {
        self.request("eth_getBlockByNumber", json!([format!("{number:#x}"), true]))
            .await
    }

    pub async fn transaction_receipt(
        &self,
        hash: B256,
    ) -> Result<Option<RpcReceipt>, NodeClientError> {
        self.request("eth_getTransactionReceipt", json!([hash]))
            .await
    }

    /// Submit a signed, encoded transaction. Returns the hash the node assigned.
    pub async fn send_raw_transaction(&self, raw: &[u8]) -> Result<B256, NodeClientError> {
        let hash: String = self
            .request("eth_sendRawTransaction", json!([encode_hex_prefixed(raw)]))
            .await?;
        Ok(parse_b256("hash", &hash)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        Mock,
        MockServer,
        ResponseTemplate,
        matchers::method,
    };

    #[test]
    fn test_receipt_block_number() {
        let pending = RpcReceipt {
            transaction_hash: format!("0x{}", "ab".repeat(32)),
            block_hash: None,
            block_number: None,
            status: None,
        };
        assert_eq!(pending.block_number().unwrap(), None);
        assert!(pending.succeeded().unwrap());

        let mined = RpcReceipt {
            block_number: Some("0x2a".to_string()),
            status: Some("0x0".to_string()),
            ..pending
        };
        assert_eq!(mined.block_number().unwrap(), Some(42));
        assert!(!mined.succeeded().unwrap());
    }

    #[test]
    fn test_block_fields() {
        let block: RpcBlock = serde_json::from_value(json!({
            "number": "0x1",
            "hash": format!("0x{}", "11".repeat(32)),
            "parentHash": format!("0x{}", "00".repeat(32)),
            "transactions": []
        }))
        .unwrap();

        assert_eq!(block.number().unwrap(), 1);
        assert_eq!(block.hash().unwrap(), B256::repeat_byte(0x11));
        assert_eq!(block.parent_hash().unwrap(), B256::ZERO);
    }

    #[tokio::test]
    async fn test_json_rpc_validation() {
        // Invalid JSON-RPC version
        {
            let mock_server = MockServer::start().await;
            let client = NodeClient::new(&mock_server.uri()).unwrap();

            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "1.0",
                    "result": "0x1",
                    "id": 1
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            match client.block_number().await.unwrap_err() {
                NodeClientError::InvalidResponse(msg) => {
                    assert!(msg.contains("Invalid JSON-RPC version"));
                }
                other => panic!("Expected InvalidResponse error, got: {other:?}"),
            }
        }

        // Mismatched ID
        {
            let mock_server = MockServer::start().await;
            let client = NodeClient::new(&mock_server.uri()).unwrap();

            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "2.0",
                    "result": "0x1",
                    "id": 999
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            match client.block_number().await.unwrap_err() {
                NodeClientError::InvalidResponse(msg) => {
                    assert!(msg.contains("Request/response ID mismatch"));
                }
                other => panic!("Expected InvalidResponse error, got: {other:?}"),
            }
        }

        // Missing result
        {
            let mock_server = MockServer::start().await;
            let client = NodeClient::new(&mock_server.uri()).unwrap();

            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                    "jsonrpc": "2.0",
                    "id": 1
                })))
                .expect(1)
                .mount(&mock_server)
                .await;

            match client.block_number().await.unwrap_err() {
                NodeClientError::InvalidResponse(msg) => {
                    assert!(msg.contains("Missing result"));
                }
                other => panic!("Expected InvalidResponse error, got: {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_null_result_is_none() {
        let mock_server = MockServer::start().await;
        let client = NodeClient::new(&mock_server.uri()).unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "result": null,
                "id": 1
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        assert_eq!(client.block_by_number(1_000).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_json_rpc_error_object() {
        let mock_server = MockServer::start().await;
        let client = NodeClient::new(&mock_server.uri()).unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": { "code": -32000, "message": "nonce too low" },
                "id": 1
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = client.send_raw_transaction(&[0xf8]).await.unwrap_err();
        assert!(matches!(
            err,
            NodeClientError::JsonRpcError { code: -32000, ref message } if message == "nonce too low"
        ));
    }

    #[tokio::test]
    async fn test_http_error_status() {
        let mock_server = MockServer::start().await;
        let client = NodeClient::new(&mock_server.uri()).unwrap();

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&mock_server)
            .await;

        let err = client.chain_id().await.unwrap_err();
        assert!(err.to_string().contains("503"));
    }
}
