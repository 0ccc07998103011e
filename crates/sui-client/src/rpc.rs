//! JSON-RPC transport to the Sui fullnode.
//!
//! [`RpcClient`] is the only component that talks to the network. It wraps
//! the node's JSON-RPC methods behind typed calls, maps HTTP-level and
//! RPC-level failures into [`ClientError`], and retries transient transport
//! failures with exponential backoff. Retrying a submission with the same
//! signed envelope is safe: nodes deduplicate transactions by digest.

use crate::config::ClientConfig;
use crate::retry::RetryConfig;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use sui_client_types::{
    ClientError, ClientResult, CoinObject, MoveFunctionSignature, ObjectData, ObjectId,
    SignedTransaction, SuiAddress, TransactionBlockResponse, TransactionDigest,
    TransactionEffects,
};
use tracing::debug;
use url::Url;

/// Client for the Sui fullnode JSON-RPC API.
#[derive(Debug, Clone)]
pub struct RpcClient {
    http: reqwest::Client,
    url: Url,
    retry: RetryConfig,
}

#[derive(Debug, Deserialize)]
struct RpcEnvelope<T> {
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

/// One page of an owned-objects query.
#[derive(Debug, Deserialize)]
struct OwnedObjectsPage {
    data: Vec<ObjectResponse>,
    #[serde(default, rename = "nextCursor")]
    next_cursor: Option<serde_json::Value>,
    #[serde(default, rename = "hasNextPage")]
    has_next_page: bool,
}

/// The node's object-response wrapper: data is absent when the object does
/// not exist (the per-object `error` field is not interpreted).
#[derive(Debug, Deserialize)]
struct ObjectResponse {
    #[serde(default)]
    data: Option<ObjectData>,
}

/// Result of a dry-run execution.
#[derive(Debug, Deserialize)]
pub struct DryRunResult {
    /// Simulated execution effects, including the gas cost breakdown.
    pub effects: TransactionEffects,
}

impl RpcClient {
    /// Creates a new RPC client from the given configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::Http)?;
        Ok(Self {
            http,
            url: config.network().rpc_url().clone(),
            retry: config.retry().clone(),
        })
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Performs one JSON-RPC call with retry for transient failures.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> ClientResult<T> {
        let mut attempt = 0u32;
        loop {
            match self.call_once(method, &params).await {
                Ok(value) => return Ok(value),
                Err(error) if attempt < self.retry.max_retries && error.is_retryable() => {
                    attempt += 1;
                    debug!(method, attempt, "retrying after transient error");
                    let delay = self.retry.delay_for_attempt(attempt);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                Err(error) => return Err(error),
            }
        }
    }

    async fn call_once<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &serde_json::Value,
    ) -> ClientResult<T> {
        debug!(method, "sending JSON-RPC request");
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self.http.post(self.url.clone()).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status_code: status.as_u16(),
                message,
            });
        }

        let envelope: RpcEnvelope<T> = response.json().await?;
        if let Some(error) = envelope.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        envelope.result.ok_or_else(|| ClientError::Rpc {
            code: 0,
            message: format!("{method}: response carried neither result nor error"),
        })
    }

    // === Reads ===

    /// Returns the current reference gas price in MIST per gas unit.
    ///
    /// # Errors
    /// Returns an error if the request fails or the response is malformed.
    pub async fn get_reference_gas_price(&self) -> ClientResult<u64> {
        let price: String = self
            .call("suix_getReferenceGasPrice", json!([]))
            .await?;
        price.parse().map_err(|_| ClientError::Rpc {
            code: 0,
            message: format!("invalid reference gas price: {price}"),
        })
    }

    /// Returns every coin of `coin_type` owned by `owner`, following
    /// pagination to the end.
    ///
    /// # Errors
    /// Returns an error if a page request fails or an entry is malformed.
    pub async fn get_coins(
        &self,
        owner: SuiAddress,
        coin_type: &str,
    ) -> ClientResult<Vec<CoinObject>> {
        let mut coins = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page: sui_client_types::object::CoinPage = self
                .call(
                    "suix_getCoins",
                    json!([owner.to_hex(), coin_type, cursor, null]),
                )
                .await?;
            for entry in page.data {
                coins.push(entry.into_coin()?);
            }
            if !page.has_next_page {
                return Ok(coins);
            }
            cursor = page.next_cursor;
        }
    }

    /// Returns the objects owned by `address`, optionally filtered by a
    /// struct type, following pagination to the end.
    ///
    /// # Errors
    /// Returns an error if a page request fails.
    pub async fn get_owned_objects(
        &self,
        address: SuiAddress,
        struct_type: Option<&str>,
    ) -> ClientResult<Vec<ObjectData>> {
        let filter = match struct_type {
            Some(t) => json!({ "StructType": t }),
            None => serde_json::Value::Null,
        };
        let query = json!({
            "filter": filter,
            "options": { "showType": true, "showOwner": true, "showContent": true },
        });

        let mut objects = Vec::new();
        let mut cursor = serde_json::Value::Null;
        loop {
            let page: OwnedObjectsPage = self
                .call(
                    "suix_getOwnedObjects",
                    json!([address.to_hex(), query, cursor, null]),
                )
                .await?;
            objects.extend(page.data.into_iter().filter_map(|entry| entry.data));
            if !page.has_next_page {
                return Ok(objects);
            }
            cursor = page.next_cursor.unwrap_or(serde_json::Value::Null);
        }
    }

    /// Fetches one object by id, with type, owner, and content.
    ///
    /// # Errors
    /// Returns [`ClientError::ObjectNotFound`] if the object does not exist,
    /// or a transport error if the request fails.
    pub async fn get_object(&self, id: ObjectId) -> ClientResult<ObjectData> {
        let response: ObjectResponse = self
            .call(
                "sui_getObject",
                json!([
                    id.to_hex(),
                    { "showType": true, "showOwner": true, "showContent": true }
                ]),
            )
            .await?;
        match response.data {
            Some(data) => Ok(data),
            None => Err(ClientError::ObjectNotFound(id.to_hex())),
        }
    }

    /// Fetches the normalized signature of a Move function.
    ///
    /// # Errors
    /// Returns an error if the package, module, or function is unknown.
    pub async fn get_normalized_move_function(
        &self,
        package: ObjectId,
        module: &str,
        function: &str,
    ) -> ClientResult<MoveFunctionSignature> {
        self.call(
            "sui_getNormalizedMoveFunction",
            json!([package.to_hex(), module, function]),
        )
        .await
    }

    // === Execution ===

    /// Simulates a transaction against current state without committing it.
    ///
    /// # Errors
    /// Returns an error if the request fails or the node rejects the
    /// transaction bytes.
    pub async fn dry_run_transaction_block(&self, tx_bytes: &str) -> ClientResult<DryRunResult> {
        self.call("sui_dryRunTransactionBlock", json!([tx_bytes])).await
    }

    /// Submits a signed transaction and returns the node's acknowledgement.
    ///
    /// The acknowledgement carries the digest; execution status is obtained
    /// by polling. Resubmitting the same envelope is idempotent.
    ///
    /// # Errors
    /// Returns an error if serialization or the request fails, or the node
    /// rejects the envelope.
    pub async fn execute_transaction_block(
        &self,
        signed: &SignedTransaction,
    ) -> ClientResult<TransactionBlockResponse> {
        let tx_bytes = signed.tx_bytes_base64()?;
        let signatures = signed.signatures_base64();
        self.call(
            "sui_executeTransactionBlock",
            json!([tx_bytes, signatures, null, null]),
        )
        .await
    }

    /// Fetches a transaction block with effects, events, and object changes.
    ///
    /// # Errors
    /// Returns [`ClientError::TransactionNotFound`] while the node does not
    /// know the digest yet, or a transport error if the request fails.
    pub async fn get_transaction_block(
        &self,
        digest: &TransactionDigest,
    ) -> ClientResult<TransactionBlockResponse> {
        let result: ClientResult<TransactionBlockResponse> = self
            .call(
                "sui_getTransactionBlock",
                json!([
                    digest.0,
                    {
                        "showInput": false,
                        "showEffects": true,
                        "showEvents": true,
                        "showObjectChanges": true
                    }
                ]),
            )
            .await;
        match result {
            Err(ClientError::Rpc { message, .. })
                if message.to_lowercase().contains("could not find") =>
            {
                Err(ClientError::TransactionNotFound(digest.0.clone()))
            }
            other => other,
        }
    }
}
