//! Per-operation object index.
//!
//! An [`ObjectIndex`] caches the node's answers about owned objects and
//! individual object lookups for the lifetime of a single top-level
//! operation (one deploy, call, or balance query). This pins one consistent
//! object-version snapshot across gas selection and argument resolution.
//! The cache is never shared across operations: each operation constructs a
//! fresh index, so version changes between operations are always observed.

use crate::rpc::RpcClient;
use std::collections::HashMap;
use sui_client_types::{ClientResult, CoinObject, ObjectData, ObjectId, SuiAddress, GAS_COIN_TYPE};

/// A cache of object queries scoped to one top-level operation.
pub struct ObjectIndex<'a> {
    rpc: &'a RpcClient,
    owned: HashMap<(SuiAddress, Option<String>), Vec<ObjectData>>,
    coins: HashMap<SuiAddress, Vec<CoinObject>>,
    by_id: HashMap<ObjectId, ObjectData>,
}

impl<'a> ObjectIndex<'a> {
    /// Creates an empty index. Call this at the start of every operation.
    pub fn new(rpc: &'a RpcClient) -> Self {
        Self {
            rpc,
            owned: HashMap::new(),
            coins: HashMap::new(),
            by_id: HashMap::new(),
        }
    }

    /// Returns the objects owned by `address`, optionally filtered by a
    /// struct type.
    ///
    /// # Errors
    /// Returns an error if the underlying query fails.
    pub async fn objects_owned_by(
        &mut self,
        address: SuiAddress,
        type_filter: Option<&str>,
    ) -> ClientResult<Vec<ObjectData>> {
        let key = (address, type_filter.map(str::to_string));
        if !self.owned.contains_key(&key) {
            let objects = self.rpc.get_owned_objects(address, type_filter).await?;
            self.owned.insert(key.clone(), objects);
        }
        Ok(self.owned[&key].clone())
    }

    /// Returns the gas coins owned by `address`.
    ///
    /// # Errors
    /// Returns an error if the underlying query fails.
    pub async fn gas_coins(&mut self, address: SuiAddress) -> ClientResult<Vec<CoinObject>> {
        if !self.coins.contains_key(&address) {
            let coins = self.rpc.get_coins(address, GAS_COIN_TYPE).await?;
            self.coins.insert(address, coins);
        }
        Ok(self.coins[&address].clone())
    }

    /// Returns one object by id.
    ///
    /// # Errors
    /// Returns [`ClientError::ObjectNotFound`] if the object does not exist.
    ///
    /// [`ClientError::ObjectNotFound`]: sui_client_types::ClientError::ObjectNotFound
    pub async fn get_object(&mut self, id: ObjectId) -> ClientResult<ObjectData> {
        if !self.by_id.contains_key(&id) {
            let object = self.rpc.get_object(id).await?;
            self.by_id.insert(id, object);
        }
        Ok(self.by_id[&id].clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn rpc_result(value: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": value }))
    }

    async fn client_for(server: &MockServer) -> RpcClient {
        let config = ClientConfig::custom(&server.uri()).unwrap().without_retry();
        RpcClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn test_coins_cached_within_operation() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "suix_getCoins"})))
            .respond_with(rpc_result(json!({
                "data": [{
                    "coinType": "0x2::sui::SUI",
                    "coinObjectId": "0xa",
                    "version": "3",
                    "digest": "digest",
                    "balance": "100"
                }],
                "hasNextPage": false
            })))
            // The point of the cache: two lookups, one query.
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let mut index = ObjectIndex::new(&client);
        let first = index.gas_coins(SuiAddress::TWO).await.unwrap();
        let second = index.gas_coins(SuiAddress::TWO).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 1);
    }

    #[tokio::test]
    async fn test_fresh_index_queries_again() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "sui_getObject"})))
            .respond_with(rpc_result(json!({
                "data": {
                    "objectId": "0xb",
                    "version": "9",
                    "digest": "digest"
                }
            })))
            // A new operation owns a new cache, so the node is asked again.
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let id = ObjectId::from_hex("0xb").unwrap();

        let mut first_op = ObjectIndex::new(&client);
        first_op.get_object(id).await.unwrap();
        first_op.get_object(id).await.unwrap();

        let mut second_op = ObjectIndex::new(&client);
        second_op.get_object(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_owned_objects_cached_per_filter() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "suix_getOwnedObjects"})))
            .respond_with(rpc_result(json!({
                "data": [],
                "hasNextPage": false
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let mut index = ObjectIndex::new(&client);
        // Different filters are different cache entries.
        index
            .objects_owned_by(SuiAddress::TWO, None)
            .await
            .unwrap();
        index
            .objects_owned_by(SuiAddress::TWO, Some("0x2::package::UpgradeCap"))
            .await
            .unwrap();
        // Repeats hit the cache.
        index
            .objects_owned_by(SuiAddress::TWO, None)
            .await
            .unwrap();
    }
}
