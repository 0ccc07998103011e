//! Gas payment selection and budget estimation.
//!
//! With an explicit budget, selection is purely local: the smallest set of
//! owned gas coins (largest-first) whose summed balance covers the budget.
//! Without one, the operation is dry-run against the node under a generous
//! ceiling, the simulated charge is scaled by the configured headroom
//! multiplier, and selection runs with the computed budget.

use crate::config::{ClientConfig, MIN_GAS_BUDGET};
use crate::index::ObjectIndex;
use crate::rpc::RpcClient;
use sui_client_types::{
    ClientError, ClientResult, CoinObject, ObjectRef, SuiAddress, TransactionData, TransactionKind,
};
use tracing::debug;

/// The gas payment and budget chosen for one transaction.
#[derive(Debug, Clone)]
pub struct GasSelection {
    /// Coin objects that pay for gas.
    pub payment: Vec<ObjectRef>,
    /// The gas budget in MIST.
    pub budget: u64,
    /// The reference gas price in MIST per gas unit.
    pub gas_price: u64,
}

/// Selects gas payment coins and a budget for a transaction.
pub struct GasEstimator<'a> {
    rpc: &'a RpcClient,
    config: &'a ClientConfig,
}

impl<'a> GasEstimator<'a> {
    /// Creates an estimator over the given transport and configuration.
    pub fn new(rpc: &'a RpcClient, config: &'a ClientConfig) -> Self {
        Self { rpc, config }
    }

    /// Picks gas payment coins and a budget for `kind` sent by `sender`.
    ///
    /// The reference gas price and the sender's coin listing are fetched
    /// concurrently; the dry-run (only needed when no explicit budget is
    /// given) runs after both are available, since its envelope embeds them.
    ///
    /// # Errors
    /// Returns [`ClientError::InsufficientGas`] when no coin set covers the
    /// budget, or a transport error if a node query fails.
    pub async fn select_gas(
        &self,
        index: &mut ObjectIndex<'_>,
        sender: SuiAddress,
        kind: &TransactionKind,
        explicit_budget: Option<u64>,
    ) -> ClientResult<GasSelection> {
        let (gas_price, coins) = tokio::try_join!(
            self.rpc.get_reference_gas_price(),
            index.gas_coins(sender)
        )?;

        if coins.is_empty() {
            return Err(ClientError::InsufficientGas {
                required: explicit_budget.unwrap_or(MIN_GAS_BUDGET),
                available: 0,
            });
        }

        let budget = match explicit_budget {
            Some(budget) => budget,
            None => {
                self.simulate_budget(sender, kind, &coins, gas_price)
                    .await?
            }
        };

        let payment = select_coins(&coins, budget)?
            .into_iter()
            .map(|coin| coin.object_ref())
            .collect();

        Ok(GasSelection {
            payment,
            budget,
            gas_price,
        })
    }

    /// Dry-runs the operation under the ceiling budget and scales the
    /// simulated charge by the configured headroom.
    async fn simulate_budget(
        &self,
        sender: SuiAddress,
        kind: &TransactionKind,
        coins: &[CoinObject],
        gas_price: u64,
    ) -> ClientResult<u64> {
        let draft = TransactionData {
            sender,
            kind: kind.clone(),
            gas_payment: coins.iter().map(CoinObject::object_ref).collect(),
            gas_price,
            gas_budget: self.config.dry_run_budget(),
        };

        let simulated = self
            .rpc
            .dry_run_transaction_block(&draft.to_base64()?)
            .await?;
        let charge = simulated.effects.gas_used.total_charge()?;

        let budget = ((charge as f64) * self.config.gas_headroom()).ceil() as u64;
        let budget = budget.max(MIN_GAS_BUDGET);
        debug!(
            simulated_charge = charge,
            headroom = self.config.gas_headroom(),
            budget,
            "estimated gas budget from dry run"
        );
        Ok(budget)
    }
}

/// Selects the smallest set of coins (by count, largest-first) whose summed
/// balance covers `required`. Equal balances are ordered by object id
/// ascending so selection is reproducible.
pub(crate) fn select_coins(
    coins: &[CoinObject],
    required: u64,
) -> ClientResult<Vec<CoinObject>> {
    let available: u64 = coins.iter().map(|c| c.balance).sum();
    if available < required {
        return Err(ClientError::InsufficientGas {
            required,
            available,
        });
    }

    let mut sorted = coins.to_vec();
    sorted.sort_by(|a, b| {
        b.balance
            .cmp(&a.balance)
            .then_with(|| a.object_id.cmp(&b.object_id))
    });

    let mut picked = Vec::new();
    let mut covered = 0u64;
    for coin in sorted {
        if covered >= required && !picked.is_empty() {
            break;
        }
        covered = covered.saturating_add(coin.balance);
        picked.push(coin);
    }
    Ok(picked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ClientConfig, DEFAULT_GAS_HEADROOM};
    use serde_json::json;
    use sui_client_types::ObjectId;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn coin(id: &str, balance: u64) -> CoinObject {
        CoinObject {
            object_id: ObjectId::from_hex(id).unwrap(),
            version: 1,
            digest: "digest".to_string(),
            coin_type: sui_client_types::GAS_COIN_TYPE.to_string(),
            balance,
        }
    }

    #[test]
    fn test_largest_first_minimal_cover() {
        let coins = vec![coin("0xa", 100), coin("0xb", 50), coin("0xc", 10)];
        let picked = select_coins(&coins, 120).unwrap();
        let balances: Vec<u64> = picked.iter().map(|c| c.balance).collect();
        // Never {100, 50, 10}: the cover stops as soon as the budget is met.
        assert_eq!(balances, vec![100, 50]);
    }

    #[test]
    fn test_single_coin_cover() {
        let coins = vec![coin("0xa", 100), coin("0xb", 50)];
        let picked = select_coins(&coins, 80).unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].balance, 100);
    }

    #[test]
    fn test_equal_balances_tie_break_by_id() {
        let coins = vec![coin("0xb", 50), coin("0xa", 50), coin("0xc", 50)];
        let picked = select_coins(&coins, 100).unwrap();
        let ids: Vec<String> = picked.iter().map(|c| c.object_id.to_hex()).collect();
        assert_eq!(
            ids,
            vec![
                ObjectId::from_hex("0xa").unwrap().to_hex(),
                ObjectId::from_hex("0xb").unwrap().to_hex()
            ]
        );
    }

    #[test]
    fn test_insufficient_gas() {
        let coins = vec![coin("0xa", 100)];
        let err = select_coins(&coins, 200).unwrap_err();
        match err {
            ClientError::InsufficientGas {
                required,
                available,
            } => {
                assert_eq!(required, 200);
                assert_eq!(available, 100);
            }
            other => panic!("expected insufficient gas, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_budget_still_selects_one_coin() {
        let coins = vec![coin("0xa", 100)];
        let picked = select_coins(&coins, 0).unwrap();
        assert_eq!(picked.len(), 1);
    }

    fn rpc_result(value: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": value }))
    }

    async fn mount_common(server: &MockServer) {
        Mock::given(method("POST"))
            .and(body_partial_json(
                json!({"method": "suix_getReferenceGasPrice"}),
            ))
            .respond_with(rpc_result(json!("1000")))
            .mount(server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "suix_getCoins"})))
            .respond_with(rpc_result(json!({
                "data": [{
                    "coinType": "0x2::sui::SUI",
                    "coinObjectId": "0xa",
                    "version": "3",
                    "digest": "digest",
                    "balance": "10000000000"
                }],
                "hasNextPage": false
            })))
            .mount(server)
            .await;
    }

    fn publish_kind() -> TransactionKind {
        TransactionKind::Publish {
            modules: vec![vec![1, 2, 3]],
            dependencies: vec![],
        }
    }

    #[tokio::test]
    async fn test_explicit_budget_skips_simulation() {
        let server = MockServer::start().await;
        mount_common(&server).await;
        // No dry-run mock mounted: a simulation request would 404 and fail.

        let config = ClientConfig::custom(&server.uri()).unwrap().without_retry();
        let rpc = RpcClient::new(&config).unwrap();
        let mut index = ObjectIndex::new(&rpc);
        let estimator = GasEstimator::new(&rpc, &config);

        let selection = estimator
            .select_gas(&mut index, SuiAddress::TWO, &publish_kind(), Some(5_000_000))
            .await
            .unwrap();
        assert_eq!(selection.budget, 5_000_000);
        assert_eq!(selection.gas_price, 1000);
        assert_eq!(selection.payment.len(), 1);
    }

    #[tokio::test]
    async fn test_simulated_budget_applies_headroom() {
        let server = MockServer::start().await;
        mount_common(&server).await;
        Mock::given(method("POST"))
            .and(body_partial_json(
                json!({"method": "sui_dryRunTransactionBlock"}),
            ))
            .respond_with(rpc_result(json!({
                "effects": {
                    "status": { "status": "success" },
                    "gasUsed": {
                        "computationCost": "1000000",
                        "storageCost": "3000000",
                        "storageRebate": "0"
                    }
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::custom(&server.uri()).unwrap().without_retry();
        let rpc = RpcClient::new(&config).unwrap();
        let mut index = ObjectIndex::new(&rpc);
        let estimator = GasEstimator::new(&rpc, &config);

        let selection = estimator
            .select_gas(&mut index, SuiAddress::TWO, &publish_kind(), None)
            .await
            .unwrap();
        // (1_000_000 + 3_000_000) * 1.5
        let expected = (4_000_000f64 * DEFAULT_GAS_HEADROOM) as u64;
        assert_eq!(selection.budget, expected);
    }

    #[tokio::test]
    async fn test_no_coins_is_insufficient_gas() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(
                json!({"method": "suix_getReferenceGasPrice"}),
            ))
            .respond_with(rpc_result(json!("1000")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": "suix_getCoins"})))
            .respond_with(rpc_result(json!({ "data": [], "hasNextPage": false })))
            .mount(&server)
            .await;

        let config = ClientConfig::custom(&server.uri()).unwrap().without_retry();
        let rpc = RpcClient::new(&config).unwrap();
        let mut index = ObjectIndex::new(&rpc);
        let estimator = GasEstimator::new(&rpc, &config);

        let err = estimator
            .select_gas(&mut index, SuiAddress::TWO, &publish_kind(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::InsufficientGas { available: 0, .. }));
    }
}
