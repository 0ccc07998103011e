//! The top-level contract client.
//!
//! A [`SuiContractClient`] is an explicit context value owning its
//! configuration, transport, and keystore — there is no process-global
//! handle. Each top-level operation (deploy, call, balance query) runs the
//! full encode-submit-confirm pipeline with a fresh per-operation object
//! index, so no cached object version ever leaks between operations.

use crate::compiler::{self, PackageArtifact};
use crate::config::ClientConfig;
use crate::gas::GasEstimator;
use crate::index::ObjectIndex;
use crate::keystore::Keystore;
use crate::poller::ExecutionPoller;
use crate::reconcile::{self, CallOutcome, DeployOutcome};
use crate::rpc::RpcClient;
use std::path::Path;
use std::sync::Arc;
use sui_client_types::{
    BalanceInfo, CallArg, ClientResult, MoveFunctionSignature, ObjectData, ObjectId,
    SignedTransaction, SuiAddress, TransactionBlockResponse, TransactionBuilder,
    TransactionDigest, TransactionKind, TypeTag, GAS_COIN_TYPE,
};
use tracing::{debug, info, warn};

/// A client for deploying and calling Move contracts over JSON-RPC.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use sui_client::client::SuiContractClient;
/// use sui_client::config::ClientConfig;
/// use sui_client::keystore::InMemoryKeystore;
/// use sui_client_types::CallArg;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let keystore = Arc::new(InMemoryKeystore::generate());
///     let client = SuiContractClient::connect(ClientConfig::testnet(), keystore).await?;
///
///     let balance = client.get_balance().await?;
///     println!("{} SUI", balance.total_in_sui);
///
///     let deployed = client.deploy(std::path::Path::new("./my_contract"), None).await?;
///     let outcome = client
///         .call(
///             deployed.package_id,
///             "example",
///             "emit",
///             vec![],
///             vec![CallArg::bytes(b"hi".to_vec())],
///             None,
///         )
///         .await?;
///     println!("status: {:?}", outcome.status);
///     Ok(())
/// }
/// ```
pub struct SuiContractClient {
    config: ClientConfig,
    rpc: RpcClient,
    keystore: Arc<dyn Keystore>,
}

impl SuiContractClient {
    /// Connects to the configured endpoint and verifies it responds.
    ///
    /// The connection check fetches the reference gas price, which also
    /// warms the path used by gas estimation.
    ///
    /// # Errors
    /// Returns an error if the transport cannot be built or the endpoint
    /// does not answer.
    pub async fn connect(
        config: ClientConfig,
        keystore: Arc<dyn Keystore>,
    ) -> ClientResult<Self> {
        let rpc = RpcClient::new(&config)?;
        let gas_price = rpc.get_reference_gas_price().await?;
        info!(
            network = config.network().name(),
            endpoint = %config.network().rpc_url(),
            gas_price,
            "connected to Sui endpoint"
        );
        Ok(Self {
            config,
            rpc,
            keystore,
        })
    }

    /// Returns the active signing address.
    ///
    /// # Errors
    /// Returns an error if the keystore holds no keys.
    pub fn active_address(&self) -> ClientResult<SuiAddress> {
        self.keystore.active_address()
    }

    /// Returns the underlying RPC transport.
    pub fn rpc(&self) -> &RpcClient {
        &self.rpc
    }

    /// Aggregates the active address's gas coins into balance totals.
    ///
    /// # Errors
    /// Returns an error if the keystore or the coin query fails.
    pub async fn get_balance(&self) -> ClientResult<BalanceInfo> {
        let address = self.keystore.active_address()?;
        let mut index = ObjectIndex::new(&self.rpc);
        let coins = index.gas_coins(address).await?;
        let info = BalanceInfo::aggregate(address, GAS_COIN_TYPE, coins);
        info!(
            address = %address,
            total_mist = info.total_in_mist,
            coins = info.coins.len(),
            "balance aggregated"
        );
        Ok(info)
    }

    /// Compiles and deploys the Move package at `package_path`.
    ///
    /// With no explicit budget the cost is estimated by dry-run.
    ///
    /// # Errors
    /// Returns an error for compile failures, gas selection failures,
    /// transport failures, or a committed on-chain abort.
    pub async fn deploy(
        &self,
        package_path: &Path,
        gas_budget: Option<u64>,
    ) -> ClientResult<DeployOutcome> {
        let artifact = compiler::compile_package(package_path).await?;
        self.deploy_artifact(artifact, gas_budget).await
    }

    /// Deploys an already-compiled package artifact.
    ///
    /// # Errors
    /// Returns an error for gas selection failures, transport failures, or
    /// a committed on-chain abort.
    pub async fn deploy_artifact(
        &self,
        artifact: PackageArtifact,
        gas_budget: Option<u64>,
    ) -> ClientResult<DeployOutcome> {
        let sender = self.keystore.active_address()?;
        info!(
            sender = %sender,
            modules = artifact.modules.len(),
            "deploying package"
        );
        let kind = TransactionKind::Publish {
            modules: artifact.modules,
            dependencies: artifact.dependencies,
        };
        let response = self.execute_operation(sender, kind, gas_budget, None).await?;
        let outcome = reconcile::reconcile_publish(&response)?;
        info!(
            package_id = %outcome.package_id,
            upgrade_cap_id = %outcome.upgrade_cap_id,
            digest = %outcome.digest,
            "package deployed"
        );
        Ok(outcome)
    }

    /// Calls `package::module::function` with the given arguments.
    ///
    /// Arguments are encoded locally before any network call; the target
    /// signature is fetched for arity validation when the node can provide
    /// it, otherwise a mismatch is left to node-side failure. The execution
    /// status in the outcome is verbatim: a committed abort is returned,
    /// not retried.
    ///
    /// # Errors
    /// Returns an error for encoding failures, arity mismatches, gas
    /// selection failures, or transport failures.
    pub async fn call(
        &self,
        package: ObjectId,
        module: &str,
        function: &str,
        type_args: Vec<TypeTag>,
        args: Vec<CallArg>,
        gas_budget: Option<u64>,
    ) -> ClientResult<CallOutcome> {
        let sender = self.keystore.active_address()?;
        info!(
            function = %format!("{}::{module}::{function}", package.to_hex()),
            args = args.len(),
            "calling contract function"
        );

        // Encode locally first so bad arguments never reach the network.
        let encoded = args
            .iter()
            .map(CallArg::encode)
            .collect::<ClientResult<Vec<_>>>()?;

        // Validate arity as soon as the signature is known, ahead of gas
        // selection, so a mismatch causes no further queries.
        let signature = self.introspect_function(package, module, function).await;
        if let Some(signature) = &signature {
            let expected = signature.arity();
            if args.len() != expected {
                return Err(sui_client_types::ClientError::ArityMismatch {
                    function: format!("{}::{module}::{function}", package.to_hex()),
                    expected,
                    got: args.len(),
                });
            }
        }
        let kind = TransactionKind::MoveCall {
            package,
            module: module.to_string(),
            function: function.to_string(),
            type_args,
            args: encoded,
        };

        let response = self
            .execute_operation(sender, kind, gas_budget, signature)
            .await?;
        let outcome = reconcile::reconcile_call(&response)?;
        info!(digest = %outcome.digest, success = outcome.status.is_success(), "call finalized");
        Ok(outcome)
    }

    /// Fetches one object with type, owner, and content.
    ///
    /// # Errors
    /// Returns an error if the object does not exist or the request fails.
    pub async fn get_object(&self, id: ObjectId) -> ClientResult<ObjectData> {
        self.rpc.get_object(id).await
    }

    /// Fetches a transaction with effects, events, and object changes.
    ///
    /// # Errors
    /// Returns an error if the digest is unknown or the request fails.
    pub async fn get_transaction(
        &self,
        digest: &TransactionDigest,
    ) -> ClientResult<TransactionBlockResponse> {
        self.rpc.get_transaction_block(digest).await
    }

    /// Best-effort function introspection for arity validation.
    async fn introspect_function(
        &self,
        package: ObjectId,
        module: &str,
        function: &str,
    ) -> Option<MoveFunctionSignature> {
        match self
            .rpc
            .get_normalized_move_function(package, module, function)
            .await
        {
            Ok(signature) => Some(signature),
            Err(error) => {
                warn!(%error, "function introspection unavailable, deferring arity check");
                None
            }
        }
    }

    /// Runs one operation through the pipeline: gas selection, envelope
    /// assembly, signing, submission, and polling to finality.
    async fn execute_operation(
        &self,
        sender: SuiAddress,
        kind: TransactionKind,
        explicit_budget: Option<u64>,
        function_signature: Option<MoveFunctionSignature>,
    ) -> ClientResult<TransactionBlockResponse> {
        // Each operation owns a fresh cache so object versions are a
        // consistent snapshot within the operation and never stale across
        // operations.
        let mut index = ObjectIndex::new(&self.rpc);
        let estimator = GasEstimator::new(&self.rpc, &self.config);
        let gas = estimator
            .select_gas(&mut index, sender, &kind, explicit_budget)
            .await?;
        debug!(
            budget = gas.budget,
            gas_price = gas.gas_price,
            payment_coins = gas.payment.len(),
            "gas selected"
        );

        let mut builder = TransactionBuilder::new()
            .sender(sender)
            .operation(kind)
            .gas_payment(gas.payment)
            .gas_price(gas.gas_price)
            .gas_budget(gas.budget);
        if let Some(signature) = function_signature {
            builder = builder.function_signature(signature);
        }
        let data = builder.build()?;

        let message = data.signing_message()?;
        let signature = self.keystore.sign_envelope(&sender, &message)?;
        let signed = SignedTransaction::new(data, vec![signature]);

        let ack = self.rpc.execute_transaction_block(&signed).await?;
        info!(digest = %ack.digest, "transaction submitted");

        let digest = TransactionDigest(ack.digest.clone());
        if ack.is_finalized() {
            return Ok(ack);
        }
        ExecutionPoller::new(&self.rpc, self.config.poll())
            .wait_for_finality(&digest)
            .await
    }
}
