//! Network and client configuration.
//!
//! A [`ClientConfig`] is an explicit value owned by each client instance:
//! endpoint, request timeout, retry policy, gas estimation headroom, and the
//! poll schedule. There is no process-global client handle.

use crate::retry::RetryConfig;
use std::time::Duration;
use url::Url;

const MAINNET_RPC_URL: &str = "https://fullnode.mainnet.sui.io:443";
const TESTNET_RPC_URL: &str = "https://fullnode.testnet.sui.io:443";
const DEVNET_RPC_URL: &str = "https://fullnode.devnet.sui.io:443";
const LOCAL_RPC_URL: &str = "http://127.0.0.1:9000";

/// An immutable definition of a network endpoint.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SuiNetwork {
    name: &'static str,
    rpc_url: Url,
}

impl SuiNetwork {
    /// Creates a network definition from a name and JSON-RPC URL.
    pub const fn new(name: &'static str, rpc_url: Url) -> SuiNetwork {
        SuiNetwork { name, rpc_url }
    }

    /// Sui mainnet.
    pub fn mainnet() -> Self {
        Self::new("mainnet", Url::parse(MAINNET_RPC_URL).unwrap())
    }

    /// Sui testnet.
    pub fn testnet() -> Self {
        Self::new("testnet", Url::parse(TESTNET_RPC_URL).unwrap())
    }

    /// Sui devnet.
    pub fn devnet() -> Self {
        Self::new("devnet", Url::parse(DEVNET_RPC_URL).unwrap())
    }

    /// A local development network on the default port.
    pub fn localnet() -> Self {
        Self::new("localnet", Url::parse(LOCAL_RPC_URL).unwrap())
    }

    /// A custom endpoint.
    pub fn custom(rpc_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new("custom", Url::parse(rpc_url)?))
    }

    /// Returns the network name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the JSON-RPC URL.
    pub fn rpc_url(&self) -> &Url {
        &self.rpc_url
    }
}

/// The schedule used while waiting for a transaction to finalize.
///
/// Polling backs off exponentially from `initial_interval` up to
/// `max_interval`, and gives up after `deadline` with an indeterminate
/// outcome (the transaction may still finalize later).
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first re-poll.
    pub initial_interval: Duration,
    /// Upper bound for the backed-off interval.
    pub max_interval: Duration,
    /// Total time to wait before reporting the outcome as indeterminate.
    pub deadline: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(200),
            max_interval: Duration::from_secs(2),
            deadline: Duration::from_secs(30),
        }
    }
}

/// Configuration for the Sui client.
///
/// # Example
///
/// ```rust
/// use sui_client::config::{ClientConfig, SuiNetwork};
/// use std::time::Duration;
///
/// let config = ClientConfig::new(SuiNetwork::testnet())
///     .with_timeout(Duration::from_secs(60))
///     .with_gas_headroom(2.0);
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    network: SuiNetwork,
    timeout: Duration,
    retry: RetryConfig,
    /// Multiplier applied to the simulated gas cost when no explicit budget
    /// is given.
    gas_headroom: f64,
    /// Ceiling budget used for the dry-run itself.
    dry_run_budget: u64,
    poll: PollConfig,
}

/// Default safety multiplier over the simulated gas cost.
pub const DEFAULT_GAS_HEADROOM: f64 = 1.5;

/// Default ceiling budget for dry-run execution, in MIST.
pub const DEFAULT_DRY_RUN_BUDGET: u64 = 5_000_000_000;

/// Smallest budget the client will compute from a simulation, in MIST.
pub const MIN_GAS_BUDGET: u64 = 1_000_000;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

impl ClientConfig {
    /// Creates a configuration for the given network with default settings.
    pub fn new(network: SuiNetwork) -> Self {
        Self {
            network,
            timeout: DEFAULT_REQUEST_TIMEOUT,
            retry: RetryConfig::default(),
            gas_headroom: DEFAULT_GAS_HEADROOM,
            dry_run_budget: DEFAULT_DRY_RUN_BUDGET,
            poll: PollConfig::default(),
        }
    }

    /// Creates a testnet configuration.
    pub fn testnet() -> Self {
        Self::new(SuiNetwork::testnet())
    }

    /// Creates a devnet configuration.
    pub fn devnet() -> Self {
        Self::new(SuiNetwork::devnet())
    }

    /// Creates a localnet configuration with fast retries.
    pub fn localnet() -> Self {
        Self::new(SuiNetwork::localnet())
    }

    /// Creates a configuration for a custom endpoint.
    pub fn custom(rpc_url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(SuiNetwork::custom(rpc_url)?))
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the retry configuration for transient transport failures.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Disables automatic retry for API calls.
    pub fn without_retry(mut self) -> Self {
        self.retry = RetryConfig::no_retry();
        self
    }

    /// Sets the gas headroom multiplier applied to simulated costs.
    pub fn with_gas_headroom(mut self, headroom: f64) -> Self {
        self.gas_headroom = headroom.max(1.0);
        self
    }

    /// Sets the ceiling budget used for dry-run execution.
    pub fn with_dry_run_budget(mut self, budget: u64) -> Self {
        self.dry_run_budget = budget;
        self
    }

    /// Sets the poll schedule.
    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Returns the network definition.
    pub fn network(&self) -> &SuiNetwork {
        &self.network
    }

    /// Returns the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the retry configuration.
    pub fn retry(&self) -> &RetryConfig {
        &self.retry
    }

    /// Returns the gas headroom multiplier.
    pub fn gas_headroom(&self) -> f64 {
        self.gas_headroom
    }

    /// Returns the dry-run ceiling budget.
    pub fn dry_run_budget(&self) -> u64 {
        self.dry_run_budget
    }

    /// Returns the poll schedule.
    pub fn poll(&self) -> &PollConfig {
        &self.poll
    }
}
