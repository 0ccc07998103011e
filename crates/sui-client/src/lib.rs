//! # Sui contract client
//!
//! A client-side pipeline that turns developer intent — "deploy this
//! package", "call this function with these arguments" — into a correctly
//! encoded transaction, submits it to a Sui fullnode over JSON-RPC, and
//! reconciles the asynchronous execution result back into a typed response.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use sui_client::client::SuiContractClient;
//! use sui_client::config::ClientConfig;
//! use sui_client::keystore::FileKeystore;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let keystore = Arc::new(FileKeystore::load(std::path::Path::new(
//!         "~/.sui/sui_config/sui.keystore",
//!     ))?);
//!     let client = SuiContractClient::connect(ClientConfig::testnet(), keystore).await?;
//!
//!     let balance = client.get_balance().await?;
//!     println!("balance: {} SUI ({} MIST)", balance.total_in_sui, balance.total_in_mist);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! One deploy or call flows through: argument encoding
//! ([`sui_client_types::CallArg`]) → gas selection and budget estimation
//! ([`gas`]) → envelope assembly
//! ([`sui_client_types::TransactionBuilder`]) → signing ([`keystore`]) →
//! submission ([`rpc`]) → polling to finality ([`poller`]) → outcome
//! reconciliation ([`reconcile`]). Object queries are cached per operation
//! by [`index::ObjectIndex`] so gas selection and argument resolution see
//! one consistent version snapshot.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod client;
pub mod compiler;
pub mod config;
pub mod gas;
pub mod index;
pub mod keystore;
pub mod poller;
pub mod reconcile;
pub mod retry;
pub mod rpc;

pub use client::SuiContractClient;
pub use compiler::PackageArtifact;
pub use config::{ClientConfig, PollConfig, SuiNetwork};
pub use keystore::{FileKeystore, InMemoryKeystore, Keystore};
pub use reconcile::{CallOutcome, DeployOutcome};
pub use retry::RetryConfig;
pub use rpc::RpcClient;

// Re-export the types crate so callers need a single dependency.
pub use sui_client_types as types;
