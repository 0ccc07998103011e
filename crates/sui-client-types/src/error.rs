//! Error types for the Sui client.
//!
//! This module provides a unified error type [`ClientError`] covering every
//! failure mode of the encode-submit-confirm pipeline, from local encoding
//! problems through transport failures to on-chain aborts.

use std::fmt;
use thiserror::Error;

/// A specialized Result type for Sui client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// The main error type for the Sui client.
///
/// Local errors (`Encoding`, `ArityMismatch`, `InsufficientGas`, `Signing`)
/// are raised before any network call is made. Transport errors carry enough
/// information for the caller to decide whether a retry is safe; on-chain
/// aborts are surfaced verbatim and never retried.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Error occurred during HTTP communication
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The node answered with a non-success HTTP status
    #[error("HTTP status {status_code}: {message}")]
    Api {
        /// HTTP status code
        status_code: u16,
        /// Error message from the node
        message: String,
    },

    /// The node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc {
        /// JSON-RPC error code
        code: i64,
        /// JSON-RPC error message
        message: String,
    },

    /// Error occurred during JSON serialization/deserialization
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error occurred during BCS serialization/deserialization
    #[error("BCS error: {0}")]
    Bcs(String),

    /// Error occurred during URL parsing
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Error occurred during hex encoding/decoding
    #[error("Hex error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Invalid address or object id
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid type tag format
    #[error("Invalid type tag: {0}")]
    InvalidTypeTag(String),

    /// A call argument could not be encoded to the wire format
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// No set of owned gas coins covers the requested budget
    #[error("Insufficient gas: budget is {required} MIST, {available} MIST available")]
    InsufficientGas {
        /// The budget that had to be covered
        required: u64,
        /// The summed balance of all candidate coins
        available: u64,
    },

    /// The argument count disagrees with the target function signature
    #[error("Arity mismatch: {function} takes {expected} arguments, got {got}")]
    ArityMismatch {
        /// The fully qualified target function
        function: String,
        /// Parameter count declared by the function
        expected: usize,
        /// Arguments actually supplied
        got: usize,
    },

    /// The keystore collaborator could not produce a signature
    #[error("Signing error: {0}")]
    Signing(String),

    /// Transaction building error
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Object does not exist or is not visible to the sender
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Transaction digest unknown to the node
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// The ledger committed an abort raised by the called program
    #[error("Execution aborted with code {code} in {location}")]
    ExecutionAborted {
        /// Abort code raised by the Move program
        code: u64,
        /// Module/function location reported by the node
        location: String,
    },

    /// Execution failed for a reason other than a Move abort
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    /// The poll deadline elapsed without a definitive status.
    ///
    /// This is not a failure: the transaction may still finalize later.
    /// Callers should re-poll or treat the outcome as unknown.
    #[error("Transaction {digest} not finalized after {waited_secs} seconds")]
    Indeterminate {
        /// Digest of the transaction whose status is unknown
        digest: String,
        /// How long we polled before giving up
        waited_secs: u64,
    },

    /// The Move compiler collaborator rejected the package
    #[error("Compile error:\n{diagnostics}")]
    Compile {
        /// Diagnostics emitted by the compiler
        diagnostics: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Any other error
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ClientError {
    /// Creates a new BCS error
    pub fn bcs<E: fmt::Display>(err: E) -> Self {
        Self::Bcs(err.to_string())
    }

    /// Creates a new encoding error
    pub fn encoding<S: Into<String>>(reason: S) -> Self {
        Self::Encoding(reason.into())
    }

    /// Creates a new transaction building error
    pub fn transaction<S: Into<String>>(msg: S) -> Self {
        Self::Transaction(msg.into())
    }

    /// Returns true if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::ObjectNotFound(_)
                | Self::TransactionNotFound(_)
                | Self::Api {
                    status_code: 404,
                    ..
                }
        )
    }

    /// Returns true if the outcome of the transaction is unknown rather
    /// than failed.
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Self::Indeterminate { .. })
    }

    /// Returns true if this is a transient transport error that is safe to
    /// retry with the same signed envelope.
    ///
    /// Resubmission is idempotent because nodes deduplicate transactions by
    /// digest. Errors the node produced after executing the request (RPC
    /// errors, aborts) are never retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status_code, .. } => {
                matches!(status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}
