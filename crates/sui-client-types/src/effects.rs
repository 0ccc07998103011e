//! Execution results: effects, object changes, and events.
//!
//! These types mirror the node's transaction-block response JSON. The RPC
//! boundary is versioned and additive, so every struct tolerates unknown
//! fields and optional sections are `Option`/defaulted.

use crate::address::{ObjectId, SuiAddress};
use crate::error::{ClientError, ClientResult};
use crate::object::Owner;
use serde::{Deserialize, Serialize};

/// The node's response for a transaction block, as returned by submission
/// and status queries.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionBlockResponse {
    /// The transaction digest.
    pub digest: String,
    /// Execution effects; present once the transaction is finalized.
    #[serde(default)]
    pub effects: Option<TransactionEffects>,
    /// Events emitted by the transaction.
    #[serde(default)]
    pub events: Option<Vec<SuiEvent>>,
    /// Object-level changes caused by the transaction.
    #[serde(default)]
    pub object_changes: Option<Vec<ObjectChange>>,
    /// The checkpoint that included the transaction, if any.
    #[serde(default)]
    pub checkpoint: Option<String>,
}

impl TransactionBlockResponse {
    /// Returns true once the node reports a definitive execution status.
    ///
    /// A committed abort is still finalized; only the absence of effects
    /// means the transaction is pending.
    pub fn is_finalized(&self) -> bool {
        self.effects.is_some()
    }
}

/// Execution effects of a finalized transaction.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffects {
    /// The definitive execution status.
    pub status: ExecutionStatus,
    /// Gas cost breakdown.
    pub gas_used: GasCostSummary,
    /// Objects created by the transaction.
    #[serde(default)]
    pub created: Vec<OwnedObjectRef>,
    /// Objects mutated by the transaction.
    #[serde(default)]
    pub mutated: Vec<OwnedObjectRef>,
    /// Objects deleted by the transaction.
    #[serde(default)]
    pub deleted: Vec<EffectsObjectRef>,
}

/// The definitive status of an executed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ExecutionStatus {
    /// The transaction executed successfully.
    Success,
    /// The ledger committed an abort; the program logic rejected the call.
    Failure {
        /// The node's error string, e.g. `MoveAbort(..., 7) in command 0`.
        error: String,
    },
}

impl ExecutionStatus {
    /// Returns true for a successful execution.
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }

    /// Parses an abort code and location out of a failure status, when the
    /// node reported a Move abort.
    pub fn abort(&self) -> Option<(u64, String)> {
        match self {
            ExecutionStatus::Success => None,
            ExecutionStatus::Failure { error } => parse_move_abort(error),
        }
    }
}

/// Gas cost breakdown, in MIST. Values arrive as decimal strings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    /// Computation cost.
    pub computation_cost: String,
    /// Storage cost.
    pub storage_cost: String,
    /// Storage rebate from deleted or mutated objects.
    pub storage_rebate: String,
    /// Non-refundable portion of the storage fee.
    #[serde(default)]
    pub non_refundable_storage_fee: Option<String>,
}

impl GasCostSummary {
    fn parse(field: &str, value: &str) -> ClientResult<u64> {
        value
            .parse()
            .map_err(|_| ClientError::encoding(format!("invalid {field}: {value}")))
    }

    /// Returns computation + storage cost, the amount a budget must cover.
    ///
    /// The storage rebate is paid back after execution and does not reduce
    /// the budget requirement.
    pub fn total_charge(&self) -> ClientResult<u64> {
        let computation = Self::parse("computationCost", &self.computation_cost)?;
        let storage = Self::parse("storageCost", &self.storage_cost)?;
        Ok(computation.saturating_add(storage))
    }
}

/// An object reference inside effects, with version as a number.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsObjectRef {
    /// The object id.
    pub object_id: ObjectId,
    /// The version after the transaction.
    pub version: u64,
    /// The digest, when present.
    #[serde(default)]
    pub digest: Option<String>,
}

/// An object reference paired with its owner, as found in effects lists.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OwnedObjectRef {
    /// The owner after the transaction.
    pub owner: Owner,
    /// The object reference.
    pub reference: EffectsObjectRef,
}

/// One object-level change, discriminated by the `type` field.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ObjectChange {
    /// A package was published.
    #[serde(rename_all = "camelCase")]
    Published {
        /// The id of the new immutable package object.
        package_id: ObjectId,
        /// The package version, as a decimal string.
        version: String,
        /// The package digest.
        digest: String,
        /// The names of the published modules.
        #[serde(default)]
        modules: Vec<String>,
    },
    /// A new object was created.
    #[serde(rename_all = "camelCase")]
    Created {
        /// The sender of the transaction.
        #[serde(default)]
        sender: Option<SuiAddress>,
        /// The owner of the new object.
        owner: Owner,
        /// The full type of the new object.
        object_type: String,
        /// The id of the new object.
        object_id: ObjectId,
        /// The object version, as a decimal string.
        version: String,
        /// The object digest.
        digest: String,
    },
    /// An existing object was mutated.
    #[serde(rename_all = "camelCase")]
    Mutated {
        /// The owner after the mutation.
        owner: Owner,
        /// The full type of the object.
        object_type: String,
        /// The object id.
        object_id: ObjectId,
        /// The new version, as a decimal string.
        version: String,
        /// The new digest.
        digest: String,
    },
    /// An object was deleted.
    #[serde(rename_all = "camelCase")]
    Deleted {
        /// The full type of the object.
        object_type: String,
        /// The object id.
        object_id: ObjectId,
        /// The version at deletion, as a decimal string.
        version: String,
    },
    /// A change kind this client does not interpret.
    #[serde(other)]
    Other,
}

/// An event emitted during execution.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiEvent {
    /// The package that emitted the event.
    pub package_id: ObjectId,
    /// The module that emitted the event.
    pub transaction_module: String,
    /// The sender of the transaction.
    pub sender: SuiAddress,
    /// The full event type.
    #[serde(rename = "type")]
    pub event_type: String,
    /// The decoded event payload.
    #[serde(default)]
    pub parsed_json: Option<serde_json::Value>,
    /// The raw BCS payload, base64-encoded.
    #[serde(default)]
    pub bcs: Option<String>,
}

/// Extracts `(code, location)` from a node abort status string of the form
/// `MoveAbort(MoveLocation { ... }, <code>) in command <n>`.
pub fn parse_move_abort(error: &str) -> Option<(u64, String)> {
    let start = error.find("MoveAbort(")? + "MoveAbort(".len();
    let rest = &error[start..];

    // The payload is balanced up to the closing parenthesis of MoveAbort.
    let mut depth = 0usize;
    let mut end = None;
    for (i, c) in rest.char_indices() {
        match c {
            '(' | '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ')' => {
                if depth == 0 {
                    end = Some(i);
                    break;
                }
                depth -= 1;
            }
            _ => {}
        }
    }
    let inner = &rest[..end?];

    let comma = inner.rfind(',')?;
    let code: u64 = inner[comma + 1..].trim().parse().ok()?;
    let location = inner[..comma].trim().to_string();
    Some((code, location))
}
