//! Result reconciliation.
//!
//! Turns the node's raw transaction-block response into the caller-facing
//! outcome shapes. Publish results are resolved by type discrimination over
//! the object-change list, never by list position.

use sui_client_types::{
    ClientError, ClientResult, ExecutionStatus, GasCostSummary, ObjectChange, ObjectId, SuiEvent,
    TransactionBlockResponse, TransactionDigest,
};

/// The suffix of the upgrade-capability object type.
const UPGRADE_CAP_TYPE_SUFFIX: &str = "::package::UpgradeCap";

/// The outcome of a successful package deployment.
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    /// The id of the new immutable package object.
    pub package_id: ObjectId,
    /// The id of the upgrade capability object, owned by the sender.
    pub upgrade_cap_id: ObjectId,
    /// The transaction digest.
    pub digest: TransactionDigest,
    /// Gas cost breakdown.
    pub gas_used: GasCostSummary,
}

/// The outcome of a contract call.
///
/// The execution status is passed through verbatim: a committed abort is a
/// finalized outcome and is surfaced, never retried.
#[derive(Debug, Clone)]
pub struct CallOutcome {
    /// The transaction digest.
    pub digest: TransactionDigest,
    /// The definitive execution status.
    pub status: ExecutionStatus,
    /// Gas cost breakdown.
    pub gas_used: GasCostSummary,
    /// Events emitted during execution.
    pub events: Vec<SuiEvent>,
}

impl CallOutcome {
    /// Returns the abort or failure as an error, if execution failed.
    pub fn execution_error(&self) -> Option<ClientError> {
        match &self.status {
            ExecutionStatus::Success => None,
            failure => Some(status_error(failure)),
        }
    }
}

fn status_error(status: &ExecutionStatus) -> ClientError {
    match status {
        ExecutionStatus::Success => {
            ClientError::ExecutionFailed("status was success".to_string())
        }
        ExecutionStatus::Failure { error } => match status.abort() {
            Some((code, location)) => ClientError::ExecutionAborted { code, location },
            None => ClientError::ExecutionFailed(error.clone()),
        },
    }
}

/// Extracts the deployment outcome from a finalized publish response.
///
/// The package id comes from the `published` change; the upgrade capability
/// from the `created` change whose type ends in `::package::UpgradeCap`.
///
/// # Errors
///
/// Returns the committed abort if execution failed, or a transaction error
/// if the response is missing effects, object changes, or either expected
/// object.
pub fn reconcile_publish(response: &TransactionBlockResponse) -> ClientResult<DeployOutcome> {
    let effects = response
        .effects
        .as_ref()
        .ok_or_else(|| ClientError::transaction("publish response carries no effects"))?;
    if !effects.status.is_success() {
        return Err(status_error(&effects.status));
    }

    let changes = response
        .object_changes
        .as_deref()
        .ok_or_else(|| ClientError::transaction("publish response carries no object changes"))?;

    let mut package_id = None;
    let mut upgrade_cap_id = None;
    for change in changes {
        match change {
            ObjectChange::Published { package_id: id, .. } => package_id = Some(*id),
            ObjectChange::Created {
                object_type,
                object_id,
                ..
            } if object_type.ends_with(UPGRADE_CAP_TYPE_SUFFIX) => {
                upgrade_cap_id = Some(*object_id);
            }
            _ => {}
        }
    }

    let package_id = package_id
        .ok_or_else(|| ClientError::transaction("no published package in object changes"))?;
    let upgrade_cap_id = upgrade_cap_id
        .ok_or_else(|| ClientError::transaction("no upgrade capability in object changes"))?;

    Ok(DeployOutcome {
        package_id,
        upgrade_cap_id,
        digest: TransactionDigest(response.digest.clone()),
        gas_used: effects.gas_used.clone(),
    })
}

/// Extracts the call outcome from a finalized call response.
///
/// Status, gas usage, and events pass through verbatim.
///
/// # Errors
/// Returns a transaction error if the response is missing effects.
pub fn reconcile_call(response: &TransactionBlockResponse) -> ClientResult<CallOutcome> {
    let effects = response
        .effects
        .as_ref()
        .ok_or_else(|| ClientError::transaction("call response carries no effects"))?;

    Ok(CallOutcome {
        digest: TransactionDigest(response.digest.clone()),
        status: effects.status.clone(),
        gas_used: effects.gas_used.clone(),
        events: response.events.clone().unwrap_or_default(),
    })
}
