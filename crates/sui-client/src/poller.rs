//! Execution polling.
//!
//! Submission only yields an acknowledgement; finality arrives later. The
//! poller turns that eventual consistency into a blocking wait: it asks the
//! node for the transaction on an exponentially backed-off schedule until a
//! definitive status appears or the deadline elapses.
//!
//! A committed abort is still a finalized outcome. Only deadline exhaustion
//! produces [`ClientError::Indeterminate`], which tells the caller the
//! outcome is unknown, not failed — the transaction may finalize later.

use crate::config::PollConfig;
use crate::rpc::RpcClient;
use std::time::Instant;
use sui_client_types::{ClientError, ClientResult, TransactionBlockResponse, TransactionDigest};
use tracing::{debug, info};

/// The observable states of a submitted transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PollState {
    /// Submitted, not yet seen by the queried node.
    Submitted,
    /// Known to the node but not yet finalized.
    Pending,
}

/// Polls a transaction digest until the node reports a definitive status.
pub struct ExecutionPoller<'a> {
    rpc: &'a RpcClient,
    config: &'a PollConfig,
}

impl<'a> ExecutionPoller<'a> {
    /// Creates a poller over the given transport and schedule.
    pub fn new(rpc: &'a RpcClient, config: &'a PollConfig) -> Self {
        Self { rpc, config }
    }

    /// Blocks until the transaction is finalized or the deadline elapses.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Indeterminate`] when the deadline elapses
    /// without a definitive status, or a transport error if a poll fails
    /// for a reason other than the digest being unknown.
    pub async fn wait_for_finality(
        &self,
        digest: &TransactionDigest,
    ) -> ClientResult<TransactionBlockResponse> {
        let start = Instant::now();
        let mut interval = self.config.initial_interval;
        let mut state = PollState::Submitted;

        loop {
            match self.rpc.get_transaction_block(digest).await {
                Ok(response) if response.is_finalized() => {
                    info!(digest = %digest, "transaction finalized");
                    return Ok(response);
                }
                Ok(_) => {
                    if state == PollState::Submitted {
                        debug!(digest = %digest, "transaction pending");
                        state = PollState::Pending;
                    }
                }
                Err(error) if error.is_not_found() => {
                    // The node has not seen the digest yet; keep waiting.
                }
                Err(error) => return Err(error),
            }

            if start.elapsed() >= self.config.deadline {
                debug!(digest = %digest, state = ?state, "poll deadline elapsed");
                return Err(ClientError::Indeterminate {
                    digest: digest.0.clone(),
                    waited_secs: self.config.deadline.as_secs(),
                });
            }

            tokio::time::sleep(interval).await;
            interval = std::cmp::min(interval * 2, self.config.max_interval);
        }
    }
}
