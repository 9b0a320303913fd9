//! Transaction confirmation polling.

use std::time::Duration;

use alloy::{primitives::TxHash, providers::Provider, rpc::types::TransactionReceipt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::ChainError;

/// How long and how often to poll for a transaction receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitPolicy {
    /// Pause between polls.
    pub interval: Duration,
    /// Give up after this much time spent waiting, `None` to wait forever.
    pub deadline: Option<Duration>,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            deadline: None,
        }
    }
}

impl WaitPolicy {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Polls `fetch` until it yields a value.
///
/// Empty results and fetch errors are both retried after `policy.interval`.
/// Fails with [`ChainError::Timeout`] once the accumulated wait reaches the
/// deadline, or with [`ChainError::Cancelled`] as soon as `cancel` fires.
pub async fn poll_until<T, E, F, Fut, S, SFut>(
    mut fetch: F,
    policy: WaitPolicy,
    cancel: Option<&CancellationToken>,
    sleep: S,
) -> Result<T, ChainError>
where
    E: std::fmt::Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, E>>,
    S: Fn(Duration) -> SFut,
    SFut: Future<Output = ()>,
{
    let mut waited = Duration::ZERO;
    loop {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(ChainError::Cancelled);
        }
        match fetch().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => debug!(?waited, "not available yet"),
            Err(err) => debug!(%err, ?waited, "poll failed, retrying"),
        }
        if policy.deadline.is_some_and(|deadline| waited >= deadline) {
            return Err(ChainError::Timeout);
        }
        match cancel {
            Some(token) => tokio::select! {
                _ = token.cancelled() => return Err(ChainError::Cancelled),
                _ = sleep(policy.interval) => {}
            },
            None => sleep(policy.interval).await,
        }
        waited += policy.interval;
    }
}

/// Blocks until the receipt of `tx_hash` is observed.
pub async fn wait_for_receipt<P: Provider>(
    provider: &P,
    tx_hash: TxHash,
    policy: WaitPolicy,
    cancel: Option<&CancellationToken>,
) -> Result<TransactionReceipt, ChainError> {
    debug!(%tx_hash, ?policy, "waiting for transaction receipt");
    poll_until(
        || async move { provider.get_transaction_receipt(tx_hash).await },
        policy,
        cancel,
        tokio::time::sleep,
    )
    .await
}
