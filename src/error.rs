use std::fmt::Display;

use alloy::{
    contract,
    primitives::TxHash,
    providers::PendingTransactionError,
    sol_types::{self, SolInterface},
    transports,
};

use crate::abi::erc20::IERC20::IERC20Errors;

pub type ChainError = ProviderError<IERC20Errors>;

/// Fatal client error.
///
/// Validation failures, exchange errors and transport failures are reported
/// through [`crate::Outcome`] instead; reaching this type means the client
/// itself is misconfigured.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to sign {primary_type} message: {source}")]
    Signing {
        primary_type: &'static str,
        source: alloy::signers::Error,
    },

    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Failure of the HTTP collaborator.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid request path {path}: {source}")]
    Path {
        path: String,
        source: url::ParseError,
    },

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Call/transaction revert reason decoded by
/// the provided known ABI or from a standard `Error(string)` / `Panic(uint256)` revert,
/// [`RevertReason::Unknown`] if neither applies.
#[derive(Debug)]
pub enum RevertReason<R> {
    Known(R),
    Generic(String),
    Unknown,
}

/// Error returned by the RPC provider as a result of call or
/// transaction execution.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError<R> {
    #[error("fatal error: {0}")]
    Fatal(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("unexpected empty RPC response")]
    NullResp,

    #[error("transaction ran out of gas")]
    OutOfGas,

    #[error("transaction reverted: {0:?}")]
    Reverted(Box<RevertReason<R>>),

    #[error("transaction {0} was mined but reverted")]
    TransactionFailed(TxHash),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("transaction timed out")]
    Timeout,

    #[error("wait for transaction cancelled")]
    Cancelled,
}

impl<R: SolInterface> From<contract::Error> for ProviderError<R> {
    fn from(value: contract::Error) -> Self {
        match value {
            contract::Error::UnknownFunction(_) => Self::Fatal(value.to_string()),
            contract::Error::UnknownSelector(_) => Self::Fatal(value.to_string()),
            contract::Error::NotADeploymentTransaction => Self::Fatal(value.to_string()),
            contract::Error::ContractNotDeployed => Self::Fatal(value.to_string()),
            contract::Error::ZeroData(_, _) => Self::Fatal(value.to_string()),
            contract::Error::AbiError(_) => Self::Fatal(value.to_string()),
            contract::Error::TransportError(rpc_err) => Self::from(rpc_err),
            contract::Error::PendingTransactionError(err) => err.into(),
        }
    }
}

impl<R: SolInterface> From<PendingTransactionError> for ProviderError<R> {
    fn from(value: PendingTransactionError) -> Self {
        match value {
            PendingTransactionError::FailedToRegister => Self::Fatal(value.to_string()),
            PendingTransactionError::TransportError(rpc_err) => Self::from(rpc_err),
            PendingTransactionError::Recv(_) => Self::Transport(value.to_string()),
            PendingTransactionError::TxWatcher(err) => match err {
                alloy::providers::WatchTxError::Timeout => Self::Timeout,
            },
        }
    }
}

impl<E: Display, R: SolInterface> From<transports::RpcError<E>> for ProviderError<R> {
    fn from(value: transports::RpcError<E>) -> Self {
        match value {
            transports::RpcError::ErrorResp(ref resp) => {
                // Heuristic to determine if eth_call failed due to OutOfGas or
                // if transaction was reverted during the gas estimation
                let msg = resp.message.to_ascii_lowercase();
                if (resp.code == -32603) && (msg.contains("gas") || msg.contains("oog")) {
                    Self::OutOfGas
                } else if resp.code == 3 && msg.contains("reverted") {
                    Self::Reverted(Box::new(RevertReason::from(value)))
                } else if (resp.code == -32600 || resp.code == -32601 || resp.code == -32602)
                    && (msg.contains("invalid") || msg.contains("not found"))
                {
                    Self::InvalidRequest(msg)
                } else {
                    Self::Transport(value.to_string())
                }
            }
            transports::RpcError::NullResp => Self::NullResp,
            _ => Self::Transport(value.to_string()),
        }
    }
}

impl<E: Display, R: SolInterface> From<transports::RpcError<E>> for RevertReason<R> {
    fn from(value: transports::RpcError<E>) -> Self {
        let Some(payload) = value.as_error_resp() else {
            return Self::Unknown;
        };
        if let Some(known) = payload.as_decoded_interface_error::<R>() {
            return Self::Known(known);
        }
        if let Some(revert) = payload.as_decoded_error::<sol_types::Revert>() {
            return Self::Generic(revert.reason);
        }
        // raw bytes are never read as a reason string
        payload
            .as_decoded_error::<sol_types::Panic>()
            .map_or(Self::Unknown, |panic| Self::Generic(panic.to_string()))
    }
}
