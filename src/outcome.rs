//! Uniform result of every network-backed operation.
//!
//! A request ends in exactly one of: success, a structured error reported by the
//! exchange (`{"error": "..."}` in the body), a decoded contract revert, or an
//! unknown failure. Unknown failures are logged at `debug` and collapsed into
//! [`UNKNOWN_ERROR_MESSAGE`].

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{ChainError, RevertReason, TransportError},
    types::ValidationError,
};

pub const UNKNOWN_ERROR_MESSAGE: &str =
    "An unknown error occurred. Try enabling debug mode for mode detail.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome<T> {
    Ok(T),
    /// Rejected before any message was signed or request was sent.
    Invalid(String),
    /// Error reported by the exchange.
    Api(String),
    /// Contract call reverted with a decodable reason.
    Reverted { error_name: String, message: String },
    Unknown,
}

/// Serialisable `{data, error}` form of an [`Outcome`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Envelope<T> {
    pub data: T,
    pub error: Option<ErrorMessage>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorMessage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_name: Option<String>,
    pub message: String,
}

impl<T> Outcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Outcome::Ok(data) => Some(data),
            _ => None,
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            Outcome::Ok(data) => Some(data),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Invalid(message) | Outcome::Api(message) => Some(message),
            Outcome::Reverted { message, .. } => Some(message),
            Outcome::Unknown => Some(UNKNOWN_ERROR_MESSAGE),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(data) => Outcome::Ok(f(data)),
            Outcome::Invalid(message) => Outcome::Invalid(message),
            Outcome::Api(message) => Outcome::Api(message),
            Outcome::Reverted {
                error_name,
                message,
            } => Outcome::Reverted {
                error_name,
                message,
            },
            Outcome::Unknown => Outcome::Unknown,
        }
    }

    /// Converts into the envelope, substituting `fallback` for the payload on failure.
    pub fn into_envelope(self, fallback: T) -> Envelope<T> {
        let error = match &self {
            Outcome::Ok(_) => None,
            Outcome::Reverted { error_name, message } => Some(ErrorMessage {
                error_name: Some(error_name.clone()),
                message: message.clone(),
            }),
            other => other.message().map(|message| ErrorMessage {
                error_name: None,
                message: message.to_string(),
            }),
        };
        Envelope {
            data: self.into_data().unwrap_or(fallback),
            error,
        }
    }
}

impl<T: DeserializeOwned> Outcome<T> {
    /// Classifies a raw exchange response by its shape.
    pub fn from_response(response: Result<Value, TransportError>) -> Self {
        let value = match response {
            Ok(value) => value,
            Err(err) => {
                debug!(%err, "request failed");
                return Outcome::Unknown;
            }
        };
        match value.get("error") {
            Some(Value::String(message)) => return Outcome::Api(message.clone()),
            Some(other) => {
                debug!(error = %other, "malformed error field");
                return Outcome::Unknown;
            }
            None => {}
        }
        match serde_json::from_value(value) {
            Ok(data) => Outcome::Ok(data),
            Err(err) => {
                debug!(%err, "unexpected response shape");
                Outcome::Unknown
            }
        }
    }
}

impl<T> From<ValidationError> for Outcome<T> {
    fn from(value: ValidationError) -> Self {
        Outcome::Invalid(value.to_string())
    }
}

impl<T> From<ChainError> for Outcome<T> {
    fn from(value: ChainError) -> Self {
        match value {
            ChainError::Reverted(reason) => match *reason {
                RevertReason::Known(err) => Outcome::Reverted {
                    error_name: err.name().to_string(),
                    message: err.describe(),
                },
                RevertReason::Generic(reason) => Outcome::Reverted {
                    error_name: "Error".to_string(),
                    message: reason,
                },
                RevertReason::Unknown => {
                    debug!("undecodable contract revert");
                    Outcome::Unknown
                }
            },
            err => {
                debug!(%err, "chain operation failed");
                Outcome::Unknown
            }
        }
    }
}

impl<T> From<Result<T, ChainError>> for Outcome<T> {
    fn from(value: Result<T, ChainError>) -> Self {
        value.map_or_else(Outcome::from, Outcome::Ok)
    }
}
