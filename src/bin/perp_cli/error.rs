//! Error types for the exchange CLI.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Environment configuration error: {0}")]
    EnvConfig(#[from] envy::Error),

    #[error("Invalid private key: {0}")]
    PrivateKey(#[from] alloy::signers::local::LocalSignerError),

    #[error("Client error: {0}")]
    Client(#[from] perp_client::error::Error),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
