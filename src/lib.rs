//! Perpetual futures exchange client.
//!
//! # Overview
//!
//! [`client::Client`] turns trading intents into EIP-712 signed messages, posts
//! them to the exchange REST API and wraps the on-chain deposit flow of the
//! margin vault.
//!
//! The signing pipeline is: [`types::OrderIntent`] (human decimals) →
//! [`num`] fixed-point conversion and [`slippage`] adjustment →
//! [`message`] typed structs → [`signer::MessageSigner`] → [`http`] →
//! [`outcome::Outcome`].
//!
//! Every network-backed operation reports validation failures, exchange errors
//! and transport failures through [`outcome::Outcome`]. Only a signing failure,
//! which means the client is misconfigured, is returned as [`error::Error`].
//!
//! # Configuration
//!
//! The client never reads the process environment, all settings come from
//! [`ClientConfig`]. See `src/bin/perp_cli` for loading it from `PERP_*`
//! environment variables.

pub mod abi;
pub mod client;
pub mod error;
pub mod http;
pub mod message;
pub mod num;
pub mod outcome;
pub mod receipt;
pub mod signer;
pub mod slippage;
pub mod time;
pub mod types;

use std::{fmt, str::FromStr};

use alloy::primitives::Address;
use serde::Deserialize;
use url::Url;

pub use client::Client;
pub use outcome::{Envelope, Outcome};

/// Network the exchange is operating on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    Testnet,
}

impl FromStr for Environment {
    type Err = types::ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Environment::Mainnet),
            "testnet" => Ok(Environment::Testnet),
            _ => Err(types::ParseEnumError::new("environment", s)),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Mainnet => "mainnet",
            Environment::Testnet => "testnet",
        })
    }
}

/// EIP-712 domain all messages of a client are signed under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DomainConfig {
    name: String,
    version: String,
    chain_id: u64,
    verifying_contract: Address,
}

impl DomainConfig {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: Address,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn verifying_contract(&self) -> Address {
        self.verifying_contract
    }
}

/// ERC-20 token accepted as margin.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarginAsset {
    pub symbol: String,
    pub address: Address,
    /// Token decimals, 6 for the stable margin asset.
    pub decimals: u8,
}

impl MarginAsset {
    pub fn new(symbol: impl Into<String>, address: Address, decimals: u8) -> Self {
        Self {
            symbol: symbol.into(),
            address,
            decimals,
        }
    }

    pub fn converter(&self) -> num::Converter {
        num::Converter::new(self.decimals)
    }
}

/// Endpoints and contracts of the exchange on one network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployment {
    pub api_url: Url,
    pub rpc_url: Url,
    pub domain: DomainConfig,
    pub vault: Address,
    pub margin_assets: Vec<MarginAsset>,
}

/// Deployments of both environments, the client picks one by [`Environment`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Deployments {
    pub mainnet: Deployment,
    pub testnet: Deployment,
}

impl Deployments {
    pub fn get(&self, environment: Environment) -> &Deployment {
        match environment {
            Environment::Mainnet => &self.mainnet,
            Environment::Testnet => &self.testnet,
        }
    }
}

/// Everything a [`Client`] needs, resolved once before construction.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub environment: Environment,
    pub api_url: Url,
    pub rpc_url: Url,
    pub domain: DomainConfig,
    pub vault: Address,
    pub margin_assets: Vec<MarginAsset>,
    pub sub_account_id: types::SubAccountId,
    pub wait_policy: receipt::WaitPolicy,
    /// Sent with the referral registration made on mainnet construction.
    pub referral_code: Option<String>,
}

impl ClientConfig {
    /// Settings for `environment`, endpoints and signing domain taken from its
    /// deployment. Starts on sub-account 0 without a referral code.
    pub fn new(environment: Environment, deployments: &Deployments) -> Self {
        let deployment = deployments.get(environment).clone();
        Self {
            environment,
            api_url: deployment.api_url,
            rpc_url: deployment.rpc_url,
            domain: deployment.domain,
            vault: deployment.vault,
            margin_assets: deployment.margin_assets,
            sub_account_id: 0,
            wait_policy: receipt::WaitPolicy::default(),
            referral_code: None,
        }
    }

    pub fn with_sub_account_id(mut self, sub_account_id: types::SubAccountId) -> Self {
        self.sub_account_id = sub_account_id;
        self
    }

    pub fn with_wait_policy(mut self, wait_policy: receipt::WaitPolicy) -> Self {
        self.wait_policy = wait_policy;
        self
    }

    pub fn with_referral_code(mut self, referral_code: impl Into<String>) -> Self {
        self.referral_code = Some(referral_code.into());
        self
    }

    /// Looks up a margin asset by symbol, case-insensitively.
    pub fn margin_asset(&self, symbol: &str) -> Option<&MarginAsset> {
        self.margin_assets
            .iter()
            .find(|asset| asset.symbol.eq_ignore_ascii_case(symbol))
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::address;

    use super::*;

    fn deployment(host: &str, chain_id: u64) -> Deployment {
        Deployment {
            api_url: Url::parse(&format!("https://{host}/api/v1")).unwrap(),
            rpc_url: Url::parse(&format!("https://rpc.{host}")).unwrap(),
            domain: DomainConfig::new(
                "Perpetuals",
                "1",
                chain_id,
                address!("0x00000000000000000000000000000000000000d1"),
            ),
            vault: address!("0x00000000000000000000000000000000000000d2"),
            margin_assets: vec![MarginAsset::new(
                "USDC",
                address!("0x00000000000000000000000000000000000000d3"),
                6,
            )],
        }
    }

    #[test]
    fn test_config_follows_environment() {
        let deployments = Deployments {
            mainnet: deployment("mainnet.example.com", 42161),
            testnet: deployment("testnet.example.com", 421614),
        };

        let mainnet = ClientConfig::new(Environment::Mainnet, &deployments);
        assert_eq!(mainnet.environment, Environment::Mainnet);
        assert_eq!(mainnet.api_url.host_str(), Some("mainnet.example.com"));
        assert_eq!(mainnet.rpc_url.host_str(), Some("rpc.mainnet.example.com"));
        assert_eq!(mainnet.domain.chain_id(), 42161);

        let testnet = ClientConfig::new(Environment::Testnet, &deployments)
            .with_sub_account_id(4)
            .with_referral_code("friends");
        assert_eq!(testnet.api_url.host_str(), Some("testnet.example.com"));
        assert_eq!(testnet.domain.chain_id(), 421614);
        assert_eq!(testnet.sub_account_id, 4);
        assert_eq!(testnet.referral_code.as_deref(), Some("friends"));
        assert_eq!(testnet.wait_policy, receipt::WaitPolicy::default());
    }
}
