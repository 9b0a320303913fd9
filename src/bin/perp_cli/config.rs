//! Configuration for the exchange CLI.
//!
//! Configuration comes from two sources:
//! - Environment variables prefixed with `PERP_` (via .env file or shell): endpoints, keys
//! - CLI arguments: the command to run

use std::time::Duration;

use alloy::primitives::{Address, U256};
use clap::{Parser, Subcommand};
use fastnum::UD128;
use perp_client::{
    ClientConfig, DomainConfig, Environment, MarginAsset,
    num::{self, STABLE_DECIMALS},
    receipt::WaitPolicy,
    types::{OrderKind, OrderSide, ProductId, TimeInForce},
};
use url::Url;

const ENV_PREFIX: &str = "PERP_";

/// Environment configuration (connection details, credentials).
#[derive(Debug, serde::Deserialize)]
pub struct EnvConfig {
    /// Private key for signing messages and transactions
    pub private_key: String,

    pub environment: Environment,

    /// Base URL of the exchange REST API
    pub api_url: String,

    /// RPC URL for the node
    pub rpc_url: String,

    /// EIP-712 domain chain ID
    pub chain_id: u64,

    /// EIP-712 domain verifying contract
    pub verifying_contract: String,

    /// EIP-712 domain name
    pub domain_name: String,

    /// EIP-712 domain version (default: "1")
    pub domain_version: Option<String>,

    /// Margin vault contract address
    pub vault_address: String,

    /// Margin asset symbol (default: "USDC")
    pub margin_asset: Option<String>,

    /// Margin asset token address
    pub margin_asset_address: String,

    /// Margin asset token decimals (default: 6)
    pub margin_asset_decimals: Option<u8>,

    /// Sub-account used for every command (default: 0)
    pub sub_account_id: Option<u64>,

    pub referral_code: Option<String>,

    /// Optional deadline for transaction receipts, waits forever if unset
    pub receipt_timeout_seconds: Option<u64>,
}

impl EnvConfig {
    /// Load configuration from `PERP_*` environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env()
    }

    /// Resolve into the library client configuration.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        let api_url = Url::parse(&self.api_url).map_err(|_| ConfigError::InvalidUrl("api_url"))?;
        let rpc_url = Url::parse(&self.rpc_url).map_err(|_| ConfigError::InvalidUrl("rpc_url"))?;
        let verifying_contract = parse_address("verifying_contract", &self.verifying_contract)?;
        let vault = parse_address("vault_address", &self.vault_address)?;
        let asset_address = parse_address("margin_asset_address", &self.margin_asset_address)?;

        let mut wait_policy = WaitPolicy::default();
        if let Some(seconds) = self.receipt_timeout_seconds {
            wait_policy = wait_policy.with_deadline(Duration::from_secs(seconds));
        }

        Ok(ClientConfig {
            environment: self.environment,
            api_url,
            rpc_url,
            domain: DomainConfig::new(
                self.domain_name.clone(),
                self.domain_version.clone().unwrap_or_else(|| "1".to_string()),
                self.chain_id,
                verifying_contract,
            ),
            vault,
            margin_assets: vec![MarginAsset::new(
                self.margin_asset.clone().unwrap_or_else(|| "USDC".to_string()),
                asset_address,
                self.margin_asset_decimals.unwrap_or(STABLE_DECIMALS),
            )],
            sub_account_id: self.sub_account_id.unwrap_or_default(),
            wait_policy,
            referral_code: self.referral_code.clone(),
        })
    }
}

fn parse_address(field: &'static str, value: &str) -> Result<Address, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidAddress(field))
}

/// Command-line client for the exchange.
#[derive(Debug, Parser)]
#[command(name = "perp-cli")]
#[command(about = "Sign and send requests to the perpetuals exchange")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List tradable products
    Products,

    /// Fetch candlesticks of a symbol
    Klines {
        symbol: String,

        #[arg(long, default_value = "1m")]
        interval: String,

        /// Start of the range, milliseconds since epoch
        #[arg(long)]
        start_time: Option<u64>,

        /// End of the range, milliseconds since epoch
        #[arg(long)]
        end_time: Option<u64>,

        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show margin balances of the configured sub-account
    Balances,

    /// Sign and place an order
    PlaceOrder {
        #[arg(long)]
        product_id: ProductId,

        /// BUY or SELL
        #[arg(long)]
        side: OrderSide,

        /// LIMIT, LIMIT_MAKER, MARKET or LIMIT_REDUCE_ONLY
        #[arg(long, default_value = "LIMIT")]
        kind: OrderKind,

        #[arg(long, value_parser = num::parse_decimal)]
        price: UD128,

        #[arg(long, value_parser = num::parse_decimal)]
        quantity: UD128,

        /// GTC, FOK or IOC; market orders default to IOC
        #[arg(long)]
        time_in_force: Option<TimeInForce>,

        /// Product price increment in 18 decimal fixed point, required for market orders
        #[arg(long)]
        price_increment: Option<U256>,

        /// Market order slippage in percent (default: 1)
        #[arg(long, value_parser = num::parse_decimal)]
        slippage: Option<UD128>,
    },

    /// Cancel a resting order
    Cancel {
        #[arg(long)]
        product_id: ProductId,

        #[arg(long)]
        order_id: U256,
    },

    /// Cancel every resting order of a product
    CancelAll {
        #[arg(long)]
        product_id: ProductId,
    },

    /// Withdraw margin from the exchange
    Withdraw {
        #[arg(long, default_value = "USDC")]
        asset: String,

        #[arg(long, value_parser = num::parse_decimal)]
        quantity: UD128,
    },

    /// Deposit margin into the vault, approving the allowance if needed
    Deposit {
        #[arg(long, default_value = "USDC")]
        asset: String,

        #[arg(long, value_parser = num::parse_decimal)]
        amount: UD128,
    },
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid URL for {0}")]
    InvalidUrl(&'static str),

    #[error("Invalid address for {0}")]
    InvalidAddress(&'static str),
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;
    use fastnum::udec128;

    use super::*;

    fn vars() -> Vec<(String, String)> {
        [
            ("PERP_PRIVATE_KEY", "0x01"),
            ("PERP_ENVIRONMENT", "testnet"),
            ("PERP_API_URL", "https://api.example.com/api/v1"),
            ("PERP_RPC_URL", "http://127.0.0.1:8545"),
            ("PERP_CHAIN_ID", "421614"),
            ("PERP_VERIFYING_CONTRACT", "0x00000000000000000000000000000000000000c1"),
            ("PERP_DOMAIN_NAME", "Perpetuals"),
            ("PERP_VAULT_ADDRESS", "0x00000000000000000000000000000000000000c2"),
            ("PERP_MARGIN_ASSET_ADDRESS", "0x00000000000000000000000000000000000000c3"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_env_config_defaults() {
        let env: EnvConfig = envy::prefixed(ENV_PREFIX).from_iter(vars()).unwrap();
        let config = env.to_client_config().unwrap();

        assert_eq!(config.environment, Environment::Testnet);
        assert_eq!(config.domain.version(), "1");
        assert_eq!(config.domain.chain_id(), 421614);
        assert_eq!(config.sub_account_id, 0);
        assert_eq!(config.wait_policy, WaitPolicy::default());

        let usdc = config.margin_asset("usdc").unwrap();
        assert_eq!(usdc.decimals, 6);
        assert_eq!(
            usdc.address,
            "0x00000000000000000000000000000000000000c3".parse::<Address>().unwrap()
        );
    }

    #[test]
    fn test_env_config_overrides() {
        let mut vars = vars();
        vars.push(("PERP_SUB_ACCOUNT_ID".to_string(), "3".to_string()));
        vars.push(("PERP_RECEIPT_TIMEOUT_SECONDS".to_string(), "90".to_string()));
        let env: EnvConfig = envy::prefixed(ENV_PREFIX).from_iter(vars).unwrap();
        let config = env.to_client_config().unwrap();

        assert_eq!(config.sub_account_id, 3);
        assert_eq!(config.wait_policy.deadline, Some(Duration::from_secs(90)));
    }

    #[test]
    fn test_invalid_address() {
        let mut vars = vars();
        vars.retain(|(k, _)| k != "PERP_VAULT_ADDRESS");
        vars.push(("PERP_VAULT_ADDRESS".to_string(), "not-an-address".to_string()));
        let env: EnvConfig = envy::prefixed(ENV_PREFIX).from_iter(vars).unwrap();

        assert!(matches!(
            env.to_client_config(),
            Err(ConfigError::InvalidAddress("vault_address"))
        ));
    }

    #[test]
    fn test_cli_parses_place_order() {
        Cli::command().debug_assert();

        let cli = Cli::try_parse_from([
            "perp-cli",
            "place-order",
            "--product-id",
            "16",
            "--side",
            "buy",
            "--kind",
            "market",
            "--price",
            "100.5",
            "--quantity",
            "2",
            "--price-increment",
            "10000000000000000",
        ])
        .unwrap();

        let Command::PlaceOrder {
            product_id,
            side,
            kind,
            price,
            price_increment,
            slippage,
            ..
        } = cli.command
        else {
            panic!("expected place-order");
        };
        assert_eq!(product_id, 16);
        assert_eq!(side, OrderSide::Buy);
        assert_eq!(kind, OrderKind::Market);
        assert_eq!(price, udec128!(100.5));
        assert_eq!(price_increment, Some(U256::from(10u64).pow(U256::from(16))));
        assert_eq!(slippage, None);
    }

    #[test]
    fn test_cli_rejects_bad_decimal() {
        assert!(
            Cli::try_parse_from(["perp-cli", "withdraw", "--quantity", "ten"]).is_err()
        );
    }
}
