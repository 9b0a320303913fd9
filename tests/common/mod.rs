#![allow(dead_code)]

pub mod node;

use std::time::Duration;

use alloy::{
    primitives::{Address, address},
    signers::local::PrivateKeySigner,
};
use perp_client::{
    Client, ClientConfig, Deployment, Deployments, DomainConfig, Environment, MarginAsset,
    receipt::WaitPolicy,
};
use url::Url;

/// First default anvil account.
pub const PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const ACCOUNT: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

pub const VERIFYING_CONTRACT: Address = address!("0x00000000000000000000000000000000000000e1");
pub const VAULT: Address = address!("0x00000000000000000000000000000000000000e2");
pub const USDC: Address = address!("0x00000000000000000000000000000000000000e3");

/// Base path the mock exchange serves the API under.
pub const API_PREFIX: &str = "/api/v1";

/// One deployment served by the mock exchange, shared by both environments.
pub fn deployment(server_url: &str) -> Deployment {
    Deployment {
        api_url: Url::parse(&format!("{server_url}{API_PREFIX}")).unwrap(),
        // nothing listens here, chain calls fail fast
        rpc_url: Url::parse("http://127.0.0.1:1").unwrap(),
        domain: DomainConfig::new("Perpetuals", "1", 421614, VERIFYING_CONTRACT),
        vault: VAULT,
        margin_assets: vec![MarginAsset::new("USDC", USDC, 6)],
    }
}

pub fn config(server_url: &str, environment: Environment) -> ClientConfig {
    let deployments = Deployments {
        mainnet: deployment(server_url),
        testnet: deployment(server_url),
    };
    ClientConfig::new(environment, &deployments).with_referral_code("friends")
}

pub fn client(server: &mockito::Server) -> Client {
    client_on(server, Environment::Testnet)
}

pub fn client_on(server: &mockito::Server, environment: Environment) -> Client {
    let signer: PrivateKeySigner = PRIVATE_KEY.parse().unwrap();
    Client::new(config(&server.url(), environment), signer).unwrap()
}

/// Client whose chain calls go to `node`, polling receipts every few milliseconds.
pub fn client_with_node(server: &mockito::Server, node: &node::Node) -> Client {
    let signer: PrivateKeySigner = PRIVATE_KEY.parse().unwrap();
    let mut config = config(&server.url(), Environment::Testnet);
    config.rpc_url = Url::parse(&node.url()).unwrap();
    let config = config.with_wait_policy(WaitPolicy {
        interval: Duration::from_millis(10),
        deadline: Some(Duration::from_secs(5)),
    });
    Client::new(config, signer).unwrap()
}

pub fn path(endpoint: &str) -> String {
    format!("{API_PREFIX}/{endpoint}")
}
