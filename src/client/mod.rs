//! Public trading, account and market operations.
//!
//! Trading operations follow validate → convert → build message → sign → send →
//! normalise. Batch variants run the single-item operation for every element
//! concurrently and return outcomes in input order.

mod account;
mod market;
mod orders;
mod vault;

use alloy::{
    network::EthereumWallet,
    primitives::Address,
    providers::{DynProvider, ProviderBuilder},
    rpc::client::RpcClient,
    signers::local::PrivateKeySigner,
};
use reqwest::Method;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, info, warn};

pub use vault::DepositReceipt;

use crate::{
    ClientConfig, Environment, MarginAsset,
    error::Error,
    http::HttpClient,
    message::{AuthQuery, SignedAuthentication},
    outcome::Outcome,
    signer::MessageSigner,
    types::{SubAccountId, ValidationError},
};

const REFERRAL_PATH: &str = "vault/referral";

/// Exchange client bound to a single signing account.
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    signer: MessageSigner,
    http: HttpClient,
    provider: DynProvider,
    sub_account_id: SubAccountId,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReferralPayload {
    account: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    referral_code: Option<String>,
}

impl Client {
    /// Create a new client for the account of `private_key`.
    ///
    /// On mainnet a referral registration is spawned on the current tokio runtime,
    /// if any; its failure is logged and otherwise ignored.
    pub fn new(config: ClientConfig, private_key: PrivateKeySigner) -> Result<Self, Error> {
        let signer = MessageSigner::new(private_key, &config.domain);
        let http = HttpClient::new(config.api_url.clone())?;

        let rpc_client = RpcClient::new_http(config.rpc_url.clone());
        let provider = DynProvider::new(
            ProviderBuilder::new()
                .wallet(EthereumWallet::new(signer.private_key().clone()))
                .connect_client(rpc_client),
        );

        info!(
            account = %signer.address(),
            environment = %config.environment,
            api_url = %config.api_url,
            sub_account_id = config.sub_account_id,
            "Initializing exchange client"
        );

        let client = Self {
            sub_account_id: config.sub_account_id,
            config,
            signer,
            http,
            provider,
        };
        if client.config.environment == Environment::Mainnet {
            client.spawn_referral();
        }
        Ok(client)
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn signer(&self) -> &MessageSigner {
        &self.signer
    }

    pub fn provider(&self) -> &DynProvider {
        &self.provider
    }

    pub fn sub_account_id(&self) -> SubAccountId {
        self.sub_account_id
    }

    /// Switches the sub-account used by every message signed from now on.
    pub fn set_sub_account_id(&mut self, sub_account_id: SubAccountId) {
        debug!(from = self.sub_account_id, to = sub_account_id, "switching sub-account");
        self.sub_account_id = sub_account_id;
    }

    fn margin_asset(&self, symbol: &str) -> Result<&MarginAsset, ValidationError> {
        self.config
            .margin_asset(symbol)
            .ok_or_else(|| ValidationError::UnknownAsset(symbol.to_string()))
    }

    fn spawn_referral(&self) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("no tokio runtime, skipping referral registration");
            return;
        };
        let http = self.http.clone();
        let payload = ReferralPayload {
            account: self.address().to_string(),
            referral_code: self.config.referral_code.clone(),
        };
        handle.spawn(async move {
            if let Err(err) = http
                .fetch_json(Method::POST, REFERRAL_PATH, &[], Some(&payload))
                .await
            {
                warn!(%err, "referral registration failed");
            }
        });
    }

    /// Signs proof of account ownership for an authenticated read.
    fn auth_query(&self) -> Result<Vec<(&'static str, String)>, Error> {
        let auth = SignedAuthentication::build(self.address(), self.sub_account_id);
        let signature = self.signer.sign(&auth)?;
        Ok(AuthQuery::new(&auth, &signature).to_pairs())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Outcome<T> {
        Outcome::from_response(
            self.http
                .fetch_json::<Value>(Method::GET, path, query, None)
                .await,
        )
    }

    async fn send<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Outcome<T> {
        Outcome::from_response(self.http.fetch_json(method, path, &[], Some(body)).await)
    }
}
