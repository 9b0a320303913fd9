use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::Client;
use crate::{
    error::Error,
    message::WithdrawPayload,
    num,
    outcome::Outcome,
    types::{OrderIntent, ProductId, WithdrawIntent},
};

impl Client {
    /// Withdraws a margin asset, quantity in exchange-native 18 decimals.
    pub async fn withdraw(&self, intent: &WithdrawIntent) -> Result<Outcome<Value>, Error> {
        let asset = match self.margin_asset(&intent.asset) {
            Ok(asset) => asset.address,
            Err(err) => return Ok(err.into()),
        };
        let withdraw = intent.to_message(self.address(), self.sub_account_id, asset);
        let signature = self.signer.sign(&withdraw)?;
        debug!(?intent, %asset, "withdrawing");
        Ok(self
            .send(
                Method::POST,
                "withdraw",
                &WithdrawPayload::new(&withdraw, &signature),
            )
            .await)
    }

    pub async fn balances(&self) -> Result<Outcome<Value>, Error> {
        let query = self.auth_query()?;
        Ok(self.get("balances", &query).await)
    }

    /// Resting orders, optionally of a single product.
    pub async fn open_orders(&self, product_id: Option<ProductId>) -> Result<Outcome<Value>, Error> {
        let mut query = self.auth_query()?;
        if let Some(product_id) = product_id {
            query.push(("productId", product_id.to_string()));
        }
        Ok(self.get("openOrders", &query).await)
    }

    pub async fn position_risk(&self) -> Result<Outcome<Value>, Error> {
        let query = self.auth_query()?;
        Ok(self.get("positionRisk", &query).await)
    }

    pub async fn account_health(&self) -> Result<Outcome<Value>, Error> {
        let query = self.auth_query()?;
        Ok(self.get("account-health", &query).await)
    }

    pub async fn trade_history(
        &self,
        product_id: Option<ProductId>,
    ) -> Result<Outcome<Value>, Error> {
        let mut query = self.auth_query()?;
        if let Some(product_id) = product_id {
            query.push(("productId", product_id.to_string()));
        }
        Ok(self.get("trade-history", &query).await)
    }

    /// Margin the exchange would reserve for `intent`, without placing it.
    pub async fn new_order_margin(&self, intent: &OrderIntent) -> Result<Outcome<Value>, Error> {
        let price = match intent.effective_price() {
            Ok(price) => price,
            Err(err) => return Ok(err.into()),
        };
        let mut query = self.auth_query()?;
        query.extend([
            ("productId", intent.product_id().to_string()),
            ("isBuy", intent.side().is_buy().to_string()),
            ("price", num::to_fixed18(price).to_string()),
            ("quantity", num::to_fixed18(intent.quantity()).to_string()),
        ]);
        Ok(self.get("new-order-margin", &query).await)
    }
}
