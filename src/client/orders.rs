use futures::future::join_all;
use reqwest::Method;
use serde_json::Value;
use tracing::debug;

use super::Client;
use crate::{
    error::Error,
    message::{CancelOrderPayload, CancelOrders, CancelOrdersPayload, OrderPayload, ReplacePayload},
    outcome::Outcome,
    types::{CancelIntent, OrderIntent, ProductId, ReplaceIntent},
};

impl Client {
    /// Places a single order.
    ///
    /// A market order without a price increment is rejected before signing.
    pub async fn place_order(&self, intent: &OrderIntent) -> Result<Outcome<Value>, Error> {
        let order = match intent.to_order(self.address(), self.sub_account_id) {
            Ok(order) => order,
            Err(err) => return Ok(err.into()),
        };
        let signature = self.signer.sign(&order)?;
        debug!(?intent, nonce = %order.nonce, "placing order");
        Ok(self
            .send(Method::POST, "order", &OrderPayload::new(&order, &signature))
            .await)
    }

    /// Places every order concurrently; outcomes keep the input order and
    /// one failing order does not affect the others.
    pub async fn place_orders(&self, intents: &[OrderIntent]) -> Result<Vec<Outcome<Value>>, Error> {
        join_all(intents.iter().map(|intent| self.place_order(intent)))
            .await
            .into_iter()
            .collect()
    }

    pub async fn cancel_order(&self, intent: &CancelIntent) -> Result<Outcome<Value>, Error> {
        let cancel = intent.to_message(self.address(), self.sub_account_id);
        let signature = self.signer.sign(&cancel)?;
        debug!(?intent, "cancelling order");
        Ok(self
            .send(
                Method::DELETE,
                "order",
                &CancelOrderPayload::new(&cancel, &signature),
            )
            .await)
    }

    /// Cancels every order concurrently, outcomes keep the input order.
    pub async fn cancel_orders(
        &self,
        intents: &[CancelIntent],
    ) -> Result<Vec<Outcome<Value>>, Error> {
        join_all(intents.iter().map(|intent| self.cancel_order(intent)))
            .await
            .into_iter()
            .collect()
    }

    /// Cancels all resting orders of `product_id`.
    pub async fn cancel_all_orders(&self, product_id: ProductId) -> Result<Outcome<Value>, Error> {
        let cancel = CancelOrders::build(self.address(), self.sub_account_id, product_id);
        let signature = self.signer.sign(&cancel)?;
        debug!(product_id, "cancelling all orders");
        Ok(self
            .send(
                Method::DELETE,
                "openOrders",
                &CancelOrdersPayload::new(&cancel, &signature),
            )
            .await)
    }

    /// Cancels a resting order and places a maker-only, good-till-cancel replacement.
    pub async fn replace_order(&self, intent: &ReplaceIntent) -> Result<Outcome<Value>, Error> {
        let (cancel, order) = match intent.to_messages(self.address(), self.sub_account_id) {
            Ok(messages) => messages,
            Err(err) => return Ok(err.into()),
        };
        let cancel_signature = self.signer.sign(&cancel)?;
        let order_signature = self.signer.sign(&order)?;
        debug!(?intent, "replacing order");
        let payload = ReplacePayload {
            cancel_order: CancelOrderPayload::new(&cancel, &cancel_signature),
            new_order: OrderPayload::new(&order, &order_signature),
        };
        Ok(self
            .send(Method::POST, "order/cancel-and-replace", &payload)
            .await)
    }
}
