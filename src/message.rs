//! EIP-712 signable messages and their outbound wire payloads.
//!
//! Every wire payload is derived from the signed message it carries, so the
//! integers the exchange verifies are exactly the integers sent over the wire.
//! Fixed-point values travel as decimal strings, enumeration codes as numbers.

use alloy::primitives::{Address, Signature, U256};
use serde::Serialize;

alloy::sol! {
    /// Place a new order.
    #[derive(Debug, PartialEq, Eq)]
    struct Order {
        address account;
        bool isBuy;
        uint256 expiration;
        uint256 nonce;
        uint8 orderType;
        uint256 price;
        uint256 productId;
        uint256 quantity;
        uint256 subAccountId;
        uint8 timeInForce;
    }

    /// Cancel a single resting order.
    #[derive(Debug, PartialEq, Eq)]
    struct CancelOrder {
        address account;
        uint256 orderId;
        uint256 productId;
        uint256 subAccountId;
    }

    /// Cancel every resting order of a product.
    #[derive(Debug, PartialEq, Eq)]
    struct CancelOrders {
        address account;
        uint256 productId;
        uint256 subAccountId;
    }

    /// Withdraw margin asset from the exchange.
    #[derive(Debug, PartialEq, Eq)]
    struct Withdraw {
        address account;
        address asset;
        uint256 subAccountId;
        uint256 nonce;
        uint256 quantity;
    }

    /// Proof of account ownership for authenticated reads.
    #[derive(Debug, PartialEq, Eq)]
    struct SignedAuthentication {
        address account;
        uint256 subAccountId;
    }
}

/// `0x`-prefixed hex of the 65-byte `r || s || v` signature.
pub fn signature_hex(signature: &Signature) -> String {
    alloy::hex::encode_prefixed(signature.as_bytes())
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub account: String,
    pub is_buy: bool,
    pub expiration: String,
    pub nonce: String,
    pub order_type: u8,
    pub price: String,
    pub product_id: String,
    pub quantity: String,
    pub sub_account_id: String,
    pub time_in_force: u8,
    pub signature: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderPayload {
    pub account: String,
    pub order_id: String,
    pub product_id: String,
    pub sub_account_id: String,
    pub signature: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrdersPayload {
    pub account: String,
    pub product_id: String,
    pub sub_account_id: String,
    pub signature: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplacePayload {
    pub cancel_order: CancelOrderPayload,
    pub new_order: OrderPayload,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawPayload {
    pub account: String,
    pub asset: String,
    pub sub_account_id: String,
    pub nonce: String,
    pub quantity: String,
    pub signature: String,
}

/// Query parameters of an authenticated read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthQuery {
    pub account: String,
    pub sub_account_id: String,
    pub signature: String,
}

impl OrderPayload {
    pub fn new(order: &Order, signature: &Signature) -> Self {
        Self {
            account: order.account.to_string(),
            is_buy: order.isBuy,
            expiration: order.expiration.to_string(),
            nonce: order.nonce.to_string(),
            order_type: order.orderType,
            price: order.price.to_string(),
            product_id: order.productId.to_string(),
            quantity: order.quantity.to_string(),
            sub_account_id: order.subAccountId.to_string(),
            time_in_force: order.timeInForce,
            signature: signature_hex(signature),
        }
    }
}

impl CancelOrderPayload {
    pub fn new(cancel: &CancelOrder, signature: &Signature) -> Self {
        Self {
            account: cancel.account.to_string(),
            order_id: cancel.orderId.to_string(),
            product_id: cancel.productId.to_string(),
            sub_account_id: cancel.subAccountId.to_string(),
            signature: signature_hex(signature),
        }
    }
}

impl CancelOrdersPayload {
    pub fn new(cancel: &CancelOrders, signature: &Signature) -> Self {
        Self {
            account: cancel.account.to_string(),
            product_id: cancel.productId.to_string(),
            sub_account_id: cancel.subAccountId.to_string(),
            signature: signature_hex(signature),
        }
    }
}

impl WithdrawPayload {
    pub fn new(withdraw: &Withdraw, signature: &Signature) -> Self {
        Self {
            account: withdraw.account.to_string(),
            asset: withdraw.asset.to_string(),
            sub_account_id: withdraw.subAccountId.to_string(),
            nonce: withdraw.nonce.to_string(),
            quantity: withdraw.quantity.to_string(),
            signature: signature_hex(signature),
        }
    }
}

impl AuthQuery {
    pub fn new(auth: &SignedAuthentication, signature: &Signature) -> Self {
        Self {
            account: auth.account.to_string(),
            sub_account_id: auth.subAccountId.to_string(),
            signature: signature_hex(signature),
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("account", self.account.clone()),
            ("subAccountId", self.sub_account_id.clone()),
            ("signature", self.signature.clone()),
        ]
    }
}

impl CancelOrder {
    pub fn build(account: Address, sub_account_id: u64, product_id: u64, order_id: U256) -> Self {
        Self {
            account,
            orderId: order_id,
            productId: U256::from(product_id),
            subAccountId: U256::from(sub_account_id),
        }
    }
}

impl CancelOrders {
    pub fn build(account: Address, sub_account_id: u64, product_id: u64) -> Self {
        Self {
            account,
            productId: U256::from(product_id),
            subAccountId: U256::from(sub_account_id),
        }
    }
}

impl SignedAuthentication {
    pub fn build(account: Address, sub_account_id: u64) -> Self {
        Self {
            account,
            subAccountId: U256::from(sub_account_id),
        }
    }
}
