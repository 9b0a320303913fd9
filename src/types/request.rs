use alloy::primitives::{Address, U256};
use fastnum::{UD128, udec128};

use crate::{message, num, slippage, time};

use super::*;

/// Slippage applied to market orders when the caller does not set one, in percent.
pub const DEFAULT_SLIPPAGE_PERCENT: UD128 = udec128!(1);

/// Largest number of candles a single K-line query may request.
pub const MAX_KLINE_LIMIT: u32 = 1000;

/// Order to place, in human units.
///
/// Market orders are signed as limit orders at a slippage-adjusted price and
/// therefore require the product's fixed-point price increment.
#[derive(Clone, derive_more::Debug, PartialEq)]
pub struct OrderIntent {
    product_id: ProductId,
    side: OrderSide,
    kind: OrderKind,
    time_in_force: TimeInForce,
    #[debug("{price}")]
    price: UD128,
    #[debug("{quantity}")]
    quantity: UD128,
    expiration: Option<u64>,
    nonce: Option<u64>,
    #[debug("{slippage_percent:?}")]
    slippage_percent: Option<UD128>,
    price_increment: Option<U256>,
}

impl OrderIntent {
    /// Create a new order intent with provided parameters, good till cancel.
    pub fn new(
        product_id: ProductId,
        side: OrderSide,
        kind: OrderKind,
        price: UD128,
        quantity: UD128,
    ) -> Self {
        Self {
            product_id,
            side,
            kind,
            time_in_force: TimeInForce::Gtc,
            price,
            quantity,
            expiration: None,
            nonce: None,
            slippage_percent: None,
            price_increment: None,
        }
    }

    pub fn limit(product_id: ProductId, side: OrderSide, price: UD128, quantity: UD128) -> Self {
        Self::new(product_id, side, OrderKind::Limit, price, quantity)
    }

    /// Market order around the reference `price`, immediate or cancel.
    pub fn market(
        product_id: ProductId,
        side: OrderSide,
        price: UD128,
        quantity: UD128,
        price_increment: U256,
    ) -> Self {
        Self::new(product_id, side, OrderKind::Market, price, quantity)
            .with_time_in_force(TimeInForce::Ioc)
            .with_price_increment(price_increment)
    }

    pub fn with_kind(mut self, kind: OrderKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    /// Sets the expiration in milliseconds since epoch (default: 30 days from signing).
    pub fn with_expiration(mut self, expiration: u64) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Sets the nonce (default: [`time::nonce`] at signing).
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Sets the market order slippage in percent (default: [`DEFAULT_SLIPPAGE_PERCENT`]).
    pub fn with_slippage(mut self, slippage_percent: UD128) -> Self {
        self.slippage_percent = Some(slippage_percent);
        self
    }

    /// Sets the product's fixed-point price increment, e.g. `10^16` for a 0.01 tick.
    pub fn with_price_increment(mut self, price_increment: U256) -> Self {
        self.price_increment = Some(price_increment);
        self
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn side(&self) -> OrderSide {
        self.side
    }

    pub fn kind(&self) -> OrderKind {
        self.kind
    }

    pub fn time_in_force(&self) -> TimeInForce {
        self.time_in_force
    }

    pub fn price(&self) -> UD128 {
        self.price
    }

    pub fn quantity(&self) -> UD128 {
        self.quantity
    }

    /// Limit price to sign: the slippage-adjusted price for market orders,
    /// the caller's price otherwise.
    pub fn effective_price(&self) -> Result<UD128, ValidationError> {
        match self.kind {
            OrderKind::Market => {
                let increment = self
                    .price_increment
                    .ok_or(ValidationError::MissingPriceIncrement)?;
                slippage::adjust_price(
                    self.side.is_buy(),
                    self.price,
                    self.slippage_percent.unwrap_or(DEFAULT_SLIPPAGE_PERCENT),
                    increment,
                )
            }
            _ => Ok(self.price),
        }
    }

    /// Prepare the signable order message, filling in default expiration and nonce.
    pub fn to_order(
        &self,
        account: Address,
        sub_account_id: SubAccountId,
    ) -> Result<message::Order, ValidationError> {
        let price = self.effective_price()?;
        Ok(message::Order {
            account,
            isBuy: self.side.is_buy(),
            expiration: U256::from(self.expiration.unwrap_or_else(time::default_expiration)),
            nonce: U256::from(self.nonce.unwrap_or_else(time::nonce)),
            orderType: self.kind.code(),
            price: num::to_fixed18(price),
            productId: U256::from(self.product_id),
            quantity: num::to_fixed18(self.quantity),
            subAccountId: U256::from(sub_account_id),
            timeInForce: self.time_in_force.code(),
        })
    }
}

/// Resting order to cancel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CancelIntent {
    pub product_id: ProductId,
    pub order_id: OrderId,
}

impl CancelIntent {
    pub fn new(product_id: ProductId, order_id: OrderId) -> Self {
        Self {
            product_id,
            order_id,
        }
    }

    pub fn to_message(
        &self,
        account: Address,
        sub_account_id: SubAccountId,
    ) -> message::CancelOrder {
        message::CancelOrder::build(account, sub_account_id, self.product_id, self.order_id)
    }
}

/// Cancel a resting order and place its replacement in one request.
///
/// The replacement is always a maker-only order, good till cancel,
/// whatever kind and time in force the new order intent carries.
#[derive(Clone, Debug, PartialEq)]
pub struct ReplaceIntent {
    pub cancel: CancelIntent,
    pub order: OrderIntent,
}

impl ReplaceIntent {
    pub fn new(cancel: CancelIntent, order: OrderIntent) -> Self {
        Self { cancel, order }
    }

    pub fn to_messages(
        &self,
        account: Address,
        sub_account_id: SubAccountId,
    ) -> Result<(message::CancelOrder, message::Order), ValidationError> {
        let replacement = self
            .order
            .clone()
            .with_kind(OrderKind::LimitMaker)
            .with_time_in_force(TimeInForce::Gtc);
        Ok((
            self.cancel.to_message(account, sub_account_id),
            replacement.to_order(account, sub_account_id)?,
        ))
    }
}

/// Withdrawal of a margin asset, in human units.
#[derive(Clone, derive_more::Debug, PartialEq)]
pub struct WithdrawIntent {
    pub asset: String,
    #[debug("{quantity}")]
    pub quantity: UD128,
    pub nonce: Option<u64>,
}

impl WithdrawIntent {
    pub fn new(asset: impl Into<String>, quantity: UD128) -> Self {
        Self {
            asset: asset.into(),
            quantity,
            nonce: None,
        }
    }

    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Prepare the signable withdraw message for the resolved asset address.
    pub fn to_message(
        &self,
        account: Address,
        sub_account_id: SubAccountId,
        asset: Address,
    ) -> message::Withdraw {
        message::Withdraw {
            account,
            asset,
            subAccountId: U256::from(sub_account_id),
            nonce: U256::from(self.nonce.unwrap_or_else(time::nonce)),
            quantity: num::to_fixed18(self.quantity),
        }
    }
}

/// On-chain deposit of a margin asset into the exchange vault, in human units.
#[derive(Clone, derive_more::Debug, PartialEq)]
pub struct DepositIntent {
    pub asset: String,
    #[debug("{amount}")]
    pub amount: UD128,
}

impl DepositIntent {
    pub fn new(asset: impl Into<String>, amount: UD128) -> Self {
        Self {
            asset: asset.into(),
            amount,
        }
    }
}

/// Candlestick query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KlineQuery {
    pub symbol: String,
    pub interval: String,
    pub start_time: Option<u64>,
    pub end_time: Option<u64>,
    pub limit: Option<u32>,
}

impl KlineQuery {
    pub fn new(symbol: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            start_time: None,
            end_time: None,
            limit: None,
        }
    }

    pub fn with_range(mut self, start_time: u64, end_time: u64) -> Self {
        self.start_time = Some(start_time);
        self.end_time = Some(end_time);
        self
    }

    pub fn with_start_time(mut self, start_time: u64) -> Self {
        self.start_time = Some(start_time);
        self
    }

    pub fn with_end_time(mut self, end_time: u64) -> Self {
        self.end_time = Some(end_time);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks limit, then range order, then that the range does not start
    /// after `now_ms`, stopping at the first failure.
    pub fn validate(&self, now_ms: u64) -> Result<(), ValidationError> {
        if let Some(limit) = self.limit {
            if limit == 0 || limit > MAX_KLINE_LIMIT {
                return Err(ValidationError::InvalidKlineLimit);
            }
        }
        if let (Some(start), Some(end)) = (self.start_time, self.end_time) {
            if start > end {
                return Err(ValidationError::StartAfterEnd);
            }
        }
        if let Some(start) = self.start_time {
            if start > now_ms {
                return Err(ValidationError::StartInFuture);
            }
        }
        Ok(())
    }

    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("symbol", self.symbol.clone()),
            ("interval", self.interval.clone()),
        ];
        if let Some(start) = self.start_time {
            query.push(("startTime", start.to_string()));
        }
        if let Some(end) = self.end_time {
            query.push(("endTime", end.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}
