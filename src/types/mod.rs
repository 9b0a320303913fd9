mod order;
mod request;

pub use order::{OrderKind, OrderSide, ParseEnumError, TimeInForce};
pub use request::{
    CancelIntent, DEFAULT_SLIPPAGE_PERCENT, DepositIntent, KlineQuery, MAX_KLINE_LIMIT, OrderIntent,
    ReplaceIntent, WithdrawIntent,
};

use alloy::primitives::U256;

/// Exchange ID of a product (perpetual market).
pub type ProductId = u64;

/// ID of a sub-account under the signing account.
pub type SubAccountId = u64;

/// Exchange ID of a resting order.
pub type OrderId = U256;

/// Caller input rejected before any message is signed or request is sent.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("A priceIncrement is required for market orders")]
    MissingPriceIncrement,

    #[error("priceIncrement must be greater than zero")]
    ZeroPriceIncrement,

    #[error("Slippage must be between 0 and 100")]
    InvalidSlippage,

    #[error("Limit must be between 0 and 1000.")]
    InvalidKlineLimit,

    #[error("Start time cannot be after end time.")]
    StartAfterEnd,

    #[error("Start time cannot be in the future.")]
    StartInFuture,

    #[error("Unknown margin asset: {0}")]
    UnknownAsset(String),

    #[error("Invalid decimal value: {0}")]
    InvalidDecimal(String),
}
