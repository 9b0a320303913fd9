//! Slippage-adjusted limit prices for market orders.

use alloy::primitives::U256;
use fastnum::{UD128, decimal::RoundingMode};

use crate::{num::EXCHANGE_DECIMALS, types::ValidationError};

/// Number of decimal places allowed by a fixed-point price increment,
/// `18 - floor(log10(increment))`, clamped to `0..=18`.
pub fn precision_for_increment(price_increment: U256) -> i16 {
    let magnitude = price_increment.to_string().len() as i16 - 1;
    (EXCHANGE_DECIMALS as i16 - magnitude).clamp(0, EXCHANGE_DECIMALS as i16)
}

/// Moves `price` by `slippage_percent` against the taker (up for buys, down for sells)
/// and rounds half away from zero to the precision of `price_increment`.
///
/// The result only stays on the taker side of `price` when `price` already
/// sits on the increment grid. An off-grid price with a small slippage can
/// round back past it: buying at 27.354 with 0.001% on a 0.01 tick gives 27.35.
pub fn adjust_price(
    is_buy: bool,
    price: UD128,
    slippage_percent: UD128,
    price_increment: U256,
) -> Result<UD128, ValidationError> {
    if slippage_percent >= UD128::from(100u64) {
        return Err(ValidationError::InvalidSlippage);
    }
    if price_increment.is_zero() {
        return Err(ValidationError::ZeroPriceIncrement);
    }

    let ratio = slippage_percent / UD128::from(100u64);
    let multiplier = if is_buy {
        UD128::ONE + ratio
    } else {
        UD128::ONE - ratio
    };
    let precision = precision_for_increment(price_increment);

    Ok((price * multiplier)
        .with_rounding_mode(RoundingMode::HalfUp)
        .rescale(precision))
}
