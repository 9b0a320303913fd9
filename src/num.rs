//! Decimal to exchange-native fixed-point conversions.
//!
//! Prices and quantities are signed as 18-decimal integers, while the stable
//! margin asset moves on chain with its token decimals (6).
//! Conversions go through [`fastnum`] decimals and never touch binary floats.

use alloy::primitives::U256;
use fastnum::{
    UD128, bint,
    decimal::{Context, RoundingMode, UnsignedDecimal},
};

use crate::types::ValidationError;

/// Decimals of exchange-native prices and quantities.
pub const EXCHANGE_DECIMALS: u8 = 18;

/// Decimals of the stable margin asset.
pub const STABLE_DECIMALS: u8 = 6;

pub const FIXED18: Converter = Converter::new(EXCHANGE_DECIMALS);
pub const FIXED6: Converter = Converter::new(STABLE_DECIMALS);

/// Fixed-point to decimal converter.
#[derive(Clone, Copy, Debug, Default)]
pub struct Converter {
    decimals: i32,
}

impl Converter {
    pub const fn new(decimals: u8) -> Self {
        Self {
            decimals: decimals as i32,
        }
    }

    pub fn decimals(&self) -> u8 {
        self.decimals as u8
    }

    /// Returns `None` if `value` does not fit into `N` 64-bit digits.
    pub fn from_unsigned<const N: usize>(&self, value: U256) -> Option<UnsignedDecimal<N>> {
        let unscaled = bint::UInt::<N>::from_le_slice(value.as_le_slice())?;
        Some(UnsignedDecimal::<N>::from_parts(
            unscaled,
            -self.decimals,
            Context::default().with_rounding_mode(RoundingMode::Floor),
        ))
    }

    pub fn to_unsigned<const N: usize>(&self, value: UnsignedDecimal<N>) -> U256 {
        let rescaled = value.rescale(self.decimals as i16);
        U256::from_le_slice(rescaled.digits().to_radix_le(256).as_slice())
    }
}

/// `value × 10^18` as an exact integer.
pub fn to_fixed18(value: UD128) -> U256 {
    FIXED18.to_unsigned(value)
}

/// `value × 10^6` as an exact integer.
pub fn to_fixed6(value: UD128) -> U256 {
    FIXED6.to_unsigned(value)
}

pub fn from_fixed18(value: U256) -> Option<UD128> {
    FIXED18.from_unsigned(value)
}

/// Parses a human decimal string, e.g. `"0.015"`.
pub fn parse_decimal(value: &str) -> Result<UD128, ValidationError> {
    UD128::from_str(value.trim(), Context::default())
        .map_err(|_| ValidationError::InvalidDecimal(value.to_string()))
}
