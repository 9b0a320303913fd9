use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Side of the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderSide {
    Buy,
    Sell,
}

/// Kind of the placed order.
///
/// * [`OrderKind::Limit`] rests on the book at the given price.
/// * [`OrderKind::LimitMaker`] is rejected instead of taking liquidity.
/// * [`OrderKind::Market`] is converted into a limit order at a slippage-adjusted
///   price, rounded to the product's price increment.
/// * [`OrderKind::LimitReduceOnly`] can only decrease an existing position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderKind {
    Limit,
    LimitMaker,
    Market,
    LimitReduceOnly,
}

/// Time in force of the placed order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeInForce {
    /// Good till cancel.
    Gtc,
    /// Fill or kill.
    Fok,
    /// Immediate or cancel.
    Ioc,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    pub fn new(kind: &'static str, value: impl fmt::Display) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

impl OrderSide {
    pub fn is_buy(&self) -> bool {
        matches!(self, OrderSide::Buy)
    }
}

impl OrderKind {
    /// Exchange code signed into the `orderType` field.
    pub fn code(&self) -> u8 {
        match self {
            OrderKind::Limit => 0,
            OrderKind::LimitMaker => 1,
            OrderKind::Market => 2,
            OrderKind::LimitReduceOnly => 3,
        }
    }
}

impl TimeInForce {
    /// Exchange code signed into the `timeInForce` field.
    pub fn code(&self) -> u8 {
        match self {
            TimeInForce::Gtc => 0,
            TimeInForce::Fok => 1,
            TimeInForce::Ioc => 2,
        }
    }
}

impl TryFrom<u8> for OrderKind {
    type Error = ParseEnumError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OrderKind::Limit),
            1 => Ok(OrderKind::LimitMaker),
            2 => Ok(OrderKind::Market),
            3 => Ok(OrderKind::LimitReduceOnly),
            _ => Err(ParseEnumError::new("order kind", value)),
        }
    }
}

impl TryFrom<u8> for TimeInForce {
    type Error = ParseEnumError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(TimeInForce::Gtc),
            1 => Ok(TimeInForce::Fok),
            2 => Ok(TimeInForce::Ioc),
            _ => Err(ParseEnumError::new("time in force", value)),
        }
    }
}

impl FromStr for OrderSide {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BUY" => Ok(OrderSide::Buy),
            "SELL" => Ok(OrderSide::Sell),
            _ => Err(ParseEnumError::new("order side", s)),
        }
    }
}

impl FromStr for OrderKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().replace('-', "_").as_str() {
            "LIMIT" => Ok(OrderKind::Limit),
            "LIMIT_MAKER" => Ok(OrderKind::LimitMaker),
            "MARKET" => Ok(OrderKind::Market),
            "LIMIT_REDUCE_ONLY" => Ok(OrderKind::LimitReduceOnly),
            _ => Err(ParseEnumError::new("order kind", s)),
        }
    }
}

impl FromStr for TimeInForce {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GTC" => Ok(TimeInForce::Gtc),
            "FOK" => Ok(TimeInForce::Fok),
            "IOC" => Ok(TimeInForce::Ioc),
            _ => Err(ParseEnumError::new("time in force", s)),
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        })
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OrderKind::Limit => "LIMIT",
            OrderKind::LimitMaker => "LIMIT_MAKER",
            OrderKind::Market => "MARKET",
            OrderKind::LimitReduceOnly => "LIMIT_REDUCE_ONLY",
        })
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Fok => "FOK",
            TimeInForce::Ioc => "IOC",
        })
    }
}
