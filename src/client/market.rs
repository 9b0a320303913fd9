use serde_json::Value;

use super::Client;
use crate::{
    outcome::Outcome,
    time,
    types::{KlineQuery, ProductId},
};

impl Client {
    pub async fn products(&self) -> Outcome<Value> {
        self.get("products", &[]).await
    }

    pub async fn product(&self, symbol: &str) -> Outcome<Value> {
        self.get(&format!("products/{}", path_segment(symbol)), &[])
            .await
    }

    pub async fn product_by_id(&self, product_id: ProductId) -> Outcome<Value> {
        self.get(&format!("products/product-by-id/{product_id}"), &[])
            .await
    }

    pub async fn server_time(&self) -> Outcome<Value> {
        self.get("time", &[]).await
    }

    /// 24 hour rolling statistics of one symbol, or of every symbol if `None`.
    pub async fn ticker_24hr(&self, symbol: Option<&str>) -> Outcome<Value> {
        let query = symbol
            .map(|symbol| vec![("symbol", symbol.to_string())])
            .unwrap_or_default();
        self.get("ticker/24hr", &query).await
    }

    pub async fn depth(&self, symbol: &str, limit: Option<u32>) -> Outcome<Value> {
        let mut query = vec![("symbol", symbol.to_string())];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.get("depth", &query).await
    }

    /// Candlesticks; the query is validated before any request is made.
    pub async fn klines(&self, query: &KlineQuery) -> Outcome<Value> {
        if let Err(err) = query.validate(time::current_timestamp_millis()) {
            return err.into();
        }
        self.get("uiKlines", &query.to_query()).await
    }
}

/// Percent-encodes `value` so it stays a single path segment.
fn path_segment(value: &str) -> String {
    // form encoding writes spaces as '+' and escapes literal '+' as %2B
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

#[cfg(test)]
mod tests {
    use super::path_segment;

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment("BTCUSD"), "BTCUSD");
        assert_eq!(path_segment("BTC/USD"), "BTC%2FUSD");
        assert_eq!(path_segment("../time"), "..%2Ftime");
        assert_eq!(path_segment("A B+C?"), "A%20B%2BC%3F");
    }
}
