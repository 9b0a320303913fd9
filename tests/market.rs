mod common;

use mockito::Matcher;
use perp_client::{Outcome, time, types::KlineQuery};
use serde_json::{Value, json};

use common::{client, path};

#[tokio::test]
async fn test_products() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", path("products").as_str())
        .with_status(200)
        .with_body(r#"[{"symbol":"BTCUSD","productId":16}]"#)
        .create_async()
        .await;
    let client = client(&server);

    let outcome = client.products().await;

    assert_eq!(
        outcome,
        Outcome::Ok(json!([{ "symbol": "BTCUSD", "productId": 16 }]))
    );
    mock.assert_async().await;
}

/// Symbols are sent as one escaped path segment.
#[tokio::test]
async fn test_product_symbol_is_escaped() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", path("products/BTC%2FUSD").as_str())
        .with_status(200)
        .with_body(r#"{"symbol":"BTC/USD","productId":16}"#)
        .create_async()
        .await;
    let client = client(&server);

    let outcome = client.product("BTC/USD").await;

    assert_eq!(
        outcome,
        Outcome::Ok(json!({ "symbol": "BTC/USD", "productId": 16 }))
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_product_falls_back() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", path("products/product-by-id/99").as_str())
        .with_status(404)
        .with_body("not found")
        .create_async()
        .await;
    let client = client(&server);

    let envelope = client.product_by_id(99).await.into_envelope(Value::Null);

    assert_eq!(envelope.data, Value::Null);
    assert_eq!(
        envelope.error.unwrap().message,
        perp_client::outcome::UNKNOWN_ERROR_MESSAGE
    );
}

#[tokio::test]
async fn test_klines_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", path("uiKlines").as_str())
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("symbol".into(), "BTCUSD".into()),
            Matcher::UrlEncoded("interval".into(), "1h".into()),
            Matcher::UrlEncoded("startTime".into(), "1000".into()),
            Matcher::UrlEncoded("endTime".into(), "2000".into()),
            Matcher::UrlEncoded("limit".into(), "50".into()),
        ]))
        .with_status(200)
        .with_body("[[1000,\"1\",\"2\",\"0.5\",\"1.5\"]]")
        .create_async()
        .await;
    let client = client(&server);

    let query = KlineQuery::new("BTCUSD", "1h")
        .with_range(1000, 2000)
        .with_limit(50);
    let outcome = client.klines(&query).await;

    assert!(outcome.is_ok());
    mock.assert_async().await;
}

/// Invalid kline queries are rejected without a request.
#[tokio::test]
async fn test_klines_validation() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;
    let client = client(&server);
    let now = time::current_timestamp_millis();

    let cases = [
        (
            KlineQuery::new("BTCUSD", "1m").with_limit(0),
            "Limit must be between 0 and 1000.",
        ),
        (
            KlineQuery::new("BTCUSD", "1m").with_limit(1500),
            "Limit must be between 0 and 1000.",
        ),
        (
            KlineQuery::new("BTCUSD", "1m")
                .with_limit(1500)
                .with_range(now + 2000, now + 1000),
            "Limit must be between 0 and 1000.",
        ),
        (
            KlineQuery::new("BTCUSD", "1m").with_range(now + 2000, now + 1000),
            "Start time cannot be after end time.",
        ),
        (
            KlineQuery::new("BTCUSD", "1m").with_range(2000, 1000),
            "Start time cannot be after end time.",
        ),
        (
            KlineQuery::new("BTCUSD", "1m").with_start_time(now + 3_600_000),
            "Start time cannot be in the future.",
        ),
    ];
    for (query, message) in cases {
        let envelope = client.klines(&query).await.into_envelope(json!([]));
        assert_eq!(envelope.data, json!([]));
        assert_eq!(envelope.error.unwrap().message, message, "{query:?}");
    }
    mock.assert_async().await;
}
