#![cfg(feature = "market_data")]

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal_macros::dec;
use stockecho::market_data::providers::BoerseFrankfurtSource;
use stockecho::market_data::{HistorySource, MarketDataService};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ISIN: &str = "IE00B3VVMM84";

fn history_body(points: &[(&str, f64)]) -> String {
    let data: Vec<serde_json::Value> = points
        .iter()
        .map(|(date, close)| {
            serde_json::json!({
                "date": date,
                "open": close,
                "close": close,
                "high": close,
                "low": close,
                "turnoverPieces": 1200,
                "turnoverEuro": 61_560.0
            })
        })
        .collect();
    serde_json::json!({
        "isin": ISIN,
        "data": data,
        "totalCount": points.len(),
        "tradedInPercent": false
    })
    .to_string()
}

#[tokio::test]
async fn boerse_frankfurt_sends_expected_query() -> Result<()> {
    let server = MockServer::start().await;
    let source = BoerseFrankfurtSource::new().with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path("/price_history"))
        .and(query_param("offset", "0"))
        .and(query_param("limit", "505"))
        .and(query_param("mic", "XETR"))
        .and(query_param("isin", ISIN))
        .and(query_param("minDate", "2020-09-10"))
        .and(query_param("maxDate", "2020-09-11"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            history_body(&[("2020-09-11", 51.3), ("2020-09-10", 51.02)]),
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let min = NaiveDate::from_ymd_opt(2020, 9, 10).unwrap();
    let max = NaiveDate::from_ymd_opt(2020, 9, 11).unwrap();
    let history = source.fetch_history(ISIN, min, max).await?;

    assert_eq!(history.isin, ISIN);
    assert_eq!(history.total_count, 2);
    assert_eq!(history.data.len(), 2);
    assert_eq!(history.data[0].date, "2020-09-11");
    assert_eq!(history.data[0].close, dec!(51.3));
    assert_eq!(history.data[1].turnover_pieces, 1200);

    Ok(())
}

#[tokio::test]
async fn boerse_frankfurt_uses_configured_mic() -> Result<()> {
    let server = MockServer::start().await;
    let source = BoerseFrankfurtSource::new()
        .with_base_url(server.uri())
        .with_mic("xfra");

    Mock::given(method("GET"))
        .and(path("/price_history"))
        .and(query_param("mic", "XFRA"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(history_body(&[]), "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let day = NaiveDate::from_ymd_opt(2020, 9, 11).unwrap();
    let history = source.fetch_history(ISIN, day, day).await?;
    assert!(history.data.is_empty());

    Ok(())
}

#[tokio::test]
async fn boerse_frankfurt_server_error_fails_the_batch() -> Result<()> {
    let server = MockServer::start().await;
    let source = BoerseFrankfurtSource::new().with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path("/price_history"))
        .and(query_param("isin", ISIN))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(history_body(&[]), "application/json"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/price_history"))
        .and(query_param("isin", "DE0005190003"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let service = MarketDataService::new(Arc::new(source));
    let day = NaiveDate::from_ymd_opt(2020, 9, 11).unwrap();
    let err = service
        .fetch_day(&[ISIN.to_string(), "DE0005190003".to_string()], day)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("DE0005190003"));
    Ok(())
}

#[tokio::test]
async fn boerse_frankfurt_rejects_malformed_body() -> Result<()> {
    let server = MockServer::start().await;
    let source = BoerseFrankfurtSource::new().with_base_url(server.uri());

    Mock::given(method("GET"))
        .and(path("/price_history"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{\"data\": 5}", "application/json"))
        .mount(&server)
        .await;

    let day = NaiveDate::from_ymd_opt(2020, 9, 11).unwrap();
    let err = source.fetch_history(ISIN, day, day).await.unwrap_err();
    assert!(err.to_string().contains("Failed to parse price history"));

    Ok(())
}
