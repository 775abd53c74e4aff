//! Shared fixtures for the dashboard integration tests.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use bike_dashboard::{build_app_router, AppState, DashboardConfig, DashboardContext};
use bike_forecast::data::{BikeRecord, Season};
use bike_forecast::{ArimaOrder, Dataset};
use chrono::{Duration, NaiveDate};
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const DAYS: i64 = 40;

pub fn first_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2017, 12, 1).unwrap()
}

pub fn last_date() -> NaiveDate {
    first_date() + Duration::days(DAYS - 1)
}

/// Forty days of 24 hourly rows with a trend and a daily cycle
pub fn synthetic_dataset() -> Dataset {
    let mut records = Vec::new();
    for day in 0..DAYS {
        let date = first_date() + Duration::days(day);
        let d = day as f64;
        for hour in 0..24u32 {
            let h = hour as f64;
            records.push(BikeRecord {
                date,
                rented_bike_count: 200.0
                    + 10.0 * h
                    + 5.0 * d
                    + 50.0 * (0.9 * d).sin()
                    + 20.0 * (2.3 * d + h).cos(),
                hour,
                temperature: -5.0 + 0.3 * h,
                humidity: 40.0 + d,
                wind_speed: 0.5 + 0.1 * h,
                visibility: 2000.0 - 10.0 * h,
                dew_point: None,
                solar_radiation: if (7..19).contains(&hour) { 0.5 } else { 0.0 },
                rainfall: Some(0.0),
                snowfall: Some(0.0),
                season: Season::Winter,
                holiday: None,
                functioning_day: Some("Yes".to_string()),
            });
        }
    }
    Dataset::from_records(records).unwrap()
}

pub fn test_config() -> DashboardConfig {
    DashboardConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        order: ArimaOrder::new(5, 1, 0),
        horizon: 10,
        confidence_level: 0.95,
        holdout: 7,
        ..DashboardConfig::default()
    }
}

/// Full application router over the synthetic dataset
pub fn build_test_app() -> Router {
    let config = test_config();
    let context = DashboardContext::build(synthetic_dataset(), &config).unwrap();
    build_app_router(AppState::new(context, config))
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// GET `uri`, assert the status and return the JSON body
pub async fn get_json(app: Router, uri: &str, expected: StatusCode) -> serde_json::Value {
    let response = get(app, uri).await;
    assert_eq!(response.status(), expected, "GET {uri}");
    body_json(response).await
}
