use bike_forecast::data::TimeSeries;
use bike_forecast::models::arima::{forecast, forecast_with_level, ArimaModel, ArimaOrder};
use bike_forecast::models::{ForecastModel, TrainedForecastModel};
use bike_forecast::utils::Frequency;
use bike_forecast::ForecastError;
use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal, Uniform};
use rstest::rstest;

/// Daily series of `len` observations ending on `last`
fn daily_series(last: NaiveDate, values: Vec<f64>) -> TimeSeries {
    let len = values.len() as i64;
    let dates = (0..len).map(|i| last - Duration::days(len - 1 - i)).collect();
    TimeSeries::from_dates(dates, values).unwrap()
}

fn demand_like(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64;
            3000.0 + 25.0 * t + 400.0 * (0.9 * t).sin() + 150.0 * (2.3 * t).cos()
        })
        .collect()
}

fn end_of_data() -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 11, 30).unwrap()
}

#[test]
fn test_fifty_day_forecast_after_last_date() {
    let series = daily_series(end_of_data(), demand_like(100));
    let result = forecast(&series, ArimaOrder::new(5, 1, 0), 50).unwrap();

    assert_eq!(result.horizon(), 50);
    assert_eq!(result.confidence_level(), 0.95);

    let timestamps = result.timestamps();
    assert_eq!(
        timestamps[0].date(),
        NaiveDate::from_ymd_opt(2018, 12, 1).unwrap()
    );
    assert_eq!(
        timestamps[49].date(),
        NaiveDate::from_ymd_opt(2019, 1, 19).unwrap()
    );
    assert!(timestamps.windows(2).all(|w| w[1] - w[0] == Duration::days(1)));

    for point in result.points() {
        assert!(point.lower <= point.value && point.value <= point.upper);
        assert!(point.value.is_finite());
    }
}

#[rstest]
#[case(ArimaOrder::new(5, 1, 0), 12, 7)]
#[case(ArimaOrder::new(1, 1, 0), 30, 10)]
#[case(ArimaOrder::new(2, 0, 0), 60, 5)]
#[case(ArimaOrder::new(1, 1, 1), 40, 3)]
fn test_increasing_series_forecast_shape(
    #[case] order: ArimaOrder,
    #[case] len: usize,
    #[case] horizon: usize,
) {
    let mut rng = StdRng::seed_from_u64(len as u64);
    let noise = Uniform::new(0.0, 2.0);
    let values: Vec<f64> = (0..len)
        .map(|t| 50.0 + 12.0 * t as f64 + noise.sample(&mut rng))
        .collect();
    let series = daily_series(end_of_data(), values);

    let result = forecast(&series, order, horizon).unwrap();
    assert_eq!(result.horizon(), horizon);

    let timestamps = result.timestamps();
    assert_eq!(timestamps[0], series.last_timestamp().unwrap() + Duration::days(1));
    assert!(timestamps.windows(2).all(|w| w[1] > w[0]));
    assert!(result
        .points()
        .iter()
        .all(|p| p.lower <= p.value && p.value <= p.upper));
}

#[test]
fn test_bands_widen_with_horizon() {
    let series = daily_series(end_of_data(), demand_like(100));
    let result = forecast(&series, ArimaOrder::new(5, 1, 0), 20).unwrap();

    let widths: Vec<f64> = result.intervals().iter().map(|(l, u)| u - l).collect();
    assert!(widths.windows(2).all(|w| w[1] >= w[0] - 1e-9));
}

#[test]
fn test_forecast_is_deterministic() {
    let series = daily_series(end_of_data(), demand_like(100));
    let first = forecast(&series, ArimaOrder::new(5, 1, 0), 10).unwrap();
    let second = forecast(&series, ArimaOrder::new(5, 1, 0), 10).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_narrower_band_at_lower_level() {
    let series = daily_series(end_of_data(), demand_like(100));
    let order = ArimaOrder::new(5, 1, 0);
    let wide = forecast_with_level(&series, order, 5, 0.95).unwrap();
    let narrow = forecast_with_level(&series, order, 5, 0.8).unwrap();

    assert_eq!(wide.values(), narrow.values());
    let (wl, wu) = wide.intervals()[4];
    let (nl, nu) = narrow.intervals()[4];
    assert!(nu - nl < wu - wl);
}

#[test]
fn test_recovers_ar1_coefficient() {
    let mut rng = StdRng::seed_from_u64(42);
    let noise = Normal::new(0.0, 1.0).unwrap();

    let mut x = 0.0;
    let mut values = Vec::with_capacity(400);
    for i in 0..500 {
        x = 0.6 * x + noise.sample(&mut rng);
        if i >= 100 {
            values.push(10.0 + x);
        }
    }

    let series = daily_series(end_of_data(), values);
    let trained = ArimaModel::new(ArimaOrder::new(1, 0, 0))
        .train(&series)
        .unwrap();

    let phi = trained.ar_coefficients()[0];
    assert!((phi - 0.6).abs() < 0.15, "phi = {}", phi);
    let mean = trained.mean().unwrap();
    assert!((mean - 10.0).abs() < 0.5, "mean = {}", mean);
    assert!((trained.sigma2() - 1.0).abs() < 0.3);
    assert_eq!(trained.frequency(), Frequency::Daily);
}

#[test]
fn test_differenced_model_has_no_mean() {
    let series = daily_series(end_of_data(), demand_like(60));
    let trained = ArimaModel::new(ArimaOrder::new(2, 1, 0))
        .train(&series)
        .unwrap();

    assert_eq!(trained.mean(), None);
    let summary = trained.summary();
    assert_eq!(summary.name, "ARIMA(2,1,0)");
    assert_eq!(summary.ar_coefficients.len(), 2);
    assert!(summary.ma_coefficients.is_empty());
    assert_eq!(summary.observations, 60);
    assert_eq!(summary.frequency, "daily");
}

#[test]
fn test_arma_with_moving_average_term() {
    let values: Vec<f64> = (0..60)
        .map(|i| {
            let t = i as f64;
            20000.0 + 800.0 * (2.0 * std::f64::consts::PI * t / 7.0).sin() + 30.0 * t
        })
        .collect();
    let series = daily_series(end_of_data(), values);
    let trained = ArimaModel::new(ArimaOrder::new(2, 0, 1))
        .train(&series)
        .unwrap();

    assert!(trained.ma_coefficients()[0].abs() < 1.0);
    assert!(trained.mean().is_some());
    assert_eq!(trained.forecast(7).unwrap().horizon(), 7);
}

#[test]
fn test_minimum_length_series_fits() {
    let series = daily_series(end_of_data(), demand_like(12));
    assert!(forecast(&series, ArimaOrder::new(5, 1, 0), 3).is_ok());
}

#[rstest]
#[case(ArimaOrder::new(5, 1, 0), 11)]
#[case(ArimaOrder::new(1, 0, 1), 4)]
#[case(ArimaOrder::new(2, 2, 0), 6)]
fn test_insufficient_data(#[case] order: ArimaOrder, #[case] len: usize) {
    let series = daily_series(end_of_data(), demand_like(len));
    let error = ArimaModel::new(order).train(&series).unwrap_err();

    assert!(matches!(error, ForecastError::ModelFit(_)));
    assert!(error.to_string().contains("Insufficient data"));
}

#[test]
fn test_non_finite_values_rejected() {
    let mut values = demand_like(30);
    values[10] = f64::NAN;
    let series = daily_series(end_of_data(), values);

    let result = forecast(&series, ArimaOrder::new(1, 1, 0), 5);
    assert!(matches!(result, Err(ForecastError::ModelFit(_))));
}

#[rstest]
#[case(0, 0.95)]
#[case(5, 0.0)]
#[case(5, 1.0)]
fn test_invalid_forecast_arguments(#[case] horizon: usize, #[case] level: f64) {
    let series = daily_series(end_of_data(), demand_like(40));
    let result = forecast_with_level(&series, ArimaOrder::new(1, 1, 0), horizon, level);
    assert!(matches!(result, Err(ForecastError::InvalidParameter(_))));
}

#[test]
fn test_optimizer_budget_exhausted() {
    let series = daily_series(end_of_data(), demand_like(100));
    let model = ArimaModel::new(ArimaOrder::new(5, 1, 0))
        .with_optimizer(1, 1e-12)
        .unwrap();

    let error = model.train(&series).unwrap_err();
    assert!(matches!(error, ForecastError::ModelFit(_)));
    assert!(error.to_string().contains("converge"));
}
