use approx::assert_abs_diff_eq;
use bike_forecast::data::TimeSeries;
use bike_forecast::metrics::{forecast_accuracy, holdout_accuracy};
use bike_forecast::models::arima::{ArimaModel, ArimaOrder};
use bike_forecast::utils::split_holdout;
use chrono::{Duration, NaiveDate};

fn trending_series(len: usize) -> TimeSeries {
    let start = NaiveDate::from_ymd_opt(2018, 1, 1).unwrap();
    let dates = (0..len as i64).map(|i| start + Duration::days(i)).collect();
    let values = (0..len)
        .map(|i| 500.0 + 8.0 * i as f64 + 40.0 * (0.8 * i as f64).sin())
        .collect();
    TimeSeries::from_dates(dates, values).unwrap()
}

#[test]
fn test_perfect_forecast() {
    let actual = [10.0, 20.0, 30.0];
    let accuracy = forecast_accuracy(&actual, &actual).unwrap();

    assert_abs_diff_eq!(accuracy.mae, 0.0);
    assert_abs_diff_eq!(accuracy.rmse, 0.0);
    assert_abs_diff_eq!(accuracy.mape, 0.0);
    assert_abs_diff_eq!(accuracy.smape, 0.0);
}

#[test]
fn test_rmse_penalises_large_errors() {
    let accuracy = forecast_accuracy(&[0.0, 0.0, 0.0, 0.0], &[1.0, 1.0, 1.0, 5.0]).unwrap();
    assert_abs_diff_eq!(accuracy.mae, 2.0);
    assert_abs_diff_eq!(accuracy.mse, 7.0);
    assert!(accuracy.rmse > accuracy.mae);
}

#[test]
fn test_display() {
    let accuracy = forecast_accuracy(&[90.0], &[100.0]).unwrap();
    assert_eq!(
        accuracy.to_string(),
        "MAE 10.00, RMSE 10.00, MAPE 10.00%, SMAPE 10.53%"
    );
}

#[test]
fn test_split_holdout() {
    let series = trending_series(30);
    let (train, test) = split_holdout(&series, 7).unwrap();

    assert_eq!(train.len(), 23);
    assert_eq!(test.len(), 7);
    assert!(train.last_timestamp().unwrap() < test.timestamps()[0]);

    assert!(split_holdout(&series, 0).is_err());
    assert!(split_holdout(&series, 30).is_err());
}

#[test]
fn test_holdout_accuracy() {
    let series = trending_series(80);
    let model = ArimaModel::new(ArimaOrder::new(2, 1, 0));
    let accuracy = holdout_accuracy(&model, &series, 10).unwrap();

    assert!(accuracy.mae.is_finite() && accuracy.mae >= 0.0);
    assert!(accuracy.rmse >= accuracy.mae);
    assert!(accuracy.mape >= 0.0);
}

#[test]
fn test_holdout_leaves_too_little_training_data() {
    let series = trending_series(15);
    let model = ArimaModel::new(ArimaOrder::new(5, 1, 0));
    assert!(holdout_accuracy(&model, &series, 10).is_err());
}
