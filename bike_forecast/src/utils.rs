//! Utility functions for the bike_forecast crate

use crate::data::TimeSeries;
use crate::error::{ForecastError, Result};
use chrono::{Datelike, Duration, Months, NaiveDateTime};
use std::collections::HashMap;

/// Spacing between consecutive observations of a series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Hourly,
    Daily,
    Weekly,
    /// Calendar months, clamped to the last day of shorter months
    Monthly,
    /// Any other fixed step
    Custom(Duration),
}

impl Frequency {
    /// Classify a fixed step
    pub fn from_step(step: Duration) -> Self {
        if step == Duration::hours(1) {
            Frequency::Hourly
        } else if step == Duration::days(1) {
            Frequency::Daily
        } else if step == Duration::weeks(1) {
            Frequency::Weekly
        } else {
            Frequency::Custom(step)
        }
    }

    /// The timestamp `periods` steps after `from`
    pub fn advance(&self, from: NaiveDateTime, periods: u32) -> Result<NaiveDateTime> {
        let advanced = match self {
            Frequency::Hourly => from.checked_add_signed(Duration::hours(periods as i64)),
            Frequency::Daily => from.checked_add_signed(Duration::days(periods as i64)),
            Frequency::Weekly => from.checked_add_signed(Duration::weeks(periods as i64)),
            Frequency::Monthly => from.checked_add_months(Months::new(periods)),
            Frequency::Custom(step) => step
                .num_seconds()
                .checked_mul(periods as i64)
                .and_then(|seconds| from.checked_add_signed(Duration::seconds(seconds))),
        };

        advanced.ok_or_else(|| {
            ForecastError::Validation(format!(
                "Timestamp overflow advancing {} by {} periods",
                from, periods
            ))
        })
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Frequency::Hourly => write!(f, "hourly"),
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
            Frequency::Monthly => write!(f, "monthly"),
            Frequency::Custom(step) => write!(f, "every {}s", step.num_seconds()),
        }
    }
}

fn is_month_end(ts: NaiveDateTime) -> bool {
    ts.date()
        .succ_opt()
        .map(|next| next.month() != ts.month())
        .unwrap_or(true)
}

/// Whole calendar months from `from` to `to`, if `to` lies on a month
/// boundary of `from`. Month-end dates stay on month ends.
fn calendar_months_between(from: NaiveDateTime, to: NaiveDateTime) -> Option<u32> {
    let months = (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32;
    let months = u32::try_from(months).ok().filter(|m| *m > 0)?;

    if from.checked_add_months(Months::new(months)) == Some(to) {
        return Some(months);
    }
    let month_end_pair = is_month_end(from) && is_month_end(to) && from.time() == to.time();
    month_end_pair.then_some(months)
}

/// Every timestamp sits `i` calendar months after the first
fn is_monthly_run(timestamps: &[NaiveDateTime]) -> bool {
    let anchored = timestamps.iter().enumerate().skip(1).all(|(i, ts)| {
        u32::try_from(i)
            .ok()
            .and_then(|i| timestamps[0].checked_add_months(Months::new(i)))
            == Some(*ts)
    });
    anchored
        || timestamps
            .windows(2)
            .all(|w| calendar_months_between(w[0], w[1]) == Some(1))
}

/// Infer the period granularity of ordered timestamps.
///
/// Series that step by calendar months are monthly. Otherwise the most
/// common fixed step between consecutive timestamps wins; ties go to the
/// shorter step. A fixed 28 or 30 day step is a custom frequency.
pub fn infer_frequency(timestamps: &[NaiveDateTime]) -> Result<Frequency> {
    if timestamps.len() < 2 {
        return Err(ForecastError::Validation(
            "At least two timestamps are needed to infer a frequency".to_string(),
        ));
    }

    if is_monthly_run(timestamps) {
        return Ok(Frequency::Monthly);
    }

    let steps: Vec<Duration> = timestamps.windows(2).map(|w| w[1] - w[0]).collect();

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for step in &steps {
        *counts.entry(step.num_seconds()).or_insert(0) += 1;
    }

    let (seconds, _) = counts
        .into_iter()
        .max_by(|(sa, ca), (sb, cb)| ca.cmp(cb).then(sb.cmp(sa)))
        .ok_or_else(|| ForecastError::Validation("No steps between timestamps".to_string()))?;

    Ok(Frequency::from_step(Duration::seconds(seconds)))
}

/// Whether every step between timestamps matches `frequency`
pub fn is_regular(timestamps: &[NaiveDateTime], frequency: Frequency) -> bool {
    match frequency {
        Frequency::Monthly => is_monthly_run(timestamps),
        other => timestamps
            .windows(2)
            .all(|w| other.advance(w[0], 1).map(|next| next == w[1]).unwrap_or(false)),
    }
}

/// Create future timestamps for forecasting.
///
/// The first timestamp is one period after `last_timestamp`; the rest follow
/// contiguously.
pub fn future_timestamps(
    last_timestamp: NaiveDateTime,
    horizon: usize,
    frequency: Frequency,
) -> Result<Vec<NaiveDateTime>> {
    (1..=horizon)
        .map(|step| {
            let step = u32::try_from(step).map_err(|_| {
                ForecastError::InvalidParameter(format!("Horizon {} is too large", horizon))
            })?;
            frequency.advance(last_timestamp, step)
        })
        .collect()
}

/// Split a series into a training head and a hold-out tail of `holdout`
/// observations
pub fn split_holdout(series: &TimeSeries, holdout: usize) -> Result<(TimeSeries, TimeSeries)> {
    if holdout == 0 || holdout >= series.len() {
        return Err(ForecastError::InvalidParameter(format!(
            "Hold-out of {} observations does not fit a series of length {}",
            holdout,
            series.len()
        )));
    }

    let cut = series.len() - holdout;
    Ok((series.slice(0, cut)?, series.slice(cut, series.len())?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_infer_daily_with_gap() {
        let ts = vec![at(2018, 1, 1, 0), at(2018, 1, 2, 0), at(2018, 1, 3, 0), at(2018, 1, 6, 0)];
        assert_eq!(infer_frequency(&ts).unwrap(), Frequency::Daily);
        assert!(!is_regular(&ts, Frequency::Daily));
        assert!(is_regular(&ts[..3], Frequency::Daily));
    }

    #[test]
    fn test_infer_hourly_and_monthly() {
        let hourly = vec![at(2018, 1, 1, 0), at(2018, 1, 1, 1), at(2018, 1, 1, 2)];
        assert_eq!(infer_frequency(&hourly).unwrap(), Frequency::Hourly);

        let monthly = vec![at(2018, 1, 31, 0), at(2018, 2, 28, 0), at(2018, 3, 28, 0)];
        assert_eq!(infer_frequency(&monthly).unwrap(), Frequency::Monthly);
    }

    #[test]
    fn test_fixed_four_week_step_is_custom() {
        let ts: Vec<NaiveDateTime> = (0..6)
            .map(|i| at(2018, 1, 1, 0) + Duration::days(28 * i))
            .collect();
        let freq = infer_frequency(&ts).unwrap();
        assert_eq!(freq, Frequency::Custom(Duration::days(28)));
        assert!(is_regular(&ts, freq));

        let future = future_timestamps(*ts.last().unwrap(), 2, freq).unwrap();
        assert_eq!(future[0], *ts.last().unwrap() + Duration::days(28));
        assert_eq!(future[1], *ts.last().unwrap() + Duration::days(56));
    }

    #[test]
    fn test_fixed_thirty_day_step_is_custom() {
        let ts = vec![at(2018, 1, 1, 0), at(2018, 1, 31, 0), at(2018, 3, 2, 0)];
        assert_eq!(
            infer_frequency(&ts).unwrap(),
            Frequency::Custom(Duration::days(30))
        );
        assert!(!is_regular(&ts, Frequency::Monthly));
    }

    #[test]
    fn test_month_end_series_is_regular() {
        let ts = vec![
            at(2018, 1, 31, 0),
            at(2018, 2, 28, 0),
            at(2018, 3, 31, 0),
            at(2018, 4, 30, 0),
        ];
        assert_eq!(infer_frequency(&ts).unwrap(), Frequency::Monthly);
        assert!(is_regular(&ts, Frequency::Monthly));

        let skipped = vec![at(2018, 1, 31, 0), at(2018, 2, 28, 0), at(2018, 4, 30, 0)];
        assert!(!is_regular(&skipped, Frequency::Monthly));
    }

    #[test]
    fn test_infer_requires_two_points() {
        assert!(infer_frequency(&[at(2018, 1, 1, 0)]).is_err());
    }

    #[test]
    fn test_future_timestamps_cross_year() {
        let ts = future_timestamps(at(2018, 12, 30, 0), 3, Frequency::Daily).unwrap();
        assert_eq!(ts, vec![at(2018, 12, 31, 0), at(2019, 1, 1, 0), at(2019, 1, 2, 0)]);
    }

    #[test]
    fn test_future_monthly_keeps_day_where_possible() {
        let ts = future_timestamps(at(2018, 1, 31, 0), 3, Frequency::Monthly).unwrap();
        assert_eq!(ts, vec![at(2018, 2, 28, 0), at(2018, 3, 31, 0), at(2018, 4, 30, 0)]);
    }

    #[test]
    fn test_custom_step() {
        let freq = Frequency::from_step(Duration::minutes(15));
        assert_eq!(freq, Frequency::Custom(Duration::minutes(15)));
        let ts = future_timestamps(at(2018, 1, 1, 0), 2, freq).unwrap();
        assert_eq!(ts[1], at(2018, 1, 1, 0) + Duration::minutes(30));
    }
}
