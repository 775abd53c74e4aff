use std::path::PathBuf;
use std::str::FromStr;

use bike_forecast::ArimaOrder;

/// Configuration could not be read from the environment.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Service configuration loaded from environment variables.
///
/// All fields have defaults matching the published dataset and the
/// ARIMA(5,1,0) / 50-day forecast the dashboard was designed around.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8050`).
    pub port: u16,
    /// Path of the hourly CSV file.
    pub data_path: PathBuf,
    /// ARIMA order fitted to daily totals.
    pub order: ArimaOrder,
    /// Days to forecast.
    pub horizon: usize,
    /// Confidence level of the forecast band, in (0, 1).
    pub confidence_level: f64,
    /// Trailing days held out to score the order; 0 disables scoring.
    pub holdout: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8050,
            data_path: PathBuf::from("data/SeoulBikeData.csv"),
            order: ArimaOrder::new(5, 1, 0),
            horizon: 50,
            confidence_level: 0.95,
            holdout: 14,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var               | Default                  |
    /// |-----------------------|--------------------------|
    /// | `HOST`                | `0.0.0.0`                |
    /// | `PORT`                | `8050`                   |
    /// | `BIKE_DATA_PATH`      | `data/SeoulBikeData.csv` |
    /// | `FORECAST_ORDER`      | `5,1,0`                  |
    /// | `FORECAST_HORIZON`    | `50`                     |
    /// | `FORECAST_CONFIDENCE` | `0.95`                   |
    /// | `FORECAST_HOLDOUT`    | `14`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or(defaults.host);
        let port = parse_var(&lookup, "PORT", defaults.port)?;
        let data_path = lookup("BIKE_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_path);
        let order = parse_var(&lookup, "FORECAST_ORDER", defaults.order)?;
        let horizon: usize = parse_var(&lookup, "FORECAST_HORIZON", defaults.horizon)?;
        let confidence_level: f64 =
            parse_var(&lookup, "FORECAST_CONFIDENCE", defaults.confidence_level)?;
        let holdout = parse_var(&lookup, "FORECAST_HOLDOUT", defaults.holdout)?;

        if horizon == 0 {
            return Err(invalid("FORECAST_HORIZON", "0", "must be at least 1"));
        }
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(invalid(
                "FORECAST_CONFIDENCE",
                &confidence_level.to_string(),
                "must lie strictly between 0 and 1",
            ));
        }

        Ok(Self {
            host,
            port,
            data_path,
            order,
            horizon,
            confidence_level,
            holdout,
        })
    }
}

fn invalid(var: &'static str, value: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_var<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e: T::Err| invalid(var, &raw, &e.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = DashboardConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.port, 8050);
        assert_eq!(config.order, ArimaOrder::new(5, 1, 0));
    }

    #[test]
    fn overrides_are_parsed() {
        let config = DashboardConfig::from_lookup(lookup_from(&[
            ("PORT", "9000"),
            ("FORECAST_ORDER", "(2,0,1)"),
            ("FORECAST_HORIZON", "7"),
            ("FORECAST_CONFIDENCE", "0.8"),
            ("FORECAST_HOLDOUT", "0"),
            ("BIKE_DATA_PATH", "/tmp/bikes.csv"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.order, ArimaOrder::new(2, 0, 1));
        assert_eq!(config.horizon, 7);
        assert_eq!(config.confidence_level, 0.8);
        assert_eq!(config.holdout, 0);
        assert_eq!(config.data_path, PathBuf::from("/tmp/bikes.csv"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cases = [
            ("PORT", "eighty"),
            ("FORECAST_ORDER", "5,1"),
            ("FORECAST_HORIZON", "0"),
            ("FORECAST_HORIZON", "-3"),
            ("FORECAST_CONFIDENCE", "1.2"),
        ];
        for (var, value) in cases {
            let result = DashboardConfig::from_lookup(lookup_from(&[(var, value)]));
            match result {
                Err(ConfigError::Invalid { var: reported, .. }) => assert_eq!(reported, var),
                Ok(_) => panic!("{var}={value} should be rejected"),
            }
        }
    }
}
