//! Chart descriptions
//!
//! Each builder is a pure function of the dataset (and the control value)
//! returning a renderer-agnostic description: title, axis titles and traces
//! of points. Any front end can draw them.

use bike_forecast::data::{day_name, Covariate, Dataset, TimeSeries};
use bike_forecast::ForecastResult;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Marker colour of the climate scatter
pub const SCATTER_COLOR: &str = "#ba69cf";
/// Forecast line colour
pub const FORECAST_COLOR: &str = "red";
/// Fill of the confidence band
pub const BAND_COLOR: &str = "rgba(255, 182, 193, 0.3)";

const DEMAND_TITLE: &str = "Bike demand";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: String,
}

impl Axis {
    fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Line,
    Bar,
    Scatter,
    /// Closed polygon filled between two bounds
    Band,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TraceMode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "lines+markers")]
    LinesMarkers,
}

/// Horizontal coordinate of a point
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XValue {
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub x: XValue,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub kind: TraceKind,
    pub mode: TraceMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDescription {
    pub title: String,
    pub x_axis: Axis,
    pub y_axis: Axis,
    pub traces: Vec<Trace>,
}

/// Total rentals per season, one bar trace per season
pub fn season_histogram(dataset: &Dataset) -> ChartDescription {
    let traces = dataset
        .season_totals()
        .into_iter()
        .map(|(season, total)| Trace {
            name: season.label().to_string(),
            kind: TraceKind::Bar,
            mode: TraceMode::Markers,
            color: Some(season.color().to_string()),
            points: vec![ChartPoint {
                x: XValue::Text(season.label().to_string()),
                y: total,
                label: Some(format!("{}", total)),
            }],
        })
        .collect();

    ChartDescription {
        title: "Bike demand per season".to_string(),
        x_axis: Axis::titled("Season"),
        y_axis: Axis::titled(DEMAND_TITLE),
        traces,
    }
}

/// Rentals per hour on `date`, or on the earliest date when none is given.
///
/// Dates outside the dataset's range are rejected.
pub fn hourly_demand(dataset: &Dataset, date: Option<NaiveDate>) -> AppResult<ChartDescription> {
    let (first, last) = dataset.date_range();
    let date = date.unwrap_or(first);
    if !dataset.covers(date) {
        return Err(AppError::Validation(format!(
            "Date {} is outside the dataset range {} to {}",
            date, first, last
        )));
    }

    let points = dataset
        .records_on(date)
        .into_iter()
        .map(|record| ChartPoint {
            x: XValue::Number(f64::from(record.hour)),
            y: record.rented_bike_count,
            label: None,
        })
        .collect();

    Ok(ChartDescription {
        title: format!("Rented bikes per hour on {}", date),
        x_axis: Axis::titled("Hour"),
        y_axis: Axis::titled(DEMAND_TITLE),
        traces: vec![Trace {
            name: day_name(date).to_string(),
            kind: TraceKind::Line,
            mode: TraceMode::LinesMarkers,
            color: None,
            points,
        }],
    })
}

/// Demand against a weather covariate, each point labelled with its date
pub fn climate_scatter(dataset: &Dataset, covariate: Covariate) -> ChartDescription {
    let points = dataset
        .covariate_points(covariate)
        .into_iter()
        .map(|point| ChartPoint {
            x: XValue::Number(point.value),
            y: point.rented_bike_count,
            label: Some(point.date.to_string()),
        })
        .collect();

    ChartDescription {
        title: format!("Bike demand vs {}", covariate.label()),
        x_axis: Axis::titled(covariate.label()),
        y_axis: Axis::titled(DEMAND_TITLE),
        traces: vec![Trace {
            name: covariate.label().to_string(),
            kind: TraceKind::Scatter,
            mode: TraceMode::Markers,
            color: Some(SCATTER_COLOR.to_string()),
            points,
        }],
    }
}

/// Observed series, forecast line and the confidence band as a closed polygon
pub fn forecast_chart(series: &TimeSeries, forecast: &ForecastResult) -> ChartDescription {
    let actual = series
        .timestamps()
        .iter()
        .zip(series.values())
        .map(|(ts, value)| ChartPoint {
            x: XValue::Date(*ts),
            y: *value,
            label: None,
        })
        .collect();

    let projected = forecast
        .points()
        .iter()
        .map(|p| ChartPoint {
            x: XValue::Date(p.timestamp),
            y: p.value,
            label: None,
        })
        .collect();

    // Forward along the lower bound, back along the upper one
    let band = forecast
        .points()
        .iter()
        .map(|p| (p.timestamp, p.lower))
        .chain(forecast.points().iter().rev().map(|p| (p.timestamp, p.upper)))
        .map(|(ts, y)| ChartPoint {
            x: XValue::Date(ts),
            y,
            label: None,
        })
        .collect();

    ChartDescription {
        title: "Bike demand forecast with ARIMA".to_string(),
        x_axis: Axis::titled("Date"),
        y_axis: Axis::titled(DEMAND_TITLE),
        traces: vec![
            Trace {
                name: "Actual".to_string(),
                kind: TraceKind::Line,
                mode: TraceMode::Lines,
                color: None,
                points: actual,
            },
            Trace {
                name: "Forecast".to_string(),
                kind: TraceKind::Line,
                mode: TraceMode::Lines,
                color: Some(FORECAST_COLOR.to_string()),
                points: projected,
            },
            Trace {
                name: format!("{:.0}% confidence band", forecast.confidence_level() * 100.0),
                kind: TraceKind::Band,
                mode: TraceMode::Lines,
                color: Some(BAND_COLOR.to_string()),
                points: band,
            },
        ],
    }
}
