//! Bike-rental dataset and time series handling

use crate::error::{ForecastError, Result};
use crate::utils::{infer_frequency, is_regular, Frequency};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Date layouts found in the published files: the raw export uses
/// day/month/year, the cleaned export ISO dates.
const DATE_FORMATS: [&str; 2] = ["%d/%m/%Y", "%Y-%m-%d"];

/// Season of the year as recorded in the `Seasons` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Autumn,
    Spring,
    Summer,
    Winter,
}

impl Season {
    /// Display order used by the charts
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    /// Numeric code used by the cleaned dataset: 0 Autumn, 1 Spring, 2 Summer, 3 Winter
    pub fn from_code(code: u8) -> Option<Season> {
        match code {
            0 => Some(Season::Autumn),
            1 => Some(Season::Spring),
            2 => Some(Season::Summer),
            3 => Some(Season::Winter),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Season::Autumn => 0,
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Winter => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Autumn => "Autumn",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Winter => "Winter",
        }
    }

    /// Chart colour for the season
    pub fn color(self) -> &'static str {
        match self {
            Season::Spring => "hotpink",
            Season::Summer => "palegreen",
            Season::Autumn => "darkorange",
            Season::Winter => "lightskyblue",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Season {
    type Err = ForecastError;

    /// Accepts either the label (any case) or the numeric code
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            return Season::from_code(code).ok_or_else(|| {
                ForecastError::Validation(format!("Unknown season code: {}", code))
            });
        }
        Season::ALL
            .into_iter()
            .find(|season| season.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ForecastError::Validation(format!("Unknown season: {}", trimmed)))
    }
}

/// Weather covariates that can be plotted against demand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Covariate {
    Temperature,
    Humidity,
    #[default]
    WindSpeed,
    Visibility,
    SolarRadiation,
}

impl Covariate {
    pub const ALL: [Covariate; 5] = [
        Covariate::Temperature,
        Covariate::Humidity,
        Covariate::WindSpeed,
        Covariate::Visibility,
        Covariate::SolarRadiation,
    ];

    /// Column name in the CSV file
    pub fn column(self) -> &'static str {
        match self {
            Covariate::Temperature => "Temperature(C)",
            Covariate::Humidity => "Humidity(%)",
            Covariate::WindSpeed => "Wind speed (m/s)",
            Covariate::Visibility => "Visibility (10m)",
            Covariate::SolarRadiation => "Solar Radiation (MJ/m2)",
        }
    }

    /// Stable identifier used in query strings
    pub fn key(self) -> &'static str {
        match self {
            Covariate::Temperature => "temperature",
            Covariate::Humidity => "humidity",
            Covariate::WindSpeed => "wind_speed",
            Covariate::Visibility => "visibility",
            Covariate::SolarRadiation => "solar_radiation",
        }
    }

    /// Human readable axis label
    pub fn label(self) -> &'static str {
        match self {
            Covariate::Temperature => "Temperature (C)",
            Covariate::Humidity => "Humidity (%)",
            Covariate::WindSpeed => "Wind speed (m/s)",
            Covariate::Visibility => "Visibility (10m)",
            Covariate::SolarRadiation => "Solar radiation (MJ/m2)",
        }
    }

    /// Read the covariate from a record
    pub fn value(self, record: &BikeRecord) -> f64 {
        match self {
            Covariate::Temperature => record.temperature,
            Covariate::Humidity => record.humidity,
            Covariate::WindSpeed => record.wind_speed,
            Covariate::Visibility => record.visibility,
            Covariate::SolarRadiation => record.solar_radiation,
        }
    }
}

impl FromStr for Covariate {
    type Err = ForecastError;

    /// Accepts the query key or the CSV column name
    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        Covariate::ALL
            .into_iter()
            .find(|c| c.key() == trimmed || c.column() == trimmed)
            .ok_or_else(|| ForecastError::Validation(format!("Unknown covariate: {}", trimmed)))
    }
}

/// One hourly row of the bike-rental dataset
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BikeRecord {
    #[serde(rename = "Date", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "Rented Bike Count")]
    pub rented_bike_count: f64,
    #[serde(rename = "Hour")]
    pub hour: u32,
    #[serde(rename = "Temperature(C)", alias = "Temperature(°C)")]
    pub temperature: f64,
    #[serde(rename = "Humidity(%)")]
    pub humidity: f64,
    #[serde(rename = "Wind speed (m/s)")]
    pub wind_speed: f64,
    #[serde(rename = "Visibility (10m)")]
    pub visibility: f64,
    #[serde(
        rename = "Dew point temperature(C)",
        alias = "Dew point temperature(°C)",
        default
    )]
    pub dew_point: Option<f64>,
    #[serde(rename = "Solar Radiation (MJ/m2)")]
    pub solar_radiation: f64,
    #[serde(rename = "Rainfall(mm)", default)]
    pub rainfall: Option<f64>,
    #[serde(rename = "Snowfall (cm)", default)]
    pub snowfall: Option<f64>,
    #[serde(rename = "Seasons", deserialize_with = "deserialize_season")]
    pub season: Season,
    #[serde(rename = "Holiday", default)]
    pub holiday: Option<String>,
    #[serde(rename = "Functioning Day", default)]
    pub functioning_day: Option<String>,
}

impl BikeRecord {
    /// Weekday name of the record's date
    pub fn day_of_week(&self) -> &'static str {
        day_name(self.date)
    }
}

/// A covariate observation paired with demand
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CovariatePoint {
    pub value: f64,
    pub rented_bike_count: f64,
    pub date: NaiveDate,
}

/// English weekday name, e.g. `Monday`
pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parse a date in any of the layouts used by the dataset
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| ForecastError::Validation(format!("Unparseable date: {}", trimmed)))
}

fn deserialize_date<'de, D>(deserializer: D) -> std::result::Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).map_err(serde::de::Error::custom)
}

fn deserialize_season<'de, D>(deserializer: D) -> std::result::Result<Season, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    raw.parse().map_err(serde::de::Error::custom)
}

/// The full hourly dataset, read once and never mutated
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<BikeRecord>,
    first_date: NaiveDate,
    last_date: NaiveDate,
}

impl Dataset {
    /// Load the dataset from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            ForecastError::DataLoad(format!("Cannot open {}: {}", path.display(), e))
        })?;
        Self::from_reader(file)
    }

    /// Load the dataset from any CSV reader with a header row
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for (index, row) in csv_reader.deserialize::<BikeRecord>().enumerate() {
            // Header is line 1
            let record = row
                .map_err(|e| ForecastError::DataLoad(format!("Row {}: {}", index + 2, e)))?;
            records.push(record);
        }

        Self::from_records(records)
    }

    /// Build a dataset from already parsed records
    pub fn from_records(records: Vec<BikeRecord>) -> Result<Self> {
        if let Some(bad) = records.iter().find(|r| r.hour > 23) {
            return Err(ForecastError::DataLoad(format!(
                "Hour {} on {} is outside 0-23",
                bad.hour, bad.date
            )));
        }

        let first_date = records.iter().map(|r| r.date).min();
        let last_date = records.iter().map(|r| r.date).max();

        match (first_date, last_date) {
            (Some(first_date), Some(last_date)) => Ok(Self {
                records,
                first_date,
                last_date,
            }),
            _ => Err(ForecastError::DataLoad("Dataset has no rows".to_string())),
        }
    }

    pub fn records(&self) -> &[BikeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest date in the dataset
    pub fn date_range(&self) -> (NaiveDate, NaiveDate) {
        (self.first_date, self.last_date)
    }

    /// Whether `date` lies within the dataset's date range
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.first_date && date <= self.last_date
    }

    /// Rows recorded on `date`, ascending by hour
    pub fn records_on(&self, date: NaiveDate) -> Vec<&BikeRecord> {
        let mut rows: Vec<&BikeRecord> = self.records.iter().filter(|r| r.date == date).collect();
        rows.sort_by_key(|r| r.hour);
        rows
    }

    /// Total rentals per season, in [`Season::ALL`] order.
    ///
    /// Seasons without rows are reported with a zero total.
    pub fn season_totals(&self) -> Vec<(Season, f64)> {
        let mut totals: BTreeMap<Season, f64> = BTreeMap::new();
        for record in &self.records {
            *totals.entry(record.season).or_insert(0.0) += record.rented_bike_count;
        }
        Season::ALL
            .into_iter()
            .map(|season| (season, totals.get(&season).copied().unwrap_or(0.0)))
            .collect()
    }

    /// Every row as a (covariate, demand, date) triple, in file order
    pub fn covariate_points(&self, covariate: Covariate) -> Vec<CovariatePoint> {
        self.records
            .iter()
            .map(|r| CovariatePoint {
                value: covariate.value(r),
                rented_bike_count: r.rented_bike_count,
                date: r.date,
            })
            .collect()
    }

    /// Daily rental totals, one observation per date present in the data.
    ///
    /// Dates missing from the file are not filled in.
    pub fn daily_totals(&self) -> Result<TimeSeries> {
        let mut totals: BTreeMap<NaiveDate, f64> = BTreeMap::new();
        for record in &self.records {
            *totals.entry(record.date).or_insert(0.0) += record.rented_bike_count;
        }
        let (dates, values): (Vec<NaiveDate>, Vec<f64>) = totals.into_iter().unzip();
        TimeSeries::from_dates(dates, values)
    }
}

/// Ordered univariate series with one value per period
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    timestamps: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    /// Create a series; timestamps must be strictly increasing and match
    /// the values one to one
    pub fn new(timestamps: Vec<NaiveDateTime>, values: Vec<f64>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(ForecastError::Validation(format!(
                "Timestamps length ({}) doesn't match values length ({})",
                timestamps.len(),
                values.len()
            )));
        }
        if timestamps.is_empty() {
            return Err(ForecastError::Validation("Empty time series".to_string()));
        }
        if let Some(pair) = timestamps.windows(2).find(|w| w[1] <= w[0]) {
            return Err(ForecastError::Validation(format!(
                "Timestamps must be strictly increasing: {} is followed by {}",
                pair[0], pair[1]
            )));
        }

        Ok(Self { timestamps, values })
    }

    /// Create a daily series from calendar dates (midnight timestamps)
    pub fn from_dates(dates: Vec<NaiveDate>, values: Vec<f64>) -> Result<Self> {
        let timestamps = dates
            .into_iter()
            .map(|d| NaiveDateTime::new(d, chrono::NaiveTime::default()))
            .collect();
        Self::new(timestamps, values)
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Timestamp of the last observation
    pub fn last_timestamp(&self) -> Option<NaiveDateTime> {
        self.timestamps.last().copied()
    }

    /// Inferred period granularity
    pub fn frequency(&self) -> Result<Frequency> {
        infer_frequency(&self.timestamps)
    }

    /// True when every step matches the inferred frequency.
    ///
    /// Single observations count as regular.
    pub fn is_regular(&self) -> bool {
        match self.frequency() {
            Ok(frequency) => is_regular(&self.timestamps, frequency),
            Err(_) => self.len() < 2,
        }
    }

    /// Observations in `start..end`
    pub fn slice(&self, start: usize, end: usize) -> Result<Self> {
        if start >= end || end > self.len() {
            return Err(ForecastError::InvalidParameter(format!(
                "Invalid slice {}..{} of a series with {} observations",
                start,
                end,
                self.len()
            )));
        }
        Ok(Self {
            timestamps: self.timestamps[start..end].to_vec(),
            values: self.values[start..end].to_vec(),
        })
    }
}
