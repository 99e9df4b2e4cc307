use std::{collections::BTreeMap, fmt, str::FromStr};

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Echo of the request as the provider understood it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestInfo {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub name: String,
    #[serde(default)]
    pub country: String,
    /// Provider-local time, `yyyy-MM-dd HH:mm`.
    #[serde(default)]
    pub localtime: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
    #[serde(default)]
    pub timezone_id: Option<String>,
    #[serde(default)]
    pub localtime_epoch: Option<i64>,
    #[serde(default)]
    pub utc_offset: Option<String>,
}

impl LocationInfo {
    /// The `HH:mm` part of the local time, if the provider sent one.
    pub fn local_clock(&self) -> Option<&str> {
        self.localtime.as_deref()?.split_once(' ').map(|(_, time)| time)
    }
}

/// Current conditions, in the provider's configured units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: i32,
    pub feelslike: i32,
    pub humidity: u8,
    pub wind_speed: f64,
    pub wind_dir: String,
    #[serde(default)]
    pub weather_descriptions: Vec<String>,
    #[serde(default)]
    pub weather_icons: Vec<String>,
    #[serde(default)]
    pub observation_time: Option<String>,
    #[serde(default)]
    pub weather_code: Option<i32>,
    #[serde(default)]
    pub wind_degree: Option<i32>,
    #[serde(default)]
    pub pressure: Option<f64>,
    #[serde(default)]
    pub precip: Option<f64>,
    #[serde(default)]
    pub cloudcover: Option<u8>,
    #[serde(default)]
    pub uv_index: Option<i32>,
    #[serde(default)]
    pub visibility: Option<f64>,
    #[serde(default)]
    pub is_day: Option<String>,
}

impl CurrentConditions {
    pub fn description(&self) -> Option<&str> {
        self.weather_descriptions.first().map(String::as_str)
    }

    pub fn icon(&self) -> Option<&str> {
        self.weather_icons.first().map(String::as_str)
    }
}

/// Result of one successful `/current` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    #[serde(default)]
    pub request: Option<RequestInfo>,
    pub location: LocationInfo,
    pub current: CurrentConditions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalQuery {
    pub city: String,
    /// `yyyy-MM-dd`; passed through as-is, the provider validates it.
    pub date: String,
    pub hourly: bool,
}

impl HistoricalQuery {
    pub fn new(city: impl Into<String>, date: impl Into<String>) -> Self {
        Self { city: city.into(), date: date.into(), hourly: true }
    }

    pub fn on(city: impl Into<String>, date: NaiveDate) -> Self {
        Self::new(city, date.format("%Y-%m-%d").to_string())
    }

    pub fn daily_only(mut self) -> Self {
        self.hourly = false;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Astro {
    #[serde(default)]
    pub sunrise: Option<String>,
    #[serde(default)]
    pub sunset: Option<String>,
    #[serde(default)]
    pub moonrise: Option<String>,
    #[serde(default)]
    pub moonset: Option<String>,
    #[serde(default)]
    pub moon_phase: Option<String>,
    #[serde(default)]
    pub moon_illumination: Option<i32>,
}

/// One hourly slot of a historical day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyConditions {
    /// Unpadded `HHMM`, as the provider encodes it (`"0"`, `"300"`, ... `"2100"`).
    pub time: String,
    pub temperature: i32,
    #[serde(default)]
    pub feelslike: Option<i32>,
    #[serde(default)]
    pub humidity: Option<u8>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub wind_dir: Option<String>,
    #[serde(default)]
    pub weather_descriptions: Vec<String>,
    #[serde(default)]
    pub weather_icons: Vec<String>,
    #[serde(default)]
    pub precip: Option<f64>,
    #[serde(default)]
    pub chanceofrain: Option<i32>,
}

impl HourlyConditions {
    /// `"900"` becomes `"09:00"`.
    pub fn clock(&self) -> String {
        match self.time.parse::<u32>() {
            Ok(hhmm) => format!("{:02}:{:02}", hhmm / 100, hhmm % 100),
            Err(_) => self.time.clone(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        self.weather_descriptions.first().map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalDay {
    pub date: String,
    #[serde(default)]
    pub date_epoch: Option<i64>,
    #[serde(default)]
    pub astro: Option<Astro>,
    #[serde(default)]
    pub mintemp: Option<i32>,
    #[serde(default)]
    pub maxtemp: Option<i32>,
    #[serde(default)]
    pub avgtemp: Option<i32>,
    #[serde(default)]
    pub totalsnow: Option<f64>,
    #[serde(default)]
    pub sunhour: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<i32>,
    #[serde(default)]
    pub hourly: Vec<HourlyConditions>,
}

/// Result of one successful `/historical` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSnapshot {
    #[serde(default)]
    pub request: Option<RequestInfo>,
    pub location: LocationInfo,
    #[serde(default)]
    pub current: Option<CurrentConditions>,
    #[serde(default)]
    pub historical: BTreeMap<String, HistoricalDay>,
}

/// Coordinates for a `/marine` query, sent as `"lat,lon"`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarineQuery {
    pub latitude: f64,
    pub longitude: f64,
}

impl MarineQuery {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for MarineQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for MarineQuery {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("Coordinates must look like \"lat,lon\", got '{s}'"))?;

        let latitude = lat
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid latitude '{}'", lat.trim()))?;
        let longitude = lon
            .trim()
            .parse::<f64>()
            .with_context(|| format!("Invalid longitude '{}'", lon.trim()))?;

        Ok(Self { latitude, longitude })
    }
}

// The marine schema varies by plan, so only the fields the dashboard reads are
// typed and everything else is kept verbatim.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineHour {
    pub time: String,
    #[serde(default)]
    pub temperature: Option<i32>,
    #[serde(default)]
    pub water_temperature: Option<f64>,
    #[serde(default)]
    pub swell_height: Option<f64>,
    #[serde(default)]
    pub swell_direction: Option<String>,
    #[serde(default)]
    pub swell_period: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
    #[serde(default)]
    pub wind_dir: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineDay {
    pub date: String,
    #[serde(default)]
    pub astro: Option<Astro>,
    #[serde(default)]
    pub mintemp: Option<i32>,
    #[serde(default)]
    pub maxtemp: Option<i32>,
    #[serde(default)]
    pub hourly: Vec<MarineHour>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of one successful `/marine` query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarineSnapshot {
    #[serde(default)]
    pub request: Option<RequestInfo>,
    #[serde(default)]
    pub location: Option<Value>,
    #[serde(default)]
    pub forecast: BTreeMap<String, MarineDay>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
