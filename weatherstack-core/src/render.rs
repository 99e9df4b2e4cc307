use std::fmt;

use crate::model::{HistoricalSnapshot, MarineSnapshot, WeatherSnapshot};

/// Display strings for the current-conditions card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentView {
    pub place: String,
    pub temperature: String,
    pub description: String,
    pub icon: Option<String>,
    pub wind: String,
    pub wind_dir: String,
    pub humidity: String,
    pub feels_like: String,
    pub local_time: Option<String>,
}

impl From<&WeatherSnapshot> for CurrentView {
    fn from(snapshot: &WeatherSnapshot) -> Self {
        let location = &snapshot.location;
        let current = &snapshot.current;

        let place = if location.country.is_empty() {
            location.name.clone()
        } else {
            format!("{}, {}", location.name, location.country)
        };

        Self {
            place,
            temperature: degrees(current.temperature),
            description: current.description().unwrap_or_default().to_string(),
            icon: current.icon().map(str::to_string),
            wind: format!("{} km/h", current.wind_speed),
            wind_dir: current.wind_dir.clone(),
            humidity: format!("{}%", current.humidity),
            feels_like: degrees(current.feelslike),
            local_time: location.local_clock().map(str::to_string),
        }
    }
}

impl fmt::Display for CurrentView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.place)?;
        writeln!(f, "  {}  {}", self.temperature, self.description)?;
        writeln!(f, "  Wind:       {} {}", self.wind, self.wind_dir)?;
        writeln!(f, "  Humidity:   {}", self.humidity)?;
        write!(f, "  Feels like: {}", self.feels_like)?;
        if let Some(time) = &self.local_time {
            write!(f, "\n  Local time: {time}")?;
        }
        Ok(())
    }
}

pub fn degrees(value: i32) -> String {
    format!("{value}°")
}

/// One line per day, followed by the hourly breakdown when present.
pub fn historical_lines(snapshot: &HistoricalSnapshot) -> Vec<String> {
    let mut lines = vec![format!("{}, {}", snapshot.location.name, snapshot.location.country)];

    for day in snapshot.historical.values() {
        let range = match (day.mintemp, day.maxtemp) {
            (Some(min), Some(max)) => format!("{} .. {}", degrees(min), degrees(max)),
            _ => "n/a".to_string(),
        };
        lines.push(format!("{}  {range}", day.date));

        for hour in &day.hourly {
            lines.push(format!(
                "  {}  {:>4}  {}",
                hour.clock(),
                degrees(hour.temperature),
                hour.description().unwrap_or_default()
            ));
        }
    }

    lines
}

pub fn marine_lines(snapshot: &MarineSnapshot) -> Vec<String> {
    let mut lines = Vec::new();

    for day in snapshot.forecast.values() {
        lines.push(day.date.clone());
        for hour in &day.hourly {
            let swell = hour
                .swell_height
                .map(|h| format!("swell {h} m"))
                .unwrap_or_else(|| "swell n/a".to_string());
            let water = hour
                .water_temperature
                .map(|t| format!("water {t}°"))
                .unwrap_or_else(|| "water n/a".to_string());
            lines.push(format!("  {:>4}  {swell}  {water}", hour.time));
        }
    }

    if lines.is_empty() {
        lines.push("No marine forecast in response".to_string());
    }
    lines
}
