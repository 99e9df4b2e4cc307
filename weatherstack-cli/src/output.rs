use anyhow::Context;
use serde::Serialize;
use weatherstack_core::{
    HistoricalSnapshot, MarineSnapshot, WeatherSnapshot,
    render::{self, CurrentView},
};

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize response")?;
    println!("{text}");
    Ok(())
}

pub fn print_current(snapshot: &WeatherSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(snapshot);
    }
    println!("{}", CurrentView::from(snapshot));
    Ok(())
}

pub fn print_historical(snapshot: &HistoricalSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(snapshot);
    }
    for line in render::historical_lines(snapshot) {
        println!("{line}");
    }
    Ok(())
}

pub fn print_marine(snapshot: &MarineSnapshot, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(snapshot);
    }
    for line in render::marine_lines(snapshot) {
        println!("{line}");
    }
    Ok(())
}
