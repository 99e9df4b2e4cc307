use crate::{
    HistoricalQuery, HistoricalSnapshot, MarineQuery, MarineSnapshot, WeatherError,
    WeatherSnapshot,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod weatherstack;

/// Remote operations exposed by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Current,
    Historical,
    Marine,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Current => "current",
            Endpoint::Historical => "historical",
            Endpoint::Marine => "marine",
        }
    }

    pub const fn all() -> &'static [Endpoint] {
        &[Endpoint::Current, Endpoint::Historical, Endpoint::Marine]
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read-only weather queries.
///
/// Provider-reported failures come back as [`WeatherError::Provider`], so a
/// returned snapshot is always complete.
#[async_trait]
pub trait WeatherClient: Send + Sync + Debug {
    async fn get_current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;

    async fn get_historical(
        &self,
        query: &HistoricalQuery,
    ) -> Result<HistoricalSnapshot, WeatherError>;

    async fn get_marine(&self, query: &MarineQuery) -> Result<MarineSnapshot, WeatherError>;
}
