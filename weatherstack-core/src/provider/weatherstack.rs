use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, instrument};

use crate::{
    config::{Config, DEFAULT_BASE_URL},
    error::{ProviderError, WeatherError},
    model::{HistoricalQuery, HistoricalSnapshot, MarineQuery, MarineSnapshot, WeatherSnapshot},
};

use super::{Endpoint, WeatherClient};

#[derive(Clone)]
pub struct WeatherstackClient {
    access_key: String,
    base_url: String,
    http: Client,
}

impl std::fmt::Debug for WeatherstackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherstackClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl WeatherstackClient {
    pub fn new(access_key: impl Into<String>) -> Self {
        Self {
            access_key: access_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let access_key = config.require_access_key()?;

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            access_key: access_key.to_owned(),
            base_url: config.base_url().to_owned(),
            http,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint)
    }

    /// GET `endpoint` and decode the body.
    ///
    /// Transport-tier failures are logged here, once; provider errors are
    /// left to the caller.
    async fn fetch<T: DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        params: &[(&str, &str)],
    ) -> Result<T, WeatherError> {
        let url = self.url(endpoint);
        debug!(%url, "Requesting Weatherstack {endpoint}");

        let result = match self.send(endpoint, &url, params).await {
            Ok(body) => decode(endpoint, body),
            Err(err) => Err(err),
        };

        match &result {
            Err(err) if err.is_transport() => {
                error!(%endpoint, error = %err, "Error fetching {endpoint} weather");
            }
            _ => {}
        }
        result
    }

    async fn send(
        &self,
        endpoint: Endpoint,
        url: &str,
        params: &[(&str, &str)],
    ) -> Result<Value, WeatherError> {
        // reqwest errors carry the request URL, which includes the access key
        let res = self
            .http
            .get(url)
            .query(&[("access_key", self.access_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source: source.without_url() })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| WeatherError::Transport { endpoint, source: source.without_url() })?;

        if !status.is_success() {
            return Err(WeatherError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| WeatherError::Decode { endpoint, source })
    }
}

/// Split a 200 body into the provider's error object or the typed snapshot.
fn decode<T: DeserializeOwned>(endpoint: Endpoint, body: Value) -> Result<T, WeatherError> {
    if let Some(raw) = body.get("error").filter(|e| !e.is_null()) {
        let provider: ProviderError = serde_json::from_value(raw.clone())
            .map_err(|source| WeatherError::Decode { endpoint, source })?;
        debug!(%endpoint, code = provider.code, info = %provider.info, "Provider reported an error");
        return Err(provider.into());
    }

    serde_json::from_value(body).map_err(|source| WeatherError::Decode { endpoint, source })
}

#[async_trait]
impl WeatherClient for WeatherstackClient {
    #[instrument(skip(self))]
    async fn get_current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        self.fetch(Endpoint::Current, &[("query", city)]).await
    }

    #[instrument(skip(self), fields(city = %query.city, date = %query.date))]
    async fn get_historical(
        &self,
        query: &HistoricalQuery,
    ) -> Result<HistoricalSnapshot, WeatherError> {
        let mut params = vec![
            ("query", query.city.as_str()),
            ("historical_date", query.date.as_str()),
        ];
        if query.hourly {
            params.push(("hourly", "1"));
        }

        self.fetch(Endpoint::Historical, &params).await
    }

    #[instrument(skip(self), fields(coords = %query))]
    async fn get_marine(&self, query: &MarineQuery) -> Result<MarineSnapshot, WeatherError> {
        let coords = query.to_string();
        self.fetch(Endpoint::Marine, &[("query", coords.as_str())]).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
