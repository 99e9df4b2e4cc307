use std::fmt;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::provider::Endpoint;

/// Failure reported by the provider inside an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderError {
    #[serde(default)]
    pub code: u16,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub info: String,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.info)
    }
}

impl std::error::Error for ProviderError {}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Failed to send request to Weatherstack ({endpoint}): {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: reqwest::Error,
    },

    #[error("Weatherstack {endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: Endpoint,
        status: StatusCode,
        body: String,
    },

    #[error("Failed to parse Weatherstack {endpoint} JSON: {source}")]
    Decode {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl WeatherError {
    /// True for failures below the provider's own error schema.
    pub fn is_transport(&self) -> bool {
        !matches!(self, WeatherError::Provider(_))
    }

    pub fn provider_error(&self) -> Option<&ProviderError> {
        match self {
            WeatherError::Provider(err) => Some(err),
            _ => None,
        }
    }
}
