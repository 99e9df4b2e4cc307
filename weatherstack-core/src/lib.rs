//! Core library for the `weatherstack` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The Weatherstack client and its typed error
//! - Snapshot models for current, historical and marine queries
//! - The dashboard state machine and text rendering
//!
//! It is used by `weatherstack-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod provider;
pub mod render;

pub use config::{Config, FailurePolicy};
pub use dashboard::{DashboardController, RequestToken, Tab, ViewState};
pub use error::{ProviderError, WeatherError};
pub use model::{
    CurrentConditions, HistoricalQuery, HistoricalSnapshot, LocationInfo, MarineQuery,
    MarineSnapshot, WeatherSnapshot,
};
pub use provider::{Endpoint, WeatherClient, weatherstack::WeatherstackClient};
