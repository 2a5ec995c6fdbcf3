use async_trait::async_trait;
use std::fmt::Debug;

use crate::{
    error::LookupError,
    model::{OwCurrentResponse, OwForecastResponse},
};

pub mod openweather;

/// Upstream source of the two bodies one lookup needs.
///
/// Both calls are keyed by the free-text city name and report every
/// failure (transport, status, shape) as a [`LookupError`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<OwCurrentResponse, LookupError>;

    /// 5-day / 3-hour forecast feed.
    async fn forecast(&self, city: &str) -> Result<OwForecastResponse, LookupError>;
}
