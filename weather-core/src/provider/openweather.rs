use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::{
    config::Config,
    error::LookupError,
    model::{OwCurrentResponse, OwForecastResponse},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Build a provider from the loaded config.
    ///
    /// A missing API key is not an error here: requests go out with an
    /// empty `appid` and the upstream rejects them like any other failure.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.resolved_api_key().unwrap_or_else(|| {
            info!("no OpenWeather API key configured; requests will be rejected upstream");
            String::new()
        });

        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        city: &str,
    ) -> Result<T, LookupError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|source| LookupError::Request {
                endpoint,
                source: source.without_url(),
            })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| LookupError::Request {
                endpoint,
                source: source.without_url(),
            })?;

        if !status.is_success() {
            debug!(endpoint, %status, body = %truncate_body(&body), "OpenWeather request rejected");
            return Err(LookupError::Status {
                endpoint,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| LookupError::Malformed {
            endpoint,
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current(&self, city: &str) -> Result<OwCurrentResponse, LookupError> {
        self.get_json("weather", city).await
    }

    #[instrument(skip(self))]
    async fn forecast(&self, city: &str) -> Result<OwForecastResponse, LookupError> {
        self.get_json("forecast", city).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
