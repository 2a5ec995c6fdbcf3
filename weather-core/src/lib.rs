//! Core library for the `weather` widget.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider and its wire models
//! - Forecast grouping and condition icon resolution
//! - The lookup dispatcher and the view state it drives
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod forecast;
pub mod icon;
pub mod model;
pub mod provider;
pub mod state;

pub use config::Config;
pub use dispatcher::{Dispatcher, LookupOutcome};
pub use error::{CITY_NOT_FOUND, EmptyCity, LookupError};
pub use forecast::{FORECAST_DAYS, normalize};
pub use icon::{IconCategory, resolve_icon};
pub use model::{CitySnapshot, ForecastCollection, ForecastDay, ForecastEntry};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use state::{LookupTicket, PresentationState, ViewState};
