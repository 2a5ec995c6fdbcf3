use serde::{Deserialize, Serialize};

use crate::icon::{IconCategory, resolve_icon_opt};

/// Current conditions for the city that was looked up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CitySnapshot {
    pub humidity: u8,
    /// Metres per second.
    pub wind_speed: f64,
    /// Whole degrees Celsius, floored.
    pub temperature: i32,
    pub location: String,
    pub icon: IconCategory,
}

impl CitySnapshot {
    pub fn from_current(body: &OwCurrentResponse) -> Self {
        Self {
            humidity: body.main.humidity,
            wind_speed: body.wind.speed,
            temperature: floor_celsius(body.main.temp),
            location: body.name.clone(),
            icon: resolve_icon_opt(body.weather.first().map(|w| w.icon.as_str())),
        }
    }
}

/// One 3-hourly reading inside a [`ForecastDay`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastEntry {
    /// `HH:MM`
    pub time: String,
    pub temp: i32,
    pub icon: IconCategory,
}

/// All readings for a single calendar date, in upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForecastDay {
    /// `YYYY-MM-DD`
    pub date: String,
    pub entries: Vec<ForecastEntry>,
}

/// Forecast days in first-seen order, at most [`crate::FORECAST_DAYS`] long.
pub type ForecastCollection = Vec<ForecastDay>;

pub(crate) fn floor_celsius(raw: f64) -> i32 {
    raw.floor() as i32
}

// OpenWeather wire models. Only the fields the widget reads are declared;
// serde ignores the rest.

#[derive(Debug, Clone, Deserialize)]
pub struct OwMain {
    pub temp: f64,
    pub humidity: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWeather {
    pub icon: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwWind {
    pub speed: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwCurrentResponse {
    pub name: String,
    pub main: OwMain,
    pub wind: OwWind,
    #[serde(default)]
    pub weather: Vec<OwWeather>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastEntry {
    /// `YYYY-MM-DD HH:MM:SS`
    pub dt_txt: String,
    pub main: OwForecastMain,
    #[serde(default)]
    pub weather: Vec<OwWeather>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OwForecastResponse {
    pub list: Vec<OwForecastEntry>,
}
