use chrono::NaiveDateTime;

use crate::{
    error::LookupError,
    icon::resolve_icon_opt,
    model::{ForecastCollection, ForecastDay, ForecastEntry, OwForecastEntry, floor_celsius},
};

/// How many calendar days of the 5-day feed are kept.
pub const FORECAST_DAYS: usize = 4;

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Group flat 3-hourly readings by calendar date.
///
/// Dates keep the order they first appear in; readings keep upstream order
/// within their date. Only the first [`FORECAST_DAYS`] dates survive.
/// Every entry is parsed, including those on dropped dates, so a malformed
/// timestamp anywhere in the feed fails the whole forecast.
pub fn normalize(entries: &[OwForecastEntry]) -> Result<ForecastCollection, LookupError> {
    let mut days: ForecastCollection = Vec::with_capacity(FORECAST_DAYS);

    for raw in entries {
        let stamp = NaiveDateTime::parse_from_str(&raw.dt_txt, DT_TXT_FORMAT).map_err(|e| {
            LookupError::Malformed {
                endpoint: "forecast",
                reason: format!("bad dt_txt {:?}: {e}", raw.dt_txt),
            }
        })?;

        let date = stamp.format("%Y-%m-%d").to_string();
        let entry = ForecastEntry {
            time: stamp.format("%H:%M").to_string(),
            temp: floor_celsius(raw.main.temp),
            icon: resolve_icon_opt(raw.weather.first().map(|w| w.icon.as_str())),
        };

        if let Some(i) = days.iter().position(|d| d.date == date) {
            days[i].entries.push(entry);
        } else if days.len() < FORECAST_DAYS {
            days.push(ForecastDay {
                date,
                entries: vec![entry],
            });
        }
    }

    Ok(days)
}
