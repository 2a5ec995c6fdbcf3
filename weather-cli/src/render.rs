use weather_core::{CitySnapshot, ForecastDay, IconCategory, ViewState};

const LOADING: &str = "Loading weather data...";

/// Glyph drawn for each icon category.
pub fn glyph(icon: IconCategory) -> &'static str {
    match icon {
        IconCategory::Clear => "☀",
        IconCategory::Cloud => "☁",
        IconCategory::Drizzle => "🌦",
        IconCategory::Rain => "🌧",
        IconCategory::Snow => "❄",
    }
}

/// Text for the display region.
pub fn render(view: &ViewState) -> String {
    match view {
        ViewState::Loading => LOADING.to_string(),
        ViewState::Error { message } => message.clone(),
        ViewState::Loaded { snapshot, forecast } => {
            let mut out = render_snapshot(snapshot);
            out.push('\n');
            out.push_str(&render_forecast(forecast));
            out
        }
    }
}

fn render_snapshot(s: &CitySnapshot) -> String {
    format!(
        "{icon}  {temp}°C\n{location}\n\n💧 {humidity}%  Humidity\n🌬 {wind} m/s  Wind Speed\n",
        icon = glyph(s.icon),
        temp = s.temperature,
        location = s.location,
        humidity = s.humidity,
        wind = s.wind_speed,
    )
}

fn render_forecast(days: &[ForecastDay]) -> String {
    let mut out = String::from("4-Day Hourly Forecast\n");
    for day in days {
        out.push_str(&format!("\n{}\n", day.date));
        for hour in &day.entries {
            out.push_str(&format!(
                "  {}  {}  {}°C\n",
                hour.time,
                glyph(hour.icon),
                hour.temp
            ));
        }
    }
    out
}
