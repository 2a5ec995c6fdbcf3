use serde::{Deserialize, Serialize};
use std::fmt;

/// Visual category a condition code is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconCategory {
    #[default]
    Clear,
    Cloud,
    Drizzle,
    Rain,
    Snow,
}

impl IconCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconCategory::Clear => "clear",
            IconCategory::Cloud => "cloud",
            IconCategory::Drizzle => "drizzle",
            IconCategory::Rain => "rain",
            IconCategory::Snow => "snow",
        }
    }

    #[cfg(test)]
    const fn all() -> &'static [IconCategory] {
        &[
            IconCategory::Clear,
            IconCategory::Cloud,
            IconCategory::Drizzle,
            IconCategory::Rain,
            IconCategory::Snow,
        ]
    }
}

impl fmt::Display for IconCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an OpenWeather condition code (e.g. `"10n"`) to its icon category.
///
/// Only the day/night variants of 01, 02, 03, 04, 09, 10 and 13 are known.
/// Everything else, thunderstorm (11x) and mist (50x) included, falls back
/// to [`IconCategory::Clear`].
pub fn resolve_icon(code: &str) -> IconCategory {
    match code {
        "01d" | "01n" => IconCategory::Clear,
        "02d" | "02n" | "03d" | "03n" => IconCategory::Cloud,
        "04d" | "04n" => IconCategory::Drizzle,
        "09d" | "09n" | "10d" | "10n" => IconCategory::Rain,
        "13d" | "13n" => IconCategory::Snow,
        _ => IconCategory::Clear,
    }
}

/// Same as [`resolve_icon`], for responses whose condition list was empty.
pub fn resolve_icon_opt(code: Option<&str>) -> IconCategory {
    code.map(resolve_icon).unwrap_or_default()
}
