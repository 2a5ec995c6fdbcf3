//! Turns a typed city name into a new [`ViewState`].

use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, instrument};

use crate::{
    config::Config,
    error::{CITY_NOT_FOUND, EmptyCity, LookupError},
    forecast::normalize,
    model::{CitySnapshot, ForecastCollection},
    provider::{WeatherProvider, openweather::OpenWeatherProvider},
    state::{PresentationState, ViewState},
};

/// How a single lookup ended.
#[derive(Debug)]
pub enum LookupOutcome {
    /// Snapshot and forecast are now on display.
    Loaded,
    /// The generic error message is now on display.
    Failed(LookupError),
    /// A newer lookup was issued while this one was in flight; its result
    /// was dropped without touching the view.
    Superseded,
}

impl LookupOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, LookupOutcome::Superseded)
    }
}

#[derive(Debug, Clone)]
pub struct Dispatcher {
    provider: Arc<dyn WeatherProvider>,
    state: Arc<Mutex<PresentationState>>,
    updates: Arc<watch::Sender<ViewState>>,
}

impl Dispatcher {
    pub fn new(provider: Arc<dyn WeatherProvider>) -> Self {
        let (updates, _) = watch::channel(ViewState::Loading);
        Self {
            provider,
            state: Arc::new(Mutex::new(PresentationState::new())),
            updates: Arc::new(updates),
        }
    }

    /// Dispatcher talking to OpenWeather as described by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let provider = OpenWeatherProvider::from_config(config)?;
        Ok(Self::new(Arc::new(provider)))
    }

    /// Copy of what is currently on display.
    pub fn view(&self) -> ViewState {
        self.state.lock().view().clone()
    }

    /// Receiver that observes every view change, `Loading` included.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.updates.subscribe()
    }

    /// The one automatic lookup made when the widget starts.
    pub async fn initial_lookup(&self, config: &Config) -> Result<LookupOutcome, EmptyCity> {
        info!(city = %config.default_city, "initial lookup");
        self.lookup(&config.default_city).await
    }

    /// Fetch current conditions and forecast for `city` and display them.
    ///
    /// Blank input is rejected before any state change or network call.
    /// Otherwise the view drops to `Loading` immediately, both upstream
    /// calls run concurrently, and the result is applied only if no newer
    /// lookup has started in the meantime.
    #[instrument(skip(self))]
    pub async fn lookup(&self, city: &str) -> Result<LookupOutcome, EmptyCity> {
        let city = city.trim();
        if city.is_empty() {
            return Err(EmptyCity);
        }

        let ticket = {
            let mut state = self.state.lock();
            let ticket = state.begin();
            self.updates.send_replace(state.view().clone());
            ticket
        };
        debug!(seq = ticket.seq(), "lookup started");

        let (view, outcome) = match self.fetch(city).await {
            Ok((snapshot, forecast)) => (
                ViewState::Loaded { snapshot, forecast },
                LookupOutcome::Loaded,
            ),
            Err(err) => {
                debug!(seq = ticket.seq(), endpoint = err.endpoint(), error = %err, "lookup failed");
                (
                    ViewState::Error {
                        message: CITY_NOT_FOUND.to_string(),
                    },
                    LookupOutcome::Failed(err),
                )
            }
        };

        let mut state = self.state.lock();
        if state.settle(ticket, view) {
            self.updates.send_replace(state.view().clone());
            Ok(outcome)
        } else {
            debug!(seq = ticket.seq(), "result superseded by a newer lookup");
            Ok(LookupOutcome::Superseded)
        }
    }

    /// Both upstream calls, joined fail-fast: the first error wins and any
    /// body that did arrive is dropped.
    async fn fetch(&self, city: &str) -> Result<(CitySnapshot, ForecastCollection), LookupError> {
        let (current, forecast) =
            tokio::try_join!(self.provider.current(city), self.provider.forecast(city))?;

        let snapshot = CitySnapshot::from_current(&current);
        let days = normalize(&forecast.list)?;

        Ok((snapshot, days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        icon::IconCategory,
        model::{
            OwCurrentResponse, OwForecastEntry, OwForecastMain, OwForecastResponse, OwMain,
            OwWeather, OwWind,
        },
    };
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

    /// Canned per-city answers with optional latency.
    #[derive(Debug, Default)]
    struct FakeProvider {
        cities: HashMap<String, FakeCity>,
        calls: AtomicUsize,
    }

    #[derive(Debug, Clone)]
    struct FakeCity {
        temp: f64,
        icon: &'static str,
        delay: Duration,
        current_status: Option<StatusCode>,
        forecast_status: Option<StatusCode>,
        dt_txt: &'static str,
    }

    impl FakeCity {
        fn ok(temp: f64, icon: &'static str) -> Self {
            Self {
                temp,
                icon,
                delay: Duration::ZERO,
                current_status: None,
                forecast_status: None,
                dt_txt: "2024-01-01 09:00:00",
            }
        }
    }

    impl FakeProvider {
        fn with(mut self, name: &str, city: FakeCity) -> Self {
            self.cities.insert(name.to_string(), city);
            self
        }

        async fn city(&self, name: &str, endpoint: &'static str) -> Result<FakeCity, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let city = self.cities.get(name).cloned().ok_or(LookupError::Status {
                endpoint,
                status: StatusCode::NOT_FOUND,
                body: "city not found".into(),
            })?;
            tokio::time::sleep(city.delay).await;
            Ok(city)
        }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn current(&self, name: &str) -> Result<OwCurrentResponse, LookupError> {
            let city = self.city(name, "weather").await?;
            if let Some(status) = city.current_status {
                return Err(LookupError::Status { endpoint: "weather", status, body: String::new() });
            }
            Ok(OwCurrentResponse {
                name: name.to_string(),
                main: OwMain { temp: city.temp, humidity: 60 },
                wind: OwWind { speed: 4.2 },
                weather: vec![OwWeather { icon: city.icon.into() }],
            })
        }

        async fn forecast(&self, name: &str) -> Result<OwForecastResponse, LookupError> {
            let city = self.city(name, "forecast").await?;
            if let Some(status) = city.forecast_status {
                return Err(LookupError::Status { endpoint: "forecast", status, body: String::new() });
            }
            Ok(OwForecastResponse {
                list: vec![OwForecastEntry {
                    dt_txt: city.dt_txt.into(),
                    main: OwForecastMain { temp: city.temp },
                    weather: vec![OwWeather { icon: city.icon.into() }],
                }],
            })
        }
    }

    fn dispatcher(provider: FakeProvider) -> (Dispatcher, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        (Dispatcher::new(provider.clone()), provider)
    }

    #[tokio::test]
    async fn successful_lookup_loads_snapshot_and_forecast() {
        let (d, _) = dispatcher(FakeProvider::default().with("Oslo", FakeCity::ok(-4.2, "13d")));

        let outcome = d.lookup("Oslo").await.unwrap();
        assert!(matches!(outcome, LookupOutcome::Loaded));

        let view = d.view();
        let snap = view.snapshot().unwrap();
        assert_eq!(snap.temperature, -5);
        assert_eq!(snap.icon, IconCategory::Snow);
        assert_eq!(snap.location, "Oslo");
        assert_eq!(view.forecast().unwrap().len(), 1);
        assert!(view.error().is_none());
    }

    #[tokio::test]
    async fn blank_city_makes_no_calls_and_keeps_state() {
        let (d, provider) = dispatcher(FakeProvider::default().with("Oslo", FakeCity::ok(1.0, "01d")));
        d.lookup("Oslo").await.unwrap();
        let before = d.view();
        let calls = provider.calls.load(Ordering::SeqCst);

        for input in ["", "   ", "\t\n"] {
            assert_eq!(d.lookup(input).await.unwrap_err(), EmptyCity);
        }

        assert_eq!(provider.calls.load(Ordering::SeqCst), calls);
        assert_eq!(d.view(), before);
    }

    #[tokio::test]
    async fn unknown_city_shows_generic_error() {
        let (d, _) = dispatcher(FakeProvider::default());

        let outcome = d.lookup("Atlantis").await.unwrap();
        assert!(matches!(outcome, LookupOutcome::Failed(LookupError::Status { .. })));

        let view = d.view();
        assert_eq!(view.error(), Some(CITY_NOT_FOUND));
        assert!(view.snapshot().is_none());
        assert!(view.forecast().is_none());
    }

    #[tokio::test]
    async fn either_call_failing_fails_the_lookup() {
        let mut current_fails = FakeCity::ok(10.0, "01d");
        current_fails.current_status = Some(StatusCode::UNAUTHORIZED);
        let mut forecast_fails = FakeCity::ok(10.0, "01d");
        forecast_fails.forecast_status = Some(StatusCode::INTERNAL_SERVER_ERROR);

        let (d, _) = dispatcher(
            FakeProvider::default()
                .with("A", current_fails)
                .with("B", forecast_fails),
        );

        for city in ["A", "B"] {
            let outcome = d.lookup(city).await.unwrap();
            assert!(matches!(outcome, LookupOutcome::Failed(_)), "{city}");
            assert_eq!(d.view().error(), Some(CITY_NOT_FOUND));
            assert!(d.view().snapshot().is_none());
        }
    }

    #[tokio::test]
    async fn malformed_forecast_fails_the_lookup() {
        let mut city = FakeCity::ok(10.0, "01d");
        city.dt_txt = "yesterday";
        let (d, _) = dispatcher(FakeProvider::default().with("X", city));

        let outcome = d.lookup("X").await.unwrap();
        assert!(matches!(outcome, LookupOutcome::Failed(LookupError::Malformed { .. })));
        assert_eq!(d.view().error(), Some(CITY_NOT_FOUND));
    }

    #[tokio::test]
    async fn new_lookup_clears_previous_error() {
        let (d, _) = dispatcher(FakeProvider::default().with("Rome", FakeCity::ok(20.0, "01d")));

        d.lookup("Nowhere").await.unwrap();
        assert!(d.view().error().is_some());

        d.lookup("Rome").await.unwrap();
        assert!(d.view().error().is_none());
        assert_eq!(d.view().snapshot().map(|s| s.location.as_str()), Some("Rome"));
    }

    #[tokio::test]
    async fn city_is_trimmed_before_lookup() {
        let (d, _) = dispatcher(FakeProvider::default().with("Lima", FakeCity::ok(20.0, "02n")));
        let outcome = d.lookup("  Lima ").await.unwrap();
        assert!(matches!(outcome, LookupOutcome::Loaded));
    }

    #[tokio::test]
    async fn older_slow_lookup_never_overwrites_newer_one() {
        let mut slow = FakeCity::ok(1.0, "13d");
        slow.delay = Duration::from_millis(200);
        let fast = FakeCity::ok(30.0, "01d");

        let (d, _) = dispatcher(FakeProvider::default().with("Slow", slow).with("Fast", fast));

        let first = d.lookup("Slow");
        let second = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            d.lookup("Fast").await
        };
        let (first, second) = tokio::join!(first, second);

        assert!(matches!(first.unwrap(), LookupOutcome::Superseded));
        assert!(matches!(second.unwrap(), LookupOutcome::Loaded));

        let view = d.view();
        let snap = view.snapshot().unwrap();
        assert_eq!(snap.location, "Fast");
        assert_eq!(snap.temperature, 30);
        assert_eq!(view.forecast().unwrap()[0].entries[0].temp, 30);
    }

    #[tokio::test]
    async fn view_is_loading_while_in_flight() {
        let mut slow = FakeCity::ok(1.0, "01d");
        slow.delay = Duration::from_millis(100);
        let (d, _) = dispatcher(FakeProvider::default().with("Slow", slow));

        let mut updates = d.subscribe();
        let lookup = d.lookup("Slow");
        let watcher = async {
            updates.changed().await.unwrap();
            let first = updates.borrow_and_update().clone();
            updates.changed().await.unwrap();
            let second = updates.borrow_and_update().clone();
            (first, second)
        };

        let (outcome, (first, second)) = tokio::join!(lookup, watcher);
        assert!(outcome.unwrap().is_applied());
        assert!(first.is_loading());
        assert!(second.snapshot().is_some());
    }

    #[tokio::test]
    async fn initial_lookup_uses_configured_city() {
        let (d, _) = dispatcher(FakeProvider::default().with("Bergen", FakeCity::ok(7.0, "09n")));
        let cfg = Config {
            default_city: "Bergen".into(),
            ..Config::default()
        };

        d.initial_lookup(&cfg).await.unwrap();
        assert_eq!(d.view().snapshot().map(|s| s.icon), Some(IconCategory::Rain));
    }
}
