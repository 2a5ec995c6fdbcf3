//! What the widget shows, and which lookup is allowed to change it.

use serde::Serialize;

use crate::model::{CitySnapshot, ForecastCollection};

/// The three things the display region can be showing.
///
/// Snapshot and forecast only ever exist together, so a half-applied
/// lookup cannot be represented.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum ViewState {
    #[default]
    Loading,
    Error {
        message: String,
    },
    Loaded {
        snapshot: CitySnapshot,
        forecast: ForecastCollection,
    },
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn snapshot(&self) -> Option<&CitySnapshot> {
        match self {
            ViewState::Loaded { snapshot, .. } => Some(snapshot),
            _ => None,
        }
    }

    pub fn forecast(&self) -> Option<&ForecastCollection> {
        match self {
            ViewState::Loaded { forecast, .. } => Some(forecast),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error { message } => Some(message),
            _ => None,
        }
    }
}

/// Handed out by [`PresentationState::begin`]; identifies one lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LookupTicket(u64);

impl LookupTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Current view plus the sequence number of the newest lookup issued.
#[derive(Debug, Default)]
pub struct PresentationState {
    view: ViewState,
    latest: u64,
}

impl PresentationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Start a new lookup: clears whatever was shown and supersedes every
    /// lookup still in flight.
    pub fn begin(&mut self) -> LookupTicket {
        self.latest += 1;
        self.view = ViewState::Loading;
        LookupTicket(self.latest)
    }

    /// Apply a finished lookup's result if it is still the newest one.
    ///
    /// Returns `false` (and leaves the view alone) for a stale ticket.
    pub fn settle(&mut self, ticket: LookupTicket, view: ViewState) -> bool {
        if ticket.0 != self.latest {
            return false;
        }
        self.view = view;
        true
    }
}
