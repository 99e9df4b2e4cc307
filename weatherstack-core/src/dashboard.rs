//! Dashboard state: one search box, three tabs.
//!
//! Only the current tab talks to the network. The history and marine tabs hold
//! form input and nothing else.

use chrono::{Local, NaiveDate};
use tracing::debug;

use crate::{
    config::FailurePolicy,
    error::WeatherError,
    model::{MarineQuery, WeatherSnapshot},
    provider::WeatherClient,
};

pub const DEFAULT_CITY: &str = "New York";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Current,
    History,
    Marine,
}

impl Tab {
    pub const fn all() -> &'static [Tab] {
        &[Tab::Current, Tab::History, Tab::Marine]
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Current => "Current",
            Tab::History => "History",
            Tab::Marine => "Marine",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading {
        stale: Option<T>,
    },
    Loaded(T),
    Failed {
        message: String,
        stale: Option<T>,
    },
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Latest data held in any state, fresh or stale.
    fn into_latest(self) -> Option<T> {
        match self {
            ViewState::Idle => None,
            ViewState::Loading { stale } | ViewState::Failed { stale, .. } => stale,
            ViewState::Loaded(data) => Some(data),
        }
    }
}

/// Identifies one search; only the most recent one may update the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryForm {
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarineForm {
    pub coords: Option<MarineQuery>,
}

#[derive(Debug)]
pub struct DashboardController {
    query: String,
    tab: Tab,
    current: ViewState<WeatherSnapshot>,
    history: HistoryForm,
    marine: MarineForm,
    policy: FailurePolicy,
    last_token: u64,
    in_flight: Option<RequestToken>,
}

impl Default for DashboardController {
    fn default() -> Self {
        Self::new(FailurePolicy::default())
    }
}

impl DashboardController {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            query: DEFAULT_CITY.to_string(),
            tab: Tab::default(),
            current: ViewState::Idle,
            history: HistoryForm { date: Local::now().date_naive() },
            marine: MarineForm::default(),
            policy,
            last_token: 0,
            in_flight: None,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn history(&self) -> &HistoryForm {
        &self.history
    }

    pub fn set_history_date(&mut self, date: NaiveDate) {
        self.history.date = date;
    }

    pub fn marine(&self) -> &MarineForm {
        &self.marine
    }

    pub fn set_marine_coords(&mut self, coords: MarineQuery) {
        self.marine.coords = Some(coords);
    }

    pub fn current_state(&self) -> &ViewState<WeatherSnapshot> {
        &self.current
    }

    /// Start a search for the current query and enter the loading state.
    pub fn begin_search(&mut self) -> RequestToken {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        self.in_flight = Some(token);

        let stale = std::mem::replace(&mut self.current, ViewState::Idle).into_latest();
        self.current = ViewState::Loading { stale };

        debug!(?token, query = %self.query, "Search started");
        token
    }

    /// Apply the outcome of the search identified by `token`.
    ///
    /// Returns `false` and leaves the view untouched when a newer search has
    /// been started since.
    pub fn complete(
        &mut self,
        token: RequestToken,
        result: Result<WeatherSnapshot, WeatherError>,
    ) -> bool {
        if self.in_flight != Some(token) {
            debug!(?token, latest = self.last_token, "Ignoring stale search result");
            return false;
        }
        self.in_flight = None;

        let previous = std::mem::replace(&mut self.current, ViewState::Idle).into_latest();
        self.current = match result {
            Ok(snapshot) => ViewState::Loaded(snapshot),
            Err(err) => ViewState::Failed {
                message: err.to_string(),
                stale: match self.policy {
                    FailurePolicy::KeepStale => previous,
                    FailurePolicy::Clear => None,
                },
            },
        };
        true
    }

    /// Search for the current query and wait for the result.
    pub async fn submit<C>(&mut self, client: &C) -> bool
    where
        C: WeatherClient + ?Sized,
    {
        let token = self.begin_search();
        let result = client.get_current(&self.query).await;
        self.complete(token, result)
    }

    /// Snapshot the current tab should show right now, if any.
    pub fn displayed_snapshot(&self) -> Option<&WeatherSnapshot> {
        match &self.current {
            ViewState::Loaded(snapshot) => Some(snapshot),
            ViewState::Failed { stale, .. } => stale.as_ref(),
            ViewState::Idle | ViewState::Loading { .. } => None,
        }
    }
}
