use std::sync::Arc;
use tracing::{debug, error};

use crate::{client::CountryDirectory, model::Country, notification::Notifier};

use super::weather::{WeatherPanel, WeatherStatus};

/// Above this many matches only a "refine your search" hint is shown.
pub const MAX_LISTED_MATCHES: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult<'a> {
    /// No search text.
    Idle,
    NoMatches,
    TooManyMatches(usize),
    /// 2..=10 matches, each selectable.
    Matches(Vec<&'a Country>),
    /// Exactly one match; its detail is shown without a selection.
    Single(&'a Country),
}

/// Country search with a detail view and nested weather.
#[derive(Debug)]
pub struct CountryExplorerView {
    directory: Arc<dyn CountryDirectory>,
    notifier: Notifier,
    countries: Vec<Country>,
    search: String,
    selected: Option<usize>,
    weather: WeatherPanel,
}

impl CountryExplorerView {
    pub fn new(
        directory: Arc<dyn CountryDirectory>,
        notifier: Notifier,
        weather: WeatherPanel,
    ) -> Self {
        Self {
            directory,
            notifier,
            countries: Vec::new(),
            search: String::new(),
            selected: None,
            weather,
        }
    }

    pub async fn load(&mut self) {
        match self.directory.list().await {
            Ok(countries) => {
                debug!(count = countries.len(), "countries loaded");
                self.countries = countries;
                self.selected = None;
                self.sync_weather();
            }
            Err(err) => {
                error!("failed to load countries: {err:#}");
                self.notifier.error("Failed to load countries");
            }
        }
    }

    pub fn countries(&self) -> &[Country] {
        &self.countries
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// New search text; any explicit selection is dropped.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
        self.selected = None;
        self.sync_weather();
    }

    pub fn results(&self) -> SearchResult<'_> {
        if self.search.is_empty() {
            return SearchResult::Idle;
        }

        let mut matches: Vec<&Country> = self.matching().map(|(_, c)| c).collect();
        match matches.len() {
            0 => SearchResult::NoMatches,
            1 => SearchResult::Single(matches.remove(0)),
            n if n > MAX_LISTED_MATCHES => SearchResult::TooManyMatches(n),
            _ => SearchResult::Matches(matches),
        }
    }

    /// Pick one of the listed matches by name. Returns `false` if it is not listed.
    pub fn select(&mut self, name: &str) -> bool {
        if !matches!(self.results(), SearchResult::Matches(_)) {
            return false;
        }

        let Some(idx) = self.matching().find(|(_, c)| c.name == name).map(|(i, _)| i) else {
            return false;
        };
        self.selected = Some(idx);
        self.sync_weather();
        true
    }

    /// The country whose detail is shown: the single match or the explicit selection.
    pub fn detail(&self) -> Option<&Country> {
        match self.results() {
            SearchResult::Single(country) => Some(country),
            _ => self.selected.and_then(|idx| self.countries.get(idx)),
        }
    }

    pub fn weather(&self) -> WeatherStatus {
        self.weather.status()
    }

    pub async fn weather_settled(&self) {
        self.weather.settled().await;
    }

    fn matching(&self) -> impl Iterator<Item = (usize, &Country)> + '_ {
        let query = self.search.as_str();
        self.countries.iter().enumerate().filter(move |(_, c)| c.matches(query))
    }

    fn sync_weather(&self) {
        match self.detail() {
            Some(country) => self.weather.observe(country.primary_capital()),
            None => self.weather.reset(),
        }
    }
}
