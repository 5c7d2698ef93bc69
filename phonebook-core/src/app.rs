use std::sync::Arc;
use tracing::info;

use crate::{
    client::{
        ContactRepository, CountryDirectory, HttpContactRepository, HttpCountryDirectory,
        OpenWeatherProvider, WeatherProvider,
    },
    config::Config,
    notification::Notifier,
    view::{ContactListView, CountryExplorerView, WeatherPanel},
};

/// The whole page: one shared notification slot and the two views that report into it.
#[derive(Debug)]
pub struct App {
    pub notifier: Notifier,
    pub contacts: ContactListView,
    pub countries: CountryExplorerView,
}

impl App {
    pub fn new(
        contacts: Arc<dyn ContactRepository>,
        directory: Arc<dyn CountryDirectory>,
        weather: Option<Arc<dyn WeatherProvider>>,
    ) -> Self {
        let notifier = Notifier::new();
        Self {
            contacts: ContactListView::new(contacts, notifier.clone()),
            countries: CountryExplorerView::new(
                directory,
                notifier.clone(),
                WeatherPanel::new(weather),
            ),
            notifier,
        }
    }

    /// Build the HTTP clients. Weather is only wired when an API key is configured.
    pub fn from_config(config: &Config) -> Self {
        let weather = config.weather_api_key().map(|key| {
            let provider = OpenWeatherProvider::with_url(key.to_string(), config.weather_url.as_str());
            Arc::new(provider) as Arc<dyn WeatherProvider>
        });
        if weather.is_none() {
            info!("no weather API key configured, weather display disabled");
        }

        Self::new(
            Arc::new(HttpContactRepository::new(config.persons_url())),
            Arc::new(HttpCountryDirectory::new(config.countries_url.as_str())),
            weather,
        )
    }

    /// Initial loads for both views, concurrently.
    pub async fn start(&mut self) {
        tokio::join!(self.contacts.load(), self.countries.load());
    }
}
