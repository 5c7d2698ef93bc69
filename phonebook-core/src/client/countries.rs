use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::model::Country;

use super::{CountryDirectory, read_json};

/// Fetches the whole "all countries" listing in one request.
#[derive(Debug, Clone)]
pub struct HttpCountryDirectory {
    url: String,
    http: Client,
}

impl HttpCountryDirectory {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into(), http: Client::new() }
    }
}

#[async_trait]
impl CountryDirectory for HttpCountryDirectory {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Country>> {
        debug!(url = %self.url, "fetching country directory");
        let res = self
            .http
            .get(&self.url)
            .send()
            .await
            .context("Failed to send request to country directory")?;

        let countries: Vec<Country> = read_json(res, "country directory").await?;
        debug!(count = countries.len(), "country directory loaded");
        Ok(countries)
    }
}
