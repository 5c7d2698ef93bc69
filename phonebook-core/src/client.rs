//! HTTP clients for the contacts backend, the country directory and the weather provider.
//!
//! Each concern sits behind an async trait so views can run against in-memory fakes.

use crate::model::{Contact, ContactDraft, ContactId, Country, WeatherSnapshot};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Response;
use serde::de::DeserializeOwned;
use std::fmt::Debug;
use thiserror::Error;

pub mod contacts;
pub mod countries;
pub mod openweather;

pub use contacts::HttpContactRepository;
pub use countries::HttpCountryDirectory;
pub use openweather::OpenWeatherProvider;

#[async_trait]
pub trait ContactRepository: Send + Sync + Debug {
    async fn list(&self) -> Result<Vec<Contact>>;
    async fn create(&self, draft: &ContactDraft) -> Result<Contact>;
    async fn update(&self, id: &ContactId, draft: &ContactDraft) -> Result<Contact>;
    async fn remove(&self, id: &ContactId) -> Result<()>;
}

#[async_trait]
pub trait CountryDirectory: Send + Sync + Debug {
    async fn list(&self) -> Result<Vec<Country>>;
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current weather for `city`. A blank city fails with [`WeatherError::MissingCity`]
    /// before any request is made.
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError>;
}

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("No city given for weather lookup")]
    MissingCity,

    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Fail with status and a truncated body unless the response is 2xx, otherwise return the body.
pub(crate) async fn read_body(res: Response, what: &str) -> Result<String> {
    let status = res.status();
    let body = res
        .text()
        .await
        .with_context(|| format!("Failed to read {what} response body"))?;

    if !status.is_success() {
        return Err(anyhow!(
            "{what} request failed with status {}: {}",
            status,
            truncate_body(&body),
        ));
    }

    Ok(body)
}

pub(crate) async fn read_json<T: DeserializeOwned>(res: Response, what: &str) -> Result<T> {
    let body = read_body(res, what).await?;
    serde_json::from_str(&body).with_context(|| format!("Failed to parse {what} JSON"))
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
