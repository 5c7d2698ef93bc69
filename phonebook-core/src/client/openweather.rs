use anyhow::{Context, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::model::WeatherSnapshot;

use super::{WeatherError, WeatherProvider, read_json};

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn with_url(api_key: String, url: impl Into<String>) -> Self {
        Self { api_key, url: url.into(), http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    dt: Option<i64>,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

impl OwCurrentResponse {
    fn into_snapshot(self, city: &str) -> anyhow::Result<WeatherSnapshot> {
        let condition = self
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("OpenWeather response contained no weather conditions"))?;

        Ok(WeatherSnapshot {
            city: city.to_string(),
            temperature_c: self.main.temp,
            wind_speed_mps: self.wind.speed,
            icon: condition.icon,
            description: condition.description,
            observation_time: self.dt.and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(skip(self))]
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(WeatherError::MissingCity);
        }

        debug!("requesting current weather");
        let res = self
            .http
            .get(&self.url)
            .query(&[("q", city), ("units", "metric"), ("appid", self.api_key.as_str())])
            .send()
            .await
            .context("Failed to send request to OpenWeather (current weather)")?;

        let parsed: OwCurrentResponse = read_json(res, "OpenWeather current").await?;
        Ok(parsed.into_snapshot(city)?)
    }
}
