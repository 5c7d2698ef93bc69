use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{collections::BTreeMap, fmt};

/// Server-assigned contact identifier.
///
/// Backends emit it either as a JSON string or a JSON integer; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContactId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => ContactId(s),
            RawId::Number(n) => ContactId(n.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub number: String,
}

impl Contact {
    /// Case-insensitive exact name comparison used for duplicate detection.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactDraft {
    pub name: String,
    pub number: String,
}

impl ContactDraft {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self { name: name.into(), number: number.into() }
    }
}

/// A read-only entry of the country directory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawCountry")]
pub struct Country {
    pub name: String,
    pub code: Option<String>,
    pub capital: Vec<String>,
    pub area: f64,
    /// Language code to display name.
    pub languages: BTreeMap<String, String>,
    pub flag_url: String,
}

impl Country {
    /// First capital in the list, if it is non-blank.
    pub fn primary_capital(&self) -> Option<&str> {
        self.capital.first().map(String::as_str).filter(|c| !c.trim().is_empty())
    }

    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

#[derive(Debug, Deserialize)]
struct RawCountry {
    name: RawCountryName,
    cca3: Option<String>,
    #[serde(default)]
    capital: Vec<String>,
    #[serde(default)]
    area: f64,
    #[serde(default)]
    languages: BTreeMap<String, String>,
    #[serde(default)]
    flags: RawFlags,
}

#[derive(Debug, Deserialize)]
struct RawCountryName {
    common: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawFlags {
    #[serde(default)]
    png: String,
}

impl From<RawCountry> for Country {
    fn from(raw: RawCountry) -> Self {
        Self {
            name: raw.name.common,
            code: raw.cca3,
            capital: raw.capital,
            area: raw.area,
            languages: raw.languages,
            flag_url: raw.flags.png,
        }
    }
}

/// Normalized current weather for a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub temperature_c: f64,
    pub wind_speed_mps: f64,
    pub icon: String,
    pub description: String,
    pub observation_time: Option<DateTime<Utc>>,
}

impl WeatherSnapshot {
    pub fn icon_url(&self) -> String {
        format!("https://openweathermap.org/img/wn/{}@2x.png", self.icon)
    }
}
