//! In-memory stand-ins for the HTTP clients.

use crate::{
    client::{ContactRepository, CountryDirectory, WeatherError, WeatherProvider},
    model::{Contact, ContactDraft, ContactId, Country, WeatherSnapshot},
};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::{
    collections::{BTreeMap, HashMap},
    sync::Mutex,
    time::Duration,
};

pub fn contact(id: &str, name: &str, number: &str) -> Contact {
    Contact { id: ContactId::new(id), name: name.into(), number: number.into() }
}

pub fn country(name: &str, capital: Option<&str>) -> Country {
    Country {
        name: name.into(),
        code: None,
        capital: capital.map(|c| vec![c.to_string()]).unwrap_or_default(),
        area: 1000.0,
        languages: BTreeMap::from([("eng".to_string(), "English".to_string())]),
        flag_url: format!("https://flags.test/{}.png", name.to_lowercase()),
    }
}

#[derive(Debug, Default)]
struct ContactsState {
    stored: Vec<Contact>,
    next_id: u64,
    fail_all: bool,
    calls: Vec<String>,
}

/// Backend that behaves like a json-server: unknown ids are 404s.
#[derive(Debug, Default)]
pub struct FakeContacts {
    state: Mutex<ContactsState>,
}

impl FakeContacts {
    pub fn with(contacts: Vec<Contact>) -> Self {
        Self {
            state: Mutex::new(ContactsState { stored: contacts, next_id: 100, ..Default::default() }),
        }
    }

    pub fn failing() -> Self {
        let fake = Self::default();
        fake.state.lock().unwrap().fail_all = true;
        fake
    }

    /// Drops a record server-side only, as if another client deleted it.
    pub fn forget(&self, id: &str) {
        self.state.lock().unwrap().stored.retain(|c| c.id.as_str() != id);
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn stored(&self) -> Vec<Contact> {
        self.state.lock().unwrap().stored.clone()
    }

    fn record(&self, call: String) -> Result<std::sync::MutexGuard<'_, ContactsState>> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if state.fail_all {
            return Err(anyhow!("request failed with status 500"));
        }
        Ok(state)
    }
}

#[async_trait]
impl ContactRepository for FakeContacts {
    async fn list(&self) -> Result<Vec<Contact>> {
        Ok(self.record("list".into())?.stored.clone())
    }

    async fn create(&self, draft: &ContactDraft) -> Result<Contact> {
        let mut state = self.record(format!("create {}", draft.name))?;
        state.next_id += 1;
        let created = Contact {
            id: ContactId::new(state.next_id.to_string()),
            name: draft.name.clone(),
            number: draft.number.clone(),
        };
        state.stored.push(created.clone());
        Ok(created)
    }

    async fn update(&self, id: &ContactId, draft: &ContactDraft) -> Result<Contact> {
        let mut state = self.record(format!("update {id}"))?;
        let slot = state
            .stored
            .iter_mut()
            .find(|c| c.id == *id)
            .ok_or_else(|| anyhow!("request failed with status 404"))?;
        slot.name = draft.name.clone();
        slot.number = draft.number.clone();
        Ok(slot.clone())
    }

    async fn remove(&self, id: &ContactId) -> Result<()> {
        let mut state = self.record(format!("remove {id}"))?;
        let before = state.stored.len();
        state.stored.retain(|c| c.id != *id);
        if state.stored.len() == before {
            return Err(anyhow!("request failed with status 404"));
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeDirectory {
    countries: Vec<Country>,
    fail: bool,
}

impl FakeDirectory {
    pub fn with(countries: Vec<Country>) -> Self {
        Self { countries, fail: false }
    }

    pub fn failing() -> Self {
        Self { countries: Vec::new(), fail: true }
    }
}

#[async_trait]
impl CountryDirectory for FakeDirectory {
    async fn list(&self) -> Result<Vec<Country>> {
        if self.fail {
            return Err(anyhow!("country directory request failed with status 503"));
        }
        Ok(self.countries.clone())
    }
}

/// Weather provider with per-city latency and a call log.
#[derive(Debug, Default)]
pub struct FakeWeather {
    delays: HashMap<String, Duration>,
    fail: bool,
    calls: Mutex<Vec<String>>,
}

impl FakeWeather {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, ..Self::default() }
    }

    pub fn delay(mut self, city: &str, delay: Duration) -> Self {
        self.delays.insert(city.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl WeatherProvider for FakeWeather {
    async fn current(&self, city: &str) -> Result<WeatherSnapshot, WeatherError> {
        if city.trim().is_empty() {
            return Err(WeatherError::MissingCity);
        }
        self.calls.lock().unwrap().push(city.to_string());

        if let Some(delay) = self.delays.get(city) {
            tokio::time::sleep(*delay).await;
        }
        if self.fail {
            return Err(anyhow!("OpenWeather current request failed with status 401").into());
        }

        Ok(WeatherSnapshot {
            city: city.to_string(),
            temperature_c: city.len() as f64,
            wind_speed_mps: 2.0,
            icon: "01d".into(),
            description: format!("clear sky over {city}"),
            observation_time: None,
        })
    }
}
