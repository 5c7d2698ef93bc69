use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::{
    client::{WeatherError, WeatherProvider},
    model::WeatherSnapshot,
};

#[derive(Debug, Clone, PartialEq)]
pub enum WeatherStatus {
    /// No country detail is shown.
    Idle,
    Loading { city: String },
    Ready(WeatherSnapshot),
    /// No capital, no API key, or the provider failed.
    Unavailable,
}

#[derive(Debug)]
struct PanelState {
    /// `None` when nothing is observed, `Some(None)` for a country without a capital.
    observed: Option<Option<String>>,
    generation: u64,
    status: WeatherStatus,
    task: Option<JoinHandle<()>>,
}

/// Weather section of the country detail, keyed on the primary capital.
///
/// Observing a new capital aborts the in-flight request and bumps a generation token;
/// a response only lands if its generation is still current.
#[derive(Debug, Clone)]
pub struct WeatherPanel {
    provider: Option<Arc<dyn WeatherProvider>>,
    state: Arc<Mutex<PanelState>>,
}

impl WeatherPanel {
    /// `None` disables weather (no API key configured).
    pub fn new(provider: Option<Arc<dyn WeatherProvider>>) -> Self {
        let state = PanelState {
            observed: None,
            generation: 0,
            status: WeatherStatus::Idle,
            task: None,
        };
        Self { provider, state: Arc::new(Mutex::new(state)) }
    }

    pub fn status(&self) -> WeatherStatus {
        lock(&self.state).status.clone()
    }

    /// Stop observing; the section disappears.
    pub fn reset(&self) {
        let mut state = lock(&self.state);
        Self::invalidate(&mut state);
        state.observed = None;
        state.status = WeatherStatus::Idle;
    }

    /// Follow `capital`. The same value as last time is a no-op.
    pub fn observe(&self, capital: Option<&str>) {
        let capital = capital.map(str::trim).filter(|c| !c.is_empty()).map(str::to_string);

        let mut state = lock(&self.state);
        if state.observed.as_ref() == Some(&capital) {
            return;
        }
        Self::invalidate(&mut state);
        state.observed = Some(capital.clone());

        let (Some(city), Some(provider)) = (capital, self.provider.as_ref()) else {
            debug!("weather prerequisites missing, not fetching");
            state.status = WeatherStatus::Unavailable;
            return;
        };

        state.status = WeatherStatus::Loading { city: city.clone() };
        let generation = state.generation;
        let shared = Arc::clone(&self.state);
        let provider = Arc::clone(provider);

        state.task = Some(tokio::spawn(async move {
            let result = provider.current(&city).await;

            let mut state = lock(&shared);
            if state.generation != generation {
                debug!(%city, "discarding stale weather response");
                return;
            }
            state.status = match result {
                Ok(snapshot) => WeatherStatus::Ready(snapshot),
                Err(WeatherError::MissingCity) => WeatherStatus::Unavailable,
                Err(WeatherError::Upstream(err)) => {
                    warn!(%city, "weather unavailable: {err:#}");
                    WeatherStatus::Unavailable
                }
            };
            state.task = None;
        }));
    }

    /// Wait for the in-flight request, if any, to finish.
    pub async fn settled(&self) {
        let task = lock(&self.state).task.take();
        if let Some(task) = task {
            let _ = task.await;
        }
    }

    fn invalidate(state: &mut PanelState) {
        state.generation += 1;
        if let Some(task) = state.task.take() {
            task.abort();
        }
    }
}

fn lock(state: &Mutex<PanelState>) -> MutexGuard<'_, PanelState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
