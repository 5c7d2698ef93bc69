//! Headless view state: each view owns its state and exposes the operations a page
//! binds to. Nothing here blocks on user input.

pub mod contacts;
pub mod countries;
pub mod weather;

pub use contacts::{ConfirmOutcome, ContactAction, ContactListView, MissingField, SubmitOutcome};
pub use countries::{CountryExplorerView, MAX_LISTED_MATCHES, SearchResult};
pub use weather::{WeatherPanel, WeatherStatus};

/// A question the presentation layer must answer before `action` runs.
///
/// Accept by handing it back to the owning view's `confirm`; decline by handing it to
/// `decline` or simply dropping it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending confirmation does nothing until it is confirmed"]
pub struct PendingConfirmation<A> {
    prompt: String,
    action: A,
}

impl<A> PendingConfirmation<A> {
    pub fn new(prompt: impl Into<String>, action: A) -> Self {
        Self { prompt: prompt.into(), action }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn into_action(self) -> A {
        self.action
    }
}
