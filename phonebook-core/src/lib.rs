//! Core library for the phonebook & country info app.
//!
//! This crate defines:
//! - Configuration (backend URLs, weather API key)
//! - HTTP clients for contacts, the country directory and the weather provider
//! - Shared domain models
//! - Headless views: contact list, country explorer with weather, notification banner
//!
//! It is used by `phonebook-cli`, but the views can be driven by any front-end.

pub mod app;
pub mod client;
pub mod config;
pub mod model;
pub mod notification;
pub mod view;

#[cfg(test)]
mod testing;

pub use app::App;
pub use client::{ContactRepository, CountryDirectory, WeatherError, WeatherProvider};
pub use config::Config;
pub use model::{Contact, ContactDraft, ContactId, Country, WeatherSnapshot};
pub use notification::{Banner, BannerColor, Notification, Notifier, Severity};
pub use view::PendingConfirmation;
