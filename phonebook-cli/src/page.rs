//! The interactive terminal page: renders the views and maps menu choices onto their
//! operations.

use std::fmt::{self, Write as _};

use anyhow::Context;
use inquire::{Confirm, InquireError, Select, Text};
use phonebook_core::{
    App, Banner, BannerColor, Contact, Country, PendingConfirmation,
    view::{ContactAction, ContactListView, MissingField, SearchResult, SubmitOutcome, WeatherStatus},
};

const FOOTER: &str = "Fullstack Open 2025 - Phonebook & Country Info App";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuItem {
    Filter,
    Add,
    Delete,
    Search,
    Show,
    Refresh,
    Quit,
}

impl MenuItem {
    fn available(app: &App) -> Vec<MenuItem> {
        let mut items = vec![MenuItem::Filter, MenuItem::Add];
        if !app.contacts.visible().is_empty() {
            items.push(MenuItem::Delete);
        }
        items.push(MenuItem::Search);
        if matches!(app.countries.results(), SearchResult::Matches(_)) {
            items.push(MenuItem::Show);
        }
        items.extend([MenuItem::Refresh, MenuItem::Quit]);
        items
    }
}

impl fmt::Display for MenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuItem::Filter => "Filter contacts",
            MenuItem::Add => "Add a new contact",
            MenuItem::Delete => "Delete a contact",
            MenuItem::Search => "Search countries",
            MenuItem::Show => "Show a country",
            MenuItem::Refresh => "Refresh",
            MenuItem::Quit => "Quit",
        })
    }
}

struct ContactChoice<'a>(&'a Contact);

impl fmt::Display for ContactChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0.name, self.0.number)
    }
}

pub async fn run(app: &mut App) -> anyhow::Result<()> {
    app.start().await;

    loop {
        print!("{}", render_page(app));

        let choice = match Select::new("What next?", MenuItem::available(app)).prompt() {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read menu choice"),
        };

        let result = match choice {
            MenuItem::Filter => filter(&mut app.contacts),
            MenuItem::Add => add(&mut app.contacts).await,
            MenuItem::Delete => delete(&mut app.contacts).await,
            MenuItem::Search => search(app).await,
            MenuItem::Show => show(app).await,
            MenuItem::Refresh => Ok(()),
            MenuItem::Quit => break,
        };

        match result {
            Ok(()) => {}
            Err(InquireError::OperationCanceled) => {}
            Err(InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read input"),
        }
    }

    Ok(())
}

fn filter(view: &mut ContactListView) -> Result<(), InquireError> {
    let text = Text::new("Filter:").with_initial_value(view.filter()).prompt()?;
    view.set_filter(text);
    Ok(())
}

async fn add(view: &mut ContactListView) -> Result<(), InquireError> {
    let name = Text::new("Name:").with_initial_value(view.name_draft()).prompt()?;
    view.set_name(name);
    let number = Text::new("Number:").with_initial_value(view.number_draft()).prompt()?;
    view.set_number(number);

    match view.submit().await {
        SubmitOutcome::Incomplete(MissingField::Name) => println!("A name is required."),
        SubmitOutcome::Incomplete(MissingField::Number) => println!("A number is required."),
        SubmitOutcome::NeedsConfirmation(pending) => resolve(view, pending).await?,
        SubmitOutcome::Created(_) | SubmitOutcome::Failed => {}
    }
    Ok(())
}

async fn delete(view: &mut ContactListView) -> Result<(), InquireError> {
    let options: Vec<ContactChoice<'_>> = view.visible().into_iter().map(ContactChoice).collect();
    let id = Select::new("Delete which contact?", options).prompt()?.0.id.clone();

    if let Some(pending) = view.request_delete(&id) {
        resolve(view, pending).await?;
    }
    Ok(())
}

async fn resolve(
    view: &mut ContactListView,
    pending: PendingConfirmation<ContactAction>,
) -> Result<(), InquireError> {
    let accepted = Confirm::new(pending.prompt()).with_default(false).prompt()?;
    if accepted {
        view.confirm(pending).await;
    } else {
        view.decline(pending);
    }
    Ok(())
}

async fn search(app: &mut App) -> Result<(), InquireError> {
    let text = Text::new("Find countries:").with_initial_value(app.countries.search()).prompt()?;
    app.countries.set_search(text);
    app.countries.weather_settled().await;
    Ok(())
}

async fn show(app: &mut App) -> Result<(), InquireError> {
    let names: Vec<String> = match app.countries.results() {
        SearchResult::Matches(list) => list.iter().map(|c| c.name.clone()).collect(),
        _ => return Ok(()),
    };
    let name = Select::new("Show which country?", names).prompt()?;
    app.countries.select(&name);
    app.countries.weather_settled().await;
    Ok(())
}

fn render_page(app: &App) -> String {
    let mut out = String::from("\n");
    if let Some(banner) = app.notifier.banner() {
        out.push_str(&render_banner(&banner));
    }

    out.push_str("\nPhonebook\n");
    if !app.contacts.filter().is_empty() {
        let _ = writeln!(out, "  filter: {}", app.contacts.filter());
    }
    out.push_str(&render_contacts(&app.contacts.visible()));

    out.push_str("\nCountry info\n");
    if !app.countries.search().is_empty() {
        let _ = writeln!(out, "  search: {}", app.countries.search());
    }
    out.push_str(&render_results(&app.countries.results()));
    if let Some(country) = app.countries.detail() {
        out.push_str(&render_country(country, &app.countries.weather()));
    }
    let _ = writeln!(out, "\n{FOOTER}");
    out
}

fn render_banner(banner: &Banner) -> String {
    let color = match banner.color {
        BannerColor::Green => "\x1b[32m",
        BannerColor::Red => "\x1b[31m",
    };
    let border = "-".repeat(banner.text.chars().count() + 4);
    format!("{color}{border}\n| {} |\n{border}\x1b[0m\n", banner.text)
}

fn render_contacts(contacts: &[&Contact]) -> String {
    if contacts.is_empty() {
        return "  (no numbers)\n".to_string();
    }
    contacts.iter().map(|c| format!("  {} {}\n", c.name, c.number)).collect()
}

fn render_results(result: &SearchResult<'_>) -> String {
    match result {
        SearchResult::Idle | SearchResult::Single(_) => String::new(),
        SearchResult::NoMatches => "  No matches\n".to_string(),
        SearchResult::TooManyMatches(_) => "  Too many matches, specify another filter\n".to_string(),
        SearchResult::Matches(list) => list.iter().map(|c| format!("  {}\n", c.name)).collect(),
    }
}

fn render_country(country: &Country, weather: &WeatherStatus) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n  {}", country.name);
    let _ = writeln!(out, "  capital {}", country.primary_capital().unwrap_or("-"));
    let _ = writeln!(out, "  area {} km²", country.area);
    out.push_str("  languages:\n");
    for language in country.languages.values() {
        let _ = writeln!(out, "    - {language}");
    }
    if !country.flag_url.is_empty() {
        let _ = writeln!(out, "  flag {}", country.flag_url);
    }

    match weather {
        WeatherStatus::Loading { city } => {
            let _ = writeln!(out, "\n  Weather in {city}\n  loading...");
        }
        WeatherStatus::Ready(w) => {
            let _ = writeln!(out, "\n  Weather in {}", w.city);
            let _ = writeln!(out, "  temperature {} Celsius", w.temperature_c);
            let _ = writeln!(out, "  {} ({})", w.description, w.icon_url());
            let _ = writeln!(out, "  wind {} m/s", w.wind_speed_mps);
            if let Some(at) = w.observation_time {
                let _ = writeln!(out, "  observed {}", at.format("%Y-%m-%d %H:%M UTC"));
            }
        }
        WeatherStatus::Idle | WeatherStatus::Unavailable => {}
    }
    out
}
