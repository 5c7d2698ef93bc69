use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::Password;
use phonebook_core::{App, Config};
use tracing::info;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "phonebook", version, about = "Phonebook & country info")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Open the interactive page (default).
    Run,

    /// Store the OpenWeather API key in the config file.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Run) {
            Command::Run => {
                let config = Config::load()?;
                info!(server = %config.server_url, "starting");
                let mut app = App::from_config(&config);
                crate::page::run(&mut app).await
            }
            Command::Configure => configure(),
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Leave empty to disable weather display")
        .prompt()
        .context("Failed to read API key")?;

    if api_key.trim().is_empty() {
        config.weather = None;
    } else {
        config.set_weather_api_key(api_key.trim().to_string());
    }
    config.save()?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}
