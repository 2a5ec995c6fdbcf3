use std::{future::Future, process::ExitCode};

use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use tracing::debug;
use weather_core::{Config, Dispatcher, EmptyCity, LookupOutcome, ViewState};

use crate::render::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and a 4-day forecast for any city")]
pub struct Cli {
    /// More diagnostics on stderr (-v, -vv). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Defaults to `watch` when omitted.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the city shown at startup.
    Configure,

    /// Look up one city and print the result.
    Show {
        /// City name; the configured default city if absent.
        city: Option<String>,

        /// Print the view as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Interactive widget: shows the default city, then prompts for searches.
    Watch,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        let config = Config::load()?;

        match self.command.unwrap_or(Command::Watch) {
            Command::Configure => configure(config).map(|()| ExitCode::SUCCESS),
            Command::Show { city, json } => show(&config, city, json).await,
            Command::Watch => watch(&config).await.map(|()| ExitCode::SUCCESS),
        }
    }
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()?;
    if !city.trim().is_empty() {
        config.set_default_city(&city);
    }

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

async fn show(config: &Config, city: Option<String>, json: bool) -> anyhow::Result<ExitCode> {
    let dispatcher = Dispatcher::from_config(config)?;
    let city = city.unwrap_or_else(|| config.default_city.clone());

    let outcome = dispatcher.lookup(&city).await?;

    let view = dispatcher.view();
    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        println!("{}", render(&view));
    }
    Ok(exit_code(&outcome))
}

/// Scripts see a failed one-shot lookup as a non-zero exit.
fn exit_code(outcome: &LookupOutcome) -> ExitCode {
    if lookup_failed(outcome) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn lookup_failed(outcome: &LookupOutcome) -> bool {
    matches!(outcome, LookupOutcome::Failed(_))
}

async fn watch(config: &Config) -> anyhow::Result<()> {
    let dispatcher = Dispatcher::from_config(config)?;

    if let Err(EmptyCity) = display(&dispatcher, dispatcher.initial_lookup(config)).await {
        println!("No default city configured. Run `weather configure`.");
    }

    loop {
        let input = match Text::new("Search:").with_placeholder("Search").prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e.into()),
        };

        if let Err(warning) = display(&dispatcher, dispatcher.lookup(&input)).await {
            println!("⚠ {warning}");
        }
    }

    Ok(())
}

/// Drive one lookup, printing the loading line when the view drops to
/// `Loading` and the final view once the lookup settles.
async fn display<F>(dispatcher: &Dispatcher, lookup: F) -> Result<LookupOutcome, EmptyCity>
where
    F: Future<Output = Result<LookupOutcome, EmptyCity>>,
{
    let mut updates = dispatcher.subscribe();
    tokio::pin!(lookup);

    let outcome = loop {
        tokio::select! {
            outcome = &mut lookup => break outcome,
            changed = updates.changed() => {
                if changed.is_err() {
                    break (&mut lookup).await;
                }
                if updates.borrow_and_update().is_loading() {
                    println!("{}", render(&ViewState::Loading));
                }
            }
        }
    }?;

    debug!(?outcome, "lookup finished");
    if outcome.is_applied() {
        println!("{}", render(&dispatcher.view()));
    }
    Ok(outcome)
}
