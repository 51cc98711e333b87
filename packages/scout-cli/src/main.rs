//! `scout` - discover trade shows and their exhibitors from the terminal.

mod config;
mod output;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Backend, Settings};
use expo_scout::{
    export_rows, load_catalog, to_csv, Catalog, Country, KeyValueStore, Region, Scout,
    ScoutError,
};

#[derive(Debug, Parser)]
#[command(name = "scout", version, about = "Trade-show discovery and enrichment")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Discover and enrich the events of a country or a whole region
    Discover {
        /// Country name, e.g. "Singapore" or "UAE"
        #[arg(required_unless_present = "region", conflicts_with = "region")]
        country: Option<Country>,

        /// Region name, e.g. "Southeast Asia"
        #[arg(long)]
        region: Option<Region>,
    },

    /// Run a broad exhibitor search for one event
    Deep {
        #[command(flatten)]
        event: EventArg,
    },

    /// Draft an outreach email for one event
    Draft {
        #[command(flatten)]
        event: EventArg,

        /// What the email should ask for
        #[arg(long)]
        instructions: Option<String>,
    },

    /// Export the catalog as CSV
    Export {
        /// Output file (stdout when omitted)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// List catalog events
    List {
        /// Only events of this country
        #[arg(long)]
        country: Option<Country>,

        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show supported regions, countries and venues
    Regions,
}

#[derive(Debug, Clone, clap::Args)]
struct EventArg {
    /// Event id or name
    event: String,

    /// Start date (YYYY-MM-DD) to pick among events sharing a name
    #[arg(long)]
    date: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before clap reads env-backed flags
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,expo_scout=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let settings = cli.settings;
    debug!(data_dir = %settings.data_dir.display(), sqlite = settings.sqlite, "Parsed settings");

    match cli.command {
        Command::Regions => {
            output::print_regions();
            Ok(())
        }
        Command::List { country, json } => {
            let catalog = offline_catalog(&settings).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&catalog)?);
            } else {
                output::print_catalog(&catalog, country);
            }
            Ok(())
        }
        Command::Export { output } => {
            let catalog = offline_catalog(&settings).await?;
            let csv = to_csv(&export_rows(catalog.events())).context("Failed to render CSV")?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, csv)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(path = %path.display(), events = catalog.len(), "Exported catalog");
                    println!("{} {}", "Exported to".green(), path.display());
                }
                None => print!("{csv}"),
            }
            Ok(())
        }
        Command::Discover { country, region } => {
            let scout = open_scout(&settings).await?;
            let progress = output::spawn_progress(scout.subscribe());
            let result = match (country, region) {
                (Some(country), _) => discover_one(&scout, country).await,
                (None, Some(region)) => discover_region(&scout, region).await,
                (None, None) => bail!("Pass a country or --region"),
            };
            progress.abort();
            result
        }
        Command::Deep { event } => {
            let scout = open_scout(&settings).await?;
            let id = resolve_event(&scout, &event).await?;
            let outcome = scout.deep_search(&id).await?;
            output::print_deep_outcome(&outcome);
            if let Some(event) = scout.event(&id).await {
                output::print_event(&event);
            }
            Ok(())
        }
        Command::Draft {
            event,
            instructions,
        } => {
            let scout = open_scout(&settings).await?;
            let id = resolve_event(&scout, &event).await?;
            let draft = scout.draft_email(&id, instructions.as_deref()).await?;
            output::print_draft(&draft);
            Ok(())
        }
    }
}

type CliScout = Scout<Arc<dyn KeyValueStore>, Backend>;

async fn open_scout(settings: &Settings) -> Result<CliScout> {
    let backend = settings.backend()?;
    info!(
        model = %settings.model,
        workers = settings.workers,
        requests_per_minute = ?settings.requests_per_minute,
        "Search backend ready"
    );
    let store = settings.store().await?;
    Scout::open(store, backend, settings.scout_config())
        .await
        .context("Failed to load catalog")
}

/// Load the catalog without a search backend.
async fn offline_catalog(settings: &Settings) -> Result<Catalog> {
    let store = settings.store().await?;
    load_catalog(store.as_ref(), &settings.scout_config().store_key)
        .await
        .context("Failed to load catalog")
}

async fn discover_one(scout: &CliScout, country: Country) -> Result<()> {
    let outcome = scout
        .discover(country)
        .await
        .with_context(|| format!("Discovery for {country} failed"))?;
    output::print_discovery(&outcome);
    Ok(())
}

async fn discover_region(scout: &CliScout, region: Region) -> Result<()> {
    let outcomes = scout.discover_region(region).await?;
    let mut failed = 0;
    for (country, outcome) in outcomes {
        match outcome {
            Ok(outcome) => output::print_discovery(&outcome),
            Err(e) => {
                failed += 1;
                warn!(%country, error = %e, "Country failed during region run");
                eprintln!("{} {country}: {e}", "✗".red());
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} countries failed", region.countries().len());
    }
    Ok(())
}

async fn resolve_event(scout: &CliScout, arg: &EventArg) -> Result<String> {
    if scout.event(&arg.event).await.is_some() {
        return Ok(arg.event.clone());
    }
    scout
        .find_event(&arg.event, arg.date.as_deref())
        .await
        .ok_or_else(|| {
            ScoutError::EventNotFound {
                event_id: arg.event.clone(),
            }
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discover_takes_country_or_region() {
        let cli = Cli::try_parse_from(["scout", "discover", "singapore"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Discover { country: Some(Country::Singapore), region: None }
        ));

        let cli = Cli::try_parse_from(["scout", "discover", "--region", "southeast asia"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Discover { country: None, region: Some(Region::SoutheastAsia) }
        ));

        assert!(Cli::try_parse_from(["scout", "discover"]).is_err());
        assert!(Cli::try_parse_from(["scout", "discover", "atlantis"]).is_err());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "scout",
            "--data-dir",
            "/tmp/scout",
            "--workers",
            "5",
            "--model",
            "gpt-4o",
            "list",
        ])
        .unwrap();

        assert_eq!(cli.settings.data_dir, PathBuf::from("/tmp/scout"));
        assert_eq!(cli.settings.scout_config().enrichment_workers, 5);
        assert_eq!(cli.settings.model, "gpt-4o");
    }

    #[tokio::test]
    async fn test_offline_catalog_from_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "scout",
            "--data-dir",
            dir.path().to_str().unwrap(),
            "list",
        ])
        .unwrap();

        let catalog = offline_catalog(&cli.settings).await.unwrap();
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_backend_requires_key() {
        let cli = Cli::try_parse_from(["scout", "--api-key", "", "regions"]).unwrap();
        assert!(cli.settings.backend().is_err());
    }
}
