use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use dayplan_agents::PlannerAgent;
use dayplan_core::{GeoPoint, PlannerConfig, PlanningRequest};
use dayplan_observability::{init_tracing, AppMetrics};
use dayplan_storage::{CatalogSource, MemoryCatalog, SqliteCatalog};

#[derive(Debug, Parser)]
#[command(name = "dayplan")]
#[command(about = "Single-day sightseeing itinerary planner")]
struct Cli {
    /// JSON catalog seed with `zones` and `places`.
    #[arg(long, env = "DAYPLAN_CATALOG")]
    catalog: Option<PathBuf>,

    /// SQLite catalog; takes precedence over --catalog.
    #[arg(long, env = "DAYPLAN_DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "DAYPLAN_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    Plan {
        #[arg(long)]
        zone: Option<String>,
        #[arg(
            long = "category",
            value_delimiter = ',',
            required_unless_present = "preferences_file"
        )]
        categories: Vec<String>,
        #[arg(long, default_value_t = 9)]
        start_hour: u8,
        #[arg(long, required_unless_present = "preferences_file")]
        duration: Option<f64>,
        #[arg(long)]
        trip_name: Option<String>,
        /// Raw preference-extractor reply containing a JSON object.
        #[arg(long, conflicts_with_all = ["zone", "categories", "duration", "trip_name"])]
        preferences_file: Option<PathBuf>,
        #[arg(long)]
        seed: Option<u64>,
    },
    Zones,
    NearestZone {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, default_value_t = 1.5)]
        max_km: f64,
    },
    /// Copy a JSON seed into the SQLite catalog.
    Import {
        seed_file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("dayplan_cli");
    let cli = Cli::parse();

    if let Command::Import { seed_file } = &cli.command {
        return import_seed(cli.database_url.as_deref(), seed_file).await;
    }

    let agent = build_agent(&cli).await?;

    match cli.command {
        Command::Plan {
            zone,
            categories,
            start_hour,
            duration,
            trip_name,
            preferences_file,
            seed,
        } => {
            let today = Local::now().date_naive();
            let trip = match preferences_file {
                Some(path) => {
                    let raw = fs::read_to_string(&path).with_context(|| {
                        format!("failed reading preferences from {}", path.display())
                    })?;
                    agent.plan_trip_from_extractor(&raw, today, seed)?
                }
                None => {
                    let request = PlanningRequest {
                        trip_name,
                        zone_name: zone,
                        categories,
                        start_hour,
                        duration_hours: duration.context("--duration is required")?,
                    };
                    agent.plan_trip(&request, today, seed)?
                }
            };

            println!("{}", serde_json::to_string_pretty(&trip)?);
        }
        Command::Zones => {
            println!("{}", serde_json::to_string_pretty(&agent.zones())?);
        }
        Command::NearestZone { lat, lon, max_km } => {
            let zone = agent.nearest_zone(GeoPoint::new(lat, lon), max_km);
            println!("{}", serde_json::to_string_pretty(&zone)?);
        }
        // handled before the catalog is loaded
        Command::Import { .. } => {}
    }

    Ok(())
}

async fn build_agent(cli: &Cli) -> Result<PlannerAgent<MemoryCatalog>> {
    let config = match &cli.config {
        Some(path) => PlannerConfig::from_json_file(path)?,
        None => PlannerConfig::default(),
    };
    let source = CatalogSource::from_options(cli.catalog.clone(), cli.database_url.clone());

    PlannerAgent::load(&source, config, AppMetrics::shared()).await
}

async fn import_seed(database_url: Option<&str>, seed_file: &Path) -> Result<()> {
    let database_url = database_url.context("--database-url is required for import")?;
    let seed = MemoryCatalog::from_json_file(seed_file)?.to_seed();

    let store = SqliteCatalog::connect(database_url).await?;
    store.import_seed(&seed).await?;

    println!(
        "imported {} zones and {} places into {}",
        seed.zones.len(),
        seed.places.len(),
        database_url
    );
    Ok(())
}
