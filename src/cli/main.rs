//! Command-line front end for POI discovery and detection comparison.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use roadside::{DiscoveryConfig, LocationFix, PoiDiscoveryService, Settings};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(name = "roadside")]
#[command(about = "Highway detection and roadside POI discovery")]
struct Args {
    /// TOML config file (optional)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Google Maps API key, overrides the config file
    #[arg(long, env = "GOOGLE_MAPS_API_KEY", hide_env_values = true)]
    google_api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover and rank POIs around a location
    Discover {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,

        /// Search radius in meters
        #[arg(long)]
        radius: Option<f64>,

        #[arg(long)]
        max_results: Option<usize>,

        /// Drop POIs scoring below this
        #[arg(long)]
        min_significance: Option<f64>,
    },
    /// Run all road detection methods side by side
    Compare {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from_file(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => Settings::default(),
    };
    if args.google_api_key.is_some() {
        settings.google.api_key = args.google_api_key.clone();
    }

    let service = PoiDiscoveryService::from_settings(&settings)?;

    match args.command {
        Command::Discover {
            lat,
            lng,
            radius,
            max_results,
            min_significance,
        } => {
            let fix = LocationFix::at(lat, lng)?;
            let config = DiscoveryConfig {
                radius_m: radius.unwrap_or(settings.discovery.radius_m),
                max_results: max_results.unwrap_or(settings.discovery.max_results),
                min_significance: min_significance.or(settings.discovery.min_significance),
            };

            info!("Discovering POIs around ({}, {})", lat, lng);
            let pois = service.discover_pois(&fix, &config).await;
            println!("{}", serde_json::to_string_pretty(&pois)?);
        }
        Command::Compare { lat, lng } => {
            let fix = LocationFix::at(lat, lng)?;
            let results = service.compare_detection_methods(&fix).await;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
