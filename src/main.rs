use clap::{Args, Parser, Subcommand};
use property_finder::config::AppConfig;
use property_finder::error::AppError;
use property_finder::query::{Catalog, FindClosestRequest};
use property_finder::{server, telemetry, tools};
use std::path::PathBuf;

/// Property finder: closest listings to the clinic and the school.
///
/// Examples:
///   property-finder
///   property-finder closest --location-type clinic --max-price 1800000
///   property-finder closest --unfiltered --listings data/haifa.csv
///   property-finder stats --offline
///   property-finder serve --port 8080
#[derive(Parser, Debug)]
#[command(name = "property-finder", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Listings CSV (overrides LISTINGS_PATH).
    #[arg(long, global = true)]
    listings: Option<PathBuf>,

    /// Offline mode: only use already cached coordinates.
    #[arg(long, global = true)]
    offline: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the closest listings to each target (default command)
    Closest(ClosestArgs),
    /// Print price and room statistics for the dataset
    Stats,
    /// Start the HTTP tool service
    Serve(ServeArgs),
    /// Print the tool definitions as JSON
    Tools,
}

#[derive(Args, Debug, Default)]
struct ClosestArgs {
    /// clinic, school or both
    #[arg(long, short = 'l')]
    location_type: Option<String>,

    /// Maximum price in NIS (default 2,000,000).
    #[arg(long)]
    max_price: Option<f64>,

    /// Minimum number of rooms (default 3).
    #[arg(long)]
    min_rooms: Option<f64>,

    /// Do not apply the default price and room bounds.
    #[arg(long)]
    unfiltered: bool,
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Closest(ClosestArgs::default()));

    match command {
        Command::Tools => print_tools(),
        Command::Closest(args) => {
            // Validate before loading or geocoding anything.
            let request = FindClosestRequest::with_defaults(
                args.location_type.as_deref(),
                args.max_price,
                args.min_rooms,
                args.unfiltered,
            )?;
            let config = load_config(cli.listings)?;
            let mut catalog = open_catalog(&config, cli.offline);
            let report = catalog.finder()?.find_closest(&request);
            println!("{report}");
            Ok(())
        }
        Command::Stats => {
            let config = load_config(cli.listings)?;
            let mut catalog = open_catalog(&config, cli.offline);
            println!("{}", catalog.finder()?.statistics());
            Ok(())
        }
        Command::Serve(mut args) => {
            let mut config = load_config(cli.listings)?;
            if let Some(host) = args.host.take() {
                config.server.host = host;
            }
            if let Some(port) = args.port.take() {
                config.server.port = port;
            }
            let addr = config.server.socket_addr()?;
            let catalog = open_catalog(&config, cli.offline);
            server::start(addr, catalog).await
        }
    }
}

fn print_tools() -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(&tools::definitions())
        .map_err(|err| AppError::Internal(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn load_config(listings: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = listings {
        config.listings_path = path;
    }
    telemetry::init(&config.telemetry)?;
    Ok(config)
}

fn open_catalog(config: &AppConfig, offline: bool) -> Catalog {
    let mut geocoder = config.geocoder.build();
    geocoder.set_offline(offline);
    Catalog::from_path(&config.listings_path, geocoder)
}
