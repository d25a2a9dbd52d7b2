use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use orderboard::analytics::{DashboardView, DateRange};
use orderboard::config::{load_config, DashboardConfig};
use orderboard::dataset::Dataset;
use orderboard::server::{DashboardContext, DashboardServer};
use std::path::PathBuf;
use tracing::{debug, error, trace};

/// Interactive order analytics dashboard
#[derive(Parser)]
#[command(name = "orderboard")]
#[command(
    about = "Serve an analytics dashboard over an e-commerce order export",
    long_about = None
)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: ./orderboard.toml if present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Order CSV to load (overrides configuration)
    #[arg(short = 'd', long, global = true)]
    data: Option<PathBuf>,

    /// Zero-fill days without orders in the daily series
    #[arg(long, global = true)]
    fill_missing_days: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP (default command)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short = 'p', long)]
        port: Option<u16>,

        /// Skip the boundary document and the choropleth map
        #[arg(long)]
        no_map: bool,
    },
    /// Print the derived tables for a date range as JSON
    Summary {
        /// First day to include (default: first purchase date)
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last day to include (default: last purchase date)
        #[arg(long)]
        end: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref());

    let configured_level = config
        .as_ref()
        .ok()
        .and_then(|c| c.log_level.clone())
        .unwrap_or_else(|| "info".to_string());
    let log_level = match cli.verbose {
        0 => configured_level,
        1 => "debug".to_string(),
        2 => "trace".to_string(),
        // -vvv also shows dependency internals
        _ => "trace,hyper=debug,tower=debug".to_string(),
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2) // Show target module for -vv and above
        .with_thread_ids(cli.verbose >= 3) // Show thread IDs for -vvv
        .with_line_number(cli.verbose >= 3) // Show line numbers for -vvv
        .with_writer(std::io::stderr)
        .init();

    debug!("orderboard started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    let result = match config.context("Failed to load configuration") {
        Ok(mut config) => {
            apply_global_overrides(&mut config, &cli);
            match cli.command {
                Some(Commands::Serve { host, port, no_map }) => {
                    run_serve(config, host, port, no_map).await
                }
                Some(Commands::Summary { start, end }) => run_summary(config, start, end),
                None => run_serve(config, None, None, false).await,
            }
        }
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        error!("Fatal error: {:#}", e);
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn apply_global_overrides(config: &mut DashboardConfig, cli: &Cli) {
    if let Some(data) = &cli.data {
        config.data_path = data.clone();
    }
    if cli.fill_missing_days {
        config.fill_missing_days = true;
    }
}

async fn run_serve(
    mut config: DashboardConfig,
    host: Option<String>,
    port: Option<u16>,
    no_map: bool,
) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if no_map {
        config.boundaries.enabled = false;
    }

    let context = DashboardContext::from_config(&config).await?;
    DashboardServer::new(config.bind_address(), context)
        .start()
        .await
}

fn run_summary(
    config: DashboardConfig,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let dataset = Dataset::load_csv(&config.data_path).with_context(|| {
        format!("Failed to load orders from {}", config.data_path.display())
    })?;

    let full = dataset.full_range();
    let range = DateRange::new(start.unwrap_or(full.start), end.unwrap_or(full.end));

    let view = DashboardView::compute(&dataset, range, &config.view_options());
    println!("{}", serde_json::to_string_pretty(&view)?);

    Ok(())
}
