//! Vayu dashboard CLI
//!
//! Command-line front-end for the air-quality monitoring backend.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, Level};
use vayu_dashboard::report::render_dashboard;
use vayu_dashboard::{load_config, AuditLog, Config, DashboardClient, EventType};

#[derive(Parser)]
#[command(name = "vayu-dashboard")]
#[command(about = "Air-quality dashboard client")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config file and BACKEND_URL)
    #[arg(long)]
    backend_url: Option<String>,

    /// Device to query (overrides config file and DEFAULT_DEVICE_ID)
    #[arg(short, long)]
    device: Option<String>,

    /// Log level
    #[arg(short, long, default_value = "info", value_parser = clap::value_parser!(Level))]
    log_level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check backend liveness
    Health,

    /// List registered devices
    Devices,

    /// Show recent sensor readings, newest first
    History {
        /// Number of readings (default: history_limit from config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the backend's current sensor state
    SensorStatus,

    /// Show aggregate statistics
    Analytics {
        #[arg(long, default_value = "24")]
        hours: u32,
    },

    /// Inspect or override fan control
    Control {
        #[command(subcommand)]
        action: ControlAction,
    },

    /// Show recent audit log entries with per-type counts
    Logs {
        /// Number of entries (default: log_limit from config)
        #[arg(long)]
        limit: Option<usize>,

        /// Only show these event types (repeatable; default: all)
        #[arg(long = "event-type", value_parser = ["decision", "fault", "healing"])]
        event_types: Vec<String>,
    },

    /// Show the aggregated dashboard view
    Dashboard {
        /// Print JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Refresh the dashboard view until interrupted
    Watch {
        /// Seconds between refreshes (default: refresh_interval_seconds)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..=60))]
        interval: Option<u64>,
    },
}

#[derive(Subcommand)]
enum ControlAction {
    /// Show current fan state
    Status,

    /// Set a manual override
    Override {
        #[arg(long, action = clap::ArgAction::Set)]
        fan_on: bool,

        /// Fan intensity in percent
        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
        intensity: u8,
    },

    /// Return to automatic control
    Clear,
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .init();

    debug!(
        "Parsed command line arguments: config={:?}, backend_url={:?}, device={:?}, log_level={:?}",
        args.config, args.backend_url, args.device, args.log_level
    );

    let mut config = if let Some(config_path) = &args.config {
        debug!("Loading configuration from {:?}", config_path);
        load_config(config_path)?
    } else {
        debug!("Using default configuration");
        Config::default()
    };

    config.apply_env_overrides()?;

    if let Some(url) = args.backend_url {
        config.backend.url = url;
    }
    if let Some(device) = args.device {
        config.default_device_id = device;
    }
    config.validate()?;

    let client = DashboardClient::new(&config.backend)?;
    let device = config.default_device_id.as_str();
    debug!("Using backend {} for device {}", client.base_url(), device);

    match args.command {
        Commands::Health => print_json(&client.health_check().await?)?,
        Commands::Devices => print_json(&client.list_devices().await?)?,
        Commands::History { limit } => {
            let limit = limit.unwrap_or(config.history_limit);
            print_json(&client.get_sensor_history(device, limit).await?)?
        }
        Commands::SensorStatus => print_json(&client.get_sensor_status(device).await?)?,
        Commands::Analytics { hours } => print_json(&client.get_analytics(device, hours).await?)?,
        Commands::Control { action } => {
            let status = match action {
                ControlAction::Status => client.get_control_status(device).await?,
                ControlAction::Override { fan_on, intensity } => {
                    client.set_control_override(device, fan_on, intensity).await?
                }
                ControlAction::Clear => client.clear_control_override(device).await?,
            };
            print_json(&status)?
        }
        Commands::Logs { limit, event_types } => {
            let limit = limit.unwrap_or(config.log_limit);
            let wanted: Vec<EventType> = event_types.into_iter().map(EventType::from).collect();
            let entries = client.get_blockchain_logs(limit).await?;
            print_json(&AuditLog::new(entries, &wanted))?
        }
        Commands::Dashboard { json } => {
            let view = client.get_aggregated_dashboard_data(device).await?;
            if json {
                print_json(&view)?
            } else {
                print!("{}", render_dashboard(device, &view));
            }
        }
        Commands::Watch { interval } => {
            let interval =
                Duration::from_secs(interval.unwrap_or(config.refresh_interval_seconds));
            let cancel = CancellationToken::new();

            let cancel_for_signal = cancel.clone();
            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for ctrl-c: {}", e);
                    return;
                }
                info!("Shutdown signal received");
                cancel_for_signal.cancel();
            });

            info!("Refreshing {} every {:?}", device, interval);
            let refreshes =
                vayu_dashboard::watch::watch(&client, device, interval, cancel, |result| {
                    match result {
                        Ok(view) => println!("{}", render_dashboard(device, &view)),
                        Err(e) => tracing::error!("Refresh failed: {}", e),
                    }
                })
                .await;
            info!("Stopped after {} refreshes", refreshes);
        }
    }

    Ok(())
}
