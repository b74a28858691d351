use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::time::{interval_at, Instant};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tryfi_core::{
    Coordinator, CoordinatorConfig, Entity, EntityDescription, EntityRegistry, FileClient,
    TryFiClient,
};

mod exporter;
mod viewer;

#[derive(Debug, Parser)]
#[command(name = "tryfid")]
#[command(about = "TryFi pet tracker bridge: exposes pets and bases as host entities")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value = "./tryfi.json")]
    snapshot_file: String,

    #[arg(long, default_value_t = 60)]
    interval_secs: u64,

    #[arg(long, default_value_t = 30_000)]
    poll_timeout_ms: u64,

    #[arg(long, default_value_t = 3)]
    error_threshold: u32,
}

#[derive(Debug, Subcommand)]
enum Command {
    Once {
        #[arg(long, value_enum, default_value = "json")]
        format: OutputFormat,
    },
    Run {
        #[arg(long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
    Entities,
    Lost {
        pet_id: String,
        #[arg(value_parser = ["Safe", "Lost"])]
        option: String,
    },
    View {
        #[arg(long, default_value_t = 3600.0)]
        window_sec: f64,
    },
    Export {
        #[arg(long, default_value = "./data/entities")]
        output_dir: String,
        #[arg(long, default_value_t = 90)]
        retention_days: u64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Human,
    Json,
    Ndjson,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let interval = Duration::from_secs(cli.interval_secs);
    let config = CoordinatorConfig {
        update_interval: interval,
        update_interval_max: interval * 10,
        stale_after: interval * 3,
        poll_timeout: Duration::from_millis(cli.poll_timeout_ms),
        error_threshold: cli.error_threshold,
    };

    let client = FileClient::new(&cli.snapshot_file);
    let mut coordinator = Coordinator::new(client, config);
    coordinator
        .first_refresh()
        .await
        .with_context(|| format!("initial refresh from {}", cli.snapshot_file))?;
    let registry = EntityRegistry::setup(coordinator.handle(), coordinator.session());
    info!(entities = registry.len(), "entities registered");

    match cli.command {
        Command::Once { format } => {
            print_entities(&registry.describe_all(), format)?;
        }
        Command::Run { format } => {
            stream_loop(&mut coordinator, &registry, format).await?;
        }
        Command::Entities => {
            for entity in registry.iter() {
                println!(
                    "{:<16} {:<36} {}",
                    entity.platform().as_str(),
                    entity.unique_id(),
                    entity.name()
                );
            }
        }
        Command::Lost { pet_id, option } => {
            let unique_id = format!("{pet_id}-lost");
            registry
                .select_option(&unique_id, &option)
                .await
                .with_context(|| format!("setting lost mode of {pet_id} to {option}"))?;
            println!("{unique_id}: requested {option}, state updates on next refresh");
        }
        Command::View { window_sec } => {
            viewer::run_viewer(&mut coordinator, &registry, window_sec).await?;
        }
        Command::Export {
            output_dir,
            retention_days,
        } => {
            exporter::run_exporter(&mut coordinator, &registry, &output_dir, retention_days)
                .await?;
        }
    }

    Ok(())
}

async fn stream_loop<C: TryFiClient + 'static>(
    coordinator: &mut Coordinator<C>,
    registry: &EntityRegistry,
    format: OutputFormat,
) -> Result<()> {
    print_entities(&registry.describe_all(), format)?;

    let next = coordinator.effective_interval();
    let mut ticker = interval_at(Instant::now() + next, next);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                warn!("received ctrl-c, stopping");
                break;
            }
            _ = ticker.tick() => {
                // Failures are logged by the coordinator; entities keep the previous data.
                let _ = coordinator.refresh().await;
                print_entities(&registry.describe_all(), format)?;
                let status = coordinator.status();
                let next = coordinator.effective_interval();
                ticker = interval_at(Instant::now() + next, next);
                info!(effective_interval_ms=%next.as_millis(), stale=%status.stale, errors_in_row=%status.errors_in_row, "tick");
            }
        }
    }

    Ok(())
}

fn print_entities(entities: &[EntityDescription], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(entities)?);
        }
        OutputFormat::Ndjson => {
            for entity in entities {
                println!("{}", serde_json::to_string(entity)?);
            }
        }
        OutputFormat::Human => {
            println!("=== TryFi Entities ===");
            let mut current_device = None;
            for entity in entities {
                if current_device.as_ref() != Some(&entity.device.identifiers) {
                    println!(
                        "{} ({} {})",
                        entity.device.name,
                        entity.device.manufacturer,
                        entity.device.model.as_deref().unwrap_or("n/a")
                    );
                    current_device = Some(entity.device.identifiers.clone());
                }
                let unit = entity.unit_of_measurement.unwrap_or("");
                println!("  {:<40} {}{}", entity.name, entity.state, unit_suffix(unit));
            }
        }
    }

    Ok(())
}

fn unit_suffix(unit: &str) -> String {
    if unit.is_empty() {
        String::new()
    } else {
        format!(" {unit}")
    }
}
