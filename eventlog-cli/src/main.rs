use anyhow::Context;
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use eventlog::{EventRepository, NewEvent};
use eventlog_core::config::Environment;
use eventlog_core::db::DatabasePool;
use eventlog_core::logging;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{info, warn};

const SEVERITIES: [&str; 3] = ["Low", "Medium", "High"];

#[derive(Parser)]
#[command(name = "eventlog")]
#[command(about = "Event log store maintenance", long_about = None)]
struct Cli {
    /// Store connection URL, e.g. `sqlite:events.db`
    #[arg(long, global = true, env = "DATABASE_URL", default_value = "sqlite:events.db")]
    database_url: String,
    /// Runtime environment; selects the default log level and format
    #[arg(long = "env", global = true, env = "EVENTLOG_ENV", default_value = "development", value_parser = parse_environment)]
    environment: Environment,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the events table
    Migrate,
    /// Insert randomly generated events
    Seed {
        /// Number of events to insert
        #[arg(short, long)]
        count: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Err(err) = logging::init_tracing(None, cli.environment) {
        eprintln!("failed to initialise tracing: {err}");
    }

    let pool = DatabasePool::connect_with_url(&cli.database_url)
        .await
        .with_context(|| format!("failed to open {}", cli.database_url))?;
    let repository = EventRepository::from_pool(pool)
        .await
        .context("failed to apply migrations")?;

    match cli.command {
        Commands::Migrate => {
            info!(database_url = %cli.database_url, "migrations applied");
        }
        Commands::Seed { count } => {
            let mut inserted = 0u32;
            for _ in 0..count {
                let event = random_event(&mut rand::thread_rng());
                match repository.insert_event(&event).await {
                    Ok(id) => {
                        inserted += 1;
                        info!(id, name = %event.name, "inserted event");
                    }
                    Err(err) => warn!(%err, "failed to insert event"),
                }
            }
            println!("Inserted {inserted} events");
        }
    }

    Ok(())
}

fn parse_environment(raw: &str) -> Result<Environment, std::convert::Infallible> {
    Ok(Environment::parse(raw))
}

/// Event somewhere in the last seven days.
fn random_event<R: Rng>(rng: &mut R) -> NewEvent {
    NewEvent {
        name: format!("Event {}", rng.gen_range(0..1000)),
        description: Some(format!(
            "This is a random event description {}",
            rng.gen_range(0..1000)
        )),
        timestamp: Utc::now() - Duration::hours(rng.gen_range(0..7 * 24)),
        source: Some(format!("Source {}", rng.gen_range(0..5))),
        severity: SEVERITIES.choose(rng).map(|severity| severity.to_string()),
    }
}
