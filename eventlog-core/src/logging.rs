use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::config::Environment;
use crate::errors::{EventLogError, Result};

/// Installs the process-wide subscriber.
///
/// `RUST_LOG` wins when set. Otherwise `level` applies, falling back to a
/// per-environment default. Production output is plain text without module
/// targets; elsewhere targets are shown and colour follows the terminal.
pub fn init_tracing(level: Option<&str>, environment: Environment) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level, environment)));

    let production = environment == Environment::Production;
    SubscriberBuilder::default()
        .with_env_filter(filter)
        .with_target(!production)
        .with_ansi(!production && atty::is(atty::Stream::Stdout))
        .try_init()
        .map_err(|err| EventLogError::General(err.to_string()))?;

    Ok(())
}

/// Filter directive used when `RUST_LOG` is absent. Outside production the
/// browser's own crates log their queries at debug level.
pub fn default_directive(level: Option<&str>, environment: Environment) -> String {
    match (level, environment) {
        (Some(level), _) => level.to_owned(),
        (None, Environment::Production) => "info".to_owned(),
        (None, _) => "info,eventlog=debug,eventlog_core=debug".to_owned(),
    }
}
