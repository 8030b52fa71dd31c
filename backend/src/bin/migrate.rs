//! Apply pending schema migrations to the inventory database.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;

use clap::Parser;
use inventory_backend::outbound::persistence::run_pending_migrations;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `migrate` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(name = "migrate", about = "Create or update the inventory tables", version)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url, env::var("DATABASE_URL").ok())?;

    let applied = run_pending_migrations(&database_url)
        .map_err(|error| io::Error::other(format!("migrate: {error}")))?;
    if applied.is_empty() {
        println!("schema up to date");
    }
    for version in applied {
        println!("applied={version}");
    }
    Ok(())
}

fn resolve_database_url(explicit: Option<String>, from_env: Option<String>) -> io::Result<String> {
    let (source, value) = match (explicit, from_env) {
        (Some(value), _) => ("--database-url", value),
        (None, Some(value)) => ("DATABASE_URL", value),
        (None, None) => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "database URL missing: set --database-url or DATABASE_URL",
            ));
        }
    };
    if value.trim().is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{source} must not be empty"),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::resolve_database_url;

    #[rstest]
    #[case(Some("postgres://cli/db"), Some("postgres://env/db"), "postgres://cli/db")]
    #[case(None, Some("postgres://env/db"), "postgres://env/db")]
    fn explicit_url_wins_over_environment(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
        #[case] expected: &str,
    ) {
        let url = resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned))
            .expect("url should resolve");
        assert_eq!(url, expected);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    #[case(None, Some(""))]
    fn missing_or_blank_urls_are_rejected(
        #[case] explicit: Option<&str>,
        #[case] from_env: Option<&str>,
    ) {
        let error = resolve_database_url(explicit.map(str::to_owned), from_env.map(str::to_owned))
            .expect_err("should fail");
        assert_eq!(error.kind(), std::io::ErrorKind::InvalidInput);
    }
}
