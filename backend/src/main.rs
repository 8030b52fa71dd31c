//! Backend entry-point: loads settings, wires adapters, and serves the REST API.

use std::ffi::OsString;
use std::net::{Ipv4Addr, SocketAddr};

use actix_web::dev::ServerHandle;
use actix_web::web;
use mockable::{DefaultEnv, Env};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use inventory_backend::inbound::http::health::HealthState;
use inventory_backend::outbound::persistence::{DbPool, PoolConfig};
use inventory_backend::settings::{InventorySettings, ResolvedSettings};

mod server;

use server::{ServerConfig, StateSettings, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let resolved = load_settings(std::env::args_os(), &DefaultEnv::new())?;

    let pool = DbPool::new(
        PoolConfig::new(resolved.database_url.as_str()).with_max_size(resolved.pool_max_size),
    )
    .await
    .map_err(|err| std::io::Error::other(err.to_string()))?;

    let http_state = build_http_state(
        &pool,
        StateSettings {
            ingestion: resolved.ingestion,
            cloudinary: resolved.cloudinary,
            upload_limits: resolved.upload_limits,
        },
    )?;

    let bind_addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, resolved.port));
    let config =
        ServerConfig::new(bind_addr, http_state).with_allowed_origins(resolved.allowed_origins);

    let health_state = web::Data::new(HealthState::new());
    info!(bind_addr = %config.bind_addr(), "starting inventory backend");
    let server = create_server(health_state.clone(), config)?;

    tokio::spawn(shutdown_on_signal(health_state, server.handle()));
    server.await
}

/// Load settings from `args`, config files and the environment, then validate them.
fn load_settings<I, T, E>(args: I, env: &E) -> std::io::Result<ResolvedSettings>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
    E: Env,
{
    let settings = InventorySettings::load_from_iter(args)
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    settings
        .resolve(env)
        .map_err(|err| std::io::Error::other(format!("invalid settings: {err}")))
}

/// Fail liveness and drain in-flight requests once the process is asked to stop.
async fn shutdown_on_signal(health_state: web::Data<HealthState>, handle: ServerHandle) {
    wait_for_signal().await;
    info!("shutdown requested, draining connections");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut terminate) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }
        Err(err) => {
            warn!(error = %err, "SIGTERM handler unavailable; waiting for ctrl-c only");
            if let Err(err) = tokio::signal::ctrl_c().await {
                warn!(error = %err, "ctrl-c handler unavailable");
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "ctrl-c handler unavailable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use env_lock::lock_env;
    use rstest::rstest;

    fn program() -> [OsString; 1] {
        [OsString::from("inventory-backend")]
    }

    #[rstest]
    fn settings_resolve_against_the_process_environment() {
        let _guard = lock_env([
            ("INVENTORY_DATABASE_URL", Some("postgres://env/inventario".to_owned())),
            ("INVENTORY_PORT", Some("8082".to_owned())),
            ("INVENTORY_CLOUDINARY_CLOUD_NAME", Some("demo".to_owned())),
            ("INVENTORY_CLOUDINARY_API_KEY", Some("123".to_owned())),
            ("INVENTORY_CLOUDINARY_API_SECRET", Some("s3cr3t".to_owned())),
        ]);

        let resolved = load_settings(program(), &DefaultEnv::new()).expect("settings resolve");

        assert_eq!(resolved.database_url, "postgres://env/inventario");
        assert_eq!(resolved.port, 8082);
        assert_eq!(resolved.cloudinary.api_secret.as_str(), "s3cr3t");
    }

    #[rstest]
    fn unprefixed_database_url_is_read_from_the_process_environment() {
        let _guard = lock_env([
            ("INVENTORY_DATABASE_URL", None),
            ("DATABASE_URL", Some("postgres://fallback/inventario".to_owned())),
            ("INVENTORY_CLOUDINARY_CLOUD_NAME", Some("demo".to_owned())),
            ("INVENTORY_CLOUDINARY_API_KEY", Some("123".to_owned())),
            ("INVENTORY_CLOUDINARY_API_SECRET", Some("s3cr3t".to_owned())),
        ]);

        let resolved = load_settings(program(), &DefaultEnv::new()).expect("settings resolve");

        assert_eq!(resolved.database_url, "postgres://fallback/inventario");
    }

    #[rstest]
    fn missing_database_url_fails_startup() {
        let _guard = lock_env([
            ("INVENTORY_DATABASE_URL", None::<String>),
            ("DATABASE_URL", None),
        ]);

        let err = load_settings(program(), &DefaultEnv::new()).expect_err("startup must fail");

        assert!(err.to_string().contains("database_url"));
    }
}
