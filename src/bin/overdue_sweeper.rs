//! Runs the overdue sweep against a `PostgreSQL` task store until Ctrl-C.
//!
//! Usage:
//!
//! ```text
//! TRACKER_DATABASE_URL=postgres://tracker@localhost/tracker overdue-sweeper
//! ```
//!
//! Settings come from the `TRACKER_*` environment variables described in
//! [`poruchenie::config`]. The first sweep runs at start-up; later sweeps
//! follow every `TRACKER_SWEEP_INTERVAL_SECS` seconds.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::DefaultClock;
use poruchenie::config::{ConfigError, TrackerConfig};
use poruchenie::task::adapters::postgres::{PostgresMessageRepository, PostgresTaskRepository};
use poruchenie::task::services::OverdueSweeper;
use poruchenie::telemetry::{self, TelemetryError};
use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Builder;
use tracing::{info, warn};

/// Errors that stop the sweeper before it starts sweeping.
#[derive(Debug, Error)]
enum SweeperError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
    #[error("failed to build connection pool: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),
}

fn main() -> Result<(), SweeperError> {
    let config = TrackerConfig::from_env()?;
    telemetry::init(&config)?;

    let manager = ConnectionManager::<PgConnection>::new(config.require_database_url()?);
    let pool = Pool::builder().build(manager)?;
    let sweeper = OverdueSweeper::new(
        Arc::new(PostgresTaskRepository::new(pool.clone())),
        Arc::new(PostgresMessageRepository::new(pool)),
        Arc::new(DefaultClock),
    )
    .with_policy(config.sweep.reentry)
    .with_interval(config.sweep.interval());

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(SweeperError::RuntimeInit)?;

    info!(
        interval_secs = config.sweep.interval_secs,
        policy = %config.sweep.reentry,
        "overdue sweeper started"
    );
    runtime.block_on(sweeper.run_periodic(async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(%err, "failed to listen for Ctrl-C; stopping");
        }
    }));
    Ok(())
}
