//! Background expiration sweeper.
//!
//! Expired records are already non-live for uniqueness purposes; this worker
//! eventually removes them from storage. Spawned once at startup from
//! [`crate::server`].

use crate::domain::repositories::ShortyRepository;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Periodically purges expired shorty records.
///
/// Runs until the process exits. A failed sweep is logged and retried on the
/// next tick; it never aborts the worker.
pub async fn run_expiration_sweeper<R>(repository: Arc<R>, interval: Duration)
where
    R: ShortyRepository + 'static,
{
    tracing::info!(interval_secs = interval.as_secs(), "Expiration sweeper started");

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match repository.purge_expired().await {
            Ok(0) => {}
            Ok(purged) => tracing::info!(purged, "Removed expired shorty resources"),
            Err(err) => tracing::warn!(error = %err, "Expiration sweep failed"),
        }
    }
}
