use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::client::{ClientError, TryFiClient};
use crate::config::CoordinatorConfig;
use crate::handle::SnapshotHandle;
use crate::snapshot::Snapshot;

#[derive(Debug, Error)]
pub enum CoordinatorError {
    #[error("update failed: {0}")]
    Update(#[from] ClientError),
    #[error("update timed out after {0:?}")]
    Timeout(Duration),
}

#[derive(Debug, Clone, Serialize)]
pub struct CoordinatorStatus {
    pub last_ok_ts: Option<DateTime<Utc>>,
    pub age_ms: Option<u128>,
    pub stale: bool,
    pub errors_in_row: u32,
    pub reads_ok: u64,
    pub reads_err: u64,
    pub effective_interval_ms: u128,
    pub last_error: Option<String>,
}

/// Owns the refresh cadence and publishes each fresh snapshot to every
/// [`SnapshotHandle`]. A failed refresh leaves the previous snapshot in place.
pub struct Coordinator<C: TryFiClient + 'static> {
    client: Arc<C>,
    config: CoordinatorConfig,
    tx: watch::Sender<Option<Arc<Snapshot>>>,
    errors_in_row: u32,
    reads_ok: u64,
    reads_err: u64,
    effective_interval: Duration,
    last_ok_instant: Option<Instant>,
    last_ok_ts: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl<C: TryFiClient + 'static> Coordinator<C> {
    pub fn new(client: C, config: CoordinatorConfig) -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            client: Arc::new(client),
            effective_interval: config.update_interval,
            config,
            tx,
            errors_in_row: 0,
            reads_ok: 0,
            reads_err: 0,
            last_ok_instant: None,
            last_ok_ts: None,
            last_error: None,
        }
    }

    pub fn handle(&self) -> SnapshotHandle {
        SnapshotHandle::new(self.tx.subscribe())
    }

    /// The upstream session, shared with entities that write back.
    pub fn session(&self) -> Arc<dyn TryFiClient> {
        self.client.clone()
    }

    pub fn data(&self) -> Option<Arc<Snapshot>> {
        self.tx.borrow().clone()
    }

    pub fn effective_interval(&self) -> Duration {
        self.effective_interval
    }

    /// Initial refresh performed before any entity is registered.
    pub async fn first_refresh(&mut self) -> Result<Arc<Snapshot>, CoordinatorError> {
        self.refresh().await
    }

    pub async fn refresh(&mut self) -> Result<Arc<Snapshot>, CoordinatorError> {
        let started = Instant::now();
        let outcome = match timeout(self.config.poll_timeout, self.client.fetch()).await {
            Ok(Ok(snapshot)) => Ok(snapshot),
            Ok(Err(err)) => Err(CoordinatorError::Update(err)),
            Err(_) => Err(CoordinatorError::Timeout(self.config.poll_timeout)),
        };

        match outcome {
            Ok(snapshot) => {
                self.reads_ok += 1;
                self.errors_in_row = 0;
                self.last_error = None;
                self.last_ok_instant = Some(Instant::now());
                self.last_ok_ts = Some(snapshot.fetched_at);
                self.effective_interval = self.config.update_interval;

                let snapshot = Arc::new(snapshot);
                self.tx.send_replace(Some(snapshot.clone()));
                info!(
                    pets = snapshot.pets.len(),
                    bases = snapshot.bases.len(),
                    rtt_ms = %started.elapsed().as_millis(),
                    "snapshot refreshed"
                );
                Ok(snapshot)
            }
            Err(err) => {
                self.reads_err += 1;
                self.errors_in_row += 1;
                self.last_error = Some(err.to_string());
                self.back_off();
                warn!(
                    error = %err,
                    errors_in_row = self.errors_in_row,
                    next_interval_ms = %self.effective_interval.as_millis(),
                    "snapshot refresh failed, keeping previous data"
                );
                Err(err)
            }
        }
    }

    fn back_off(&mut self) {
        if self.errors_in_row < self.config.error_threshold {
            return;
        }
        self.effective_interval = (self.effective_interval + Duration::from_millis(250))
            .min(self.config.update_interval_max);
    }

    pub fn status(&self) -> CoordinatorStatus {
        let age_ms = self.last_ok_instant.map(|t| t.elapsed().as_millis());
        let stale = age_ms
            .map(|age| age > self.config.stale_after.as_millis())
            .unwrap_or(true);

        CoordinatorStatus {
            last_ok_ts: self.last_ok_ts,
            age_ms,
            stale,
            errors_in_row: self.errors_in_row,
            reads_ok: self.reads_ok,
            reads_err: self.reads_err,
            effective_interval_ms: self.effective_interval.as_millis(),
            last_error: self.last_error.clone(),
        }
    }
}
