//! Audit sink backed by a bounded queue and batching database workers.

use anyhow::Result;
use flume::{bounded, Receiver, Sender};
use sqlx::types::Json;
use sqlx::PgPool;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use campus_core::services::{AuditEvent, AuditLogger};

#[derive(Debug, Clone)]
pub struct AuditQueueConfig {
    /// Max events held in memory; further events are dropped with a warning.
    pub queue_capacity: usize,

    /// Rows per insert
    pub batch_size: usize,

    /// Flush a partial batch after this long (milliseconds)
    pub batch_timeout_ms: u64,

    pub worker_count: usize,
}

impl Default for AuditQueueConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 10_000,
            batch_size: 100,
            batch_timeout_ms: 1000,
            worker_count: 2,
        }
    }
}

/// Persists audit events into `audit_events` without blocking request handlers.
#[derive(Clone)]
pub struct PgAuditLogger {
    sender: Sender<AuditEvent>,
}

/// Handles of the spawned audit workers.
///
/// `shutdown` drains whatever is still queued before returning.
pub struct AuditWorkers {
    stop: Sender<()>,
    handles: Vec<JoinHandle<()>>,
}

impl AuditWorkers {
    pub async fn shutdown(self) {
        let Self { stop, handles } = self;
        // Dropping the only stop sender wakes every worker.
        drop(stop);

        for (worker_id, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                error!("Audit worker {} did not stop cleanly: {}", worker_id, e);
            }
        }
        info!("Audit workers stopped");
    }
}

impl PgAuditLogger {
    /// Spawns the workers; must be called inside a tokio runtime.
    pub fn new(pool: PgPool, config: AuditQueueConfig) -> (Self, AuditWorkers) {
        let (sender, receiver) = bounded(config.queue_capacity);
        let (stop, stop_signal) = bounded::<()>(1);

        info!(
            "Initializing PgAuditLogger: queue={}, batch={}, timeout={}ms, workers={}",
            config.queue_capacity, config.batch_size, config.batch_timeout_ms, config.worker_count
        );

        let handles = (0..config.worker_count.max(1))
            .map(|worker_id| {
                let pool = pool.clone();
                let receiver = receiver.clone();
                let stop_signal = stop_signal.clone();
                let config = config.clone();

                tokio::spawn(async move {
                    Self::worker_loop(worker_id, pool, receiver, stop_signal, config).await;
                })
            })
            .collect();

        (Self { sender }, AuditWorkers { stop, handles })
    }

    async fn worker_loop(
        worker_id: usize,
        pool: PgPool,
        receiver: Receiver<AuditEvent>,
        stop_signal: Receiver<()>,
        config: AuditQueueConfig,
    ) {
        info!("Audit worker {} started", worker_id);

        let batch_size = config.batch_size.max(1);
        let mut batch: Vec<AuditEvent> = Vec::with_capacity(batch_size);
        let batch_timeout = Duration::from_millis(config.batch_timeout_ms);

        loop {
            // Block for the first event, then fill the batch until the deadline.
            tokio::select! {
                event = receiver.recv_async() => match event {
                    Ok(event) => batch.push(event),
                    Err(_) => {
                        info!("Audit worker {} shutting down (channel closed)", worker_id);
                        return;
                    }
                },
                _ = stop_signal.recv_async() => {
                    Self::drain(&pool, &receiver, batch_size, worker_id).await;
                    return;
                }
            }

            let deadline = tokio::time::Instant::now() + batch_timeout;
            let mut closed = false;
            let mut stopping = false;
            while batch.len() < batch_size {
                tokio::select! {
                    event = receiver.recv_async() => match event {
                        Ok(event) => batch.push(event),
                        Err(_) => {
                            closed = true;
                            break;
                        }
                    },
                    _ = stop_signal.recv_async() => {
                        stopping = true;
                        break;
                    }
                    _ = tokio::time::sleep_until(deadline) => break,
                }
            }

            Self::flush_batch(&pool, &batch, worker_id).await;
            batch.clear();

            if stopping {
                Self::drain(&pool, &receiver, batch_size, worker_id).await;
                return;
            }
            if closed {
                info!("Audit worker {} shutting down (channel closed)", worker_id);
                return;
            }
        }
    }

    /// Flush every event still queued, `batch_size` rows at a time.
    async fn drain(pool: &PgPool, receiver: &Receiver<AuditEvent>, batch_size: usize, worker_id: usize) {
        let mut drained = 0;
        loop {
            let batch: Vec<AuditEvent> = receiver.try_iter().take(batch_size).collect();
            if batch.is_empty() {
                break;
            }
            drained += batch.len();
            Self::flush_batch(pool, &batch, worker_id).await;
        }
        info!("Audit worker {} drained {} queued events", worker_id, drained);
    }

    async fn flush_batch(pool: &PgPool, batch: &[AuditEvent], worker_id: usize) {
        let start = std::time::Instant::now();

        match Self::insert_batch(pool, batch).await {
            Ok(inserted) => {
                debug!("Audit worker {} inserted {} events in {:?}", worker_id, inserted, start.elapsed());
            }
            Err(e) => {
                error!("Audit worker {} failed to insert {} events: {}", worker_id, batch.len(), e);
            }
        }
    }

    async fn insert_batch(pool: &PgPool, events: &[AuditEvent]) -> Result<usize> {
        let mut query_builder = sqlx::QueryBuilder::<sqlx::Postgres>::new(
            "INSERT INTO audit_events (resource, action, record_count, records, occurred_at) ",
        );

        query_builder.push_values(events, |mut b, event| {
            b.push_bind(event.resource)
                .push_bind(event.action.as_str())
                .push_bind(i32::try_from(event.records.len()).unwrap_or(i32::MAX))
                .push_bind(Json(&event.records))
                .push_bind(event.occurred_at);
        });

        let result = query_builder.build().execute(pool).await?;
        Ok(result.rows_affected() as usize)
    }

    pub fn queue_len(&self) -> usize {
        self.sender.len()
    }

    pub fn is_queue_full(&self) -> bool {
        self.sender.is_full()
    }
}

impl AuditLogger for PgAuditLogger {
    fn record(&self, event: AuditEvent) {
        if let Err(e) = self.sender.try_send(event) {
            warn!("Dropping audit event (queue full?): {}", e);
        }
    }
}
