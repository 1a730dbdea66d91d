//! Bounded worker pool.
//!
//! A fixed number of worker tasks drain a bounded queue. Submitting to a full
//! queue either waits for space ([`QueueFullPolicy::Block`]) or hands the item
//! back to the caller ([`QueueFullPolicy::Reject`]).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

use crate::config::{PoolConfig, QueueFullPolicy};

/// Fixed set of workers fed by a bounded queue.
#[derive(Debug)]
pub struct WorkerPool<T> {
    sender: mpsc::Sender<T>,
    workers: Vec<JoinHandle<()>>,
    policy: QueueFullPolicy,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Spawn `config.workers` workers, each running `handler` for one item
    /// at a time.
    pub fn start<H, Fut>(config: &PoolConfig, handler: H) -> Self
    where
        H: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let size = config.workers.max(1);
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let handler = Arc::new(handler);

        let workers = (0..size)
            .map(|id| {
                let receiver = Arc::clone(&receiver);
                let handler = Arc::clone(&handler);
                tokio::spawn(async move {
                    loop {
                        let next = receiver.lock().await.recv().await;
                        match next {
                            Some(item) => handler(item).await,
                            None => break,
                        }
                    }
                    tracing::trace!(worker = id, "Worker stopped");
                })
            })
            .collect();

        tracing::info!(
            workers = size,
            queue_capacity = config.queue_capacity,
            when_full = ?config.when_full,
            "Worker pool started"
        );

        Self {
            sender,
            workers,
            policy: config.when_full,
        }
    }

    /// Queue an item. Returns it back when the policy rejects a full queue.
    pub async fn submit(&self, item: T) -> Result<(), T> {
        match self.policy {
            QueueFullPolicy::Block => self.sender.send(item).await.map_err(|e| e.0),
            QueueFullPolicy::Reject => self.sender.try_send(item).map_err(|e| match e {
                mpsc::error::TrySendError::Full(item) => item,
                mpsc::error::TrySendError::Closed(item) => item,
            }),
        }
    }

    /// Free queue slots.
    pub fn available(&self) -> usize {
        self.sender.capacity()
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    /// Close the queue and let workers finish what was queued.
    ///
    /// Workers still running after `deadline` are aborted. Returns whether
    /// every worker finished on its own.
    pub async fn shutdown(self, deadline: Duration) -> bool {
        drop(self.sender);
        let mut workers = self.workers;

        let joined = tokio::time::timeout(deadline, async {
            for worker in workers.iter_mut() {
                if let Err(e) = worker.await {
                    tracing::error!(error = %e, "Worker task failed");
                }
            }
        })
        .await
        .is_ok();

        if !joined {
            let stuck = workers.iter().filter(|w| !w.is_finished()).count();
            tracing::warn!(
                stuck,
                deadline = ?deadline,
                "Workers did not drain in time, aborting"
            );
            for worker in &workers {
                worker.abort();
            }
        }
        joined
    }
}
