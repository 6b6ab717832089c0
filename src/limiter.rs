//! Bounded-parallelism task runner.
//!
//! [`ConcurrencyLimiter::run`] starts tasks in submission order, keeps at
//! most `limit` of them in flight, and refills a slot as soon as a task
//! finishes. Results come back in submission order. The first failure is
//! returned immediately and nothing new is started after it; tasks already
//! running are left to finish on the limiter's [`TaskTracker`], where
//! [`ConcurrencyLimiter::drain`] can wait for them.

use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::future::Future;
use std::num::NonZeroUsize;
use tokio::task::JoinError;
use tokio_util::task::TaskTracker;

pub struct ConcurrencyLimiter {
    limit: NonZeroUsize,
    tracker: TaskTracker,
}

impl ConcurrencyLimiter {
    pub fn new(limit: NonZeroUsize) -> Self {
        Self {
            limit,
            tracker: TaskTracker::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit.get()
    }

    /// Tasks spawned by this limiter, including ones abandoned by a failed run.
    pub fn tracker(&self) -> &TaskTracker {
        &self.tracker
    }

    /// Run `tasks`, turning each into a future with `start` when its slot
    /// opens.
    ///
    /// `start` is called on the caller's task, in submission order, and never
    /// for tasks after the first observed failure. Every future is spawned
    /// onto the runtime so it runs to completion even if this call returns
    /// early.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by a task, or the [`JoinError`] of a
    /// task that panicked.
    pub async fn run<T, F, Fut, R, E>(&self, tasks: Vec<T>, mut start: F) -> Result<Vec<R>, E>
    where
        F: FnMut(T) -> Fut,
        Fut: Future<Output = Result<R, E>> + Send + 'static,
        R: Send + 'static,
        E: From<JoinError> + Send + 'static,
    {
        let total = tasks.len();
        let mut results: Vec<Option<R>> = std::iter::repeat_with(|| None).take(total).collect();
        let mut pending = tasks.into_iter().enumerate();
        let mut in_flight = FuturesUnordered::new();

        loop {
            // Fill every free slot before waiting on the next completion.
            while in_flight.len() < self.limit.get() {
                let Some((index, task)) = pending.next() else {
                    break;
                };
                let handle = self.tracker.spawn(start(task));
                in_flight.push(handle.map(move |joined| (index, joined)));
            }

            // Nothing left to start and nothing running.
            let Some((index, joined)) = in_flight.next().await else {
                break;
            };

            match joined {
                Ok(Ok(value)) => results[index] = Some(value),
                Ok(Err(e)) => {
                    tracing::debug!(
                        "Task {} failed, abandoning {} in-flight and {} unstarted tasks",
                        index,
                        in_flight.len(),
                        pending.len()
                    );
                    return Err(e);
                }
                Err(join_error) => return Err(E::from(join_error)),
            }
        }

        Ok(results.into_iter().flatten().collect())
    }

    /// Wait for every task this limiter has spawned, including ones left
    /// running by a failed [`run`](Self::run).
    pub async fn drain(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }
}
