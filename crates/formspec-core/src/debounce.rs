//! Trailing-edge debouncing
//!
//! Collapses a burst of rapid calls into a single execution after a quiet
//! period. Each call cancels the pending timer and schedules a new one, so
//! only the last call within the window runs; a superseded call is discarded
//! entirely, never queued.
//!
//! Schema validation is synchronous and CPU-bound, so per-keystroke paths
//! must route through a debouncer rather than validating inline.
//!
//! Copyright (c) 2025 Formspec Team
//! Licensed under the Apache-2.0 license

use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Trailing-edge debouncer for fire-and-forget closures.
///
/// There is no cancellation hook: the only way to stop a pending execution
/// is to supersede it with a new call. Callers that mutate shared state must
/// keep the scheduled closure idempotent so a stale timer firing after e.g.
/// a reset stays harmless.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// The configured quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `f` to run after the quiet period, superseding any call
    /// still pending.
    ///
    /// Requires a tokio runtime; without one the closure runs synchronously
    /// as a degraded fallback.
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = pending.take() {
            debug!("superseding pending debounced call");
            handle.abort();
        }
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                let delay = self.delay;
                *pending = Some(runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    f();
                }));
            }
            Err(_) => {
                warn!("no tokio runtime available, running debounced call synchronously");
                drop(pending);
                f();
            }
        }
    }
}

/// A debounced wrapper around a reusable closure, built with [`debounce`].
pub struct Debounced<F> {
    f: std::sync::Arc<F>,
    debouncer: Debouncer,
}

impl<F> Debounced<F>
where
    F: Fn() + Send + Sync + 'static,
{
    /// Request an execution; only the last request within the quiet period
    /// actually runs.
    pub fn call(&self) {
        let f = std::sync::Arc::clone(&self.f);
        self.debouncer.call(move || f());
    }

    /// The configured quiet period.
    pub fn delay(&self) -> Duration {
        self.debouncer.delay()
    }
}

/// Wrap a closure so that bursts of calls collapse into one trailing
/// execution after `delay` of quiet.
pub fn debounce<F>(delay: Duration, f: F) -> Debounced<F>
where
    F: Fn() + Send + Sync + 'static,
{
    Debounced {
        f: std::sync::Arc::new(f),
        debouncer: Debouncer::new(delay),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_burst_collapses_to_one_execution() {
        let calls = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(50));

        for _ in 0..3 {
            let calls = Arc::clone(&calls);
            debouncer.call(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_separated_calls_both_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(30));

        let c = Arc::clone(&calls);
        debouncer.call(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        let c = Arc::clone(&calls);
        debouncer.call(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_superseded_call_is_discarded_not_delayed() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let debouncer = Debouncer::new(Duration::from_millis(40));

        for label in ["first", "second", "last"] {
            let seen = Arc::clone(&seen);
            debouncer.call(move || {
                seen.lock().unwrap().push(label);
            });
        }

        tokio::time::sleep(Duration::from_millis(120)).await;
        assert_eq!(*seen.lock().unwrap(), vec!["last"]);
    }

    #[tokio::test]
    async fn test_debounced_wrapper() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let debounced = debounce(Duration::from_millis(30), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        debounced.call();
        debounced.call();
        debounced.call();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(debounced.delay(), Duration::from_millis(30));
    }
}
