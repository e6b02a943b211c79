//! Debounced save scheduling.
//!
//! A single worker task owns the quiet window. Every request restarts the
//! window instead of stacking another timer; when the window elapses with no
//! further requests the job runs once. Requests that arrive while the job is
//! running queue up and open the next window after it finishes.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::debug;

#[derive(Debug)]
enum Signal {
    Request,
    Cancel,
}

pub struct SaveScheduler {
    tx: mpsc::UnboundedSender<Signal>,
}

impl SaveScheduler {
    /// Spawns the worker onto the current tokio runtime. The worker stops once
    /// the scheduler is dropped; a job already running is left to finish.
    pub fn spawn<F, Fut>(quiet: Duration, job: F) -> Self
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run(rx, quiet, job));
        Self { tx }
    }

    /// (Re)starts the quiet window. Returns false if the worker is gone.
    pub fn request(&self) -> bool {
        self.tx.send(Signal::Request).is_ok()
    }

    /// Drops a pending window without running the job.
    pub fn cancel(&self) {
        let _ = self.tx.send(Signal::Cancel);
    }
}

async fn run<F, Fut>(mut rx: mpsc::UnboundedReceiver<Signal>, quiet: Duration, job: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = ()>,
{
    while let Some(signal) = rx.recv().await {
        if matches!(signal, Signal::Cancel) {
            continue;
        }

        let fire = loop {
            tokio::select! {
                _ = tokio::time::sleep(quiet) => break true,
                next = rx.recv() => match next {
                    Some(Signal::Request) => continue,
                    Some(Signal::Cancel) => break false,
                    None => return,
                },
            }
        };

        if fire {
            debug!("Save window elapsed after {quiet:?}, running save");
            job().await;
        } else {
            debug!("Pending save cancelled");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(quiet: Duration) -> (SaveScheduler, Arc<AtomicUsize>) {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let scheduler = SaveScheduler::spawn(quiet, move || {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        (scheduler, runs)
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_within_window_coalesce() {
        let (scheduler, runs) = counting(Duration::from_secs(1));
        for _ in 0..5 {
            assert!(scheduler.request());
            tokio::time::sleep(Duration::from_millis(300)).await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);

        tokio::time::sleep(Duration::from_millis(800)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_windows_run_separately() {
        let (scheduler, runs) = counting(Duration::from_secs(1));
        scheduler.request();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        scheduler.request();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_window() {
        let (scheduler, runs) = counting(Duration::from_secs(1));
        scheduler.request();
        tokio::time::sleep(Duration::from_millis(200)).await;
        scheduler.cancel();
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requests_during_job_open_next_window() {
        let runs = Arc::new(AtomicUsize::new(0));
        let counter = runs.clone();
        let scheduler = SaveScheduler::spawn(Duration::from_secs(1), move || {
            let counter = counter.clone();
            async move {
                tokio::time::sleep(Duration::from_secs(2)).await;
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });

        scheduler.request();
        // Window closes at 1s, job runs until 3s.
        tokio::time::sleep(Duration::from_millis(1500)).await;
        scheduler.request();
        scheduler.request();
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        // Queued requests open one more window: 3s + 1s quiet + 2s job.
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
