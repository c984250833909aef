//! Periodic retention sweeps on the tokio runtime

use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

/// Something holding expiring state
pub trait Sweep: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Drop expired entries and return how many were removed
    fn sweep(&self) -> usize;
}

/// Runs every registered [`Sweep`] on a fixed interval
pub struct SweepScheduler {
    interval: Duration,
    targets: Vec<Arc<dyn Sweep>>,
    active: Arc<AtomicBool>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl SweepScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            targets: Vec::new(),
            active: Arc::new(AtomicBool::new(false)),
            handle: Mutex::new(None),
        }
    }

    /// Add a sweep target
    pub fn register(mut self, target: Arc<dyn Sweep>) -> Self {
        self.targets.push(target);
        self
    }

    /// Sweep every target once, returning the total removed
    pub fn run_once(&self) -> usize {
        sweep_all(&self.targets)
    }

    /// Spawn the background task. Calling `start` twice is a no-op.
    pub fn start(&self) {
        if self.active.swap(true, Ordering::AcqRel) {
            return;
        }

        let targets = self.targets.clone();
        let active = self.active.clone();
        let period = self.interval;

        info!(
            interval_secs = period.as_secs(),
            targets = targets.len(),
            "Starting retention sweeper"
        );

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately
            interval.tick().await;

            while active.load(Ordering::Acquire) {
                interval.tick().await;
                sweep_all(&targets);
            }
        });

        *self.handle.lock() = Some(handle);
    }

    /// Stop the background task
    pub fn stop(&self) {
        self.active.store(false, Ordering::Release);
        if let Some(handle) = self.handle.lock().take() {
            handle.abort();
            info!("Retention sweeper stopped");
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    pub fn target_names(&self) -> Vec<&'static str> {
        self.targets.iter().map(|t| t.name()).collect()
    }
}

impl Drop for SweepScheduler {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.get_mut().take() {
            handle.abort();
        }
    }
}

impl std::fmt::Debug for SweepScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepScheduler")
            .field("interval", &self.interval)
            .field("targets", &self.target_names())
            .field("active", &self.is_active())
            .finish()
    }
}

fn sweep_all(targets: &[Arc<dyn Sweep>]) -> usize {
    targets
        .iter()
        .map(|target| {
            let removed = target.sweep();
            if removed > 0 {
                debug!(target = target.name(), removed, "Swept expired entries");
            }
            removed
        })
        .sum()
}
