//! Tick Scheduling
//!
//! The session logic never owns a timer directly; it asks a [`Scheduler`]
//! to call it back every interval. Production uses [`TokioScheduler`];
//! tests drive ticks by hand with [`ManualScheduler`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Callback fired once per tick
pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

/// Something that can invoke a callback at a fixed interval
pub trait Scheduler {
    /// Call `callback` every `interval` until the returned handle is
    /// cancelled or dropped
    fn schedule_every(&self, interval: Duration, callback: TickCallback) -> TickHandle;
}

/// Cancels its timer when dropped
pub struct TickHandle {
    cancelled: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl TickHandle {
    fn new(cancelled: Arc<AtomicBool>, task: Option<JoinHandle<()>>) -> Self {
        Self { cancelled, task }
    }

    /// Stop the timer. Idempotent.
    pub fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Scheduler backed by `tokio::time::interval`
///
/// The first tick fires immediately. Ticks missed while the runtime was
/// busy are skipped rather than replayed in a burst. Must be used from
/// within a Tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioScheduler;

impl TokioScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for TokioScheduler {
    fn schedule_every(&self, interval: Duration, mut callback: TickCallback) -> TickHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                if flag.load(Ordering::SeqCst) {
                    break;
                }
                callback();
            }
        });

        TickHandle::new(cancelled, Some(task))
    }
}

struct ManualEntry {
    interval: Duration,
    cancelled: Arc<AtomicBool>,
    callback: TickCallback,
}

/// Scheduler whose ticks are fired explicitly with [`ManualScheduler::advance`]
#[derive(Clone, Default)]
pub struct ManualScheduler {
    entries: Arc<Mutex<Vec<ManualEntry>>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every live callback once, in registration order.
    /// Returns how many callbacks ran.
    pub fn advance(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.retain(|entry| !entry.cancelled.load(Ordering::SeqCst));

        for entry in entries.iter_mut() {
            (entry.callback)();
        }
        entries.len()
    }

    /// Number of registered, uncancelled timers
    pub fn active(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|entry| !entry.cancelled.load(Ordering::SeqCst))
            .count()
    }

    /// Intervals of the uncancelled timers
    pub fn intervals(&self) -> Vec<Duration> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|entry| !entry.cancelled.load(Ordering::SeqCst))
            .map(|entry| entry.interval)
            .collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_every(&self, interval: Duration, callback: TickCallback) -> TickHandle {
        let cancelled = Arc::new(AtomicBool::new(false));
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(ManualEntry {
                interval,
                cancelled: Arc::clone(&cancelled),
                callback,
            });

        TickHandle::new(cancelled, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter() -> (Arc<AtomicUsize>, TickCallback) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let callback: TickCallback = Box::new(move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (count, callback)
    }

    #[test]
    fn test_manual_advance() {
        let scheduler = ManualScheduler::new();
        let (count, callback) = counter();
        let _handle = scheduler.schedule_every(Duration::from_secs(1), callback);

        assert_eq!(scheduler.advance(), 1);
        assert_eq!(scheduler.advance(), 1);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(scheduler.intervals(), vec![Duration::from_secs(1)]);
    }

    #[test]
    fn test_manual_cancel_on_drop() {
        let scheduler = ManualScheduler::new();
        let (count, callback) = counter();
        let handle = scheduler.schedule_every(Duration::from_secs(1), callback);

        scheduler.advance();
        drop(handle);

        assert_eq!(scheduler.advance(), 0);
        assert_eq!(scheduler.active(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_ticks() {
        let (count, callback) = counter();
        let mut handle = TokioScheduler::new().schedule_every(Duration::from_secs(1), callback);

        // First tick is immediate, then one per second
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);

        handle.cancel();
        assert!(handle.is_cancelled());
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 4);
    }
}
