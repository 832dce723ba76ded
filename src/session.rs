//! Dashboard Session
//!
//! One independent Generator/Store pair. Every connected client gets its
//! own session, so nothing about reading state is shared between clients.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::config::DashboardConfig;
use crate::reading::{GeneratorConfig, GeneratorError, ReadingGenerator, TemperatureUnit};
use crate::scheduler::{Scheduler, TickHandle};
use crate::store::{ReactiveStore, Snapshot, SubscriptionId};
use crate::views::DashboardView;

/// Session settings derived from [`DashboardConfig`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub update_interval: Duration,
    pub history_max_length: usize,
    pub unit: TemperatureUnit,
    pub generator: GeneratorConfig,
}

impl SessionConfig {
    /// Override the generator seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.generator.seed = Some(seed);
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig::from(&DashboardConfig::default())
    }
}

impl From<&DashboardConfig> for SessionConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            update_interval: config.update_interval(),
            history_max_length: config.history_max_length,
            unit: config.unit,
            generator: GeneratorConfig {
                range: config.value_range,
                decimals: Some(config.decimals),
                seed: None,
            },
        }
    }
}

/// Generator plus the store it feeds
pub struct DashboardSession {
    generator: ReadingGenerator,
    store: ReactiveStore,
    config: SessionConfig,
}

/// Session shared with its own timer callback
pub type SharedSession = Arc<Mutex<DashboardSession>>;

impl DashboardSession {
    pub fn new(config: SessionConfig) -> Result<Self, GeneratorError> {
        Ok(Self {
            generator: ReadingGenerator::new(config.generator)?,
            store: ReactiveStore::new(config.history_max_length),
            config,
        })
    }

    /// Produce one reading and record it, notifying every subscriber
    pub fn tick(&mut self) {
        let reading = self.generator.produce_reading();
        tracing::trace!(
            value = reading.value(),
            produced = self.generator.produced(),
            "Tick"
        );
        self.store.record(reading);
    }

    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }

    /// Current page rendered in the configured unit
    pub fn view(&self) -> DashboardView {
        DashboardView::render(&self.store.snapshot(), self.config.unit)
    }

    /// Subscribe a callback that receives a freshly rendered view after each tick
    pub fn subscribe_view<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(DashboardView) + Send + 'static,
    {
        let unit = self.config.unit;
        self.store
            .subscribe(move |snapshot| callback(DashboardView::render(snapshot, unit)))
    }

    /// Raw store access for subscribing snapshot-level callbacks
    pub fn store_mut(&mut self) -> &mut ReactiveStore {
        &mut self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Wrap the session so it can be driven by a timer
    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    /// Tick `session` every configured interval on `scheduler`
    ///
    /// The timer stops when the returned handle is dropped.
    pub fn start(session: &SharedSession, scheduler: &dyn Scheduler) -> TickHandle {
        let interval = lock(session).config.update_interval;
        let ticking = Arc::clone(session);

        scheduler.schedule_every(interval, Box::new(move || lock(&ticking).tick()))
    }
}

/// Lock a shared session, recovering from a poisoned mutex
///
/// A panicking subscriber cannot leave the store half-updated: `record`
/// finishes mutating before any subscriber runs.
pub fn lock(session: &SharedSession) -> MutexGuard<'_, DashboardSession> {
    session.lock().unwrap_or_else(|e| e.into_inner())
}
