//! # Live Dashboard
//!
//! A live dashboard that shows a periodically updating simulated temperature
//! reading, its capture time, a rolling table of recent readings and a trend
//! line, streamed to each browser tab over WebSocket.
//!
//! ## Modules
//!
//! - [`reading`]: `Reading` type and the random `ReadingGenerator`
//! - [`store`]: `ReactiveStore`, a bounded history that notifies subscribers
//! - [`scheduler`]: injected timer abstraction (`schedule_every`)
//! - [`session`]: one Generator/Store pair per client
//! - [`views`]: pure renderings of a snapshot
//! - [`api`] / [`websocket`]: Axum server
//!
//! ## Quick Start
//!
//! ```rust
//! use live_dashboard::session::{DashboardSession, SessionConfig};
//!
//! let mut session = DashboardSession::new(SessionConfig::default().with_seed(1)).unwrap();
//! session.subscribe_view(|view| println!("{}", view.current_temperature));
//!
//! for _ in 0..3 {
//!     session.tick();
//! }
//!
//! assert_eq!(session.snapshot().history.len(), 3);
//! ```

pub mod api;
pub mod config;
pub mod reading;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod views;
pub mod websocket;

// Re-export top-level types for convenience
pub use reading::{
    GeneratorConfig, GeneratorError, Reading, ReadingGenerator, TemperatureUnit, ValueRange,
};

pub use store::{History, ReactiveStore, Snapshot, StoreState, SubscriptionId};

pub use scheduler::{ManualScheduler, Scheduler, TickHandle, TokioScheduler};

pub use session::{DashboardSession, SessionConfig, SharedSession};

pub use views::{DashboardView, TableRow, Trend};

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{ClientMessage, HubConfig, HubError, ServerMessage, SessionHub};

pub use config::{Config, ConfigError, DashboardConfig, LoggingConfig, ServerConfig};
