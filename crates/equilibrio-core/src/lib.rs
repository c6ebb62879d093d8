//! # Equilibrio Core Library
//!
//! Routine scheduling and notification engine for the Equilibrio daily
//! routine tracker. A routine is an ordered list of time blocks; the engine
//! samples the wall clock, works out which block is active, keeps a
//! full-screen lock engaged during "sacred" blocks and fires block alarms,
//! pre-sacred warnings and a daily wellness reminder at most once per day.
//!
//! ## Architecture
//!
//! - **Engine**: an explicit context object. The caller invokes `tick(now)`
//!   periodically and applies user commands between ticks
//! - **Ticker**: optional tokio driver that owns the engine and serializes
//!   ticks and commands onto one task
//! - **Collaborators**: audio, system notifications, toasts and persistence
//!   are injected behind traits; their failures never abort a tick
//! - **Storage**: SQLite key/value state store and TOML host configuration
//!
//! ## Key Components
//!
//! - [`RoutineEngine`]: tick evaluation and user commands
//! - [`locate`]: active-block lookup
//! - [`SacredLock`]: lock state machine
//! - [`NotificationLedger`]: at-most-once-per-day tracking
//! - [`Ticker`]: periodic driver

pub mod clock;
pub mod dedup;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod events;
pub mod goals;
pub mod locator;
pub mod lock;
pub mod notify;
pub mod routine;
pub mod scheduler;
pub mod settings;
pub mod storage;

pub use clock::{Clock, ClockTime, DayKey, ManualClock, Sample, SystemClock};
pub use dedup::NotificationLedger;
pub use dispatch::{Notice, NoticeKind};
pub use engine::{EngineCommand, EngineOptions, EngineStatus, Evaluation, RoutineEngine, TickReport};
pub use error::{ConfigError, CoreError, RoutineError, StorageError, ValidationError};
pub use events::Event;
pub use goals::{Goal, GoalList, GoalPeriod};
pub use locator::{locate, ActiveBlock, Location};
pub use lock::{LockState, LockTransition, ReleaseReason, SacredLock};
pub use notify::{AudioPlayer, Notifiers, Permission, SystemNotifier, Toast, ToastKind, ToastSink};
pub use routine::{BlockType, Routine, RoutineRepository, TimeBlock};
pub use scheduler::{Ticker, TickerOutput};
pub use settings::AppSettings;
pub use storage::{Config, Database, MemoryStore, StateStore};
