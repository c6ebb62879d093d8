//! Periodic driver for [`RoutineEngine`].
//!
//! The engine is pure with respect to time; the ticker owns it, samples the
//! clock on a fixed interval and serializes user commands onto the same
//! task, so state only ever has one writer. Tests drive
//! [`RoutineEngine::tick`] directly instead.
//!
//! The interval must be at most 10 seconds. Triggers match exact minutes,
//! and a slower ticker can step over a minute entirely.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::engine::{EngineCommand, RoutineEngine, TickReport};
use crate::error::ValidationError;
use crate::events::Event;
use crate::storage::config::validate_tick_interval;
use crate::storage::Config;

/// Everything the ticker reports back to its host.
#[derive(Debug, Clone)]
pub enum TickerOutput {
    Tick(TickReport),
    Command(Option<Event>),
    CommandRejected(String),
}

#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    interval: Duration,
}

impl Ticker {
    pub fn new(interval: Duration) -> Result<Self, ValidationError> {
        let interval = validate_tick_interval(interval)?;
        Ok(Self { interval })
    }

    pub fn from_config(config: &Config) -> Result<Self, ValidationError> {
        Self::new(Duration::from_secs(config.engine.tick_interval_secs))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run until `shutdown` flips to `true` (or its sender is dropped),
    /// then hand the engine back.
    ///
    /// Ticks once immediately. Ticks delayed past their slot are skipped,
    /// not bunched up.
    pub async fn run(
        self,
        mut engine: RoutineEngine,
        clock: Arc<dyn Clock>,
        mut commands: mpsc::Receiver<EngineCommand>,
        mut shutdown: watch::Receiver<bool>,
        output: Option<mpsc::Sender<TickerOutput>>,
    ) -> RoutineEngine {
        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        info!(interval_ms = self.interval.as_millis() as u64, "ticker started");

        let emit = |out: TickerOutput| {
            if let Some(tx) = &output {
                if let Err(e) = tx.try_send(out) {
                    debug!(error = %e, "dropping ticker output");
                }
            }
        };

        loop {
            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    let stop = changed.is_err() || *shutdown.borrow();
                    if stop {
                        break;
                    }
                }
                Some(command) = commands.recv() => {
                    match engine.apply(command, clock.now()) {
                        Ok(event) => emit(TickerOutput::Command(event)),
                        Err(e) => {
                            warn!(error = %e, "command rejected");
                            emit(TickerOutput::CommandRejected(e.to_string()));
                        }
                    }
                }
                _ = interval.tick() => {
                    let report = engine.tick(clock.now());
                    emit(TickerOutput::Tick(report));
                }
            }
        }

        info!("ticker stopped");
        engine
    }
}
