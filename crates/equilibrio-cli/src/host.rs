//! Console collaborators for the engine.
//!
//! Toasts go to stdout, the alarm is the terminal bell, and system
//! notifications become log lines.

use std::io::Write;

use chrono::{Local, NaiveDateTime};
use equilibrio_core::notify::NotifyError;
use equilibrio_core::{
    AudioPlayer, Config, Database, EngineOptions, Notifiers, Permission, RoutineEngine,
    SystemNotifier, Toast, ToastKind, ToastSink,
};

pub struct TerminalBell;

impl AudioPlayer for TerminalBell {
    fn play(&self, source: &str) -> Result<(), NotifyError> {
        tracing::debug!(source, "ringing terminal bell");
        let mut stderr = std::io::stderr();
        stderr
            .write_all(b"\x07")
            .and_then(|_| stderr.flush())
            .map_err(|e| NotifyError::AudioBlocked(e.to_string()))
    }
}

pub struct LogNotifier;

impl SystemNotifier for LogNotifier {
    fn permission(&self) -> Permission {
        Permission::Granted
    }

    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        tracing::info!(target: "notification", title, body);
        Ok(())
    }
}

pub struct StdoutToasts;

impl ToastSink for StdoutToasts {
    fn show(&self, toast: Toast) {
        let tag = match toast.kind {
            ToastKind::Info => "info",
            ToastKind::Warning => "warning",
            ToastKind::Success => "success",
        };
        println!("[{tag}] {}", toast.message);
    }
}

pub fn console_notifiers() -> Notifiers {
    Notifiers {
        audio: Box::new(TerminalBell),
        system: Box::new(LogNotifier),
        toasts: Box::new(StdoutToasts),
    }
}

/// Open the engine over the on-disk state store.
pub fn open_engine(
    options: EngineOptions,
    notifiers: Notifiers,
) -> Result<RoutineEngine, Box<dyn std::error::Error>> {
    let db = Database::open()?;
    Ok(RoutineEngine::with_options(Box::new(db), notifiers, options))
}

/// Engine for one-shot management commands: no audio, no toasts.
pub fn open_quiet_engine(config: &Config) -> Result<RoutineEngine, Box<dyn std::error::Error>> {
    open_engine(EngineOptions::from(config), Notifiers::default())
}

pub fn now() -> NaiveDateTime {
    Local::now().naive_local()
}
