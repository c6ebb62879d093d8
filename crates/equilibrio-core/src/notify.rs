//! Outbound collaborators: audio, system notifications and toasts.
//!
//! All three are best-effort. The engine logs their failures and moves on;
//! one channel failing never stops the others.

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    /// Playback refused by the host (autoplay policy, no device, ...)
    #[error("Audio playback blocked: {0}")]
    AudioBlocked(String),

    /// Channel not available on this host
    #[error("Notification channel unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Warning,
    Success,
}

/// Transient UI message. Hosts show one at a time; a new one replaces the old.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
}

impl Toast {
    pub fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    /// Not asked yet.
    Default,
}

/// Fire-and-forget sound playback.
pub trait AudioPlayer: Send {
    fn play(&self, source: &str) -> Result<(), NotifyError>;
}

/// OS-level notifications.
pub trait SystemNotifier: Send {
    fn permission(&self) -> Permission;
    fn request_permission(&mut self) -> Permission;
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;
}

pub trait ToastSink: Send {
    fn show(&self, toast: Toast);
}

/// Plays nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioPlayer for SilentAudio {
    fn play(&self, _source: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Never granted; every notification is skipped.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoSystemNotifier;

impl SystemNotifier for NoSystemNotifier {
    fn permission(&self) -> Permission {
        Permission::Denied
    }

    fn request_permission(&mut self) -> Permission {
        Permission::Denied
    }

    fn notify(&self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Err(NotifyError::Unavailable("no system notifier".into()))
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardToasts;

impl ToastSink for DiscardToasts {
    fn show(&self, _toast: Toast) {}
}

/// Records every played source. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    played: Arc<Mutex<Vec<String>>>,
    fail: bool,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the attempt, then reports a blocked playback.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn played(&self) -> Vec<String> {
        self.played.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl AudioPlayer for RecordingAudio {
    fn play(&self, source: &str) -> Result<(), NotifyError> {
        if let Ok(mut played) = self.played.lock() {
            played.push(source.to_string());
        }
        if self.fail {
            return Err(NotifyError::AudioBlocked("autoplay disallowed".into()));
        }
        Ok(())
    }
}

/// Records delivered notifications. Clones share the same log.
#[derive(Debug, Clone)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, String)>>>,
    permission: Permission,
    grant_on_request: bool,
}

impl RecordingNotifier {
    pub fn granted() -> Self {
        Self {
            sent: Arc::default(),
            permission: Permission::Granted,
            grant_on_request: true,
        }
    }

    pub fn denied() -> Self {
        Self {
            sent: Arc::default(),
            permission: Permission::Denied,
            grant_on_request: false,
        }
    }

    /// Starts undecided and grants when asked.
    pub fn undecided() -> Self {
        Self {
            sent: Arc::default(),
            permission: Permission::Default,
            grant_on_request: true,
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl SystemNotifier for RecordingNotifier {
    fn permission(&self) -> Permission {
        self.permission
    }

    fn request_permission(&mut self) -> Permission {
        if self.permission == Permission::Default {
            self.permission = if self.grant_on_request {
                Permission::Granted
            } else {
                Permission::Denied
            };
        }
        self.permission
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push((title.to_string(), body.to_string()));
        }
        Ok(())
    }
}

/// Records shown toasts. Clones share the same log.
#[derive(Debug, Default, Clone)]
pub struct RecordingToasts {
    shown: Arc<Mutex<Vec<Toast>>>,
}

impl RecordingToasts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shown(&self) -> Vec<Toast> {
        self.shown.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// The toast currently on screen.
    pub fn current(&self) -> Option<Toast> {
        self.shown.lock().ok().and_then(|s| s.last().cloned())
    }
}

impl ToastSink for RecordingToasts {
    fn show(&self, toast: Toast) {
        if let Ok(mut shown) = self.shown.lock() {
            shown.push(toast);
        }
    }
}

/// The collaborator bundle handed to the engine.
pub struct Notifiers {
    pub audio: Box<dyn AudioPlayer>,
    pub system: Box<dyn SystemNotifier>,
    pub toasts: Box<dyn ToastSink>,
}

impl Default for Notifiers {
    fn default() -> Self {
        Self {
            audio: Box::new(SilentAudio),
            system: Box::new(NoSystemNotifier),
            toasts: Box::new(DiscardToasts),
        }
    }
}
