//! Routine engine.
//!
//! An explicit context object owning every piece of mutable state: the
//! routine repository, settings, goals, the notification ledger, the lock
//! and the mute flag. It has no thread or timer of its own; a host (or
//! [`crate::scheduler::Ticker`]) calls [`RoutineEngine::tick`] with the
//! current wall-clock time and applies user commands between ticks.
//!
//! ## Tick
//!
//! ```text
//! sample clock -> locate active block -> update lock -> dispatch notices
//! ```
//!
//! Collaborator failures (audio, system notification, persistence) are
//! logged and swallowed; a tick never fails.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{ClockTime, Sample};
use crate::dedup::NotificationLedger;
use crate::dispatch::{dispatch, DispatchInput, Notice, NOTIFICATION_TITLE};
use crate::error::Result;
use crate::events::Event;
use crate::goals::{Goal, GoalList, GoalPeriod};
use crate::locator::{locate, Location};
use crate::lock::{LockState, LockTransition, SacredLock};
use crate::notify::{Notifiers, Permission};
use crate::routine::{Routine, RoutineRepository};
use crate::settings::AppSettings;
use crate::storage::state::{
    save_json, PersistedState, GOALS_KEY, ROUTINES_KEY, SELECTED_ROUTINE_KEY, SETTINGS_KEY,
};
use crate::storage::{Config, StateStore};

/// Host-level switches, usually taken from [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    pub start_muted: bool,
    pub system_notifications: bool,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            start_muted: false,
            system_notifications: true,
        }
    }
}

impl From<&Config> for EngineOptions {
    fn from(config: &Config) -> Self {
        Self {
            start_muted: config.engine.start_muted,
            system_notifications: config.notifications.system,
        }
    }
}

/// User-initiated commands, applied between ticks.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    EmergencyUnlock,
    SetMuted(bool),
    ToggleMute,
    UpdateRoutine(Routine),
    DeleteRoutine(String),
    SelectRoutine(String),
    UpdateSettings(AppSettings),
}

/// What one tick saw and did.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReport {
    pub sample: Sample,
    pub routine_id: String,
    pub location: Location,
    pub lock: LockState,
    pub notices: Vec<Notice>,
    pub events: Vec<Event>,
}

/// Serializable view of the engine for hosts.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStatus {
    pub routine_id: String,
    pub routine_name: String,
    pub lock: LockState,
    pub muted: bool,
    pub fired_today_keys: usize,
}

/// A side-effect-free look at a given instant.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub sample: Sample,
    pub routine_id: String,
    pub location: Location,
    pub locked: bool,
    pub next_start: Option<ClockTime>,
    /// Notices a tick at this instant would fire, given what has fired so far.
    pub notices: Vec<Notice>,
}

pub struct RoutineEngine {
    routines: RoutineRepository,
    goals: GoalList,
    settings: AppSettings,
    ledger: NotificationLedger,
    lock: SacredLock,
    muted: bool,
    system_notifications: bool,
    store: Box<dyn StateStore>,
    notifiers: Notifiers,
}

impl RoutineEngine {
    /// Hydrate from `store` with default options.
    pub fn new(store: Box<dyn StateStore>, notifiers: Notifiers) -> Self {
        Self::with_options(store, notifiers, EngineOptions::default())
    }

    pub fn with_options(
        store: Box<dyn StateStore>,
        mut notifiers: Notifiers,
        options: EngineOptions,
    ) -> Self {
        let state = PersistedState::load(store.as_ref());
        if options.system_notifications && notifiers.system.permission() == Permission::Default {
            let granted = notifiers.system.request_permission();
            debug!(?granted, "requested system notification permission");
        }
        Self {
            routines: state.routines,
            goals: state.goals,
            settings: state.settings,
            ledger: NotificationLedger::new(),
            lock: SacredLock::new(),
            muted: options.start_muted,
            system_notifications: options.system_notifications,
            store,
            notifiers,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn routines(&self) -> &RoutineRepository {
        &self.routines
    }

    pub fn selected_routine(&self) -> Option<&Routine> {
        self.routines.selected()
    }

    pub fn goals(&self) -> &GoalList {
        &self.goals
    }

    pub fn settings(&self) -> &AppSettings {
        &self.settings
    }

    pub fn lock_state(&self) -> &LockState {
        self.lock.state()
    }

    pub fn is_locked(&self) -> bool {
        self.lock.is_locked()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn ledger(&self) -> &NotificationLedger {
        &self.ledger
    }

    pub fn snapshot(&self) -> EngineStatus {
        EngineStatus {
            routine_id: self.routines.selected_id().to_string(),
            routine_name: self
                .selected_routine()
                .map(|r| r.name.clone())
                .unwrap_or_default(),
            lock: self.lock.state().clone(),
            muted: self.muted,
            fired_today_keys: self.ledger.len(),
        }
    }

    /// What a tick at `now` would see, without touching any state.
    pub fn evaluate(&self, now: NaiveDateTime) -> Evaluation {
        let sample = Sample::of(now);
        let routine = self.selected_routine();
        let location = routine
            .map(|r| locate(r, sample.minute_of_day))
            .unwrap_or_default();
        let mut ledger = self.ledger.clone();
        let notices = dispatch(
            DispatchInput {
                routine,
                sample: &sample,
                settings: &self.settings,
                muted: self.muted,
            },
            &mut ledger,
        );
        Evaluation {
            routine_id: self.routines.selected_id().to_string(),
            locked: location.is_sacred(),
            next_start: location.next_start,
            location,
            sample,
            notices,
        }
    }

    // ── Tick ─────────────────────────────────────────────────────────

    pub fn tick(&mut self, now: NaiveDateTime) -> TickReport {
        let sample = Sample::of(now);
        let routine_id = self.routines.selected_id().to_string();
        let routine = self.routines.selected();
        let location = routine
            .map(|r| locate(r, sample.minute_of_day))
            .unwrap_or_default();

        let mut events = Vec::new();

        if let Some(transition) = self.lock.observe(location.active_block()) {
            match transition {
                LockTransition::Engaged { label } => {
                    info!(routine = %routine_id, activity = %label, "sacred block lock engaged");
                    if !self.muted {
                        self.play_alarm();
                    }
                    events.push(Event::LockEngaged {
                        routine_id: routine_id.clone(),
                        block_id: location
                            .active_block()
                            .map(|b| b.id.clone())
                            .unwrap_or_default(),
                        label,
                        at: now,
                    });
                }
                LockTransition::Released { reason } => {
                    info!(?reason, "sacred block lock released");
                    events.push(Event::LockReleased { reason, at: now });
                }
            }
        }

        let notices = dispatch(
            DispatchInput {
                routine,
                sample: &sample,
                settings: &self.settings,
                muted: self.muted,
            },
            &mut self.ledger,
        );
        for notice in &notices {
            self.deliver(notice);
            events.push(Event::NoticeFired {
                kind: notice.kind,
                key: notice.key.clone(),
                message: notice.toast.message.clone(),
                at: now,
            });
        }

        TickReport {
            sample,
            routine_id,
            location,
            lock: self.lock.state().clone(),
            notices,
            events,
        }
    }

    fn play_alarm(&self) {
        let source = self.settings.alarm_source();
        if let Err(e) = self.notifiers.audio.play(source) {
            debug!(error = %e, "alarm playback failed");
        }
    }

    fn deliver(&self, notice: &Notice) {
        info!(kind = ?notice.kind, key = %notice.key, "notice fired");
        if notice.play_audio {
            self.play_alarm();
        }
        if let Some(body) = &notice.system_body {
            if self.system_notifications && self.notifiers.system.permission() == Permission::Granted {
                if let Err(e) = self.notifiers.system.notify(NOTIFICATION_TITLE, body) {
                    debug!(error = %e, "system notification failed");
                }
            }
        }
        self.notifiers.toasts.show(notice.toast.clone());
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn emergency_unlock(&mut self, at: NaiveDateTime) -> Option<Event> {
        match self.lock.emergency_unlock()? {
            LockTransition::Released { reason } => {
                warn!("emergency unlock during sacred block");
                Some(Event::LockReleased { reason, at })
            }
            LockTransition::Engaged { .. } => None,
        }
    }

    /// Returns an event only when the flag actually changed.
    pub fn set_muted(&mut self, muted: bool, at: NaiveDateTime) -> Option<Event> {
        if self.muted == muted {
            return None;
        }
        self.muted = muted;
        Some(Event::MuteChanged { muted, at })
    }

    pub fn toggle_mute(&mut self, at: NaiveDateTime) -> Event {
        self.muted = !self.muted;
        Event::MuteChanged {
            muted: self.muted,
            at,
        }
    }

    /// Insert or replace a routine by id.
    pub fn update_routine(&mut self, routine: Routine, at: NaiveDateTime) -> Event {
        let routine_id = routine.id.clone();
        let created = self.routines.upsert(routine).is_none();
        self.persist_routines();
        Event::RoutineUpdated {
            routine_id,
            created,
            at,
        }
    }

    pub fn delete_routine(&mut self, id: &str, at: NaiveDateTime) -> Result<Event> {
        let deletion = self.routines.delete(id)?;
        if let Some(selected) = &deletion.reselected {
            info!(deleted = %id, selected = %selected, "selected routine deleted, reselected");
        }
        self.persist_routines();
        Ok(Event::RoutineDeleted {
            routine_id: deletion.removed.id,
            reselected: deletion.reselected,
            restored_defaults: deletion.restored_defaults,
            at,
        })
    }

    pub fn select_routine(&mut self, id: &str, at: NaiveDateTime) -> Result<Event> {
        self.routines.select(id)?;
        self.persist(SELECTED_ROUTINE_KEY, self.routines.selected_id());
        Ok(Event::RoutineSelected {
            routine_id: id.to_string(),
            at,
        })
    }

    pub fn update_settings(&mut self, settings: AppSettings, at: NaiveDateTime) -> Event {
        self.settings = settings;
        self.persist(SETTINGS_KEY, &self.settings);
        Event::SettingsUpdated { at }
    }

    pub fn add_goal(&mut self, text: &str, period: GoalPeriod, category: Option<String>) -> Goal {
        let goal = self.goals.add(text, period, category).clone();
        self.persist(GOALS_KEY, &self.goals);
        goal
    }

    pub fn toggle_goal(&mut self, id: &str) -> Result<bool> {
        let completed = self.goals.toggle(id)?;
        self.persist(GOALS_KEY, &self.goals);
        Ok(completed)
    }

    pub fn delete_goal(&mut self, id: &str) -> Result<Goal> {
        let goal = self.goals.delete(id)?;
        self.persist(GOALS_KEY, &self.goals);
        Ok(goal)
    }

    /// Apply a queued command. Unknown ids surface as errors; everything
    /// else succeeds.
    pub fn apply(&mut self, command: EngineCommand, at: NaiveDateTime) -> Result<Option<Event>> {
        Ok(match command {
            EngineCommand::EmergencyUnlock => self.emergency_unlock(at),
            EngineCommand::SetMuted(muted) => self.set_muted(muted, at),
            EngineCommand::ToggleMute => Some(self.toggle_mute(at)),
            EngineCommand::UpdateRoutine(routine) => Some(self.update_routine(routine, at)),
            EngineCommand::DeleteRoutine(id) => Some(self.delete_routine(&id, at)?),
            EngineCommand::SelectRoutine(id) => Some(self.select_routine(&id, at)?),
            EngineCommand::UpdateSettings(settings) => Some(self.update_settings(settings, at)),
        })
    }

    // ── Persistence ──────────────────────────────────────────────────

    fn persist_routines(&self) {
        self.persist(ROUTINES_KEY, self.routines.routines());
        self.persist(SELECTED_ROUTINE_KEY, self.routines.selected_id());
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = save_json(self.store.as_ref(), key, value) {
            warn!(key, error = %e, "failed to persist state");
        }
    }
}
