//! Integration tests driving the engine through whole days of ticks.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use equilibrio_core::notify::{RecordingAudio, RecordingNotifier, RecordingToasts};
use equilibrio_core::routine::DEFAULT_ROUTINE_ID;
use equilibrio_core::storage::state::{ROUTINES_KEY, SELECTED_ROUTINE_KEY, SETTINGS_KEY};
use equilibrio_core::{
    locate, AppSettings, BlockType, Event, MemoryStore, NoticeKind, Notifiers, Routine,
    RoutineEngine, TimeBlock, ToastKind,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn at(d: u32, h: u32, m: u32, s: u32) -> NaiveDateTime {
    day(d).and_hms_opt(h, m, s).unwrap()
}

struct Harness {
    engine: RoutineEngine,
    audio: RecordingAudio,
    notifier: RecordingNotifier,
    toasts: RecordingToasts,
    store: MemoryStore,
}

fn harness(store: MemoryStore, notifier: RecordingNotifier, audio: RecordingAudio) -> Harness {
    let toasts = RecordingToasts::new();
    let notifiers = Notifiers {
        audio: Box::new(audio.clone()),
        system: Box::new(notifier.clone()),
        toasts: Box::new(toasts.clone()),
    };
    Harness {
        engine: RoutineEngine::new(Box::new(store.clone()), notifiers),
        audio,
        notifier,
        toasts,
        store,
    }
}

fn with_routine(routine: Routine, settings: AppSettings) -> Harness {
    let mut h = harness(MemoryStore::new(), RecordingNotifier::granted(), RecordingAudio::new());
    let id = routine.id.clone();
    h.engine.update_routine(routine, at(19, 0, 0, 0));
    h.engine.select_routine(&id, at(19, 0, 0, 0)).unwrap();
    h.engine.update_settings(settings, at(19, 0, 0, 0));
    h
}

fn no_vitamin_d() -> AppSettings {
    AppSettings {
        vitamin_d_enabled: false,
        ..AppSettings::default()
    }
}

fn workday() -> Routine {
    Routine::new("workday", "Workday", "").with_blocks(vec![
        TimeBlock::new("w1", "09:00", "Deep work", BlockType::Work),
        TimeBlock::new("s1", "14:00", "Family lunch", BlockType::Sacred),
        TimeBlock::new("b1", "15:00", "Walk", BlockType::Break).with_alarm(false),
        TimeBlock::new("w2", "15:30", "Email", BlockType::Work),
        TimeBlock::new("s2", "18:00", "Kids", BlockType::Sacred),
        TimeBlock::new("s3", "19:00", "Dinner", BlockType::Sacred),
    ])
}

/// Tick every ten seconds across a whole day and collect all reports.
fn run_day(h: &mut Harness, d: u32) -> Vec<equilibrio_core::TickReport> {
    let mut reports = Vec::new();
    let mut now = at(d, 0, 0, 0);
    let end = at(d, 23, 59, 59);
    while now <= end {
        reports.push(h.engine.tick(now));
        now += Duration::seconds(10);
    }
    reports
}

#[test]
fn lock_tracks_sacred_windows_all_day() {
    let mut h = with_routine(workday(), no_vitamin_d());
    let routine = workday();

    for report in run_day(&mut h, 19) {
        let expected = locate(&routine, report.sample.minute_of_day).is_sacred();
        assert_eq!(
            report.lock.locked, expected,
            "lock mismatch at {}",
            report.sample.at
        );
    }

    // s2 and s3 are back to back: one engage for the pair, no flicker.
    let h2 = &mut with_routine(workday(), no_vitamin_d());
    let engaged = run_day(h2, 19)
        .iter()
        .flat_map(|r| r.events.iter())
        .filter(|e| matches!(e, Event::LockEngaged { .. }))
        .count();
    assert_eq!(engaged, 2);
}

#[test]
fn back_to_back_sacred_blocks_refresh_label() {
    let mut h = with_routine(workday(), no_vitamin_d());
    h.engine.tick(at(19, 18, 30, 0));
    assert_eq!(h.engine.lock_state().active_sacred_activity_label, "Kids");
    let report = h.engine.tick(at(19, 19, 0, 0));
    assert!(report.lock.locked);
    assert_eq!(report.lock.active_sacred_activity_label, "Dinner");
    assert!(!report
        .events
        .iter()
        .any(|e| matches!(e, Event::LockEngaged { .. } | Event::LockReleased { .. })));
    assert!(!h.engine.tick(at(19, 20, 0, 0)).lock.locked);
}

#[test]
fn every_trigger_fires_once_per_day() {
    let mut h = with_routine(workday(), AppSettings::default());

    let fired: Vec<_> = run_day(&mut h, 19)
        .into_iter()
        .flat_map(|r| r.notices)
        .collect();

    let mut keys: Vec<_> = fired.iter().map(|n| n.key.clone()).collect();
    let total = keys.len();
    keys.sort();
    keys.dedup();
    assert_eq!(keys.len(), total, "a key fired twice: {keys:?}");

    let alarms = fired.iter().filter(|n| n.kind == NoticeKind::BlockAlarm).count();
    let warnings = fired.iter().filter(|n| n.kind == NoticeKind::SacredWarning).count();
    let wellness = fired.iter().filter(|n| n.kind == NoticeKind::WellnessReminder).count();
    // Six blocks, one with its alarm switched off.
    assert_eq!(alarms, 5);
    // s1 follows w1 and s2 follows w2; s3 follows a sacred block.
    assert_eq!(warnings, 2);
    assert_eq!(wellness, 1);

    // Next day everything fires again.
    let next: Vec<_> = run_day(&mut h, 20).into_iter().flat_map(|r| r.notices).collect();
    assert_eq!(next.len(), fired.len());
}

#[test]
fn unset_alarm_flag_matches_explicit_true() {
    let unset = Routine::new("r", "R", "")
        .with_blocks(vec![TimeBlock::new("a", "08:00", "Start", BlockType::Work)]);
    let explicit = Routine::new("r", "R", "").with_blocks(vec![
        TimeBlock::new("a", "08:00", "Start", BlockType::Work).with_alarm(true),
    ]);

    let mut a = with_routine(unset, no_vitamin_d());
    let mut b = with_routine(explicit, no_vitamin_d());
    let ra: Vec<_> = run_day(&mut a, 19).into_iter().flat_map(|r| r.notices).collect();
    let rb: Vec<_> = run_day(&mut b, 19).into_iter().flat_map(|r| r.notices).collect();
    assert_eq!(ra, rb);
    assert_eq!(ra.len(), 1);
    assert_eq!(a.toasts.current().unwrap().message, "Alarma: Start");
}

#[test]
fn sacred_warning_fires_only_on_the_exact_minute() {
    let routine = Routine::new("r", "R", "").with_blocks(vec![
        TimeBlock::new("w", "12:00", "Work", BlockType::Work).with_alarm(false),
        TimeBlock::new("s", "14:00", "Lunch", BlockType::Sacred).with_alarm(false),
    ]);
    let mut h = with_routine(routine.clone(), no_vitamin_d());

    assert!(h.engine.tick(at(19, 13, 44, 50)).notices.is_empty());
    let report = h.engine.tick(at(19, 13, 45, 0));
    assert_eq!(report.notices.len(), 1);
    assert!(h.engine.tick(at(19, 13, 45, 50)).notices.is_empty());
    assert!(h.engine.tick(at(19, 13, 46, 0)).notices.is_empty());

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, "Equilibrio IA");
    assert!(sent[0].1.contains("\"Lunch\""));
    assert_eq!(h.toasts.current().unwrap().kind, ToastKind::Warning);
    assert_eq!(h.audio.played().len(), 1);

    // A host that slept through 13:45 never gets the warning late.
    let mut late = with_routine(routine, no_vitamin_d());
    assert!(late.engine.tick(at(19, 13, 44, 0)).notices.is_empty());
    assert!(late.engine.tick(at(19, 13, 47, 0)).notices.is_empty());
    assert!(late.notifier.sent().is_empty());
}

#[test]
fn vitamin_d_reminder_daily() {
    let mut h = with_routine(Routine::new("empty", "Empty", ""), AppSettings::default());

    let first = h.engine.tick(at(19, 10, 0, 5));
    assert_eq!(first.notices.len(), 1);
    assert_eq!(first.notices[0].kind, NoticeKind::WellnessReminder);
    assert_eq!(h.toasts.current().unwrap().kind, ToastKind::Success);

    for s in [15, 25, 35, 45, 55] {
        assert!(h.engine.tick(at(19, 10, 0, s)).notices.is_empty());
    }
    assert!(h.engine.tick(at(19, 22, 0, 0)).notices.is_empty());
    assert_eq!(h.engine.tick(at(20, 10, 0, 0)).notices.len(), 1);
    assert_eq!(h.notifier.sent().len(), 2);
}

#[test]
fn denied_permission_skips_only_system_channel() {
    let mut h = harness(MemoryStore::new(), RecordingNotifier::denied(), RecordingAudio::new());
    h.engine.update_routine(Routine::new("empty", "Empty", ""), at(19, 0, 0, 0));
    h.engine.select_routine("empty", at(19, 0, 0, 0)).unwrap();

    let report = h.engine.tick(at(19, 10, 0, 0));
    assert_eq!(report.notices.len(), 1);
    assert!(h.notifier.sent().is_empty());
    assert_eq!(h.toasts.shown().len(), 1);
    assert_eq!(h.audio.played().len(), 1);
}

#[test]
fn undecided_permission_is_requested_at_startup() {
    let mut h = harness(MemoryStore::new(), RecordingNotifier::undecided(), RecordingAudio::new());
    h.engine.tick(at(19, 10, 0, 0));
    // The recorder handle keeps its own permission copy, but deliveries
    // land in the shared log once the engine's copy was granted.
    assert_eq!(h.notifier.sent().len(), 1);
}

#[test]
fn audio_failure_does_not_abort_tick() {
    let mut h = harness(MemoryStore::new(), RecordingNotifier::granted(), RecordingAudio::failing());
    h.engine.update_routine(workday(), at(19, 0, 0, 0));
    h.engine.select_routine("workday", at(19, 0, 0, 0)).unwrap();

    let report = h.engine.tick(at(19, 14, 0, 0));
    assert!(report.lock.locked);
    assert!(!report.notices.is_empty());
    assert!(!h.audio.played().is_empty());
    assert!(!h.toasts.shown().is_empty());
}

#[test]
fn muted_engine_plays_nothing() {
    let mut h = with_routine(workday(), AppSettings::default());
    h.engine.set_muted(true, at(19, 0, 0, 0));
    let notices: Vec<_> = run_day(&mut h, 19).into_iter().flat_map(|r| r.notices).collect();
    assert!(h.audio.played().is_empty());
    assert!(notices.iter().all(|n| n.kind != NoticeKind::BlockAlarm));
    assert!(notices.iter().any(|n| n.kind == NoticeKind::SacredWarning));
}

#[test]
fn deleting_selected_routine_falls_back() {
    let mut h = harness(MemoryStore::new(), RecordingNotifier::granted(), RecordingAudio::new());
    h.engine.update_routine(workday(), at(19, 0, 0, 0));
    h.engine.select_routine("workday", at(19, 0, 0, 0)).unwrap();

    let event = h.engine.delete_routine("workday", at(19, 9, 0, 0)).unwrap();
    let Event::RoutineDeleted { reselected, restored_defaults, .. } = event else {
        panic!("expected RoutineDeleted");
    };
    assert_eq!(reselected.as_deref(), Some(DEFAULT_ROUTINE_ID));
    assert!(!restored_defaults);
    assert!(h.engine.selected_routine().is_some());

    // Drain everything; the last delete restores the built-in set.
    let ids: Vec<String> = h.engine.routines().routines().keys().cloned().collect();
    let mut last = None;
    for id in ids {
        h.engine.select_routine(&id, at(19, 9, 0, 0)).unwrap();
        last = Some(h.engine.delete_routine(&id, at(19, 9, 0, 0)).unwrap());
    }
    assert!(matches!(
        last,
        Some(Event::RoutineDeleted { restored_defaults: true, .. })
    ));
    assert_eq!(h.engine.routines().selected_id(), DEFAULT_ROUTINE_ID);

    let persisted = h.store.get(SELECTED_ROUTINE_KEY).unwrap();
    assert_eq!(persisted, format!("\"{DEFAULT_ROUTINE_ID}\""));
}

#[test]
fn state_survives_restart() {
    let store = MemoryStore::new();
    {
        let mut h = harness(store.clone(), RecordingNotifier::granted(), RecordingAudio::new());
        h.engine.update_routine(workday(), at(19, 0, 0, 0));
        h.engine.select_routine("workday", at(19, 0, 0, 0)).unwrap();
        h.engine.update_settings(no_vitamin_d(), at(19, 0, 0, 0));
    }
    let h = harness(store, RecordingNotifier::granted(), RecordingAudio::new());
    assert_eq!(h.engine.routines().selected_id(), "workday");
    assert!(!h.engine.settings().vitamin_d_enabled);
}

#[test]
fn corrupt_store_starts_with_defaults() {
    let store = MemoryStore::new()
        .with_entry(ROUTINES_KEY, "{\"broken\":")
        .with_entry(SETTINGS_KEY, "not json at all");
    let h = harness(store, RecordingNotifier::granted(), RecordingAudio::new());
    assert_eq!(h.engine.routines().selected_id(), DEFAULT_ROUTINE_ID);
    assert_eq!(h.engine.settings(), &AppSettings::default());
}

#[test]
fn malformed_block_time_never_activates() {
    let routine = Routine::new("r", "R", "").with_blocks(vec![
        TimeBlock::new("bad", "25:00", "Broken", BlockType::Sacred),
        TimeBlock::new("ok", "10:00", "Fine", BlockType::Personal),
    ]);
    let mut h = with_routine(routine, no_vitamin_d());
    let reports = run_day(&mut h, 19);
    assert!(reports.iter().all(|r| !r.lock.locked));
    let notices: Vec<_> = reports.into_iter().flat_map(|r| r.notices).collect();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].block_id.as_deref(), Some("ok"));
}

#[test]
fn one_damaged_block_does_not_discard_saved_routines() {
    let saved = r#"{
        "mine": {"id": "mine", "name": "Mía", "blocks": [
            {"id": "a", "time": "09:00", "activity": "Trabajo", "type": "work"},
            {"id": "b", "activity": "Sin hora", "type": "sacred"},
            {"id": "c", "time": "12:00", "activity": "Enfoque", "type": "focus"}
        ]},
        "other": {"id": "other", "name": "Otra", "blocks": []}
    }"#;
    let store = MemoryStore::new()
        .with_entry(ROUTINES_KEY, saved)
        .with_entry(SELECTED_ROUTINE_KEY, "\"mine\"");
    let mut h = harness(store, RecordingNotifier::granted(), RecordingAudio::new());
    h.engine.update_settings(no_vitamin_d(), at(19, 0, 0, 0));

    assert_eq!(h.engine.routines().selected_id(), "mine");
    assert!(h.engine.routines().get("other").is_some());
    let mine = h.engine.selected_routine().unwrap();
    assert_eq!(mine.blocks.len(), 3);
    assert_eq!(mine.blocks[2].block_type, BlockType::Other);

    let noon = locate(mine, 12 * 60 + 30);
    assert_eq!(noon.active_block().map(|b| b.id.as_str()), Some("c"));
    assert!(!noon.is_sacred());

    let reports = run_day(&mut h, 19);
    assert!(reports.iter().all(|r| !r.lock.locked));
    assert!(reports
        .iter()
        .filter_map(|r| r.location.active_block())
        .all(|b| b.id == "c"));

    h.engine
        .update_routine(Routine::new("extra", "Extra", ""), at(20, 0, 0, 0));
    let persisted = h.store.get(ROUTINES_KEY).unwrap();
    assert!(persisted.contains("\"mine\""));
    assert!(persisted.contains("Sin hora"));
}
