//! Alarm and notice dispatch.
//!
//! Three independent trigger families are checked every tick, each gated
//! by the [`NotificationLedger`]:
//!
//! - block-start alarm, at the exact start minute of a block;
//! - sacred warning, exactly 15 minutes before a sacred block that follows
//!   a work block in stored order;
//! - vitamin-D reminder, at the configured minute.
//!
//! All matches are exact-minute equality. A minute that no tick sampled is
//! never caught up later.

use serde::Serialize;

use crate::clock::Sample;
use crate::dedup::{block_alarm_key, sacred_warning_key, wellness_key, NotificationLedger};
use crate::notify::{Toast, ToastKind};
use crate::routine::{BlockType, Routine};
use crate::settings::AppSettings;

/// Title of every system notification.
pub const NOTIFICATION_TITLE: &str = "Equilibrio IA";
pub const SACRED_WARNING_LEAD_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    BlockAlarm,
    SacredWarning,
    WellnessReminder,
}

/// One decided notification with every side effect it calls for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notice {
    pub kind: NoticeKind,
    /// Ledger key this notice consumed.
    pub key: String,
    pub block_id: Option<String>,
    pub toast: Toast,
    /// Body for a system notification, if this notice sends one.
    pub system_body: Option<String>,
    pub play_audio: bool,
}

pub fn block_alarm_message(activity: &str) -> String {
    format!("Alarma: {activity}")
}

pub fn sacred_warning_message(activity: &str) -> String {
    format!(
        "Aviso: Cierre de Sesión IA en 15 minutos. Tu bloque \"{activity}\" comienza pronto. Guarda tu trabajo."
    )
}

pub const WELLNESS_MESSAGE: &str = "☀️ Hora de la Vitamina D: Sal a la calle por 15 minutos.";

/// Everything a dispatch pass reads.
#[derive(Debug, Clone, Copy)]
pub struct DispatchInput<'a> {
    pub routine: Option<&'a Routine>,
    pub sample: &'a Sample,
    pub settings: &'a AppSettings,
    pub muted: bool,
}

/// Decide this tick's notices and record them in `ledger`.
pub fn dispatch(input: DispatchInput<'_>, ledger: &mut NotificationLedger) -> Vec<Notice> {
    let mut notices = Vec::new();
    if let Some(routine) = input.routine {
        routine_notices(routine, input, ledger, &mut notices);
    }
    if let Some(notice) = wellness_notice(input, ledger) {
        notices.push(notice);
    }
    notices
}

fn routine_notices(
    routine: &Routine,
    input: DispatchInput<'_>,
    ledger: &mut NotificationLedger,
    out: &mut Vec<Notice>,
) {
    let now = i64::from(input.sample.minute_of_day);
    let day = &input.sample.day_key;

    for (index, block) in routine.blocks.iter().enumerate() {
        let Some(start) = block.start() else {
            continue;
        };
        let diff = i64::from(start.minutes()) - now;

        if diff == 0 && block.alarm_enabled() && !input.muted {
            let key = block_alarm_key(day, &block.time);
            if ledger.try_fire(key.clone()) {
                out.push(Notice {
                    kind: NoticeKind::BlockAlarm,
                    key,
                    block_id: Some(block.id.clone()),
                    toast: Toast::new(block_alarm_message(&block.activity), ToastKind::Info),
                    system_body: None,
                    play_audio: true,
                });
            }
        }

        if block.is_sacred() && diff == SACRED_WARNING_LEAD_MINUTES {
            let after_work = index
                .checked_sub(1)
                .and_then(|prev| routine.blocks.get(prev))
                .is_some_and(|prev| prev.block_type == BlockType::Work);
            if after_work {
                let key = sacred_warning_key(day, &block.time, &routine.id);
                if ledger.try_fire(key.clone()) {
                    let message = sacred_warning_message(&block.activity);
                    out.push(Notice {
                        kind: NoticeKind::SacredWarning,
                        key,
                        block_id: Some(block.id.clone()),
                        toast: Toast::new(message.clone(), ToastKind::Warning),
                        system_body: Some(message),
                        play_audio: !input.muted,
                    });
                }
            }
        }
    }
}

fn wellness_notice(input: DispatchInput<'_>, ledger: &mut NotificationLedger) -> Option<Notice> {
    if !input.settings.vitamin_d_enabled {
        return None;
    }
    let at = input.settings.vitamin_d_at()?;
    if at.minutes() != input.sample.minute_of_day {
        return None;
    }
    let key = wellness_key(&input.sample.day_key);
    if !ledger.try_fire(key.clone()) {
        return None;
    }
    Some(Notice {
        kind: NoticeKind::WellnessReminder,
        key,
        block_id: None,
        toast: Toast::new(WELLNESS_MESSAGE, ToastKind::Success),
        system_body: Some(WELLNESS_MESSAGE.to_string()),
        play_audio: !input.muted,
    })
}
