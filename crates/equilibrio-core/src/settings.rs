//! User settings consumed read-only by the tick.

use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::ClockTime;
use crate::storage::state::or_default;

pub const DEFAULT_ALARM_URL: &str = "https://actions.google.com/sounds/v1/alarms/beep_short.ogg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

/// Persisted as the `equilibrio_settings` JSON object. Missing keys take
/// their defaults, unknown keys are ignored, and a null or mistyped value
/// resets only that field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    #[serde(default = "default_vitamin_d_time", deserialize_with = "vitamin_d_time_or_default")]
    pub vitamin_d_time: String,
    #[serde(default = "default_true", deserialize_with = "true_unless_false")]
    pub vitamin_d_enabled: bool,
    #[serde(default, deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    /// Opaque audio source (URL or data URI) replacing the default beep.
    #[serde(default, deserialize_with = "or_default", skip_serializing_if = "Option::is_none")]
    pub custom_alarm_url: Option<String>,
}

fn default_vitamin_d_time() -> String {
    "10:00".into()
}

fn default_true() -> bool {
    true
}

fn vitamin_d_time_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw: Option<String> = or_default(deserializer)?;
    Ok(raw.unwrap_or_else(default_vitamin_d_time))
}

fn true_unless_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw: Option<bool> = or_default(deserializer)?;
    Ok(raw.unwrap_or(true))
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            vitamin_d_time: default_vitamin_d_time(),
            vitamin_d_enabled: true,
            theme: Some(Theme::Light),
            custom_alarm_url: None,
        }
    }
}

impl AppSettings {
    /// `None` when the stored time does not parse; the reminder is then
    /// skipped rather than failing the tick.
    pub fn vitamin_d_at(&self) -> Option<ClockTime> {
        self.vitamin_d_time.parse().ok()
    }

    pub fn alarm_source(&self) -> &str {
        self.custom_alarm_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_ALARM_URL)
    }
}
