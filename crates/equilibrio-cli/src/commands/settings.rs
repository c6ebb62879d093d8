use clap::Subcommand;
use equilibrio_core::settings::Theme;
use equilibrio_core::{AppSettings, ClockTime, Config};

use crate::host;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Print current settings as JSON
    Show,
    /// Update one or more settings
    Set {
        /// Daily vitamin-D reminder time (HH:MM)
        #[arg(long)]
        vitamin_d_time: Option<String>,
        /// Enable or disable the vitamin-D reminder
        #[arg(long)]
        vitamin_d_enabled: Option<bool>,
        /// Custom alarm sound; an empty value restores the default beep
        #[arg(long)]
        alarm_url: Option<String>,
        /// light or dark
        #[arg(long)]
        theme: Option<String>,
    },
}

fn parse_theme(raw: &str) -> Result<Theme, String> {
    match raw.to_ascii_lowercase().as_str() {
        "light" => Ok(Theme::Light),
        "dark" => Ok(Theme::Dark),
        other => Err(format!("unknown theme: {other}")),
    }
}

fn apply_changes(
    mut settings: AppSettings,
    vitamin_d_time: Option<String>,
    vitamin_d_enabled: Option<bool>,
    alarm_url: Option<String>,
    theme: Option<String>,
) -> Result<AppSettings, Box<dyn std::error::Error>> {
    if let Some(raw) = vitamin_d_time {
        settings.vitamin_d_time = raw.parse::<ClockTime>()?.to_string();
    }
    if let Some(enabled) = vitamin_d_enabled {
        settings.vitamin_d_enabled = enabled;
    }
    if let Some(url) = alarm_url {
        settings.custom_alarm_url = (!url.is_empty()).then_some(url);
    }
    if let Some(raw) = theme {
        settings.theme = Some(parse_theme(&raw)?);
    }
    Ok(settings)
}

pub fn run(action: SettingsAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = host::open_quiet_engine(config)?;

    match action {
        SettingsAction::Show => {
            println!("{}", serde_json::to_string_pretty(engine.settings())?);
        }
        SettingsAction::Set {
            vitamin_d_time,
            vitamin_d_enabled,
            alarm_url,
            theme,
        } => {
            let updated = apply_changes(
                engine.settings().clone(),
                vitamin_d_time,
                vitamin_d_enabled,
                alarm_url,
                theme,
            )?;
            engine.update_settings(updated, host::now());
            println!("{}", serde_json::to_string_pretty(engine.settings())?);
        }
    }
    Ok(())
}
