use clap::Subcommand;
use equilibrio_core::{Config, ConfigError};

/// Every settable key, in display order.
const KEYS: &[&str] = &[
    "engine.tick_interval_secs",
    "engine.start_muted",
    "notifications.system",
    "logging.filter",
];

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value
    Get {
        /// Dotted key, e.g. engine.tick_interval_secs
        key: String,
    },
    /// Validate and store one value
    Set {
        /// Dotted key
        key: String,
        /// New value
        value: String,
    },
    /// Print every key as `key = value`
    List,
    /// Print the config file location
    Path,
    /// Restore the defaults
    Reset,
}

fn render(config: &Config) -> Vec<String> {
    KEYS.iter()
        .map(|key| format!("{key} = {}", config.get(key).unwrap_or_default()))
        .collect()
}

/// Apply `key = value` and return the stored line; the config is
/// untouched when validation fails.
fn update(config: &mut Config, key: &str, value: &str) -> Result<String, ConfigError> {
    if !KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey(key.to_string()));
    }
    config.set(key, value)?;
    Ok(format!("{key} = {}", config.get(key).unwrap_or_default()))
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key).ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            let line = update(&mut config, &key, &value)?;
            config.save()?;
            println!("{line}");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for line in render(&config) {
                println!("{line}");
            }
        }
        ConfigAction::Path => println!("{}", Config::path()?.display()),
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("config reset to defaults");
        }
    }
    Ok(())
}
