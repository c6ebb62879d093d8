use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;
use equilibrio_core::{ClockTime, Config};

use crate::host;

#[derive(Args)]
pub struct StatusArgs {
    /// Time of day to evaluate (HH:MM). Defaults to now.
    #[arg(long)]
    at: Option<String>,
    /// Calendar day to evaluate (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    date: Option<String>,
}

fn resolve_instant(args: &StatusArgs, now: NaiveDateTime) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    let date = match &args.date {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{raw}': {e}"))?,
        None => now.date(),
    };
    let time = match &args.at {
        Some(raw) => raw.parse::<ClockTime>()?.to_naive_time(),
        None => now.time(),
    };
    Ok(date.and_time(time))
}

pub fn run(args: StatusArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let instant = resolve_instant(&args, host::now())?;
    let engine = host::open_quiet_engine(config)?;
    let evaluation = engine.evaluate(instant);
    println!("{}", serde_json::to_string_pretty(&evaluation)?);
    Ok(())
}
