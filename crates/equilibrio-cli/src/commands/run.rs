use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use equilibrio_core::{Config, EngineCommand, EngineOptions, SystemClock, Ticker, TickerOutput};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};

use crate::host;

#[derive(Args)]
pub struct RunArgs {
    /// Seconds between ticks (1-10). Defaults to the configured interval.
    #[arg(long)]
    interval: Option<u64>,
    /// Start with the alarm muted
    #[arg(long)]
    muted: bool,
}

/// A line typed on stdin while the engine runs.
#[derive(Debug, PartialEq)]
enum ConsoleCommand {
    Engine(EngineCommand),
    Quit,
}

fn parse_console_command(line: &str) -> Option<ConsoleCommand> {
    let mut parts = line.split_whitespace();
    let command = match parts.next()? {
        "unlock" => ConsoleCommand::Engine(EngineCommand::EmergencyUnlock),
        "mute" => ConsoleCommand::Engine(EngineCommand::SetMuted(true)),
        "unmute" => ConsoleCommand::Engine(EngineCommand::SetMuted(false)),
        "toggle-mute" => ConsoleCommand::Engine(EngineCommand::ToggleMute),
        "select" => {
            let id = parts.collect::<Vec<_>>().join(" ");
            if id.is_empty() {
                return None;
            }
            ConsoleCommand::Engine(EngineCommand::SelectRoutine(id))
        }
        "quit" | "exit" => ConsoleCommand::Quit,
        _ => return None,
    };
    Some(command)
}

fn print_output(output: &TickerOutput) -> Result<(), serde_json::Error> {
    match output {
        TickerOutput::Tick(report) => {
            for event in &report.events {
                println!("{}", serde_json::to_string(event)?);
            }
        }
        TickerOutput::Command(Some(event)) => println!("{}", serde_json::to_string(event)?),
        TickerOutput::Command(None) => {}
        TickerOutput::CommandRejected(message) => eprintln!("rejected: {message}"),
    }
    Ok(())
}

pub fn run(args: RunArgs, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let ticker = match args.interval {
        Some(secs) => Ticker::new(Duration::from_secs(secs))?,
        None => Ticker::from_config(config)?,
    };
    let mut options = EngineOptions::from(config);
    options.start_muted |= args.muted;
    let engine = host::open_engine(options, host::console_notifiers())?;

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let engine = rt.block_on(async move {
        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let (out_tx, mut out_rx) = mpsc::channel(64);
        let (stop_tx, stop_rx) = watch::channel(false);

        let handle = tokio::spawn(ticker.run(
            engine,
            Arc::new(SystemClock),
            cmd_rx,
            stop_rx,
            Some(out_tx),
        ));

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => break,
                Some(output) = out_rx.recv() => print_output(&output)?,
                line = lines.next_line(), if stdin_open => match line {
                    Ok(Some(line)) => match parse_console_command(&line) {
                        Some(ConsoleCommand::Quit) => break,
                        Some(ConsoleCommand::Engine(command)) => {
                            if cmd_tx.send(command).await.is_err() {
                                break;
                            }
                        }
                        None if line.trim().is_empty() => {}
                        None => eprintln!("unknown command: {}", line.trim()),
                    },
                    Ok(None) | Err(_) => stdin_open = false,
                },
            }
        }

        let _ = stop_tx.send(true);
        let engine = handle.await?;
        Ok::<_, Box<dyn std::error::Error>>(engine)
    })?;

    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    // A blocked stdin read would otherwise keep the runtime alive.
    rt.shutdown_timeout(Duration::from_millis(100));
    Ok(())
}
