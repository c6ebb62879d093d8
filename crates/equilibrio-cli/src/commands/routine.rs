use std::path::PathBuf;

use clap::Subcommand;
use equilibrio_core::{Config, Routine};
use serde::Deserialize;

use crate::host;

#[derive(Subcommand)]
pub enum RoutineAction {
    /// List routines; the selected one is marked with `*`
    List {
        /// Print the full routines as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print one routine as JSON (defaults to the selected routine)
    Show {
        /// Routine ID
        id: Option<String>,
    },
    /// Make a routine the active one
    Select {
        /// Routine ID
        id: String,
    },
    /// Delete a routine
    Delete {
        /// Routine ID
        id: String,
    },
    /// Insert or replace routines from a JSON file (one routine or an array)
    Import {
        /// Path to the JSON file
        file: PathBuf,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ImportDocument {
    Many(Vec<Routine>),
    One(Routine),
}

impl ImportDocument {
    fn into_routines(self) -> Vec<Routine> {
        match self {
            ImportDocument::Many(routines) => routines,
            ImportDocument::One(routine) => vec![routine],
        }
    }
}

fn parse_import(content: &str) -> Result<Vec<Routine>, serde_json::Error> {
    serde_json::from_str::<ImportDocument>(content).map(ImportDocument::into_routines)
}

pub fn run(action: RoutineAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = host::open_quiet_engine(config)?;

    match action {
        RoutineAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(engine.routines().routines())?);
            } else {
                let selected = engine.routines().selected_id();
                for routine in engine.routines().list() {
                    let marker = if routine.id == selected { "*" } else { " " };
                    println!("{marker} {} ({} blocks)", routine.id, routine.blocks.len());
                }
            }
        }
        RoutineAction::Show { id } => {
            let routine = match &id {
                Some(id) => engine.routines().get(id),
                None => engine.selected_routine(),
            };
            match routine {
                Some(routine) => println!("{}", serde_json::to_string_pretty(routine)?),
                None => {
                    let id = id.unwrap_or_else(|| engine.routines().selected_id().to_string());
                    return Err(format!("routine not found: {id}").into());
                }
            }
        }
        RoutineAction::Select { id } => {
            let event = engine.select_routine(&id, host::now())?;
            println!("{}", serde_json::to_string(&event)?);
        }
        RoutineAction::Delete { id } => {
            let event = engine.delete_routine(&id, host::now())?;
            println!("{}", serde_json::to_string(&event)?);
        }
        RoutineAction::Import { file } => {
            let content = std::fs::read_to_string(&file)?;
            let routines = parse_import(&content)?;
            for routine in routines {
                let event = engine.update_routine(routine, host::now());
                println!("{}", serde_json::to_string(&event)?);
            }
        }
    }
    Ok(())
}
