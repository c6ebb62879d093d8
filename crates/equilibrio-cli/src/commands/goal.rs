use clap::Subcommand;
use equilibrio_core::{Config, GoalPeriod};

use crate::host;

#[derive(Subcommand)]
pub enum GoalAction {
    /// List goals
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add a goal
    Add {
        /// Goal text
        text: String,
        /// diario, semanal, mensual or anual
        #[arg(long, default_value = "semanal")]
        period: GoalPeriod,
        /// Optional category label
        #[arg(long)]
        category: Option<String>,
    },
    /// Flip a goal between done and pending
    Toggle {
        /// Goal ID
        id: String,
    },
    /// Delete a goal
    Delete {
        /// Goal ID
        id: String,
    },
}

pub fn run(action: GoalAction, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut engine = host::open_quiet_engine(config)?;

    match action {
        GoalAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(engine.goals())?);
            } else {
                for goal in engine.goals().iter() {
                    let check = if goal.completed { "x" } else { " " };
                    println!("[{check}] {} {} ({:?})", goal.id, goal.text, goal.period);
                }
            }
        }
        GoalAction::Add { text, period, category } => {
            let goal = engine.add_goal(&text, period, category);
            println!("{}", serde_json::to_string(&goal)?);
        }
        GoalAction::Toggle { id } => {
            let completed = engine.toggle_goal(&id)?;
            println!("{id}: {}", if completed { "done" } else { "pending" });
        }
        GoalAction::Delete { id } => {
            let goal = engine.delete_goal(&id)?;
            println!("deleted: {}", goal.id);
        }
    }
    Ok(())
}
