//! Goal list, persisted next to routines and settings.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RoutineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalPeriod {
    Diario,
    Semanal,
    Mensual,
    Anual,
}

impl std::str::FromStr for GoalPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "diario" | "daily" => Ok(Self::Diario),
            "semanal" | "weekly" => Ok(Self::Semanal),
            "mensual" | "monthly" => Ok(Self::Mensual),
            "anual" | "yearly" => Ok(Self::Anual),
            other => Err(format!("unknown goal period: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: String,
    pub text: String,
    pub period: GoalPeriod,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Ordered goal list. Serialized as a bare JSON array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GoalList {
    goals: Vec<Goal>,
}

impl Default for GoalList {
    fn default() -> Self {
        Self {
            goals: vec![
                Goal {
                    id: "pdf-task-1".into(),
                    text: "Agendar Citas Clave (Médico y Dentista)".into(),
                    period: GoalPeriod::Semanal,
                    completed: false,
                    category: None,
                },
                Goal {
                    id: "pdf-task-2".into(),
                    text: "Comprar Ropa de Reposición".into(),
                    period: GoalPeriod::Semanal,
                    completed: false,
                    category: None,
                },
            ],
        }
    }
}

impl GoalList {
    pub fn empty() -> Self {
        Self { goals: Vec::new() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Goal> {
        self.goals.iter()
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn add(&mut self, text: impl Into<String>, period: GoalPeriod, category: Option<String>) -> &Goal {
        self.goals.push(Goal {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            period,
            completed: false,
            category,
        });
        &self.goals[self.goals.len() - 1]
    }

    /// Flip completion. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool, RoutineError> {
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| RoutineError::GoalNotFound(id.to_string()))?;
        goal.completed = !goal.completed;
        Ok(goal.completed)
    }

    pub fn delete(&mut self, id: &str) -> Result<Goal, RoutineError> {
        let pos = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| RoutineError::GoalNotFound(id.to_string()))?;
        Ok(self.goals.remove(pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_toggle_delete() {
        let mut goals = GoalList::empty();
        let id = goals.add("Leer 20 páginas", GoalPeriod::Diario, None).id.clone();
        assert_eq!(goals.len(), 1);
        assert!(goals.toggle(&id).unwrap());
        assert!(!goals.toggle(&id).unwrap());
        assert_eq!(goals.delete(&id).unwrap().text, "Leer 20 páginas");
        assert!(goals.is_empty());
        assert_eq!(goals.toggle(&id), Err(RoutineError::GoalNotFound(id)));
    }

    #[test]
    fn serializes_as_array() {
        let json = serde_json::to_string(&GoalList::default()).unwrap();
        assert!(json.starts_with('['));
        let back: GoalList = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GoalList::default());
    }

    #[test]
    fn parses_period_aliases() {
        assert_eq!("weekly".parse::<GoalPeriod>().unwrap(), GoalPeriod::Semanal);
        assert_eq!("Anual".parse::<GoalPeriod>().unwrap(), GoalPeriod::Anual);
        assert!("sometimes".parse::<GoalPeriod>().is_err());
    }
}
