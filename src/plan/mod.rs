pub mod builtin;
pub mod csv_file;
pub mod sqlite;

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::exercise::{ExerciseStep, SessionQueue};

pub use self::builtin::BuiltinPlans;
pub use self::csv_file::CsvPlanProvider;
pub use self::sqlite::SqlitePlanStore;

/// Sets are checked off with the number keys 1-9
pub const MAX_SETS_PER_EXERCISE: usize = 9;

/// Supplies the ordered exercise list for a session.
///
/// Asking for a plan that does not exist is not an error: providers answer
/// with an empty queue and the session starts out `Empty`.
pub trait PlanProvider {
    fn list_plans(&self) -> Result<Vec<PlanSummary>, PlanError>;
    fn load_queue(&self, plan_id: &str) -> Result<SessionQueue, PlanError>;

    fn find_plan(&self, plan_id: &str) -> Result<Option<PlanSummary>, PlanError> {
        Ok(self.list_plans()?.into_iter().find(|p| p.id == plan_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub id: String,
    pub title: String,
    pub exercise_count: usize,
    pub total_sets: usize,
}

impl PlanSummary {
    pub fn from_plan(plan: &PlanFile) -> Self {
        Self {
            id: plan.id.clone(),
            title: plan.title.clone(),
            exercise_count: plan.exercises.len(),
            total_sets: plan.exercises.iter().map(|e| e.target_sets).sum(),
        }
    }
}

/// A complete plan as stored on disk or in the library
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanFile {
    pub id: String,
    pub title: String,
    pub exercises: Vec<ExerciseStep>,
}

impl PlanFile {
    pub fn validate(&self) -> Result<(), PlanError> {
        let bad = self
            .exercises
            .iter()
            .enumerate()
            .find(|(_, e)| !(1..=MAX_SETS_PER_EXERCISE).contains(&e.target_sets));

        match bad {
            Some((position, step)) => Err(PlanError::InvalidStep {
                plan: self.id.clone(),
                position,
                exercise: step.name.clone(),
                sets: step.target_sets,
            }),
            None => Ok(()),
        }
    }

    pub fn into_queue(self) -> SessionQueue {
        SessionQueue::new(self.exercises)
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlanSource {
    #[default]
    Builtin,
    Csv,
    Sqlite,
}

/// Open the provider for `source`. CSV needs `file`; SQLite uses `file`
/// when given and the default library location otherwise.
pub fn open_provider(
    source: PlanSource,
    file: Option<&Path>,
) -> Result<Box<dyn PlanProvider>, PlanError> {
    let provider: Box<dyn PlanProvider> = match source {
        PlanSource::Builtin => Box::new(BuiltinPlans::new()),
        PlanSource::Csv => {
            let path = file.ok_or_else(|| PlanError::MissingFile(source.to_string()))?;
            Box::new(CsvPlanProvider::new(path))
        }
        PlanSource::Sqlite => match file {
            Some(path) => Box::new(SqlitePlanStore::open(path)?),
            None => Box::new(SqlitePlanStore::open_default()?),
        },
    };
    tracing::debug!(%source, "plan provider opened");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_validate_rejects_zero_sets() {
        let plan = PlanFile {
            id: "p".into(),
            title: "P".into(),
            exercises: vec![
                ExerciseStep::new("Row", "back", 3, "10"),
                ExerciseStep::new("Curl", "arms", 0, "10"),
            ],
        };

        assert_matches!(
            plan.validate(),
            Err(PlanError::InvalidStep { position: 1, .. })
        );
    }

    #[test]
    fn test_validate_rejects_more_sets_than_keys() {
        let plan = PlanFile {
            id: "p".into(),
            title: "P".into(),
            exercises: vec![
                ExerciseStep::new("Row", "back", MAX_SETS_PER_EXERCISE, "10"),
                ExerciseStep::new("Calf Raise", "calves", MAX_SETS_PER_EXERCISE + 1, "20"),
            ],
        };

        assert_matches!(
            plan.validate(),
            Err(PlanError::InvalidStep { position: 1, sets: 10, .. })
        );
    }

    #[test]
    fn test_summary_counts() {
        let plan = PlanFile {
            id: "p".into(),
            title: "P".into(),
            exercises: vec![
                ExerciseStep::new("Row", "back", 3, "10"),
                ExerciseStep::new("Curl", "arms", 2, "10"),
            ],
        };
        let summary = PlanSummary::from_plan(&plan);

        assert_eq!(summary.exercise_count, 2);
        assert_eq!(summary.total_sets, 5);
    }

    #[test]
    fn test_csv_source_requires_file() {
        assert!(matches!(
            open_provider(PlanSource::Csv, None),
            Err(PlanError::MissingFile(_))
        ));
    }

    #[test]
    fn test_plan_source_display() {
        assert_eq!(PlanSource::Builtin.to_string(), "builtin");
        assert_eq!(PlanSource::Sqlite.to_string(), "sqlite");
    }
}
