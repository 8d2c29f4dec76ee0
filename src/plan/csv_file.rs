use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use itertools::Itertools;
use serde::Deserialize;
use tracing::debug;

use crate::error::PlanError;
use crate::exercise::{ExerciseStep, SessionQueue};
use crate::plan::{PlanFile, PlanProvider, PlanSummary};

/// One row of a plan sheet:
/// `plan,exercise,muscle_group,sets,reps,media`
#[derive(Debug, Deserialize)]
struct PlanRow {
    plan: String,
    exercise: String,
    muscle_group: String,
    sets: usize,
    reps: String,
    #[serde(default)]
    media: Option<String>,
}

impl From<PlanRow> for ExerciseStep {
    fn from(row: PlanRow) -> Self {
        let step = ExerciseStep::new(row.exercise, row.muscle_group, row.sets, row.reps);
        match row.media.filter(|m| !m.trim().is_empty()) {
            Some(media) => step.with_media(media),
            None => step,
        }
    }
}

/// Plans kept in a spreadsheet export. Rows of a plan may be interleaved
/// with other plans; within a plan, file order is session order.
#[derive(Debug, Clone)]
pub struct CsvPlanProvider {
    path: PathBuf,
}

impl CsvPlanProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Read and validate every plan in the file, in order of first appearance
    pub fn read_plans(&self) -> Result<Vec<PlanFile>, PlanError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .from_path(&self.path)?;
        let rows = reader
            .deserialize::<PlanRow>()
            .collect::<Result<Vec<_>, _>>()?;
        debug!(path = %self.path.display(), rows = rows.len(), "read plan csv");

        let order: Vec<String> = rows.iter().map(|r| r.plan.clone()).unique().collect();
        let mut grouped = rows.into_iter().into_group_map_by(|r| r.plan.clone());

        order
            .into_iter()
            .map(|id| {
                let exercises = grouped
                    .remove(&id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(ExerciseStep::from)
                    .collect();
                let plan = PlanFile {
                    title: id.clone(),
                    id,
                    exercises,
                };
                plan.validate()?;
                Ok(plan)
            })
            .collect()
    }
}

impl PlanProvider for CsvPlanProvider {
    fn list_plans(&self) -> Result<Vec<PlanSummary>, PlanError> {
        Ok(self.read_plans()?.iter().map(PlanSummary::from_plan).collect())
    }

    fn load_queue(&self, plan_id: &str) -> Result<SessionQueue, PlanError> {
        Ok(self
            .read_plans()?
            .into_iter()
            .find(|p| p.id == plan_id)
            .map(PlanFile::into_queue)
            .unwrap_or_default())
    }
}
