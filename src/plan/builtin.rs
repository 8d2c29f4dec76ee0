use include_dir::{include_dir, Dir};
use tracing::warn;

use crate::error::PlanError;
use crate::exercise::SessionQueue;
use crate::plan::{PlanFile, PlanProvider, PlanSummary};

static PLAN_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/plans");

/// Plans compiled into the binary from `src/plans/*.json`
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinPlans;

impl BuiltinPlans {
    pub fn new() -> Self {
        Self
    }

    fn read_plan(&self, plan_id: &str) -> Result<Option<PlanFile>, PlanError> {
        let file_name = format!("{plan_id}.json");
        let Some(file) = PLAN_DIR.get_file(&file_name) else {
            return Ok(None);
        };

        let plan: PlanFile =
            serde_json::from_slice(file.contents()).map_err(|source| PlanError::Json {
                file: file_name,
                source,
            })?;
        plan.validate()?;
        Ok(Some(plan))
    }
}

impl PlanProvider for BuiltinPlans {
    fn list_plans(&self) -> Result<Vec<PlanSummary>, PlanError> {
        let mut summaries = Vec::new();
        for file in PLAN_DIR.files() {
            let Some(id) = file.path().file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match self.read_plan(id)? {
                Some(plan) => summaries.push(PlanSummary::from_plan(&plan)),
                None => warn!(id, "bundled plan vanished"),
            }
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    fn load_queue(&self, plan_id: &str) -> Result<SessionQueue, PlanError> {
        Ok(self
            .read_plan(plan_id)?
            .map(PlanFile::into_queue)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lists_bundled_plans() {
        let plans = BuiltinPlans::new().list_plans().unwrap();
        let ids: Vec<&str> = plans.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, vec!["core-blast", "full-body", "upper-lower"]);
        assert!(plans.iter().all(|p| p.exercise_count > 0));
    }

    #[test]
    fn test_load_full_body_in_order() {
        let queue = BuiltinPlans::new().load_queue("full-body").unwrap();

        assert_eq!(queue.len(), 5);
        assert_eq!(queue.get(0).unwrap().name, "Goblet Squat");
        assert_eq!(queue.get(4).unwrap().name, "Plank");
        assert!(queue.get(0).unwrap().media.is_some());
    }

    #[test]
    fn test_unknown_plan_is_empty() {
        let queue = BuiltinPlans::new().load_queue("does-not-exist").unwrap();
        assert!(queue.is_empty());
    }

    #[test]
    fn test_find_plan_title() {
        let plan = BuiltinPlans::new().find_plan("core-blast").unwrap().unwrap();
        assert_eq!(plan.title, "Core Blast");
        assert_eq!(plan.total_sets, 9);
    }
}
