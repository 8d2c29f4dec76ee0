use std::path::{Path, PathBuf};

use chrono::Local;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::app_dirs::AppDirs;
use crate::error::PlanError;
use crate::exercise::{ExerciseStep, SessionQueue};
use crate::plan::{PlanFile, PlanProvider, PlanSummary};

/// Local plan library. Plans are assigned by importing them (for example
/// from a coach's CSV sheet) and read back in `position` order.
#[derive(Debug)]
pub struct SqlitePlanStore {
    conn: Connection,
}

impl SqlitePlanStore {
    /// Open the library at `$HOME/.local/state/repflow/plans.db`
    pub fn open_default() -> Result<Self, PlanError> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("repflow_plans.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, PlanError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self, PlanError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, PlanError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS plans (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                imported_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS plan_exercises (
                plan_id TEXT NOT NULL REFERENCES plans(id) ON DELETE CASCADE,
                position INTEGER NOT NULL,
                name TEXT NOT NULL,
                muscle_group TEXT NOT NULL,
                target_sets INTEGER NOT NULL CHECK (target_sets BETWEEN 1 AND 9),
                target_reps TEXT NOT NULL,
                media TEXT,
                PRIMARY KEY (plan_id, position)
            );
            "#,
        )?;

        Ok(Self { conn })
    }

    /// Store `plan`, replacing any plan with the same id
    pub fn import_plan(&mut self, plan: &PlanFile) -> Result<(), PlanError> {
        plan.validate()?;

        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM plans WHERE id = ?1", [&plan.id])?;
        tx.execute(
            "INSERT INTO plans (id, title, imported_at) VALUES (?1, ?2, ?3)",
            params![plan.id, plan.title, Local::now().to_rfc3339()],
        )?;

        for (position, step) in plan.exercises.iter().enumerate() {
            tx.execute(
                r#"
                INSERT INTO plan_exercises
                (plan_id, position, name, muscle_group, target_sets, target_reps, media)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                "#,
                params![
                    plan.id,
                    position as i64,
                    step.name,
                    step.muscle_group,
                    step.target_sets as i64,
                    step.target_reps,
                    step.media,
                ],
            )?;
        }

        tx.commit()?;
        info!(plan = %plan.id, exercises = plan.exercises.len(), "plan imported");
        Ok(())
    }

    pub fn remove_plan(&self, plan_id: &str) -> Result<bool, PlanError> {
        let removed = self.conn.execute("DELETE FROM plans WHERE id = ?1", [plan_id])?;
        Ok(removed > 0)
    }

    fn plan_title(&self, plan_id: &str) -> Result<Option<String>, PlanError> {
        Ok(self
            .conn
            .query_row("SELECT title FROM plans WHERE id = ?1", [plan_id], |row| {
                row.get(0)
            })
            .optional()?)
    }
}

impl PlanProvider for SqlitePlanStore {
    fn list_plans(&self) -> Result<Vec<PlanSummary>, PlanError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT p.id, p.title, COUNT(e.position), COALESCE(SUM(e.target_sets), 0)
            FROM plans p
            LEFT JOIN plan_exercises e ON e.plan_id = p.id
            GROUP BY p.id
            ORDER BY p.id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(PlanSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                exercise_count: row.get::<_, i64>(2)? as usize,
                total_sets: row.get::<_, i64>(3)? as usize,
            })
        })?;

        let mut summaries = Vec::new();
        for summary in rows {
            summaries.push(summary?);
        }
        Ok(summaries)
    }

    fn load_queue(&self, plan_id: &str) -> Result<SessionQueue, PlanError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT name, muscle_group, target_sets, target_reps, media
            FROM plan_exercises
            WHERE plan_id = ?1
            ORDER BY position
            "#,
        )?;

        let rows = stmt.query_map([plan_id], |row| {
            Ok(ExerciseStep {
                name: row.get(0)?,
                muscle_group: row.get(1)?,
                target_sets: row.get::<_, i64>(2)? as usize,
                target_reps: row.get(3)?,
                media: row.get(4)?,
            })
        })?;

        let mut steps = Vec::new();
        for step in rows {
            steps.push(step?);
        }
        Ok(SessionQueue::new(steps))
    }

    fn find_plan(&self, plan_id: &str) -> Result<Option<PlanSummary>, PlanError> {
        if self.plan_title(plan_id)?.is_none() {
            return Ok(None);
        }
        Ok(self.list_plans()?.into_iter().find(|p| p.id == plan_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_plan() -> PlanFile {
        PlanFile {
            id: "push".into(),
            title: "Push Day".into(),
            exercises: vec![
                ExerciseStep::new("Bench Press", "chest", 4, "6-8")
                    .with_media("https://example.com/bench"),
                ExerciseStep::new("Dip", "triceps", 3, "10"),
            ],
        }
    }

    #[test]
    fn test_import_and_load_in_order() {
        let mut store = SqlitePlanStore::open_in_memory().unwrap();
        store.import_plan(&sample_plan()).unwrap();

        let queue = store.load_queue("push").unwrap();
        assert_eq!(queue, sample_plan().into_queue());
    }

    #[test]
    fn test_list_plans_summary() {
        let mut store = SqlitePlanStore::open_in_memory().unwrap();
        store.import_plan(&sample_plan()).unwrap();

        let plans = store.list_plans().unwrap();
        assert_eq!(
            plans,
            vec![PlanSummary {
                id: "push".into(),
                title: "Push Day".into(),
                exercise_count: 2,
                total_sets: 7,
            }]
        );
    }

    #[test]
    fn test_reimport_replaces_plan() {
        let mut store = SqlitePlanStore::open_in_memory().unwrap();
        store.import_plan(&sample_plan()).unwrap();

        let mut shorter = sample_plan();
        shorter.exercises.truncate(1);
        store.import_plan(&shorter).unwrap();

        assert_eq!(store.load_queue("push").unwrap().len(), 1);
    }

    #[test]
    fn test_import_rejects_oversized_exercise() {
        let mut store = SqlitePlanStore::open_in_memory().unwrap();
        let mut plan = sample_plan();
        plan.exercises[1].target_sets = 12;

        assert!(matches!(
            store.import_plan(&plan),
            Err(PlanError::InvalidStep { position: 1, sets: 12, .. })
        ));
        assert!(store.list_plans().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_plan_is_empty() {
        let store = SqlitePlanStore::open_in_memory().unwrap();
        assert!(store.load_queue("nope").unwrap().is_empty());
        assert_eq!(store.find_plan("nope").unwrap(), None);
    }

    #[test]
    fn test_remove_plan_cascades() {
        let mut store = SqlitePlanStore::open_in_memory().unwrap();
        store.import_plan(&sample_plan()).unwrap();

        assert!(store.remove_plan("push").unwrap());
        assert!(store.load_queue("push").unwrap().is_empty());
        assert!(!store.remove_plan("push").unwrap());
    }

    #[test]
    fn test_persists_on_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("plans.db");
        {
            let mut store = SqlitePlanStore::open(&path).unwrap();
            store.import_plan(&sample_plan()).unwrap();
        }

        let store = SqlitePlanStore::open(&path).unwrap();
        assert_eq!(store.find_plan("push").unwrap().unwrap().title, "Push Day");
    }
}
