use serde::{Deserialize, Serialize};

/// One entry of a session queue, as handed over by a plan provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseStep {
    pub name: String,
    pub muscle_group: String,
    pub target_sets: usize,
    /// free-form, e.g. "12-15" or "30s"
    pub target_reps: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
}

impl ExerciseStep {
    pub fn new(
        name: impl Into<String>,
        muscle_group: impl Into<String>,
        target_sets: usize,
        target_reps: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            muscle_group: muscle_group.into(),
            target_sets,
            target_reps: target_reps.into(),
            media: None,
        }
    }

    pub fn with_media(mut self, media: impl Into<String>) -> Self {
        self.media = Some(media.into());
        self
    }
}

/// Ordered exercise list for one session. Insertion order is execution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionQueue {
    steps: Vec<ExerciseStep>,
}

impl SessionQueue {
    pub fn new(steps: Vec<ExerciseStep>) -> Self {
        Self { steps }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&ExerciseStep> {
        self.steps.get(idx)
    }

    pub fn total_sets(&self) -> usize {
        self.steps.iter().map(|s| s.target_sets).sum()
    }
}

impl From<Vec<ExerciseStep>> for SessionQueue {
    fn from(steps: Vec<ExerciseStep>) -> Self {
        Self::new(steps)
    }
}

impl FromIterator<ExerciseStep> for SessionQueue {
    fn from_iter<I: IntoIterator<Item = ExerciseStep>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
