//! Label containers shared by every dataset.
//!
//! Labels are always aligned with the feature array by sample index. A
//! single-task dataset holds one `Array1<i64>`; a multitask dataset holds a
//! [`TaskLabels`] registry mapping task names to independent label vectors,
//! in insertion order.

use ndarray::{Array1, ArrayView1};

use crate::error::DatastoreError;

/// Insertion-ordered mapping from task name to a label vector.
///
/// All vectors have the same length: inserting a vector whose length differs
/// from the vectors already registered fails with `ShapeMismatch`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskLabels {
    tasks: Vec<(String, Array1<i64>)>,
}

/// Registry of a label set without tasks.
static NO_TASKS: TaskLabels = TaskLabels::new();

impl TaskLabels {
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Registers `labels` under `name`.
    ///
    /// Re-inserting an existing name replaces its labels in place, keeping
    /// the original position.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        labels: Array1<i64>,
    ) -> Result<(), DatastoreError> {
        let name = name.into();
        if let Some(expected) = self.num_samples() {
            let replaces_only_task = self.tasks.len() == 1 && self.tasks[0].0 == name;
            if labels.len() != expected && !replaces_only_task {
                return Err(DatastoreError::length_mismatch(
                    expected,
                    labels.len(),
                    "TaskLabels::insert",
                ));
            }
        }
        match self.tasks.iter_mut().find(|(task, _)| *task == name) {
            Some((_, existing)) => *existing = labels,
            None => self.tasks.push((name, labels)),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Array1<i64>> {
        self.tasks
            .iter()
            .find(|(task, _)| task == name)
            .map(|(_, labels)| labels)
    }

    /// Task names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.tasks.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Array1<i64>)> + '_ {
        self.tasks
            .iter()
            .map(|(name, labels)| (name.as_str(), labels))
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of samples each task vector covers, `None` without tasks.
    pub fn num_samples(&self) -> Option<usize> {
        self.tasks.first().map(|(_, labels)| labels.len())
    }

    /// Collects the label of every task for sample `index`.
    pub fn targets_at(&self, index: usize) -> Option<TaskTargets> {
        let mut targets = TaskTargets::with_capacity(self.tasks.len());
        for (name, labels) in &self.tasks {
            targets.push(name.clone(), *labels.get(index)?);
        }
        Some(targets)
    }
}

/// Per-sample labels of a multitask dataset, in task insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskTargets {
    entries: Vec<(String, i64)>,
}

impl TaskTargets {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, label: i64) {
        self.entries.push((name.into(), label));
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.entries
            .iter()
            .find(|(task, _)| task == name)
            .map(|(_, label)| *label)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.entries.iter().map(|(name, label)| (name.as_str(), *label))
    }

    /// Applies `f` to every label, keeping task names and order.
    pub fn map_labels<F: Fn(i64) -> i64>(self, f: F) -> Self {
        Self {
            entries: self
                .entries
                .into_iter()
                .map(|(name, label)| (name, f(label)))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Label of a single sample when the label kind is only known at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Class(i64),
    Tasks(TaskTargets),
}

/// Labels of a whole dataset: either one vector or a task registry.
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    Single(Array1<i64>),
    MultiTask(TaskLabels),
}

impl Labels {
    /// Number of samples covered by the labels.
    pub fn len(&self) -> usize {
        match self {
            Labels::Single(labels) => labels.len(),
            Labels::MultiTask(tasks) => tasks.num_samples().unwrap_or(0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_single(&self) -> Option<&Array1<i64>> {
        match self {
            Labels::Single(labels) => Some(labels),
            Labels::MultiTask(_) => None,
        }
    }

    pub fn as_multi_task(&self) -> Option<&TaskLabels> {
        match self {
            Labels::Single(_) => None,
            Labels::MultiTask(tasks) => Some(tasks),
        }
    }

    /// The task registry; single-task labels have an empty one.
    pub fn task_labels(&self) -> &TaskLabels {
        match self {
            Labels::Single(_) => &NO_TASKS,
            Labels::MultiTask(tasks) => tasks,
        }
    }

    pub fn target_at(&self, index: usize) -> Option<Target> {
        match self {
            Labels::Single(labels) => labels.get(index).copied().map(Target::Class),
            Labels::MultiTask(tasks) => tasks.targets_at(index).map(Target::Tasks),
        }
    }

    /// Selects the label vector used for stratification.
    ///
    /// Single-task labels ignore `task`; multitask labels require one.
    pub fn stratification_view(&self, task: Option<&str>) -> Result<ArrayView1<'_, i64>, DatastoreError> {
        match (self, task) {
            (Labels::Single(labels), _) => Ok(labels.view()),
            (Labels::MultiTask(tasks), Some(name)) => tasks
                .get(name)
                .map(|labels| labels.view())
                .ok_or_else(|| DatastoreError::TaskNotFound(name.to_string())),
            (Labels::MultiTask(_), None) => Err(DatastoreError::InvalidArgument(
                "labels are multi-task; a task key is required to stratify".to_string(),
            )),
        }
    }
}

impl From<Array1<i64>> for Labels {
    fn from(labels: Array1<i64>) -> Self {
        Labels::Single(labels)
    }
}

impl From<TaskLabels> for Labels {
    fn from(tasks: TaskLabels) -> Self {
        Labels::MultiTask(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_task_labels_of_single_labels_is_empty() {
        let labels = Labels::from(array![0_i64, 1, 1]);
        assert!(labels.task_labels().is_empty());
        assert_eq!(labels.task_labels().names().count(), 0);

        let mut tasks = TaskLabels::new();
        tasks.insert("grade", array![2_i64, 0, 1]).unwrap();
        let labels = Labels::from(tasks.clone());
        assert_eq!(labels.task_labels(), &tasks);
    }

    #[test]
    fn test_task_labels_keep_insertion_order() {
        let mut tasks = TaskLabels::new();
        tasks.insert("subsite", array![0, 1]).unwrap();
        tasks.insert("grade", array![2, 3]).unwrap();
        tasks.insert("behavior", array![4, 5]).unwrap();
        let names: Vec<&str> = tasks.names().collect();
        assert_eq!(names, vec!["subsite", "grade", "behavior"]);
    }

    #[test]
    fn test_task_labels_reinsert_replaces_in_place() {
        let mut tasks = TaskLabels::new();
        tasks.insert("a", array![0, 0]).unwrap();
        tasks.insert("b", array![1, 1]).unwrap();
        tasks.insert("a", array![7, 8]).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks.names().next(), Some("a"));
        assert_eq!(tasks.get("a").unwrap(), &array![7, 8]);
    }

    #[test]
    fn test_task_labels_reject_misaligned_vector() {
        let mut tasks = TaskLabels::new();
        tasks.insert("a", array![0, 1, 2]).unwrap();
        match tasks.insert("b", array![0, 1]) {
            Err(DatastoreError::ShapeMismatch { .. }) => {}
            other => panic!("Expected ShapeMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_targets_at_collects_every_task() {
        let mut tasks = TaskLabels::new();
        tasks.insert("task0", array![3, 4]).unwrap();
        tasks.insert("task1", array![5, 6]).unwrap();
        let targets = tasks.targets_at(1).unwrap();
        assert_eq!(targets.get("task0"), Some(4));
        assert_eq!(targets.get("task1"), Some(6));
        assert!(tasks.targets_at(2).is_none());
    }

    #[test]
    fn test_stratification_view_requires_task_for_multitask() {
        let mut tasks = TaskLabels::new();
        tasks.insert("task0", array![0, 1]).unwrap();
        let labels = Labels::from(tasks);
        assert!(matches!(
            labels.stratification_view(None),
            Err(DatastoreError::InvalidArgument(_))
        ));
        assert!(matches!(
            labels.stratification_view(Some("missing")),
            Err(DatastoreError::TaskNotFound(_))
        ));
        assert_eq!(labels.stratification_view(Some("task0")).unwrap().len(), 2);
    }

    #[test]
    fn test_single_labels_target_at() {
        let labels = Labels::from(array![9, 8, 7]);
        assert_eq!(labels.len(), 3);
        assert_eq!(labels.target_at(2), Some(Target::Class(7)));
        assert_eq!(labels.target_at(3), None);
    }
}
