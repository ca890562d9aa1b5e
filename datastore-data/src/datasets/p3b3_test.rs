// datastore-data/src/datasets/p3b3_test.rs

use super::*;
use datastore_core::npy::write_npy;
use ndarray::{array, Array2};
use std::fs;

/// Raw `.npy` dumps as the upstream repository ships them: integer token
/// documents and an `(N, 4)` integer label matrix.
fn write_raw(root: &Path) {
    let raw = root.join(NAME).join("raw");
    fs::create_dir_all(&raw).unwrap();
    let documents = Array2::from_shape_fn((5, 3), |(n, t)| (n * 3 + t) as i32);
    write_npy(raw.join("train-data.npy"), &documents.into_dyn()).unwrap();
    let labels = array![
        [0i32, 1, 0, 2],
        [1, 0, 1, 3],
        [2, 1, 1, 0],
        [0, 0, 0, 1],
        [1, 1, 0, 2]
    ];
    write_npy(raw.join("train-labels.npy"), &labels.into_dyn()).unwrap();
    write_npy(raw.join("test-data.npy"), &Array2::<i32>::ones((2, 3)).into_dyn()).unwrap();
    write_npy(
        raw.join("test-labels.npy"),
        &array![[3i32, 0, 1, 1], [4, 1, 0, 0]].into_dyn(),
    )
    .unwrap();
}

fn load(root: &Path, partition: Partition, tasks: TaskSelection) -> P3b3 {
    // Raw files are present, so "downloading" only normalizes them.
    P3b3::new(root, partition, tasks, true).unwrap()
}

#[test]
fn test_not_found_without_download() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    match P3b3::new(dir.path(), Partition::Test, TaskSelection::default(), false) {
        Err(DatastoreError::DatasetNotFound { root }) => assert_eq!(root, dir.path()),
        other => panic!("Expected DatasetNotFound, got {:?}", other),
    }
}

#[test]
fn test_all_tasks_by_default() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_raw(dir.path());
    let dataset = load(dir.path(), Partition::Train, TaskSelection::default());
    assert_eq!(dataset.len(), 5);
    assert_eq!(
        dataset.get_labels(),
        vec!["subsite", "laterality", "behavior", "grade"]
    );

    let (document, targets) = dataset.get(1).unwrap();
    assert_eq!(document, array![3.0f32, 4.0, 5.0].into_dyn());
    assert_eq!(targets.get("subsite"), Some(1));
    assert_eq!(targets.get("laterality"), Some(0));
    assert_eq!(targets.get("behavior"), Some(1));
    assert_eq!(targets.get("grade"), Some(3));
}

#[test]
fn test_task_selection() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_raw(dir.path());
    let tasks = TaskSelection {
        subsite: false,
        laterality: true,
        behavior: false,
        grade: true,
    };
    let dataset = load(dir.path(), Partition::Train, tasks);
    assert_eq!(dataset.get_labels(), vec!["laterality", "grade"]);
    let (_, targets) = dataset.get(4).unwrap();
    assert_eq!(targets.len(), 2);
    assert_eq!(targets.get("subsite"), None);
    assert_eq!(targets.get("grade"), Some(2));
    assert_eq!(
        dataset.task_labels().get("grade").unwrap(),
        &array![2i64, 3, 0, 1, 2]
    );
}

#[test]
fn test_target_transform_applies_to_every_task() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_raw(dir.path());
    let dataset = load(dir.path(), Partition::Test, TaskSelection::default())
        .with_target_transform(|label| label + 100)
        .with_transform(|document| document * 2.0);
    let (document, targets) = dataset.get(0).unwrap();
    assert_eq!(document, array![2.0f32, 2.0, 2.0].into_dyn());
    let labels: Vec<i64> = targets.iter().map(|(_, label)| label).collect();
    assert_eq!(labels, vec![103, 100, 101, 101]);
}

#[test]
fn test_load_data_returns_task_mapping() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_raw(dir.path());
    let dataset = load(dir.path(), Partition::Test, TaskSelection::default());
    let (data, labels) = dataset.load_data();
    assert_eq!(data.shape(), &[2, 3]);
    let tasks = labels.as_multi_task().unwrap();
    assert_eq!(tasks.get("subsite").unwrap(), &array![3i64, 4]);
}

#[test]
fn test_rejects_label_file_with_too_few_columns() {
    let labels = array![[0i64, 1], [1, 0]].into_dyn();
    assert!(matches!(
        P3b3::get_targets(labels, TaskSelection::default()),
        Err(DatastoreError::ShapeMismatch { .. })
    ));
}

#[test]
fn test_validation_partition_is_rejected() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    assert!(matches!(
        P3b3::new(dir.path(), Partition::Validation, TaskSelection::default(), true),
        Err(DatastoreError::InvalidPartition(_))
    ));
}
