use std::fs;
use std::path::Path;

use datastore_core::npy::write_npy;
use datastore_core::utils::testing::{assert_disjoint, assert_is_partition, balanced_labels};
use datastore_core::{DatastoreError, Partition};
use datastore_data::datasets::{ArrayDataset, Dataset, InMemoryDataset, P3b3, RandomData, TaskSelection};
use datastore_data::sampling::{bootstrap, multitask_stratified_split, stratified_split};
use ndarray::{Array1, Array2, ArrayD, IxDyn};

#[test]
fn test_random_data_is_reproducible_from_seed() {
    let first = RandomData::new(100, 3, Some(13)).unwrap();
    let second = RandomData::new(100, 3, Some(13)).unwrap();
    assert_eq!(first.len(), 100);

    let (first_data, first_labels) = first.load_data();
    let (second_data, second_labels) = second.load_data();
    assert_eq!(first_data, second_data);
    assert!(first_data
        .iter()
        .zip(second_data.iter())
        .all(|(a, b)| a.to_bits() == b.to_bits()));
    assert_eq!(first_labels, second_labels);
    assert!(first_labels
        .as_single()
        .unwrap()
        .iter()
        .all(|&label| (0..3).contains(&label)));
}

#[test]
fn test_bootstrap_of_ten_samples() {
    let dataset = RandomData::new(10, 2, Some(1)).unwrap();
    let draws = bootstrap(&dataset, 5, 0.5).unwrap();
    assert_eq!(draws.len(), 5);
    for draw in &draws {
        assert_eq!(draw.train.len(), 5);
        assert!(draw.train.indices().iter().all(|&index| index < 10));
        assert_disjoint(draw.train.indices(), draw.valid.indices());
    }
}

#[test]
fn test_five_fold_split_of_balanced_dataset() {
    let dataset = ArrayDataset::new(
        ArrayD::<f32>::ones(IxDyn(&[100, 2])),
        balanced_labels(100, 2),
    )
    .unwrap();
    let splits = stratified_split(&dataset, 5).unwrap();
    let folds: Vec<Vec<usize>> = splits
        .iter()
        .map(|split| {
            assert_eq!(split.valid.len(), 20);
            split.valid.indices().to_vec()
        })
        .collect();
    assert_is_partition(&folds, 100);
}

#[test]
fn test_p3b3_without_download_on_empty_root() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let result = P3b3::new(dir.path(), Partition::Train, TaskSelection::default(), false);
    assert!(matches!(result, Err(DatastoreError::DatasetNotFound { .. })));
    assert!(!dir.path().join("P3B3").exists());
}

fn write_p3b3_raw(root: &Path) {
    let raw = root.join("P3B3").join("raw");
    fs::create_dir_all(&raw).unwrap();
    let documents = Array2::from_shape_fn((12, 4), |(n, t)| (n + t) as i64);
    let labels = Array2::from_shape_fn((12, 4), |(n, task)| match task {
        0 => (n % 3) as i64,
        1 => (n % 2) as i64,
        _ => 0,
    });
    write_npy(raw.join("train-data.npy"), &documents.clone().into_dyn()).unwrap();
    write_npy(raw.join("train-labels.npy"), &labels.clone().into_dyn()).unwrap();
    write_npy(raw.join("test-data.npy"), &documents.into_dyn()).unwrap();
    write_npy(raw.join("test-labels.npy"), &labels.into_dyn()).unwrap();
}

#[test]
fn test_p3b3_multitask_split_on_subsite() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    write_p3b3_raw(dir.path());
    let dataset = P3b3::new(dir.path(), Partition::Train, TaskSelection::default(), true).unwrap();

    let splits = multitask_stratified_split(&dataset, 4, "subsite").unwrap();
    assert_eq!(splits.len(), 4);
    for split in &splits {
        let subsites: Array1<i64> = split
            .valid
            .iter()
            .map(|item| item.unwrap().1.get("subsite").unwrap())
            .collect();
        // One document of each of the three subsites per fold.
        let mut sorted = subsites.to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2]);
    }

    // A task with a single class still splits into folds of equal size.
    let by_behavior = multitask_stratified_split(&dataset, 3, "behavior").unwrap();
    assert!(by_behavior.iter().all(|split| split.valid.len() == 4));
    assert!(matches!(
        multitask_stratified_split(&dataset, 2, "histology"),
        Err(DatastoreError::TaskNotFound(_))
    ));
}
