// datastore-data/src/dataloader_test.rs

use super::*;
use crate::datasets::RandomData;
use crate::samplers::{RandomSampler, SequentialSampler};

/// Dataset of `0..len` that counts its epoch-end calls.
#[derive(Debug)]
struct CountingDataset {
    len: usize,
    epochs_ended: usize,
}

impl CountingDataset {
    fn new(len: usize) -> Self {
        Self {
            len,
            epochs_ended: 0,
        }
    }
}

impl Dataset for CountingDataset {
    type Item = usize;

    fn get(&self, index: usize) -> Result<Self::Item, DatastoreError> {
        if index >= self.len {
            return Err(DatastoreError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(index)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn on_epoch_end(&mut self) {
        self.epochs_ended += 1;
    }
}

fn collect_batches<D: Dataset, S: Sampler>(loader: &mut DataLoader<D, S>) -> Vec<Vec<D::Item>> {
    loader
        .by_ref()
        .map(|batch| batch.expect("Batch should not error"))
        .collect()
}

#[test]
fn test_dataloader_sequential() {
    let mut loader =
        DataLoader::new(CountingDataset::new(6), 2, SequentialSampler::new(), false, None).unwrap();
    let batches = collect_batches(&mut loader);
    assert_eq!(batches, vec![vec![0, 1], vec![2, 3], vec![4, 5]]);
    assert_eq!(loader.num_batches(), 3);
}

#[test]
fn test_dataloader_drop_last() {
    let mut loader =
        DataLoader::new(CountingDataset::new(5), 2, SequentialSampler::new(), true, None).unwrap();
    let batches = collect_batches(&mut loader);
    // The trailing batch of one item is skipped.
    assert_eq!(batches, vec![vec![0, 1], vec![2, 3]]);
    assert_eq!(loader.num_batches(), 2);
}

#[test]
fn test_dataloader_keeps_incomplete_last_batch() {
    let mut loader =
        DataLoader::with_default_collate(CountingDataset::new(5), 2, SequentialSampler::new(), false)
            .unwrap();
    let batches = collect_batches(&mut loader);
    assert_eq!(batches.last(), Some(&vec![4]));
    assert_eq!(loader.num_batches(), 3);
}

#[test]
fn test_dataloader_rejects_zero_batch_size() {
    let result = DataLoader::new(CountingDataset::new(3), 0, SequentialSampler::new(), false, None);
    assert!(matches!(result, Err(DatastoreError::InvalidArgument(_))));
}

#[test]
fn test_next_epoch_calls_dataset_hook() {
    let mut loader =
        DataLoader::new(CountingDataset::new(4), 3, SequentialSampler::new(), false, None).unwrap();
    assert_eq!(collect_batches(&mut loader).len(), 2);
    assert!(loader.next().is_none());

    loader.next_epoch();
    assert_eq!(loader.epoch(), 1);
    assert_eq!(loader.dataset().epochs_ended, 1);
    assert_eq!(collect_batches(&mut loader), vec![vec![0, 1, 2], vec![3]]);

    loader.next_epoch();
    assert_eq!(loader.into_dataset().epochs_ended, 2);
}

/// Dataset of `0..len` that gains one item at every epoch end.
#[derive(Debug)]
struct GrowingDataset {
    len: usize,
}

impl Dataset for GrowingDataset {
    type Item = usize;

    fn get(&self, index: usize) -> Result<Self::Item, DatastoreError> {
        if index >= self.len {
            return Err(DatastoreError::IndexOutOfBounds {
                index,
                len: self.len,
            });
        }
        Ok(index)
    }

    fn len(&self) -> usize {
        self.len
    }

    fn on_epoch_end(&mut self) {
        self.len += 1;
    }
}

#[test]
fn test_sequential_epochs_follow_resized_dataset() {
    let mut loader =
        DataLoader::new(GrowingDataset { len: 2 }, 2, SequentialSampler::new(), false, None).unwrap();
    assert_eq!(collect_batches(&mut loader), vec![vec![0, 1]]);
    loader.next_epoch();
    assert_eq!(collect_batches(&mut loader), vec![vec![0, 1], vec![2]]);
}

#[test]
fn test_dataloader_custom_collate() {
    let reverse: CollateFn<CountingDataset> = Box::new(|mut batch: Vec<usize>| {
        batch.reverse();
        Ok(batch)
    });
    let mut loader =
        DataLoader::new(CountingDataset::new(4), 2, SequentialSampler::new(), false, Some(reverse))
            .unwrap();
    assert_eq!(collect_batches(&mut loader), vec![vec![1, 0], vec![3, 2]]);
}

#[test]
fn test_dataloader_collate_error_is_forwarded() {
    let failing: CollateFn<CountingDataset> =
        Box::new(|_: Vec<usize>| Err(DatastoreError::InvalidArgument("cannot collate".to_string())));
    let mut loader =
        DataLoader::new(CountingDataset::new(2), 2, SequentialSampler::new(), false, Some(failing))
            .unwrap();
    assert!(matches!(loader.next(), Some(Err(DatastoreError::InvalidArgument(_)))));
}

#[test]
fn test_dataloader_random_sampler_covers_dataset() {
    let dataset = RandomData::new(10, 2, Some(5)).unwrap();
    let mut loader =
        DataLoader::new(dataset, 4, RandomSampler::new(false, None).with_seed(3), false, None).unwrap();
    let batches = collect_batches(&mut loader);
    assert_eq!(batches.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 4, 2]);
    let mut values: Vec<f32> = batches.into_iter().flatten().map(|(value, _)| value).collect();
    let mut expected: Vec<f32> = loader.dataset().iter().map(|item| item.unwrap().0).collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    expected.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(values, expected);
}
