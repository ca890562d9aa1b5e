use std::collections::HashSet;

use ndarray::Array1;

/// Checks that `held_out` folds partition `0..num_samples`: every index
/// appears in exactly one fold.
/// Panics with the offending index otherwise.
pub fn assert_is_partition(held_out: &[Vec<usize>], num_samples: usize) {
    let mut seen = vec![false; num_samples];
    for (fold, indices) in held_out.iter().enumerate() {
        for &index in indices {
            assert!(
                index < num_samples,
                "Index {} in fold {} is out of range for {} samples",
                index,
                fold,
                num_samples
            );
            assert!(!seen[index], "Index {} appears in more than one fold", index);
            seen[index] = true;
        }
    }
    if let Some(missing) = seen.iter().position(|&present| !present) {
        panic!("Index {} is not held out by any fold", missing);
    }
}

/// Checks that `train` and `valid` index lists share no index.
pub fn assert_disjoint(train: &[usize], valid: &[usize]) {
    let train_set: HashSet<usize> = train.iter().copied().collect();
    for index in valid {
        assert!(
            !train_set.contains(index),
            "Index {} is in both the training and the held-out set",
            index
        );
    }
}

/// Labels cycling through `0..num_classes`, so every class has the same
/// number of members when `num_samples` is a multiple of `num_classes`.
pub fn balanced_labels(num_samples: usize, num_classes: usize) -> Array1<i64> {
    Array1::from_shape_fn(num_samples, |i| (i % num_classes) as i64)
}

/// Counts how often each class in `0..num_classes` occurs in `labels`.
pub fn class_counts(labels: &[i64], num_classes: usize) -> Vec<usize> {
    let mut counts = vec![0; num_classes];
    for &label in labels {
        counts[label as usize] += 1;
    }
    counts
}
