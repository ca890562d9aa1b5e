use std::fmt;
use std::path::{Path, PathBuf};

use ndarray::{ArrayD, Axis, Ix1};

use datastore_core::{DatastoreError, Labels, Partition};

use super::remote::{self, ArchiveFormat, DatasetFolders, RemoteSources};
use super::transform::{self, Transform};
use super::traits::{Dataset, InMemoryDataset};

const NAME: &str = "KuzushijiMNIST";

const SOURCES: RemoteSources = RemoteSources {
    train_data: "https://raw.githubusercontent.com/yngtodd/kmnist/master/data/kmnist/kmnist-train-imgs.npz",
    train_labels: "https://raw.githubusercontent.com/yngtodd/kmnist/master/data/kmnist/kmnist-train-labels.npz",
    test_data: "https://raw.githubusercontent.com/yngtodd/kmnist/master/data/kmnist/kmnist-test-imgs.npz",
    test_labels: "https://raw.githubusercontent.com/yngtodd/kmnist/master/data/kmnist/kmnist-test-labels.npz",
    format: ArchiveFormat::Npz,
};

/// Kuzushiji MNIST dataset of 28x28 grayscale character images.
///
/// The archives are fetched from a GitHub mirror as `.npz` files and
/// normalized under `<root>/KuzushijiMNIST/processed/`. Pixel values are kept
/// as they are (cast to `f32`); use a transform to rescale them.
pub struct KuzushijiMnist {
    folders: DatasetFolders,
    partition: Partition,
    data: ArrayD<f32>,
    targets: Labels,
    transform: Option<Transform<ArrayD<f32>>>,
    target_transform: Option<Transform<i64>>,
}

impl KuzushijiMnist {
    /// Loads `partition` from `root`.
    ///
    /// # Arguments
    ///
    /// * `root` - Root directory, the dataset lives in `root/KuzushijiMNIST`.
    /// * `partition` - Either `Partition::Train` or `Partition::Test`.
    /// * `download` - If true, fetches and normalizes the archives unless the
    ///   normalized files already exist.
    ///
    /// # Errors
    ///
    /// * `InvalidPartition` for `Partition::Validation`.
    /// * `DatasetNotFound` when the normalized files are missing and
    ///   `download` is false.
    /// * `Transport` when a download fails.
    pub fn new<P: AsRef<Path>>(
        root: P,
        partition: Partition,
        download: bool,
    ) -> Result<Self, DatastoreError> {
        let folders = DatasetFolders::new(root, NAME);
        let (data, labels) = remote::prepare(&folders, &SOURCES, partition, download)?;
        let labels = labels.into_dimensionality::<Ix1>().map_err(|e| {
            DatastoreError::ShapeMismatch {
                expected: "one label per image".to_string(),
                actual: e.to_string(),
                operation: "KuzushijiMnist::new".to_string(),
            }
        })?;
        Ok(Self {
            folders,
            partition,
            data,
            targets: Labels::Single(labels),
            transform: None,
            target_transform: None,
        })
    }

    /// Sets a function applied to every image on access.
    pub fn with_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(ArrayD<f32>) -> ArrayD<f32> + Send + Sync + 'static,
    {
        self.transform = Some(Box::new(transform));
        self
    }

    /// Sets a function applied to every label on access.
    pub fn with_target_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(i64) -> i64 + Send + Sync + 'static,
    {
        self.target_transform = Some(Box::new(transform));
        self
    }

    pub fn partition(&self) -> Partition {
        self.partition
    }

    pub fn raw_folder(&self) -> PathBuf {
        self.folders.raw_folder()
    }

    pub fn processed_folder(&self) -> PathBuf {
        self.folders.processed_folder()
    }
}

impl Dataset for KuzushijiMnist {
    type Item = (ArrayD<f32>, i64);

    fn get(&self, index: usize) -> Result<Self::Item, DatastoreError> {
        let label = self
            .targets
            .as_single()
            .and_then(|labels| labels.get(index))
            .copied()
            .ok_or(DatastoreError::IndexOutOfBounds {
                index,
                len: self.len(),
            })?;
        let image = self.data.index_axis(Axis(0), index).to_owned();
        Ok((
            transform::apply(&self.transform, image),
            transform::apply(&self.target_transform, label),
        ))
    }

    fn len(&self) -> usize {
        self.data.shape().first().copied().unwrap_or(0)
    }
}

impl InMemoryDataset for KuzushijiMnist {
    type Features = ArrayD<f32>;

    fn load_data(&self) -> (&Self::Features, &Labels) {
        (&self.data, &self.targets)
    }
}

impl fmt::Display for KuzushijiMnist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Dataset {}", NAME)?;
        writeln!(f, "    Number of datapoints: {}", self.len())?;
        writeln!(f, "    Split: {}", self.partition)?;
        writeln!(f, "    Root Location: {}", self.folders.root().display())
    }
}

impl fmt::Debug for KuzushijiMnist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KuzushijiMnist")
            .field("root", &self.folders.root())
            .field("partition", &self.partition)
            .field("shape", &self.data.shape())
            .field("transform", &self.transform.is_some())
            .field("target_transform", &self.target_transform.is_some())
            .finish()
    }
}

#[cfg(test)]
#[path = "kuzushiji_test.rs"]
mod tests;
