//! Shared machinery of the download-and-normalize datasets.
//!
//! Every remote dataset lives under `<root>/<name>/`:
//!
//! * `raw/` holds the archives exactly as fetched,
//! * `processed/` holds the normalized `.npy` files (`f32` features, `i64`
//!   labels) for the train and test partitions.
//!
//! The presence of the four processed files is the only check gating a
//! download; their content is never verified.

use std::path::{Path, PathBuf};

use log::info;
use ndarray::ArrayD;

use datastore_core::npy::{read_dyn_npy, read_dyn_npz, read_f32_npy, read_i64_npy, write_npy};
use datastore_core::{DatastoreError, DynArray, Partition};

use crate::download::{download_url, expand_user, file_name_from_url, makedir_exist_ok};

pub const TRAIN_DATA_FILE: &str = "train_data.npy";
pub const TRAIN_LABEL_FILE: &str = "train_labels.npy";
pub const TEST_DATA_FILE: &str = "test_data.npy";
pub const TEST_LABEL_FILE: &str = "test_labels.npy";

/// How the payload array is stored inside a fetched file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveFormat {
    /// A plain `.npy` dump.
    Npy,
    /// A `.npz` archive whose payload is the entry `arr_0`.
    Npz,
}

/// Source URLs of a remote dataset, one per normalized file.
#[derive(Debug, Clone, Copy)]
pub struct RemoteSources {
    pub train_data: &'static str,
    pub train_labels: &'static str,
    pub test_data: &'static str,
    pub test_labels: &'static str,
    pub format: ArchiveFormat,
}

impl RemoteSources {
    pub fn urls(&self) -> [&'static str; 4] {
        [
            self.train_data,
            self.train_labels,
            self.test_data,
            self.test_labels,
        ]
    }
}

/// On-disk layout of a remote dataset.
#[derive(Debug, Clone)]
pub struct DatasetFolders {
    root: PathBuf,
    name: &'static str,
}

impl DatasetFolders {
    pub fn new<P: AsRef<Path>>(root: P, name: &'static str) -> Self {
        Self {
            root: expand_user(root),
            name,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn raw_folder(&self) -> PathBuf {
        self.root.join(self.name).join("raw")
    }

    pub fn processed_folder(&self) -> PathBuf {
        self.root.join(self.name).join("processed")
    }

    pub fn processed_file(&self, file_name: &str) -> PathBuf {
        self.processed_folder().join(file_name)
    }

    /// True when all four processed files exist.
    pub fn check_exists(&self) -> bool {
        [TRAIN_DATA_FILE, TRAIN_LABEL_FILE, TEST_DATA_FILE, TEST_LABEL_FILE]
            .iter()
            .all(|file_name| self.processed_file(file_name).exists())
    }
}

/// Processed `(data, labels)` file names of a partition.
///
/// # Errors
///
/// Returns `DatastoreError::InvalidPartition` for anything but train/test.
pub fn partition_files(partition: Partition) -> Result<(&'static str, &'static str), DatastoreError> {
    match partition {
        Partition::Train => Ok((TRAIN_DATA_FILE, TRAIN_LABEL_FILE)),
        Partition::Test => Ok((TEST_DATA_FILE, TEST_LABEL_FILE)),
        other => Err(DatastoreError::InvalidPartition(other.to_string())),
    }
}

/// Reads the payload array of a fetched file.
pub fn extract_array<P: AsRef<Path>>(path: P, format: ArchiveFormat) -> Result<DynArray, DatastoreError> {
    info!("Extracting {:?}", path.as_ref());
    match format {
        ArchiveFormat::Npy => read_dyn_npy(path),
        ArchiveFormat::Npz => read_dyn_npz(path, "arr_0"),
    }
}

/// Fetches the raw files and writes the normalized ones, unless the
/// normalized files already exist.
pub fn download_and_normalize(
    folders: &DatasetFolders,
    sources: &RemoteSources,
) -> Result<(), DatastoreError> {
    if folders.check_exists() {
        return Ok(());
    }

    let raw_folder = folders.raw_folder();
    makedir_exist_ok(&raw_folder)?;
    makedir_exist_ok(folders.processed_folder())?;

    for url in sources.urls() {
        download_url(url, &raw_folder, file_name_from_url(url))?;
    }

    info!("Processing...");
    let raw = |url: &str| extract_array(raw_folder.join(file_name_from_url(url)), sources.format);

    let train_data = raw(sources.train_data)?.into_f32();
    let train_labels = raw(sources.train_labels)?.into_i64();
    check_aligned(&train_data, &train_labels, Partition::Train)?;
    let test_data = raw(sources.test_data)?.into_f32();
    let test_labels = raw(sources.test_labels)?.into_i64();
    check_aligned(&test_data, &test_labels, Partition::Test)?;

    write_npy(folders.processed_file(TRAIN_DATA_FILE), &train_data)?;
    write_npy(folders.processed_file(TRAIN_LABEL_FILE), &train_labels)?;
    write_npy(folders.processed_file(TEST_DATA_FILE), &test_data)?;
    write_npy(folders.processed_file(TEST_LABEL_FILE), &test_labels)?;

    info!("Done!");
    Ok(())
}

fn check_aligned(
    data: &ArrayD<f32>,
    labels: &ArrayD<i64>,
    partition: Partition,
) -> Result<(), DatastoreError> {
    let samples = data.shape().first().copied().unwrap_or(0);
    let label_rows = labels.shape().first().copied().unwrap_or(0);
    if samples != label_rows {
        return Err(DatastoreError::length_mismatch(
            samples,
            label_rows,
            &format!("normalizing {} partition", partition),
        ));
    }
    Ok(())
}

/// Runs the construction steps every remote dataset shares and returns the
/// processed arrays of `partition`.
///
/// The partition is checked first, then the optional download runs, then a
/// missing processed file fails with `DatasetNotFound`. Without `download`
/// no network access is attempted.
pub fn prepare(
    folders: &DatasetFolders,
    sources: &RemoteSources,
    partition: Partition,
    download: bool,
) -> Result<(ArrayD<f32>, ArrayD<i64>), DatastoreError> {
    let (data_file, label_file) = partition_files(partition)?;

    if download {
        download_and_normalize(folders, sources)?;
    }

    if !folders.check_exists() {
        return Err(DatastoreError::DatasetNotFound {
            root: folders.root().to_path_buf(),
        });
    }

    let data = read_f32_npy(folders.processed_file(data_file))?;
    let labels = read_i64_npy(folders.processed_file(label_file))?;
    check_aligned(&data, &labels, partition)?;
    Ok((data, labels))
}

#[cfg(test)]
#[path = "remote_test.rs"]
mod tests;
