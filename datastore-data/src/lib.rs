//! Datasets, loaders and resampling utilities.
//!
//! * [`datasets`]: the [`Dataset`] contract, index views, random and
//!   downloadable datasets.
//! * [`sampling`]: bootstrap resampling and stratified k-fold splits.
//! * [`dataloader`]: batching driven by a [`samplers::Sampler`].

pub mod dataloader;
pub mod datasets;
pub mod download;
pub mod samplers;
pub mod sampling;

pub use dataloader::DataLoader;
pub use datasets::{
    ArrayDataset, Dataset, InMemoryDataset, KuzushijiMnist, MultiTaskDataset, MultiTaskRandomData,
    P3b3, RandomData, Subset, TaskSelection,
};
pub use sampling::{
    bootstrap, leave_one_out_bootstrap, multitask_stratified_split, sample, stratified_split,
    BootstrapSample, LeaveOneOutSample, Split, StratifiedKFold,
};
