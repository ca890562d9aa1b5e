//! Resampling: bootstrap draws and stratified k-fold cross-validation.

pub mod bootstrap;
pub mod cross_validation;

pub use bootstrap::{
    bootstrap, bootstrap_with_rng, leave_one_out_bootstrap, leave_one_out_bootstrap_with_rng,
    sample, sample_with_rng, BootstrapSample, LeaveOneOutSample,
};
pub use cross_validation::{multitask_stratified_split, stratified_split, Split, StratifiedKFold};
