//! Bootstrap and stratified k-fold over a random dataset, then one epoch of
//! batches through a DataLoader.

use datastore_data::dataloader::DataLoader;
use datastore_data::datasets::{Dataset, RandomData};
use datastore_data::samplers::RandomSampler;
use datastore_data::sampling::{bootstrap, stratified_split};
use datastore_core::DatastoreError;

fn main() -> Result<(), DatastoreError> {
    let dataset = RandomData::new(100, 3, Some(13))?;

    println!("--- Bootstrap ---");
    for (i, draw) in bootstrap(&dataset, 5, 0.5)?.iter().enumerate() {
        println!(
            "Draw {i}: {} training indices, {} held out",
            draw.train.len(),
            draw.valid.len()
        );
    }

    println!("\n--- Stratified 5-fold ---");
    for (i, split) in stratified_split(&dataset, 5)?.iter().enumerate() {
        let first = split.valid.get(0)?;
        println!(
            "Fold {i}: train {} / valid {} (first held-out item: {:?})",
            split.train.len(),
            split.valid.len(),
            first
        );
    }

    println!("\n--- DataLoader ---");
    let sampler = RandomSampler::new(false, None).with_seed(7);
    let mut loader = DataLoader::with_default_collate(dataset, 32, sampler, false)?;
    for (i, batch) in loader.by_ref().enumerate() {
        println!("Batch {i}: {} items", batch?.len());
    }
    loader.next_epoch();
    println!("Now at epoch {}", loader.epoch());
    Ok(())
}
