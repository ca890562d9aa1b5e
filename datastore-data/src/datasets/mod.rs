pub mod array_dataset;
pub mod kuzushiji;
pub mod p3b3;
pub mod random;
pub mod remote;
pub mod subset;
pub mod traits;
pub mod transform;

pub use array_dataset::ArrayDataset;
pub use kuzushiji::KuzushijiMnist;
pub use p3b3::{P3b3, TaskSelection};
pub use random::{MultiTaskRandomData, RandomData};
pub use subset::Subset;
pub use traits::{Dataset, DatasetIter, InMemoryDataset, MultiTaskDataset};
pub use transform::Transform;
