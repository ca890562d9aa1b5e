// Random array creation used by the synthetic datasets.

use ndarray::{Array1, ArrayD, IxDyn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::DatastoreError;

/// Builds a `StdRng`, seeded deterministically when `seed` is given.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Draws an array of the given shape from the standard normal distribution.
pub fn randn<R: Rng + ?Sized>(shape: &[usize], rng: &mut R) -> ArrayD<f32> {
    ArrayD::from_shape_simple_fn(IxDyn(shape), || rng.sample(StandardNormal))
}

/// Draws `len` integers uniformly from `[0, high)`.
pub fn randint<R: Rng + ?Sized>(
    len: usize,
    high: i64,
    rng: &mut R,
) -> Result<Array1<i64>, DatastoreError> {
    if high < 1 {
        return Err(DatastoreError::InvalidArgument(format!(
            "randint upper bound must be at least 1, got {}",
            high
        )));
    }
    Ok(Array1::from_shape_simple_fn(len, || rng.gen_range(0..high)))
}
