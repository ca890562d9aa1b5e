//! NumPy array storage.
//!
//! Raw archives are decoded into a [`DynArray`] whatever their element type,
//! then cast to the normalized element types (`f32` features, `i64` labels)
//! and written back as plain `.npy` files.

use std::fs::{self, File};
use std::io::{BufWriter, Read, Seek};
use std::path::Path;

use log::debug;
use ndarray::{ArrayD, OwnedRepr, IxDyn};
use ndarray_npy::{NpzReader, ReadNpyExt, ReadNpyError, ReadNpzError, WritableElement, WriteNpyExt};
use num_traits::AsPrimitive;

use crate::error::DatastoreError;
use crate::types::DType;

/// An array decoded from storage with its original element type.
#[derive(Debug, Clone, PartialEq)]
pub enum DynArray {
    U8(ArrayD<u8>),
    I8(ArrayD<i8>),
    U16(ArrayD<u16>),
    I16(ArrayD<i16>),
    U32(ArrayD<u32>),
    I32(ArrayD<i32>),
    U64(ArrayD<u64>),
    I64(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

fn cast<S, T>(array: ArrayD<S>) -> ArrayD<T>
where
    S: AsPrimitive<T>,
    T: Copy + 'static,
{
    array.mapv(|value| value.as_())
}

macro_rules! dispatch {
    ($array:expr, $inner:ident => $body:expr) => {
        match $array {
            DynArray::U8($inner) => $body,
            DynArray::I8($inner) => $body,
            DynArray::U16($inner) => $body,
            DynArray::I16($inner) => $body,
            DynArray::U32($inner) => $body,
            DynArray::I32($inner) => $body,
            DynArray::U64($inner) => $body,
            DynArray::I64($inner) => $body,
            DynArray::F32($inner) => $body,
            DynArray::F64($inner) => $body,
        }
    };
}

impl DynArray {
    /// Decodes a `.npy` payload, trying each supported element type in turn.
    pub fn from_npy_bytes(bytes: &[u8]) -> Result<Self, ReadNpyError> {
        macro_rules! attempt {
            ($elem:ty, $variant:ident) => {
                match ArrayD::<$elem>::read_npy(bytes) {
                    Ok(array) => return Ok(DynArray::$variant(array)),
                    Err(err) => err,
                }
            };
        }
        attempt!(u8, U8);
        attempt!(i8, I8);
        attempt!(u16, U16);
        attempt!(i16, I16);
        attempt!(u32, U32);
        attempt!(i32, I32);
        attempt!(u64, U64);
        attempt!(i64, I64);
        attempt!(f32, F32);
        Err(attempt!(f64, F64))
    }

    /// Decodes the `.npz` entry called `name` (with or without the `.npy`
    /// suffix).
    pub fn from_npz_entry<R: Read + Seek>(
        npz: &mut NpzReader<R>,
        name: &str,
    ) -> Result<Self, DatastoreError> {
        let wanted = name.trim_end_matches(".npy");
        let names = npz.names()?;
        let index = names
            .iter()
            .position(|entry| entry.trim_end_matches(".npy") == wanted)
            .ok_or_else(|| {
                DatastoreError::InvalidArgument(format!(
                    "archive has no entry '{}' (entries: {:?})",
                    name, names
                ))
            })?;

        macro_rules! attempt {
            ($elem:ty, $variant:ident) => {
                match npz.by_index::<OwnedRepr<$elem>, IxDyn>(index) {
                    Ok(array) => return Ok(DynArray::$variant(array)),
                    Err(err) => err,
                }
            };
        }
        attempt!(u8, U8);
        attempt!(i8, I8);
        attempt!(u16, U16);
        attempt!(i16, I16);
        attempt!(u32, U32);
        attempt!(i32, I32);
        attempt!(u64, U64);
        attempt!(i64, I64);
        attempt!(f32, F32);
        let err: ReadNpzError = attempt!(f64, F64);
        Err(err.into())
    }

    pub fn dtype(&self) -> DType {
        match self {
            DynArray::U8(_) => DType::U8,
            DynArray::I8(_) => DType::I8,
            DynArray::U16(_) => DType::U16,
            DynArray::I16(_) => DType::I16,
            DynArray::U32(_) => DType::U32,
            DynArray::I32(_) => DType::I32,
            DynArray::U64(_) => DType::U64,
            DynArray::I64(_) => DType::I64,
            DynArray::F32(_) => DType::F32,
            DynArray::F64(_) => DType::F64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        dispatch!(self, array => array.shape())
    }

    /// Casts to `f32`, the normalized feature element type.
    pub fn into_f32(self) -> ArrayD<f32> {
        match self {
            DynArray::F32(array) => array,
            other => dispatch!(other, array => cast(array)),
        }
    }

    /// Casts to `i64`, the normalized label element type. Floating-point
    /// values are truncated toward zero.
    pub fn into_i64(self) -> ArrayD<i64> {
        match self {
            DynArray::I64(array) => array,
            other => dispatch!(other, array => cast(array)),
        }
    }
}

/// Reads a `.npy` file of any supported element type.
pub fn read_dyn_npy<P: AsRef<Path>>(path: P) -> Result<DynArray, DatastoreError> {
    let bytes = fs::read(path.as_ref())?;
    let array = DynArray::from_npy_bytes(&bytes)?;
    debug!(
        "Read {:?} array of shape {:?} from {:?}",
        array.dtype(),
        array.shape(),
        path.as_ref()
    );
    Ok(array)
}

/// Reads entry `name` of a `.npz` archive, whatever its element type.
pub fn read_dyn_npz<P: AsRef<Path>>(path: P, name: &str) -> Result<DynArray, DatastoreError> {
    let mut npz = NpzReader::new(File::open(path.as_ref())?)?;
    DynArray::from_npz_entry(&mut npz, name)
}

/// Reads a normalized `f32` array.
pub fn read_f32_npy<P: AsRef<Path>>(path: P) -> Result<ArrayD<f32>, DatastoreError> {
    let file = File::open(path)?;
    Ok(ArrayD::<f32>::read_npy(file)?)
}

/// Reads a normalized `i64` array.
pub fn read_i64_npy<P: AsRef<Path>>(path: P) -> Result<ArrayD<i64>, DatastoreError> {
    let file = File::open(path)?;
    Ok(ArrayD::<i64>::read_npy(file)?)
}

/// Writes `array` as a `.npy` file, replacing any existing file.
pub fn write_npy<P, A>(path: P, array: &ArrayD<A>) -> Result<(), DatastoreError>
where
    P: AsRef<Path>,
    A: WritableElement,
{
    let writer = BufWriter::new(File::create(path.as_ref())?);
    array.write_npy(writer)?;
    debug!("Wrote array of shape {:?} to {:?}", array.shape(), path.as_ref());
    Ok(())
}
