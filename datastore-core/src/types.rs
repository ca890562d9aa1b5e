use std::fmt;
use std::str::FromStr;

use crate::error::DatastoreError;

/// Element types a stored array may carry before normalization.
///
/// Raw archives come with whatever dtype they were dumped with; the
/// normalized layout only ever holds `F32` features and `I64` labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    /// 32-bit floating-point type.
    F32,
    /// 64-bit floating-point type.
    F64,
}

/// Dataset partition selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Train,
    Test,
    /// Recognized by the parser, but no download-backed dataset ships a
    /// validation partition; asking for one yields `InvalidPartition`.
    Validation,
}

impl Partition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::Train => "train",
            Partition::Test => "test",
            Partition::Validation => "validation",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = DatastoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Partition::Train),
            "test" => Ok(Partition::Test),
            "validation" => Ok(Partition::Validation),
            other => Err(DatastoreError::InvalidPartition(other.to_string())),
        }
    }
}
