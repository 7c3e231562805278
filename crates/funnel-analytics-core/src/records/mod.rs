pub mod qualification;
pub mod revenue;

#[cfg(feature = "acquisition")]
pub mod acquisition;

use serde::{Deserialize, Serialize};

use crate::types::Count;
use crate::validation::ValidationError;

/// Result of normalizing a batch of raw entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedBatch<T> {
    pub records: Vec<T>,
    pub rejected: Vec<RejectedEntry>,
}

impl<T> Default for NormalizedBatch<T> {
    fn default() -> Self {
        NormalizedBatch {
            records: Vec::new(),
            rejected: Vec::new(),
        }
    }
}

/// A raw entry that failed validation, by its position in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedEntry {
    pub index: usize,
    pub errors: Vec<ValidationError>,
}

/// Only called after validation has rejected negatives.
pub(crate) fn to_count(value: i64) -> Count {
    Count::try_from(value).unwrap_or(0)
}
