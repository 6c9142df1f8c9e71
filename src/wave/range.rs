//! Value range of a sample sequence.

use super::error::{WaveError, WaveResult};

/// Largest and smallest sample of a non-empty sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRange {
    pub max: i64,
    pub min: i64,
}

impl ValueRange {
    /// Distance between the extremes. Unsigned so a full-scale 64-bit
    /// signal does not overflow.
    pub fn span(&self) -> u64 {
        self.max.abs_diff(self.min)
    }
}

/// Computes `(max, min)` in a single pass.
///
/// # Errors
/// Returns [`WaveError::EmptySequence`] for an empty slice.
pub fn range_of(samples: &[i64]) -> WaveResult<ValueRange> {
    let (&first, rest) = samples.split_first().ok_or(WaveError::EmptySequence)?;
    Ok(rest.iter().fold(
        ValueRange {
            max: first,
            min: first,
        },
        |range, &s| ValueRange {
            max: range.max.max(s),
            min: range.min.min(s),
        },
    ))
}
