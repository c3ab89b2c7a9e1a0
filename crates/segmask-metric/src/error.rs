use std::fmt;

use segmask_util::MaskError;
use thiserror::Error;

/// Pixel class of a binary mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskClass {
    Positive,
    Negative,
}

impl fmt::Display for MaskClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => f.write_str("positive"),
            Self::Negative => f.write_str("negative"),
        }
    }
}

/// The error type for mask scoring.
#[derive(Error, Debug)]
pub enum MetricError {
    /// The reference mask lacks one of the two classes, so rates are undefined.
    #[error("reference mask has no {missing} pixels")]
    DegenerateReference {
        /// The class with no pixels in the reference.
        missing: MaskClass,
    },

    /// A ratio of the strict scoring path has a zero denominator.
    #[error("division by zero while computing {quantity}")]
    ZeroDivision {
        /// Name of the metric being computed.
        quantity: &'static str,
    },

    /// The masks themselves are unusable, e.g. their shapes differ.
    #[error(transparent)]
    Mask(#[from] MaskError),
}

/// A specialized `Result` type for scoring operations.
pub type MetricResult<T> = Result<T, MetricError>;
