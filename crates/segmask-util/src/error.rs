use thiserror::Error;

/// The error type for mask construction, geometry and I/O operations.
///
/// Every variant names the precondition that failed so callers can decide how to
/// recover. None of these are retried internally.
#[derive(Error, Debug)]
pub enum MaskError {
    /// Two masks passed to a binary operation do not share the same dimensions.
    #[error("mask shape mismatch: left={}x{}, right={}x{}", left.0, left.1, right.0, right.1)]
    ShapeMismatch {
        /// Width and height of the first operand.
        left: (u32, u32),
        /// Width and height of the second operand.
        right: (u32, u32),
    },

    /// Raw pixel data does not cover the requested grid.
    #[error("data length mismatch: expected {expected}, got {actual}")]
    DataLengthMismatch {
        /// Number of pixels implied by width and height.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// A coincidence ratio was requested with an empty operand, so the ratio has
    /// no denominator.
    #[error("coincidence ratio is undefined: {left} and {right} selected pixels")]
    EmptyMasks {
        /// Selected pixels in the first operand.
        left: u64,
        /// Selected pixels in the second operand.
        right: u64,
    },

    /// The thresholded image has no contour to measure.
    #[error("no contour found in a {width}x{height} image")]
    NoContour { width: u32, height: u32 },

    /// A negative or NaN ratio threshold.
    #[error("invalid threshold: {value} (expected a non-negative number)")]
    InvalidThreshold {
        /// The rejected threshold.
        value: f64,
    },

    #[error("failed to open image at '{path}': {source}")]
    ImageLoad {
        path: String,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to save image at '{path}': {source}")]
    ImageSave {
        path: String,
        #[source]
        source: image::ImageError,
    },
}

/// A specialized `Result` type for mask operations.
pub type MaskResult<T> = Result<T, MaskError>;
