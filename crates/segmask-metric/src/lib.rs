//! # segmask-metric
//!
//! Scoring of a candidate binary mask against a reference mask.
//!
//! Two scorers are provided:
//!
//! - [`evaluate`]: manual confusion-matrix metrics with zero guards. Rates are
//!   normalized by the reference class sizes and derived metrics are omitted
//!   when precision and recall are both zero.
//! - [`evaluate_library`]: the same quantities reduced with burn tensor ops on
//!   any [`burn::tensor::backend::Backend`]. It never defaults a ratio; every
//!   zero denominator is a [`MetricError::ZeroDivision`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use burn::backend::NdArray;
//! use segmask_metric::{evaluate, evaluate_library};
//! use segmask_util::Mask;
//!
//! let reference = Mask::from_fn(100, 100, |_, y| y < 50);
//! let candidate = Mask::from_fn(100, 100, |_, _| true);
//!
//! let stats = evaluate(&candidate, &reference)?;
//! assert_eq!(stats.precision, 0.5);
//!
//! let oracle = evaluate_library::<NdArray>(&candidate, &reference, &Default::default())?;
//! assert_eq!(oracle.precision, stats.precision);
//! ```

pub mod confusion;
pub mod error;
pub mod evaluation;
pub mod library;

pub use confusion::ConfusionCounts;
pub use error::{MaskClass, MetricError, MetricResult};
pub use evaluation::{evaluate, MaskStats};
pub use library::{
    evaluate_library, evaluate_library_with, mask_to_tensor, LibraryEvaluationConfig, LibraryStats,
};
