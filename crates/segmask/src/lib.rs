//! `segmask`: scoring and geometric refinement of binary segmentation masks.
//!
//! This crate bundles the mask engine and the scorers behind one interface and
//! ships the `segmask` command-line tool.

#[cfg(feature = "ndarray")]
pub mod backend;

#[doc(inline)]
pub use segmask_metric as metric;
#[doc(inline)]
pub use segmask_util as util;
