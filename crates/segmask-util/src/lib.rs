//! # segmask-util
//!
//! Binary mask data model and the geometry engine that refines masks.
//!
//! - [`Mask`]: encoding-agnostic 2-D selection grid backed by a 0/255 [`image::GrayImage`]
//! - [`geometry`]: coincidence and containment tests, hole filling, largest-region
//!   extraction, region pruning, bounding and circular masks
//! - [`contours`]: border tracing in raster discovery order and polygon geometry
//! - [`ImageUtils`]: loading masks from image files and rendering them for display

pub mod contours;
pub mod error;
pub mod geometry;
pub mod io;
pub mod mask;
pub mod morphology;

pub use error::{MaskError, MaskResult};
pub use geometry::{
    bounding_circle, circular_boolean_mask, circular_mask, coincidence_ratio, contains,
    largest_component, mask_bounding_circle, prune_by_region, prune_by_region_with, OntoConfig,
    PruneConfig,
};
pub use io::ImageUtils;
pub use mask::{Circle, Mask};
pub use morphology::{border_background, fill_holes};
