//! Geometry engine: set relationships between masks and contour-based refinement.
//!
//! Every operation here is a pure function of its arguments. Inputs are borrowed
//! and never modified; refined masks are returned as new values.

use burn::config::Config;
use image::{GrayImage, ImageBuffer, Luma, Pixel};
use imageproc::drawing::draw_filled_circle_mut;
use tracing::{debug, trace, warn};

use crate::{
    contours::{fill_contour, min_enclosing_circle, trace_contours, Contour},
    error::{MaskError, MaskResult},
    mask::{Circle, Mask, SELECTED},
};

/// Settings for [`contains`].
#[derive(Config, Debug)]
pub struct OntoConfig {
    /// Fraction of a mask that must overlap the other one.
    #[config(default = 0.9)]
    pub threshold: f64,
}

impl OntoConfig {
    /// Run [`contains`] with this configuration.
    pub fn contains(&self, a: &Mask, b: &Mask) -> MaskResult<bool> {
        contains(a, b, self.threshold)
    }
}

/// Settings for [`prune_by_region`].
#[derive(Config, Debug)]
pub struct PruneConfig {
    /// Contours with polygon area at or below this value are never pruned.
    #[config(default = 100.0)]
    pub min_area: f64,
}

/// Intersection size over the smaller of the two selections.
///
/// Fails with [`MaskError::EmptyMasks`] when either mask has no selected pixel,
/// since the ratio has no denominator.
pub fn coincidence_ratio(a: &Mask, b: &Mask) -> MaskResult<f64> {
    let common = a.intersection_count(b)?;
    let (left, right) = (a.count(), b.count());
    let smaller = left.min(right);
    if smaller == 0 {
        return Err(MaskError::EmptyMasks { left, right });
    }
    Ok(common as f64 / smaller as f64)
}

/// Whether either mask lies mostly inside the other.
///
/// True when the intersection exceeds `threshold` times the size of `a` or of
/// `b`. The result does not depend on argument order. A threshold above 1 can
/// never be met and yields `false`; negative or NaN thresholds are rejected.
pub fn contains(a: &Mask, b: &Mask, threshold: f64) -> MaskResult<bool> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(MaskError::InvalidThreshold { value: threshold });
    }
    let common = a.intersection_count(b)? as f64;
    Ok(common > threshold * a.count() as f64 || common > threshold * b.count() as f64)
}

/// Keep only the largest externally connected region, with its holes filled.
///
/// Regions are compared by the polygon area of their outer border; on ties the
/// region whose border is discovered first in raster order wins. A mask with no
/// region is returned unchanged.
pub fn largest_component(mask: &Mask) -> Mask {
    let contours = trace_contours(mask);
    let mut largest: Option<(&Contour, f64)> = None;
    for contour in contours.iter().filter(|c| c.is_external()) {
        let area = contour.area();
        if largest.map_or(true, |(_, best)| area > best) {
            largest = Some((contour, area));
        }
    }

    let Some((contour, area)) = largest else {
        return mask.clone();
    };

    debug!(
        regions = contours.iter().filter(|c| c.is_external()).count(),
        area, "kept largest region"
    );
    let mut kept = Mask::new(mask.width(), mask.height());
    fill_contour(&mut kept, &contour.points, true);
    kept
}

/// Erase every region above `boundary_y`, using the default [`PruneConfig`].
pub fn prune_by_region(mask: &Mask, boundary_y: i32) -> Mask {
    prune_by_region_with(mask, boundary_y, &PruneConfig::new())
}

/// Erase every contour whose centroid row is above `boundary_y`.
///
/// All borders are visited, holes included. A border is erased (its polygon
/// and everything inside it cleared) when its area exceeds
/// `config.min_area` and its truncated centroid row is strictly less than
/// `boundary_y`. Zero-area borders have no centroid and are skipped.
pub fn prune_by_region_with(mask: &Mask, boundary_y: i32, config: &PruneConfig) -> Mask {
    let mut pruned = mask.clone();

    for (index, contour) in trace_contours(mask).iter().enumerate() {
        let area = contour.area();
        if area <= config.min_area {
            continue;
        }

        let Some((_, cy)) = contour.moments().centroid() else {
            warn!(index, area, "skipping contour with zero moment");
            continue;
        };

        let row = cy.trunc();
        if row < f64::from(boundary_y) {
            trace!(index, area, row, boundary_y, "erasing contour");
            fill_contour(&mut pruned, &contour.points, false);
        }
    }

    pruned
}

/// Minimum enclosing circle of the first dark region of `image`.
///
/// The image is binarized with an inverted threshold: pixels with intensity at
/// most 1 form the measured region. The circle encloses the first border found
/// in raster order, which is not necessarily the largest one. Coordinates and
/// radius are truncated to integers.
///
/// A [`Mask`] passed through [`Mask::as_gray`] therefore measures its
/// unselected region; use [`mask_bounding_circle`] to measure the selection.
pub fn bounding_circle(image: &GrayImage) -> MaskResult<Circle> {
    let dark = Mask::from_fn(image.width(), image.height(), |x, y| {
        image.get_pixel(x, y)[0] <= 1
    });
    mask_bounding_circle(&dark)
}

/// Minimum enclosing circle of the first selected region of `mask`.
///
/// Same selection and truncation rules as [`bounding_circle`], applied to the
/// selected pixels directly.
///
/// ```rust,ignore
/// use segmask_util::{circular_boolean_mask, mask_bounding_circle, Circle};
///
/// let disk = circular_boolean_mask((80, 60), Circle::new(30, 25, 12));
/// let circle = mask_bounding_circle(&disk)?;
/// assert_eq!(circle.center(), (30, 25));
/// ```
pub fn mask_bounding_circle(mask: &Mask) -> MaskResult<Circle> {
    let contours = trace_contours(mask);
    let no_contour = || MaskError::NoContour {
        width: mask.width(),
        height: mask.height(),
    };

    let first = contours.first().ok_or_else(no_contour)?;
    let (cx, cy, radius) = min_enclosing_circle(&first.points).ok_or_else(no_contour)?;
    let circle = Circle::new(cx as i32, cy as i32, radius as i32);

    debug!(contours = contours.len(), ?circle, "bounding circle");
    Ok(circle)
}

/// A mask of the given `(width, height)` with the disk of `circle` selected.
///
/// The disk boundary is inclusive. A negative radius selects nothing.
pub fn circular_boolean_mask((width, height): (u32, u32), circle: Circle) -> Mask {
    let mut canvas = GrayImage::new(width, height);
    if circle.radius >= 0 {
        draw_filled_circle_mut(&mut canvas, circle.center(), circle.radius, Luma([SELECTED]));
    }
    Mask::from_gray_owned(canvas)
}

/// Zero every pixel of `image` outside the disk of `circle`.
///
/// All channels of a pixel inside the disk are kept as they are.
pub fn circular_mask<P>(image: &ImageBuffer<P, Vec<u8>>, circle: Circle) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let disk = circular_boolean_mask(image.dimensions(), circle);
    let mut masked = image.clone();
    for (x, y, pixel) in masked.enumerate_pixels_mut() {
        if !disk.get(x, y) {
            pixel.channels_mut().fill(0);
        }
    }
    masked
}
