//! Region-growing operations on binary masks.

use std::collections::BTreeSet;

use image::Luma;
use imageproc::region_labelling::{connected_components, Connectivity};
use tracing::debug;

use crate::mask::Mask;

/// Unselected pixels connected to the image border through 4-connected
/// unselected pixels.
///
/// Background components are labelled on the inverted mask; the components
/// that own at least one border pixel are kept. The input is not modified.
pub fn border_background(mask: &Mask) -> Mask {
    let (width, height) = mask.dimensions();
    let labels = connected_components(mask.invert().as_gray(), Connectivity::Four, Luma([0u8]));

    let border_labels: BTreeSet<u32> = border_pixels(width, height)
        .map(|(x, y)| labels.get_pixel(x, y)[0])
        .filter(|&label| label != 0)
        .collect();

    Mask::from_fn(width, height, |x, y| {
        border_labels.contains(&labels.get_pixel(x, y)[0])
    })
}

/// Border pixels in row-major order, starting at the `(0, 0)` corner.
fn border_pixels(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    (0..height).flat_map(move |y| {
        let columns: Box<dyn Iterator<Item = u32>> = if y == 0 || y + 1 == height {
            Box::new(0..width)
        } else if width > 1 {
            Box::new([0, width - 1].into_iter())
        } else {
            Box::new(std::iter::once(0))
        };
        columns.map(move |x| (x, y))
    })
}

/// Select every unselected pixel that is not connected to the image border.
///
/// Background reachable from corner `(0, 0)` or from any other unselected
/// border pixel, moving through 4-connected unselected pixels, stays
/// unselected. The result is the original selection OR the complement of
/// that background.
pub fn fill_holes(mask: &Mask) -> Mask {
    let (width, height) = mask.dimensions();
    let background = border_background(mask);
    let filled = Mask::from_fn(width, height, |x, y| {
        mask.get(x, y) || !background.get(x, y)
    });

    debug!(
        width,
        height,
        filled = filled.count() - mask.count(),
        "filled enclosed holes"
    );
    filled
}
