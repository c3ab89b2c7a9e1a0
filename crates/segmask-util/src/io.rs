//! Image file collaborators: loading masks from disk and rendering them for display.

use std::path::Path;

use image::{Rgb, RgbImage};
use tracing::debug;

use crate::{
    error::{MaskError, MaskResult},
    mask::Mask,
};

/// Mask image utilities
pub struct ImageUtils;

impl ImageUtils {
    /// Load a black-on-white mask image.
    ///
    /// The file is converted to grayscale; black pixels become selected and any
    /// other pixel unselected. Returns `Ok(None)` when the file does not exist.
    ///
    /// # Arguments
    /// * `path` - Path to the image file
    pub fn load_mask<P: AsRef<Path>>(path: P) -> MaskResult<Option<Mask>> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "mask file not found");
            return Ok(None);
        }

        let gray = image::open(path)
            .map_err(|source| MaskError::ImageLoad {
                path: path.display().to_string(),
                source,
            })?
            .into_luma8();

        let (width, height) = gray.dimensions();
        let mask = Mask::from_fn(width, height, |x, y| gray.get_pixel(x, y)[0] == 0);
        debug!(path = %path.display(), width, height, selected = mask.count(), "loaded mask");
        Ok(Some(mask))
    }

    /// Load a grayscale image as-is, without binarizing it.
    pub fn load_gray<P: AsRef<Path>>(path: P) -> MaskResult<image::GrayImage> {
        let path = path.as_ref();
        image::open(path)
            .map(|img| img.into_luma8())
            .map_err(|source| MaskError::ImageLoad {
                path: path.display().to_string(),
                source,
            })
    }

    /// Write the mask as a 0/255 grayscale image; the format follows the extension.
    pub fn save_mask<P: AsRef<Path>>(mask: &Mask, path: P) -> MaskResult<()> {
        let path = path.as_ref();
        mask.as_gray()
            .save(path)
            .map_err(|source| MaskError::ImageSave {
                path: path.display().to_string(),
                source,
            })
    }

    /// Render a mask as a 3-channel image: selected pixels black, the rest white.
    pub fn mask_to_rgb(mask: &Mask) -> RgbImage {
        RgbImage::from_fn(mask.width(), mask.height(), |x, y| {
            if mask.get(x, y) {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use image::{GrayImage, Luma};

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("segmask-io-{}-{name}", std::process::id()))
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let result = ImageUtils::load_mask(scratch_path("does-not-exist.png")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn black_pixels_load_as_selected() {
        let path = scratch_path("black-on-white.png");
        let mut image = GrayImage::from_pixel(6, 4, Luma([255]));
        image.put_pixel(1, 1, Luma([0]));
        image.put_pixel(4, 2, Luma([0]));
        image.put_pixel(5, 3, Luma([128]));
        image.save(&path).unwrap();

        let mask = ImageUtils::load_mask(&path).unwrap().unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(mask.dimensions(), (6, 4));
        assert_eq!(mask.count(), 2);
        assert!(mask.get(1, 1));
        assert!(mask.get(4, 2));
        assert!(!mask.get(5, 3));
    }

    #[test]
    fn saved_mask_round_trips_through_rendering() {
        let path = scratch_path("saved.png");
        let mask = Mask::from_fn(8, 8, |x, y| x == y);
        ImageUtils::save_mask(&mask, &path).unwrap();

        let gray = ImageUtils::load_gray(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(Mask::from_gray(&gray), mask);
    }

    #[test]
    fn undecodable_file_reports_its_path() {
        let path = scratch_path("garbage.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = ImageUtils::load_mask(&path).unwrap_err();
        std::fs::remove_file(&path).ok();

        assert!(matches!(err, MaskError::ImageLoad { .. }));
        assert!(err.to_string().contains("garbage.png"));
    }

    #[test]
    fn rgb_rendering_is_black_on_white() {
        let mask = Mask::from_bools(2, 1, &[true, false]).unwrap();
        let rgb = ImageUtils::mask_to_rgb(&mask);

        assert_eq!(rgb.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(rgb.get_pixel(1, 0), &Rgb([255, 255, 255]));
    }
}
