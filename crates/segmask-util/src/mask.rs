//! Binary mask data model.
//!
//! A [`Mask`] is a rectangular grid with one flag per pixel. Storage is a
//! [`GrayImage`] normalized to `0` (unselected) and `255` (selected), so the
//! same buffer can be handed to `imageproc` routines without conversion.
//! Constructors accept any numeric encoding (0/1, 0/255, arbitrary nonzero) and
//! normalize at the boundary.

use image::{GrayImage, Luma};
use serde::{Deserialize, Serialize};

use crate::error::{MaskError, MaskResult};

/// Pixel value of a selected pixel in the normalized buffer.
pub const SELECTED: u8 = u8::MAX;
/// Pixel value of an unselected pixel in the normalized buffer.
pub const UNSELECTED: u8 = 0;

/// A binary segmentation mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    buffer: GrayImage,
}

impl Mask {
    /// Create an all-unselected mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: GrayImage::new(width, height),
        }
    }

    /// Create a mask from a grayscale image, treating any nonzero pixel as selected.
    pub fn from_gray(image: &GrayImage) -> Self {
        let mut buffer = image.clone();
        normalize(&mut buffer);
        Self { buffer }
    }

    /// Take ownership of a grayscale image, treating any nonzero pixel as selected.
    pub fn from_gray_owned(mut image: GrayImage) -> Self {
        normalize(&mut image);
        Self { buffer: image }
    }

    /// Create a mask from row-major raw values; any nonzero value is selected.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> MaskResult<Self> {
        let expected = width as usize * height as usize;
        let actual = data.len();
        let buffer = GrayImage::from_raw(width, height, data)
            .filter(|_| actual == expected)
            .ok_or(MaskError::DataLengthMismatch { expected, actual })?;
        Ok(Self::from_gray_owned(buffer))
    }

    /// Create a mask from row-major booleans.
    pub fn from_bools(width: u32, height: u32, data: &[bool]) -> MaskResult<Self> {
        let raw = data
            .iter()
            .map(|&selected| if selected { SELECTED } else { UNSELECTED })
            .collect();
        Self::from_raw(width, height, raw)
    }

    /// Create a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> bool,
    {
        let buffer = GrayImage::from_fn(width, height, |x, y| {
            Luma([if f(x, y) { SELECTED } else { UNSELECTED }])
        });
        Self { buffer }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Width and height of the grid.
    pub fn dimensions(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// Total number of pixels.
    pub fn pixel_count(&self) -> usize {
        self.buffer.as_raw().len()
    }

    /// Whether the pixel at `(x, y)` is selected. Out-of-bounds reads are unselected.
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.buffer
            .get_pixel_checked(x, y)
            .is_some_and(|p| p[0] != UNSELECTED)
    }

    /// Set the pixel at `(x, y)`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, selected: bool) {
        if let Some(pixel) = self.buffer.get_pixel_mut_checked(x, y) {
            pixel[0] = if selected { SELECTED } else { UNSELECTED };
        }
    }

    /// Number of selected pixels.
    pub fn count(&self) -> u64 {
        self.buffer
            .as_raw()
            .iter()
            .filter(|&&v| v != UNSELECTED)
            .count() as u64
    }

    /// True when no pixel is selected.
    pub fn is_empty(&self) -> bool {
        self.buffer.as_raw().iter().all(|&v| v == UNSELECTED)
    }

    /// Row-major iterator over the pixel flags.
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        self.buffer.as_raw().iter().map(|&v| v != UNSELECTED)
    }

    /// The normalized 0/255 buffer.
    pub fn as_gray(&self) -> &GrayImage {
        &self.buffer
    }

    pub fn into_gray(self) -> GrayImage {
        self.buffer
    }

    /// A new mask with every pixel flipped.
    pub fn invert(&self) -> Self {
        let mut buffer = self.buffer.clone();
        for value in buffer.iter_mut() {
            *value = !*value;
        }
        Self { buffer }
    }

    /// Pixel-wise intersection of two same-shape masks.
    pub fn and(&self, other: &Self) -> MaskResult<Self> {
        self.zip_with(other, |a, b| a && b)
    }

    /// Pixel-wise union of two same-shape masks.
    pub fn or(&self, other: &Self) -> MaskResult<Self> {
        self.zip_with(other, |a, b| a || b)
    }

    /// Number of pixels selected in both masks.
    pub fn intersection_count(&self, other: &Self) -> MaskResult<u64> {
        self.ensure_same_shape(other)?;
        Ok(self
            .iter()
            .zip(other.iter())
            .filter(|&(a, b)| a && b)
            .count() as u64)
    }

    /// Fail with [`MaskError::ShapeMismatch`] unless both masks share dimensions.
    pub fn ensure_same_shape(&self, other: &Self) -> MaskResult<()> {
        if self.dimensions() == other.dimensions() {
            Ok(())
        } else {
            Err(MaskError::ShapeMismatch {
                left: self.dimensions(),
                right: other.dimensions(),
            })
        }
    }

    fn zip_with<F>(&self, other: &Self, f: F) -> MaskResult<Self>
    where
        F: Fn(bool, bool) -> bool,
    {
        self.ensure_same_shape(other)?;
        let raw = self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| if f(a, b) { SELECTED } else { UNSELECTED })
            .collect();
        Self::from_raw(self.width(), self.height(), raw)
    }
}

impl From<GrayImage> for Mask {
    fn from(image: GrayImage) -> Self {
        Self::from_gray_owned(image)
    }
}

fn normalize(buffer: &mut GrayImage) {
    for value in buffer.iter_mut() {
        if *value != UNSELECTED {
            *value = SELECTED;
        }
    }
}

/// A disk described by an integer center and radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Circle {
    pub center_x: i32,
    pub center_y: i32,
    pub radius: i32,
}

impl Circle {
    pub const fn new(center_x: i32, center_y: i32, radius: i32) -> Self {
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    /// Center as an `(x, y)` pair.
    pub const fn center(&self) -> (i32, i32) {
        (self.center_x, self.center_y)
    }
}
