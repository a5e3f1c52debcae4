//! Synthetic part images for testing.

use std::path::{Path, PathBuf};

use anyhow::Context;
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use part_qa_core::CapturedImage;

/// Builder for creating synthetic part images.
///
/// Each image targets a known detector response, so tests can assert on
/// verdicts without shipping binary fixtures.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Clean parts ===

    /// Creates a uniform gray image. Mid-gray fires no detector.
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> CapturedImage {
        let img = GrayImage::from_pixel(width, height, Luma([value]));
        CapturedImage::new("synthetic://uniform_gray", DynamicImage::ImageLuma8(img))
    }

    /// Creates a uniform RGB image.
    #[must_use]
    pub fn rgb_uniform(width: u32, height: u32, r: u8, g: u8, b: u8) -> CapturedImage {
        let img = RgbImage::from_pixel(width, height, Rgb([r, g, b]));
        CapturedImage::new("synthetic://rgb_uniform", DynamicImage::ImageRgb8(img))
    }

    /// Creates a smooth horizontal gradient (no edges, low local variance).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient(width: u32, height: u32) -> CapturedImage {
        let img = GrayImage::from_fn(width, height, |x, _| {
            let val = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            Luma([val])
        });
        CapturedImage::new(
            "synthetic://horizontal_gradient",
            DynamicImage::ImageLuma8(img),
        )
    }

    // === Exposure ===

    /// Creates an all-black image (brightness penalty, nothing else).
    #[must_use]
    pub fn underexposed(width: u32, height: u32) -> CapturedImage {
        Self::uniform_gray(width, height, 0)
    }

    /// Creates an all-white image (brightness penalty, nothing else).
    #[must_use]
    pub fn overexposed(width: u32, height: u32) -> CapturedImage {
        Self::uniform_gray(width, height, 255)
    }

    // === Anomalous parts ===

    /// Creates a black and white checkerboard with 1-pixel cells.
    ///
    /// Gray std is 127.5 and local variance is high, so the brightness and
    /// texture detectors fire.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32) -> CapturedImage {
        Self::checkerboard_with_cell_size(width, height, 1)
    }

    /// Creates a black and white checkerboard with custom cell size.
    #[must_use]
    pub fn checkerboard_with_cell_size(width: u32, height: u32, cell_size: u32) -> CapturedImage {
        let cell = cell_size.max(1);
        let img = RgbImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Rgb([255, 255, 255])
            } else {
                Rgb([0, 0, 0])
            }
        });
        CapturedImage::new("synthetic://checkerboard", DynamicImage::ImageRgb8(img))
    }

    /// Creates three vertical bands of red, green and blue.
    ///
    /// With a width divisible by three the regional hue means are 0, 60 and
    /// 120, which fires the color uniformity detector.
    #[must_use]
    pub fn hue_bands(width: u32, height: u32) -> CapturedImage {
        let band = (width / 3).max(1);
        let img = RgbImage::from_fn(width, height, |x, _| match x / band {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        });
        CapturedImage::new("synthetic://hue_bands", DynamicImage::ImageRgb8(img))
    }

    /// Creates a grid of small bright squares on a dark background.
    ///
    /// Each square leaves its own closed edge loop, which drives the contour
    /// count and fragmentation signals up.
    #[must_use]
    pub fn dot_grid(width: u32, height: u32, period: u32, dot: u32) -> CapturedImage {
        let period = period.max(1);
        let img = RgbImage::from_fn(width, height, |x, y| {
            if x % period < dot && y % period < dot {
                Rgb([230, 230, 230])
            } else {
                Rgb([20, 20, 20])
            }
        });
        CapturedImage::new("synthetic://dot_grid", DynamicImage::ImageRgb8(img))
    }

    /// Creates deterministic pseudo-random noise (high local variance).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn noise(width: u32, height: u32, seed: u32) -> CapturedImage {
        let mut state = seed.max(1);
        let img = GrayImage::from_fn(width, height, |_, _| {
            // xorshift32
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            Luma([(state >> 24) as u8])
        });
        CapturedImage::new("synthetic://noise", DynamicImage::ImageLuma8(img))
    }

    // === Edge cases ===

    /// Creates a 1x1 pixel image.
    #[must_use]
    pub fn single_pixel(value: u8) -> CapturedImage {
        let img = GrayImage::from_pixel(1, 1, Luma([value]));
        CapturedImage::new("synthetic://1x1", DynamicImage::ImageLuma8(img))
    }

    /// Creates a zero-sized image, which the detector must reject.
    #[must_use]
    pub fn empty() -> CapturedImage {
        CapturedImage::new("synthetic://empty", DynamicImage::new_rgb8(0, 0))
    }
}

/// Saves `image` under `dir` as `name`; the extension picks the format.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_fixture(dir: &Path, name: &str, image: &CapturedImage) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    image
        .image
        .save(&path)
        .with_context(|| format!("Failed to write fixture: {}", path.display()))?;
    Ok(path)
}
