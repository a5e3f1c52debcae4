//! Color space conversions used by the detectors.
//!
//! Hue follows the common 8-bit convention: degrees halved into `0..180`,
//! with saturation and value in `0..=255`.

use image::{GrayImage, Luma, RgbImage};

/// Separate hue, saturation and value planes of an image, row-major.
#[derive(Debug, Clone)]
pub struct HsvPlanes {
    /// Image width.
    pub width: u32,
    /// Image height.
    pub height: u32,
    /// Hue, `0..180`.
    pub hue: Vec<u8>,
    /// Saturation, `0..=255`.
    pub saturation: Vec<u8>,
    /// Value, `0..=255`.
    pub value: Vec<u8>,
}

impl HsvPlanes {
    /// Converts an RGB image.
    #[must_use]
    pub fn from_rgb(image: &RgbImage) -> Self {
        let len = image.pixels().len();
        let mut hue = Vec::with_capacity(len);
        let mut saturation = Vec::with_capacity(len);
        let mut value = Vec::with_capacity(len);

        for pixel in image.pixels() {
            let [r, g, b] = pixel.0;
            let (h, s, v) = rgb_to_hsv(r, g, b);
            hue.push(h);
            saturation.push(s);
            value.push(v);
        }

        Self {
            width: image.width(),
            height: image.height(),
            hue,
            saturation,
            value,
        }
    }
}

/// Converts one RGB pixel to 8-bit HSV.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::many_single_char_names
)]
#[must_use]
pub fn rgb_to_hsv(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = f64::from(max - min);

    let s = if max == 0 {
        0
    } else {
        (255.0 * diff / f64::from(max)).round() as u8
    };

    if max == min {
        return (0, s, max);
    }

    let (rf, gf, bf) = (f64::from(r), f64::from(g), f64::from(b));
    // 30 units per 60 degrees after halving.
    let mut h = if max == r {
        30.0 * (gf - bf) / diff
    } else if max == g {
        60.0 + 30.0 * (bf - rf) / diff
    } else {
        120.0 + 30.0 * (rf - gf) / diff
    }
    .round();

    if h < 0.0 {
        h += 180.0;
    }
    if h >= 180.0 {
        h -= 180.0;
    }

    (h as u8, s, max)
}

/// Converts RGB to gray with BT.601 weights in 14-bit fixed point.
#[allow(clippy::cast_possible_truncation)]
#[must_use]
pub fn to_gray(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let weighted = u32::from(r) * 4899 + u32::from(g) * 9617 + u32::from(b) * 1868 + 8192;
        Luma([(weighted >> 14) as u8])
    })
}
