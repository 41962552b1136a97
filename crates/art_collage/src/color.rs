//! Color math: RGB/HSL conversion and dominant color extraction.
//!
//! The manifest is ordered by the hue of each image's dominant color, so the
//! conversion here is the sort key for the whole collection.
use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Edge length of the thumbnail used for dominant color extraction.
pub const DEFAULT_SAMPLE_SIZE: u32 = 50;

/// Histogram bins per channel. 16 bins of width 16 cover the 8-bit range.
const BINS_PER_CHANNEL: usize = 16;
const BIN_WIDTH: u32 = 256 / BINS_PER_CHANNEL as u32;

/// An 8-bit sRGB triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Pure black, used as the placeholder when color extraction fails.
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Converts to HSL.
    pub fn to_hsl(self) -> Hsl {
        rgb_to_hsl(self)
    }

    /// Normalized hue in `[0, 1)`.
    pub fn hue(self) -> f64 {
        rgb_to_hsl(self).h
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// Hue, saturation and lightness, each normalized to `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

/// Converts an sRGB triple to HSL.
///
/// Achromatic colors (`max == min`) get hue and saturation 0. Otherwise the hue
/// branch is chosen by the maximal channel, checking red, then green, then blue.
pub fn rgb_to_hsl(rgb: Rgb) -> Hsl {
    let r = rgb.r as f64 / 255.0;
    let g = rgb.g as f64 / 255.0;
    let b = rgb.b as f64 / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return Hsl { h: 0.0, s: 0.0, l };
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };
    let h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };

    Hsl { h: h / 6.0, s, l }
}

/// Computes the dominant color of `image`.
///
/// The image is first resized to `sample_size x sample_size`, then every pixel
/// is binned into a 16x16x16 RGB histogram. The centre of the most populated
/// bin is returned; ties go to the first bin in red-major order.
pub fn dominant_color(image: &DynamicImage, sample_size: u32) -> Rgb {
    let sample_size = sample_size.max(1);
    let thumb = image
        .resize_exact(sample_size, sample_size, FilterType::Lanczos3)
        .to_rgb8();

    let mut histogram = vec![0u32; BINS_PER_CHANNEL * BINS_PER_CHANNEL * BINS_PER_CHANNEL];
    for pixel in thumb.pixels() {
        let [r, g, b] = pixel.0;
        histogram[bin_index(r, g, b)] += 1;
    }

    let mut best = 0usize;
    for (i, &count) in histogram.iter().enumerate() {
        if count > histogram[best] {
            best = i;
        }
    }

    let r_bin = best / (BINS_PER_CHANNEL * BINS_PER_CHANNEL);
    let g_bin = (best / BINS_PER_CHANNEL) % BINS_PER_CHANNEL;
    let b_bin = best % BINS_PER_CHANNEL;
    Rgb::new(bin_centre(r_bin), bin_centre(g_bin), bin_centre(b_bin))
}

#[inline]
fn bin_index(r: u8, g: u8, b: u8) -> usize {
    let rb = (r as u32 / BIN_WIDTH) as usize;
    let gb = (g as u32 / BIN_WIDTH) as usize;
    let bb = (b as u32 / BIN_WIDTH) as usize;
    (rb * BINS_PER_CHANNEL + gb) * BINS_PER_CHANNEL + bb
}

#[inline]
fn bin_centre(bin: usize) -> u8 {
    (bin as u32 * BIN_WIDTH + BIN_WIDTH / 2) as u8
}
