//! Tone mapping and glyph/palette quantization.
//!
//! Accumulated radiance is unbounded, so the frame is compressed with a
//! log-domain map referenced to its own per-channel brightness range, then
//! quantized twice: mapped luminance picks a glyph from the ramp, and the
//! raw color picks the nearest of the 9 terminal palette entries.

use std::fmt::Write;

use nalgebra::Vector3;

use crate::GLYPH_RAMP;

/// The 9 terminal foreground colors, index 0 = black.
pub const PALETTE: [[f32; 3]; 9] = [
    [0.0, 0.0, 0.0],
    [240.0, 82.0, 79.0],
    [92.0, 150.0, 44.0],
    [166.0, 138.0, 13.0],
    [57.0, 147.0, 212.0],
    [167.0, 113.0, 191.0],
    [0.0, 163.0, 163.0],
    [128.0, 128.0, 128.0],
    [187.0, 187.0, 187.0],
];

/// Per-channel brightness bounds of a completed frame.
#[derive(Debug, Clone, Copy)]
struct FrameBounds {
    brightest: Vector3<f32>,
    darkest: Vector3<f32>,
}

impl FrameBounds {
    /// Scan the whole frame. The darkest bound is clamped to >= 0 so the
    /// log map stays defined for any non-negative radiance.
    fn scan(frame: &[Vector3<f32>]) -> Self {
        let mut brightest = Vector3::<f32>::zeros();
        let mut darkest = Vector3::repeat(f32::MAX);
        for pixel in frame {
            for channel in 0..3 {
                brightest[channel] = brightest[channel].max(pixel[channel]);
                darkest[channel] = darkest[channel].min(pixel[channel]).max(0.0);
            }
        }
        Self { brightest, darkest }
    }
}

/// Log-domain normalization of one channel against the frame bounds,
/// into [0, 255]. A flat channel (brightest == darkest) maps to 0 rather
/// than dividing by zero.
fn hdr_map(x: f32, darkest: f32, brightest: f32) -> f32 {
    if brightest == darkest {
        return 0.0;
    }
    255.0 * ((x + 1.0).ln() - (darkest + 1.0).ln())
        / ((brightest + 1.0).ln() - (darkest + 1.0).ln())
}

/// Nearest palette entry by squared distance in raw RGB; ties go to the
/// lowest index.
fn nearest_palette_index(raw: &Vector3<f32>) -> usize {
    let mut least = f32::MAX;
    let mut nearest = 0;
    for (index, color) in PALETTE.iter().enumerate() {
        let distance = (raw.x - color[0]).powi(2)
            + (raw.y - color[1]).powi(2)
            + (raw.z - color[2]).powi(2);
        if distance < least {
            least = distance;
            nearest = index;
        }
    }
    nearest
}

/// Glyph for a mapped grayscale value in [0, 255].
fn glyph_for(gray: f32, ramp: &[char]) -> char {
    let step = 255.0 / ramp.len() as f32;
    let index = ((gray / step) as usize).min(ramp.len() - 1);
    ramp[index]
}

/// Render the completed frame as ANSI-colored glyph pairs, one frame row
/// per output line. Each glyph is doubled to approximate square pixels in
/// terminal cells.
pub fn to_ansi(frame: &[Vector3<f32>], width: usize, height: usize) -> String {
    let ramp: Vec<char> = GLYPH_RAMP.chars().collect();
    let bounds = FrameBounds::scan(frame);

    let mut out = String::with_capacity(width * height * 16 + height);
    for y in 0..height {
        for x in 0..width {
            let raw = &frame[y * width + x];
            let red = hdr_map(raw.x, bounds.darkest.x, bounds.brightest.x);
            let green = hdr_map(raw.y, bounds.darkest.y, bounds.brightest.y);
            let blue = hdr_map(raw.z, bounds.darkest.z, bounds.brightest.z);

            let gray = (red + green + blue) / 3.0;
            let glyph = glyph_for(gray, &ramp);
            let color = nearest_palette_index(raw);

            let _ = write!(out, "\x1b[;3{}m{}{}\x1b[0m", color, glyph, glyph);
        }
        out.push('\n');
    }
    out
}
