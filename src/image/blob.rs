//! Conversion of a letterboxed canvas into the detector input blob.
//!
//! The blob is a planar `[1, 3, S, S]` `f32` buffer. Resizing uses bilinear
//! sampling at pixel centres, `src = (dst + 0.5) * (src_len / dst_len) - 0.5`,
//! with coordinates clamped to the image edge. Resampled values are rounded
//! back to `u8` before scaling so the blob matches an 8-bit resize followed by
//! a float conversion.

use crate::image::letterbox::DEFAULT_INPUT_SIZE;
use crate::image::{ImageView, CHANNELS};
use crate::trace::trace_span;
use crate::util::{YoloboxError, YoloboxResult};

/// Options for building a detector input blob.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlobConfig {
    /// Square side `S` of the resized blob.
    pub input_size: usize,
    /// Reverse channel order (BGR sources feeding an RGB model or vice versa).
    pub swap_rb: bool,
    /// Multiplier applied to every 8-bit sample.
    pub scale: f32,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            input_size: DEFAULT_INPUT_SIZE,
            swap_rb: false,
            scale: 1.0 / 255.0,
        }
    }
}

/// Planar NCHW detector input with a batch of one.
#[derive(Clone, Debug, PartialEq)]
pub struct Blob {
    data: Vec<f32>,
    side: usize,
}

impl Blob {
    /// Returns the side length `S`.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Returns the tensor shape `[1, 3, S, S]`.
    pub fn shape(&self) -> [usize; 4] {
        [1, CHANNELS, self.side, self.side]
    }

    /// Returns the planar sample buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Returns the sample for `channel` at `(x, y)`.
    pub fn get(&self, channel: usize, x: usize, y: usize) -> Option<f32> {
        if channel >= CHANNELS || x >= self.side || y >= self.side {
            return None;
        }
        self.data
            .get(channel * self.side * self.side + y * self.side + x)
            .copied()
    }
}

/// Resizes `image` to `S x S` and converts it to a scaled planar blob.
pub fn build_blob(image: ImageView<'_>, cfg: &BlobConfig) -> YoloboxResult<Blob> {
    let side = cfg.input_size;
    if side == 0 {
        return Err(YoloboxError::InvalidConfig("input_size must be positive"));
    }
    let _span = trace_span!("blob", side = side).entered();

    let plane = side * side;
    let mut data = vec![0f32; plane * CHANNELS];
    let xs = axis_samples(image.width(), side);
    let ys = axis_samples(image.height(), side);

    for (dy, &(y0, y1, fy)) in ys.iter().enumerate() {
        let (Some(row0), Some(row1)) = (image.row(y0), image.row(y1)) else {
            return Err(YoloboxError::BufferTooSmall {
                needed: (y1 + 1) * image.stride(),
                got: image.as_slice().len(),
            });
        };
        for (dx, &(x0, x1, fx)) in xs.iter().enumerate() {
            for c in 0..CHANNELS {
                let a = row0[x0 * CHANNELS + c] as f32;
                let b = row0[x1 * CHANNELS + c] as f32;
                let p = row1[x0 * CHANNELS + c] as f32;
                let q = row1[x1 * CHANNELS + c] as f32;
                let top = a + (b - a) * fx;
                let bottom = p + (q - p) * fx;
                let value = (top + (bottom - top) * fy).round().clamp(0.0, 255.0);

                let plane_idx = if cfg.swap_rb { CHANNELS - 1 - c } else { c };
                data[plane_idx * plane + dy * side + dx] = value * cfg.scale;
            }
        }
    }

    Ok(Blob { data, side })
}

/// Source index pair and interpolation weight for every destination index.
fn axis_samples(src_len: usize, dst_len: usize) -> Vec<(usize, usize, f32)> {
    let ratio = src_len as f32 / dst_len as f32;
    let last = src_len - 1;
    (0..dst_len)
        .map(|d| {
            let src = ((d as f32 + 0.5) * ratio - 0.5).max(0.0);
            let i0 = (src.floor() as usize).min(last);
            let i1 = (i0 + 1).min(last);
            let frac = if i0 == last { 0.0 } else { src - i0 as f32 };
            (i0, i1, frac)
        })
        .collect()
}
