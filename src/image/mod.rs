//! RGB image views, owned buffers and preprocessing.
//!
//! Pixels are interleaved 8-bit triples. `ImageView` borrows a buffer with an
//! explicit stride counted in bytes between the starts of consecutive rows, so
//! a stride larger than `width * 3` represents padded rows. `OwnedImage` is
//! always contiguous.

use crate::util::{YoloboxError, YoloboxResult};

pub mod blob;
#[cfg(feature = "image-io")]
pub mod io;
pub mod letterbox;

/// Number of interleaved channels per pixel.
pub const CHANNELS: usize = 3;

/// Borrowed RGB image view with an explicit row stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> ImageView<'a> {
    /// Creates a contiguous view with `stride == width * 3`.
    pub fn from_slice(data: &'a [u8], width: usize, height: usize) -> YoloboxResult<Self> {
        Self::new(data, width, height, width.saturating_mul(CHANNELS))
    }

    /// Creates a view with an explicit stride in bytes.
    pub fn new(data: &'a [u8], width: usize, height: usize, stride: usize) -> YoloboxResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(YoloboxError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in bytes between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; CHANNELS]> {
        if x >= self.width {
            return None;
        }
        let row = self.row(y)?;
        let start = x * CHANNELS;
        Some([row[start], row[start + 1], row[start + 2]])
    }

    /// Returns the `width * 3` bytes of row `y`.
    pub fn row(&self, y: usize) -> Option<&'a [u8]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width * CHANNELS)?;
        self.data.get(start..end)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> YoloboxResult<usize> {
    if width == 0 || height == 0 {
        return Err(YoloboxError::InvalidImage { width, height });
    }
    let row_len = width
        .checked_mul(CHANNELS)
        .ok_or(YoloboxError::InvalidImage { width, height })?;
    if stride < row_len {
        return Err(YoloboxError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(row_len))
        .ok_or(YoloboxError::InvalidImage { width, height })
}

/// Owned contiguous RGB image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Wraps a contiguous buffer of exactly `width * height * 3` bytes.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> YoloboxResult<Self> {
        let needed = required_len(width, height, width.saturating_mul(CHANNELS))?;
        if data.len() < needed {
            return Err(YoloboxError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(YoloboxError::InvalidImage { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Allocates a black image.
    pub fn zeros(width: usize, height: usize) -> YoloboxResult<Self> {
        let needed = required_len(width, height, width.saturating_mul(CHANNELS))?;
        Ok(Self {
            data: vec![0u8; needed],
            width,
            height,
        })
    }

    /// Copies a (possibly strided) view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_>) -> Self {
        let row_len = view.width() * CHANNELS;
        let mut data = Vec::with_capacity(row_len * view.height());
        for y in 0..view.height() {
            if let Some(row) = view.row(y) {
                data.extend_from_slice(row);
            }
        }
        Self {
            data,
            width: view.width(),
            height: view.height(),
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the raw interleaved pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns its pixel bytes.
    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width * CHANNELS,
        }
    }

    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        let row_len = self.width * CHANNELS;
        &mut self.data[y * row_len..(y + 1) * row_len]
    }
}
