//! Image codec helpers built on the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageView, OwnedImage};
use crate::util::{YoloboxError, YoloboxResult};
use image::RgbImage;
use std::path::Path;

/// Creates a borrowed view from an RGB image buffer.
pub fn view_from_rgb_image(img: &RgbImage) -> YoloboxResult<ImageView<'_>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Creates an owned image from an RGB image buffer.
pub fn owned_from_rgb_image(img: &RgbImage) -> YoloboxResult<OwnedImage> {
    OwnedImage::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
    )
}

/// Converts an owned image into an `image::RgbImage`.
pub fn rgb_image_from_owned(img: OwnedImage) -> YoloboxResult<RgbImage> {
    let (width, height) = (img.width(), img.height());
    let (w, h) = (
        u32::try_from(width).map_err(|_| YoloboxError::InvalidImage { width, height })?,
        u32::try_from(height).map_err(|_| YoloboxError::InvalidImage { width, height })?,
    );
    RgbImage::from_raw(w, h, img.into_raw()).ok_or(YoloboxError::InvalidImage { width, height })
}

/// Loads an image from disk and converts it to 8-bit RGB.
///
/// Missing files and unsupported formats both surface as `ImageDecode`.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> YoloboxResult<RgbImage> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| YoloboxError::ImageDecode {
        reason: format!("{}: {err}", path.display()),
    })?;
    let rgb = img.into_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(YoloboxError::InvalidImage {
            width: rgb.width() as usize,
            height: rgb.height() as usize,
        });
    }
    Ok(rgb)
}

/// Encodes an RGB image to disk; the format follows the file extension.
pub fn save_rgb_image<P: AsRef<Path>>(img: &RgbImage, path: P) -> YoloboxResult<()> {
    let path = path.as_ref();
    img.save(path).map_err(|err| YoloboxError::ImageEncode {
        reason: format!("{}: {err}", path.display()),
    })
}
