//! Drawing of detections onto RGB images.
//!
//! Available when the `render` feature is enabled. Boxes are drawn as 2 px
//! green outlines. Labels need a TrueType font; without one only the boxes
//! are drawn.

use crate::detect::Detection;
use crate::util::{YoloboxError, YoloboxResult};
use ab_glyph::{Font, FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect as PixelRect;
use std::path::Path;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const BOX_THICKNESS: i32 = 2;
const LABEL_SCALE: f32 = 16.0;
const LABEL_OFFSET: i32 = 10;

/// Reads a TrueType/OpenType font for label rendering.
pub fn load_font<P: AsRef<Path>>(path: P) -> YoloboxResult<FontVec> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|err| YoloboxError::FontLoad {
        reason: format!("{}: {err}", path.display()),
    })?;
    FontVec::try_from_vec(bytes).map_err(|err| YoloboxError::FontLoad {
        reason: format!("{}: {err}", path.display()),
    })
}

/// Returns a copy of `image` with every detection outlined and labelled.
pub fn draw_detections<F: Font>(
    image: &RgbImage,
    detections: &[Detection],
    font: Option<&F>,
) -> RgbImage {
    let mut out = image.clone();
    for det in detections {
        draw_box(&mut out, det);
        if let Some(font) = font {
            let y = det.rect.top - LABEL_OFFSET - LABEL_SCALE as i32;
            draw_text_mut(
                &mut out,
                BOX_COLOR,
                det.rect.left,
                y,
                PxScale::from(LABEL_SCALE),
                font,
                &det.label(),
            );
        }
    }
    out
}

fn draw_box(image: &mut RgbImage, det: &Detection) {
    let rect = det.rect;
    for inset in 0..BOX_THICKNESS {
        let width = rect.width - 2 * inset;
        let height = rect.height - 2 * inset;
        if width <= 0 || height <= 0 {
            break;
        }
        let outline = PixelRect::at(rect.left + inset, rect.top + inset)
            .of_size(width as u32, height as u32);
        draw_hollow_rect_mut(image, outline, BOX_COLOR);
    }
}
