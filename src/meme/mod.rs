//! The meme compositor.
//!
//! Takes an arbitrary raster image plus two caption strings and
//! produces the classic meme layout: the image normalized to a fixed
//! square canvas, uppercased text wrapped and centered at the top and
//! bottom, each line drawn white with a black outline so it stays
//! readable over any background.
//!
//! The compositor is pure CPU work with no shared state; it never
//! mutates its input image and is safe to call from concurrent
//! request handlers.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, RgbImage};
use imageproc::drawing::draw_text_mut;

use crate::constants::{
    CANVAS_HEIGHT, CANVAS_WIDTH, LINE_GAP, OUTLINE_WIDTH, TEXT_BLOCK_HEIGHT, TEXT_FILL,
    TEXT_MAX_WIDTH, TEXT_OUTLINE, TEXT_PADDING,
};
use crate::error::MemeError;

pub mod font;
pub mod layout;

pub use font::{FontProvider, FontSpec};
pub use layout::{fit_font_size, wrap};

/// Composites `top_text` and `bottom_text` onto `image` in classic
/// meme form and returns a new owned canvas; the input is left
/// untouched.
///
/// The input is normalized to 800x800 RGB (aspect ratio discarded) and
/// both strings are uppercased. Each block is fitted independently
/// into a quarter of the canvas height, then rendered at the smaller
/// of the two fitted sizes so top and bottom always match. Empty
/// strings render zero lines and do not shift the other block.
///
/// The only failure is a render failure: no font candidate could be
/// resolved while there is text to draw.
pub fn compose(
    provider: &FontProvider,
    image: &DynamicImage,
    top_text: &str,
    bottom_text: &str,
) -> Result<RgbImage, MemeError> {
    let mut canvas = image
        .resize_exact(CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Lanczos3)
        .to_rgb8();

    let top_text = top_text.to_uppercase();
    let bottom_text = bottom_text.to_uppercase();
    let has_words = |text: &str| text.split_whitespace().next().is_some();
    if !has_words(&top_text) && !has_words(&bottom_text) {
        return Ok(canvas);
    }

    let top_size = fit_font_size(provider, &top_text, TEXT_MAX_WIDTH, TEXT_BLOCK_HEIGHT);
    let bottom_size = fit_font_size(provider, &bottom_text, TEXT_MAX_WIDTH, TEXT_BLOCK_HEIGHT);

    // The smaller of the two fitted sizes keeps both blocks visually
    // consistent.
    let size = top_size.min(bottom_size);
    let font = provider
        .resolve(size as f32)
        .ok_or_else(|| MemeError::Render("no usable font could be resolved".to_string()))?;

    // Wrapping is size-dependent, so both blocks re-wrap at the shared
    // final size.
    let top_lines = wrap(&top_text, &font, TEXT_MAX_WIDTH);
    let mut y = TEXT_PADDING as i32;
    for line in &top_lines {
        draw_outlined_line(&mut canvas, &font, line, y);
        y += font.line_height(line).ceil() as i32 + LINE_GAP as i32;
    }

    let bottom_lines = wrap(&bottom_text, &font, TEXT_MAX_WIDTH);
    let total_height: i32 = bottom_lines
        .iter()
        .map(|line| font.line_height(line).ceil() as i32 + LINE_GAP as i32)
        .sum();
    let mut y = CANVAS_HEIGHT as i32 - total_height - TEXT_PADDING as i32;
    for line in &bottom_lines {
        draw_outlined_line(&mut canvas, &font, line, y);
        y += font.line_height(line).ceil() as i32 + LINE_GAP as i32;
    }

    Ok(canvas)
}

/// Draws one horizontally-centered line with the outline effect: the
/// glyphs are stamped in the outline color at every integer offset
/// within the outline radius, corners included, then once more in the
/// fill color at the exact position.
fn draw_outlined_line(canvas: &mut RgbImage, font: &FontSpec, line: &str, y: i32) {
    let width = font.line_width(line).ceil() as i32;
    let x = (CANVAS_WIDTH as i32 - width) / 2;

    for dx in -OUTLINE_WIDTH..=OUTLINE_WIDTH {
        for dy in -OUTLINE_WIDTH..=OUTLINE_WIDTH {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_text_mut(
                canvas,
                TEXT_OUTLINE,
                x + dx,
                y + dy,
                font.scale(),
                font.font(),
                line,
            );
        }
    }
    draw_text_mut(canvas, TEXT_FILL, x, y, font.scale(), font.font(), line);
}

/// Encodes an image for download or transmission. PNG is the default
/// format used by the web layer.
pub fn image_to_bytes(image: &RgbImage, format: ImageFormat) -> Result<Vec<u8>, MemeError> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format)?;
    Ok(buffer.into_inner())
}
