//! Text wrapping and font-size fitting.

use crate::constants::{FONT_SIZE_MAX, FONT_SIZE_MIN, FONT_SIZE_STEP, LINE_GAP};

use super::font::{FontProvider, FontSpec};

/// Greedy word-wraps `text` so no line's rendered width exceeds
/// `max_width` pixels.
///
/// Words are accumulated while the space-joined candidate still fits,
/// measured with the font's real glyph metrics. A single word wider
/// than `max_width` is still emitted alone on its own line; the
/// overflow is accepted rather than hyphenated or truncated.
pub fn wrap(text: &str, font: &FontSpec, max_width: u32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if font.line_width(&candidate) <= max_width as f32 {
            current = candidate;
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            current = word.to_string();
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Total rendered height of the given lines, including the fixed gap
/// after each line.
pub(crate) fn block_height(font: &FontSpec, lines: &[String]) -> f32 {
    lines
        .iter()
        .map(|line| font.line_height(line) + LINE_GAP as f32)
        .sum()
}

/// Finds the largest font size whose wrapped text fits the given box.
///
/// Candidate sizes descend from 80 to 25 in steps of 5; the first size
/// whose wrapped total height fits `max_height` wins. When none fit,
/// the minimum size is returned unconditionally and the resulting
/// overflow is accepted. Sizes whose font cannot be resolved are
/// skipped, matching the provider's never-raise contract.
pub fn fit_font_size(
    provider: &FontProvider,
    text: &str,
    max_width: u32,
    max_height: u32,
) -> u32 {
    if text.split_whitespace().next().is_none() {
        return FONT_SIZE_MAX;
    }

    let mut size = FONT_SIZE_MAX;
    while size >= FONT_SIZE_MIN {
        if let Some(font) = provider.resolve(size as f32) {
            let lines = wrap(text, &font, max_width);
            if block_height(&font, &lines) <= max_height as f32 {
                return size;
            }
        }
        size -= FONT_SIZE_STEP;
    }
    FONT_SIZE_MIN
}
