//! Shared constants for the compositor and the web layer
//!

use image::Rgb;

/// Width of the output canvas in pixels. Inputs are resized to this.
pub const CANVAS_WIDTH: u32 = 800;

/// Height of the output canvas in pixels.
pub const CANVAS_HEIGHT: u32 = 800;

/// Padding between the canvas edge and the text, per side.
pub const TEXT_PADDING: u32 = 20;

/// Vertical gap between wrapped lines within a text block.
pub const LINE_GAP: u32 = 5;

/// Height budget for each text block: a quarter of the canvas.
pub const TEXT_BLOCK_HEIGHT: u32 = CANVAS_HEIGHT / 4;

/// Drawable text width: canvas width minus the padding on both sides.
pub const TEXT_MAX_WIDTH: u32 = CANVAS_WIDTH - TEXT_PADDING * 2;

/// Largest font size evaluated by the fitting search.
pub const FONT_SIZE_MAX: u32 = 80;

/// Smallest font size evaluated, and the unconditional floor when
/// nothing fits.
pub const FONT_SIZE_MIN: u32 = 25;

/// Step between candidate font sizes in the descending search.
pub const FONT_SIZE_STEP: u32 = 5;

/// Fill color for meme text.
pub const TEXT_FILL: Rgb<u8> = Rgb([255, 255, 255]);

/// Outline color for meme text.
pub const TEXT_OUTLINE: Rgb<u8> = Rgb([0, 0, 0]);

/// Outline stroke width in pixels. The glyphs are stamped at every
/// integer offset within this radius, corners included.
pub const OUTLINE_WIDTH: i32 = 3;

/// Candidate font files, tried in order. Impact is the classic meme
/// face; Arial Bold and the common Linux bold sans faces cover hosts
/// without it. Unreadable entries are skipped silently.
pub const FONT_CANDIDATE_PATHS: &[&str] = &[
    "C:/Windows/Fonts/impact.ttf",
    "C:/Windows/Fonts/IMPACT.TTF",
    "/usr/share/fonts/truetype/msttcorefonts/Impact.ttf",
    "/System/Library/Fonts/Supplemental/Impact.ttf",
    "impact.ttf",
    "C:/Windows/Fonts/arialbd.ttf",
    "C:/Windows/Fonts/Arial Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
];
