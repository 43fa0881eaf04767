//! Font resolution and glyph measurement.
//!
//! Fonts are probed from an ordered list of well-known file locations;
//! every unreadable or unparsable candidate is skipped without raising.
//! Only exhaustion of the whole list yields `None`, which the compositor
//! reports as its single render-failure kind.

use std::path::PathBuf;
use std::sync::OnceLock;

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use tracing::debug;

use crate::constants::FONT_CANDIDATE_PATHS;

/// Resolves the meme typeface from a configurable ordered path list.
///
/// The parsed face is cached after the first successful probe, so the
/// per-size [`FontProvider::resolve`] calls made by the fitting search
/// only pay the file reads once. Resolution holds no other state and
/// the provider is safe to share across concurrent composing calls.
#[derive(Debug)]
pub struct FontProvider {
    candidates: Vec<PathBuf>,
    face: OnceLock<Option<FontArc>>,
}

impl FontProvider {
    /// Provider probing the platform's well-known meme font locations.
    pub fn platform() -> Self {
        Self::with_candidates(FONT_CANDIDATE_PATHS.iter().map(PathBuf::from).collect())
    }

    /// Provider probing only the given paths, in order.
    pub fn with_candidates(candidates: Vec<PathBuf>) -> Self {
        Self {
            candidates,
            face: OnceLock::new(),
        }
    }

    /// Resolves a font at the requested pixel size.
    ///
    /// Returns `None` only when no candidate file could be loaded.
    pub fn resolve(&self, size_px: f32) -> Option<FontSpec> {
        let face = self.face.get_or_init(|| self.load_first_candidate());
        face.as_ref().map(|font| FontSpec {
            font: font.clone(),
            scale: PxScale::from(size_px.max(1.0)),
        })
    }

    fn load_first_candidate(&self) -> Option<FontArc> {
        for path in &self.candidates {
            let Ok(bytes) = std::fs::read(path) else {
                continue;
            };
            match FontArc::try_from_vec(bytes) {
                Ok(font) => {
                    debug!("Loaded meme font from {}", path.display());
                    return Some(font);
                }
                Err(err) => {
                    debug!("Skipping font candidate {}: {}", path.display(), err);
                }
            }
        }
        debug!("No font candidate could be loaded");
        None
    }
}

/// A resolved font face at a fixed pixel size.
///
/// Both text blocks of one meme render through the same `FontSpec`, so
/// top and bottom text always share a size.
#[derive(Clone, Debug)]
pub struct FontSpec {
    font: FontArc,
    scale: PxScale,
}

impl FontSpec {
    /// The underlying face, for rasterization.
    pub fn font(&self) -> &FontArc {
        &self.font
    }

    /// The pixel scale this spec renders at.
    pub fn scale(&self) -> PxScale {
        self.scale
    }

    /// Rendered pixel width of a single line: glyph advances plus
    /// kerning.
    pub fn line_width(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    /// Rendered pixel height of a single line: the vertical extent of
    /// the union of the line's glyph outlines. Lines with no ink
    /// (empty or whitespace) measure zero.
    pub fn line_height(&self, text: &str) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        let ascent = scaled.ascent();
        let mut top = f32::MAX;
        let mut bottom = f32::MIN;
        let mut x = 0.0;
        let mut prev: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                x += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(self.scale, point(x, ascent));
            if let Some(outlined) = self.font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();
                top = top.min(bounds.min.y);
                bottom = bottom.max(bounds.max.y);
            }
            x += scaled.h_advance(id);
            prev = Some(id);
        }
        if bottom > top { bottom - top } else { 0.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_candidate_list_resolves_none() {
        let provider = FontProvider::with_candidates(Vec::new());
        assert!(provider.resolve(40.0).is_none());
    }

    #[test]
    fn missing_candidates_are_skipped_silently() {
        let provider = FontProvider::with_candidates(vec![
            PathBuf::from("/nonexistent/meme-font.ttf"),
            PathBuf::from("/also/not/here.ttf"),
        ]);
        assert!(provider.resolve(40.0).is_none());
        // Resolution is memoized; a second call must agree.
        assert!(provider.resolve(25.0).is_none());
    }

    #[test]
    fn measurement_grows_with_text() {
        let provider = FontProvider::platform();
        let Some(font) = provider.resolve(40.0) else {
            eprintln!("no system font available, skipping");
            return;
        };
        assert!(font.line_width("AB") > font.line_width("A"));
        assert!(font.line_width("A") > 0.0);
        assert!(font.line_height("A") > 0.0);
        assert_eq!(font.line_width(""), 0.0);
        assert_eq!(font.line_height(""), 0.0);
    }

    #[test]
    fn larger_scale_measures_wider() {
        let provider = FontProvider::platform();
        let (Some(small), Some(large)) = (provider.resolve(20.0), provider.resolve(60.0)) else {
            eprintln!("no system font available, skipping");
            return;
        };
        assert!(large.line_width("MEME") > small.line_width("MEME"));
        assert!(large.line_height("MEME") > small.line_height("MEME"));
    }
}
