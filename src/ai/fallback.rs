//! Offline degradation: a deterministic gradient background keyed by
//! the topic, used when both image endpoints fail.

use image::{Rgb, RgbImage};
use sha2::{Digest, Sha256};

use crate::constants::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Maps a topic to a hue in `[0, 360)`. The digest keeps the mapping
/// stable across processes, so the same topic always gets the same
/// backdrop.
fn topic_hue(topic: &str) -> f32 {
    let digest = Sha256::digest(topic.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    (u64::from_be_bytes(prefix) % 360) as f32
}

/// Standard HSV to RGB conversion; all inputs and outputs in `[0, 1]`.
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> (f32, f32, f32) {
    let i = (h * 6.0).floor();
    let f = h * 6.0 - i;
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    match (i as i32).rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    }
}

/// Renders the fallback background: a vertical gradient that darkens
/// and desaturates towards the bottom, hue picked by the topic.
pub fn fallback_image(topic: &str) -> RgbImage {
    let hue = topic_hue(topic) / 360.0;
    let mut image = RgbImage::new(CANVAS_WIDTH, CANVAS_HEIGHT);
    for y in 0..CANVAS_HEIGHT {
        let saturation = 0.6 - y as f32 / 2000.0;
        let value = 0.4 - y as f32 / 4000.0;
        let (r, g, b) = hsv_to_rgb(hue, saturation, value);
        let pixel = Rgb([
            (r.max(0.0) * 255.0) as u8,
            (g.max(0.0) * 255.0) as u8,
            (b.max(0.0) * 255.0) as u8,
        ]);
        for x in 0..CANVAS_WIDTH {
            image.put_pixel(x, y, pixel);
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gradient_is_canvas_sized_and_deterministic() {
        let first = fallback_image("rust compile times");
        let second = fallback_image("rust compile times");
        assert_eq!(first.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_eq!(first, second);
    }

    #[test]
    fn gradient_darkens_towards_the_bottom() {
        let image = fallback_image("mondays");
        let top = image.get_pixel(0, 0);
        let bottom = image.get_pixel(0, CANVAS_HEIGHT - 1);
        let brightness =
            |p: &Rgb<u8>| p.0.iter().map(|c| u32::from(*c)).sum::<u32>();
        assert!(brightness(top) > brightness(bottom));
    }

    #[test]
    fn hue_is_stable_and_in_range() {
        let hue = topic_hue("coffee");
        assert_eq!(hue, topic_hue("coffee"));
        assert!((0.0..360.0).contains(&hue));
    }
}
