//! End-to-end offline pipeline: the gradient fallback background
//! through the compositor to encodable PNG bytes. This is the exact
//! path a generation request takes when both image services are down.

use image::DynamicImage;
use memesmith::ai::fallback_image;
use memesmith::meme::{FontProvider, compose, image_to_bytes};

#[test]
fn fallback_background_composes_to_a_png() {
    let provider = FontProvider::platform();
    let background = DynamicImage::ImageRgb8(fallback_image("integration tests"));

    if provider.resolve(40.0).is_none() {
        // Fontless host: composing empty text must still work.
        let meme = compose(&provider, &background, "", "").expect("compose without text");
        assert_eq!(meme.dimensions(), (800, 800));
        return;
    }

    let meme = compose(
        &provider,
        &background,
        "me waiting for the image API",
        "it was down the whole time",
    )
    .expect("compose");
    assert_eq!(meme.dimensions(), (800, 800));

    let bytes = image_to_bytes(&meme, image::ImageFormat::Png).expect("encode");
    let decoded = image::load_from_memory(&bytes).expect("png decodes");
    assert_eq!(decoded.width(), 800);
    assert_eq!(decoded.height(), 800);
}
