//! External AI collaborators: caption generation, reaction-image
//! generation, and the offline gradient fallback.

use image::DynamicImage;
use tracing::warn;

pub mod caption;
pub mod fallback;
pub mod imagegen;

pub use caption::{Caption, HumorStyle, generate_caption};
pub use fallback::fallback_image;
pub use imagegen::{generate_image, generate_image_sd3};

/// Fetches a reaction image for the prompt, degrading through the
/// fallback chain: the core endpoint, then SD3, then the local
/// topic-keyed gradient.
///
/// Returns the image and whether the gradient fallback was used, so
/// the caller can tell the user the backdrop is a stand-in.
pub async fn reaction_image(
    client: &reqwest::Client,
    prompt: &str,
    topic: &str,
    api_key: &str,
) -> (DynamicImage, bool) {
    match generate_image(client, prompt, api_key).await {
        Ok(image) => return (image, false),
        Err(err) => warn!("Primary image generation failed: {err:?}"),
    }
    match generate_image_sd3(client, prompt, api_key).await {
        Ok(image) => (image, false),
        Err(err) => {
            warn!("SD3 image generation failed, using gradient fallback: {err:?}");
            (DynamicImage::ImageRgb8(fallback_image(topic)), true)
        }
    }
}
