//! Reaction-image generation via the Stability AI image endpoints.
//!
//! Both endpoints take a multipart form and, with `Accept: image/*`,
//! answer with raw image bytes on success. Docs:
//! <https://platform.stability.ai/docs/api-reference>

use image::DynamicImage;
use reqwest::header::ACCEPT;
use reqwest::multipart::Form;

use crate::error::MemeError;

const STABILITY_CORE_URL: &str =
    "https://api.stability.ai/v2beta/stable-image/generate/core";
const STABILITY_SD3_URL: &str = "https://api.stability.ai/v2beta/stable-image/generate/sd3";

const NEGATIVE_PROMPT: &str =
    "real photo, photorealistic, text, watermark, blurry, complex background, 3d render";

/// The fixed art direction wrapped around every reaction-image prompt.
fn core_prompt(prompt: &str) -> String {
    format!(
        r#"Meme reaction image: {prompt}

Style requirements:
- MODERN digital illustration / 2D cartoon style
- HIGH EXPRESSION: The face must be doing something weird and funny (shock, defeat, insane joy, or blank stare)
- Clean, simple, solid-color backgrounds (no clutter)
- Leave empty space at the very top and very bottom for text
- NO TEXT in the image itself
- High contrast, meme-reaction aesthetic"#
    )
}

async fn request_image(
    client: &reqwest::Client,
    url: &str,
    form: Form,
    api_key: &str,
    service: &str,
) -> Result<DynamicImage, MemeError> {
    let response = client
        .post(url)
        .bearer_auth(api_key)
        .header(ACCEPT, "image/*")
        .multipart(form)
        .send()
        .await
        .map_err(|err| MemeError::ImageGeneration(format!("{service} request failed: {err}")))?;

    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|err| MemeError::ImageGeneration(format!("{service} body read failed: {err}")))?;
    if !status.is_success() {
        return Err(MemeError::ImageGeneration(format!(
            "{service} error {status}: {}",
            String::from_utf8_lossy(&bytes)
        )));
    }

    image::load_from_memory(&bytes)
        .map_err(|err| MemeError::ImageGeneration(format!("{service} returned a bad image: {err}")))
}

/// Generates a reaction image with the primary (core) Stability
/// endpoint.
pub async fn generate_image(
    client: &reqwest::Client,
    prompt: &str,
    api_key: &str,
) -> Result<DynamicImage, MemeError> {
    let form = Form::new()
        .text("prompt", core_prompt(prompt))
        .text("output_format", "png")
        .text("aspect_ratio", "1:1")
        .text("negative_prompt", NEGATIVE_PROMPT);
    request_image(client, STABILITY_CORE_URL, form, api_key, "Stability core").await
}

/// Generates a reaction image with the SD3 endpoint, the secondary
/// choice when the core endpoint rejects a request.
pub async fn generate_image_sd3(
    client: &reqwest::Client,
    prompt: &str,
    api_key: &str,
) -> Result<DynamicImage, MemeError> {
    let form = Form::new()
        .text(
            "prompt",
            format!(
                "Modern meme reaction: {prompt}, simple flat illustration style, expressive, vibrant"
            ),
        )
        .text("output_format", "png")
        .text("aspect_ratio", "1:1")
        .text("model", "sd3.5-large");
    request_image(client, STABILITY_SD3_URL, form, api_key, "Stability sd3").await
}
