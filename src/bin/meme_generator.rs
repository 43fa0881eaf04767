use anyhow::{Context, Result};
use clap::Parser;
use image::ImageFormat;
use memesmith::ai::{self, HumorStyle};
use memesmith::meme::{self, FontProvider};
use std::fs;
use std::path::PathBuf;

/// Generate a meme from the command line.
///
/// Minimal UX:
///   meme_generator "monday mornings" --style dark
#[derive(Parser, Debug)]
#[command(name = "meme_generator")]
#[command(about = "Generate a meme offline: LLM caption + reaction image + composite")]
struct Args {
    /// Meme topic (e.g. "college life", "coding bugs")
    topic: String,

    /// Humor style: sarcastic, relatable, absurd, wholesome or dark
    #[arg(long, default_value = "sarcastic")]
    style: String,

    /// Groq API key, used for caption generation
    #[arg(required = true, long, env = "GROQ_API_KEY", hide_env_values = true)]
    groq_api_key: String,

    /// Stability API key, used for the reaction image
    #[arg(required = true, long, env = "STABILITY_API_KEY", hide_env_values = true)]
    stability_api_key: String,

    /// Output file for the finished meme
    #[arg(long, default_value = "meme.png")]
    output: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let style = HumorStyle::parse(&args.style);
    let client = reqwest::Client::new();

    let caption = ai::generate_caption(&client, &args.topic, style, &args.groq_api_key).await;
    eprintln!("Top:    {}", caption.top_text);
    eprintln!("Bottom: {}", caption.bottom_text);
    eprintln!("Scene:  {}", caption.image_prompt);

    let (background, degraded) = ai::reaction_image(
        &client,
        &caption.image_prompt,
        &args.topic,
        &args.stability_api_key,
    )
    .await;
    if degraded {
        eprintln!("Image service unavailable, composing over the gradient fallback");
    }

    let fonts = FontProvider::platform();
    let meme = meme::compose(&fonts, &background, &caption.top_text, &caption.bottom_text)
        .map_err(|err| anyhow::anyhow!("Compositing failed: {err:?}"))?;
    let bytes = meme::image_to_bytes(&meme, ImageFormat::Png)
        .map_err(|err| anyhow::anyhow!("Encoding failed: {err:?}"))?;

    fs::write(&args.output, &bytes)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;
    eprintln!("Saved: {}", args.output.display());
    Ok(())
}
