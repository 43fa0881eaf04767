use super::prelude::*;
use crate::ai::{self, HumorStyle, generate_caption};
use crate::meme;
use axum::body::Body;
use axum::http::header::CONTENT_DISPOSITION;
use image::ImageFormat;

#[derive(Clone, Debug)]
pub(crate) struct StyleOption {
    pub(crate) value: &'static str,
    pub(crate) title: &'static str,
    pub(crate) description: &'static str,
}

fn style_title(style: HumorStyle) -> &'static str {
    match style {
        HumorStyle::Sarcastic => "Sarcastic 😏",
        HumorStyle::Relatable => "Relatable 😅",
        HumorStyle::Absurd => "Absurd 🤪",
        HumorStyle::Wholesome => "Wholesome 😊",
        HumorStyle::Dark => "Dark 💀",
    }
}

fn style_options() -> Vec<StyleOption> {
    HumorStyle::ALL
        .iter()
        .map(|style| StyleOption {
            value: style.label(),
            title: style_title(*style),
            description: style.description(),
        })
        .collect()
}

#[derive(Template, WebTemplate)]
#[template(path = "setup.html")]
pub(crate) struct SetupTemplate {
    has_flash: bool,
    flash_message: String,
    flash_class: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub(crate) struct HomeTemplate {
    styles: Vec<StyleOption>,
    has_caption: bool,
    caption_top: String,
    caption_bottom: String,
    has_meme: bool,
    has_flash: bool,
    flash_message: String,
    flash_class: String,
}

#[derive(Deserialize)]
pub(crate) struct SetupForm {
    groq_key: String,
    stability_key: String,
}

#[derive(Deserialize)]
pub(crate) struct GenerateForm {
    topic: String,
    #[serde(default)]
    style: String,
}

/// handles the / GET
pub(crate) async fn root_handler(session: Session) -> Result<Response, MemeError> {
    let flash_message = flash::take_flash_message(&session).await?;
    let (has_flash, text, class) = match flash_message {
        Some(message) => (true, message.text, message.class),
        None => (false, "", ""),
    };

    if session::api_keys(&session).await?.is_none() {
        return Ok(SetupTemplate {
            has_flash,
            flash_message: text.to_string(),
            flash_class: class.to_string(),
        }
        .into_response());
    }

    let caption = session::caption(&session).await?;
    let (has_caption, caption_top, caption_bottom) = match caption {
        Some(caption) => (true, caption.top_text, caption.bottom_text),
        None => (false, String::new(), String::new()),
    };

    Ok(HomeTemplate {
        styles: style_options(),
        has_caption,
        caption_top,
        caption_bottom,
        has_meme: session::has_meme(&session).await?,
        has_flash,
        flash_message: text.to_string(),
        flash_class: class.to_string(),
    }
    .into_response())
}

/// Stores the two API keys in the session.
pub(crate) async fn setup_handler(
    session: Session,
    Form(form): Form<SetupForm>,
) -> Result<Redirect, MemeError> {
    let groq = form.groq_key.trim();
    let stability = form.stability_key.trim();
    if groq.is_empty() || stability.is_empty() {
        flash::set_flash(&session, flash::FLASH_MISSING_KEYS).await?;
        return Ok(Redirect::to("/"));
    }
    session::store_api_keys(&session, groq, stability).await?;
    Ok(Redirect::to("/"))
}

/// Drops the stored API keys, returning the user to the setup view.
pub(crate) async fn reset_handler(session: Session) -> Result<Redirect, MemeError> {
    session::clear_api_keys(&session).await?;
    Ok(Redirect::to("/"))
}

/// Drops the last meme and caption so a fresh one can be made.
pub(crate) async fn clear_handler(session: Session) -> Result<Redirect, MemeError> {
    session::clear_meme(&session).await?;
    Ok(Redirect::to("/"))
}

/// Runs the whole pipeline: caption, reaction image (with the fallback
/// chain), composite, then stores the result in the session.
pub(crate) async fn generate_handler(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<GenerateForm>,
) -> Result<Redirect, MemeError> {
    let Some(keys) = session::api_keys(&session).await? else {
        flash::set_flash(&session, flash::FLASH_MISSING_KEYS).await?;
        return Ok(Redirect::to("/"));
    };
    let topic = form.topic.trim().to_string();
    if topic.is_empty() {
        flash::set_flash(&session, flash::FLASH_MISSING_TOPIC).await?;
        return Ok(Redirect::to("/"));
    }
    let style = HumorStyle::parse(&form.style);

    info!("Generating a {} meme about {topic:?}", style.label());
    let caption = generate_caption(&state.http, &topic, style, &keys.groq).await;
    let (background, degraded) =
        ai::reaction_image(&state.http, &caption.image_prompt, &topic, &keys.stability).await;

    // Compositing is pure raster work; keep it off the async runtime.
    let fonts = state.fonts.clone();
    let (top_text, bottom_text) = (caption.top_text.clone(), caption.bottom_text.clone());
    let meme = tokio::task::spawn_blocking(move || {
        meme::compose(&fonts, &background, &top_text, &bottom_text)
    })
    .await
    .map_err(|err| MemeError::InternalServerError(err.to_string()))??;

    let png = meme::image_to_bytes(&meme, ImageFormat::Png)?;
    session::store_meme(&session, &caption, &png).await?;
    if degraded {
        flash::set_flash(&session, flash::FLASH_FALLBACK_IMAGE).await?;
    }
    Ok(Redirect::to("/"))
}

fn png_response(png: Vec<u8>, attachment: bool) -> Result<Response, MemeError> {
    let mut builder = Response::builder().header(CONTENT_TYPE, "image/png");
    if attachment {
        builder = builder.header(CONTENT_DISPOSITION, "attachment; filename=\"meme.png\"");
    }
    builder.body(Body::from(png)).map_err(MemeError::from)
}

/// Serves the session's meme inline for the result page.
pub(crate) async fn meme_png_handler(session: Session) -> Result<Response, MemeError> {
    let Some(png) = session::meme_png(&session).await? else {
        return Err(MemeError::NotFound("/meme.png".to_string()));
    };
    png_response(png, false)
}

/// Serves the session's meme as a download.
pub(crate) async fn download_handler(session: Session) -> Result<Response, MemeError> {
    let Some(png) = session::meme_png(&session).await? else {
        return Err(MemeError::NotFound("/download".to_string()));
    };
    png_response(png, true)
}

pub(crate) async fn styles_handler() -> impl IntoResponse {
    const STYLES: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/static/styles.css"));
    ([(CONTENT_TYPE, "text/css")], STYLES)
}
