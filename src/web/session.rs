//! Session-state bookkeeping: the API keys the user entered, the last
//! generated caption, and the last rendered meme. Nothing is persisted
//! anywhere else; this is a single-user tool.

use base64::Engine;
use base64::engine::general_purpose;
use tower_sessions::Session;

use crate::ai::Caption;
use crate::error::MemeError;

const GROQ_KEY: &str = "groq_api_key";
const STABILITY_KEY: &str = "stability_api_key";
const CAPTION_KEY: &str = "caption";
const MEME_PNG_KEY: &str = "meme_png";

/// The pair of credentials needed to run the full pipeline.
#[derive(Clone, Debug)]
pub(crate) struct ApiKeys {
    pub(crate) groq: String,
    pub(crate) stability: String,
}

pub(crate) async fn api_keys(session: &Session) -> Result<Option<ApiKeys>, MemeError> {
    let groq = session.get::<String>(GROQ_KEY).await?;
    let stability = session.get::<String>(STABILITY_KEY).await?;
    match (groq, stability) {
        (Some(groq), Some(stability)) if !groq.is_empty() && !stability.is_empty() => {
            Ok(Some(ApiKeys { groq, stability }))
        }
        _ => Ok(None),
    }
}

pub(crate) async fn store_api_keys(
    session: &Session,
    groq: &str,
    stability: &str,
) -> Result<(), MemeError> {
    session.insert(GROQ_KEY, groq).await?;
    session.insert(STABILITY_KEY, stability).await?;
    Ok(())
}

pub(crate) async fn clear_api_keys(session: &Session) -> Result<(), MemeError> {
    session.remove::<String>(GROQ_KEY).await?;
    session.remove::<String>(STABILITY_KEY).await?;
    Ok(())
}

/// Stores the finished meme. The PNG bytes ride along in the session
/// record base64-encoded, mirroring how the upstream image APIs ship
/// binary payloads.
pub(crate) async fn store_meme(
    session: &Session,
    caption: &Caption,
    png: &[u8],
) -> Result<(), MemeError> {
    session.insert(CAPTION_KEY, caption).await?;
    session
        .insert(MEME_PNG_KEY, general_purpose::STANDARD.encode(png))
        .await?;
    Ok(())
}

pub(crate) async fn caption(session: &Session) -> Result<Option<Caption>, MemeError> {
    Ok(session.get::<Caption>(CAPTION_KEY).await?)
}

pub(crate) async fn meme_png(session: &Session) -> Result<Option<Vec<u8>>, MemeError> {
    let Some(encoded) = session.get::<String>(MEME_PNG_KEY).await? else {
        return Ok(None);
    };
    general_purpose::STANDARD
        .decode(encoded)
        .map(Some)
        .map_err(|err| MemeError::InternalServerError(err.to_string()))
}

pub(crate) async fn has_meme(session: &Session) -> Result<bool, MemeError> {
    Ok(session.get::<String>(MEME_PNG_KEY).await?.is_some())
}

pub(crate) async fn clear_meme(session: &Session) -> Result<(), MemeError> {
    session.remove::<Caption>(CAPTION_KEY).await?;
    session.remove::<String>(MEME_PNG_KEY).await?;
    Ok(())
}
