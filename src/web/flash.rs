use tower_sessions::Session;

use crate::error::MemeError;

const FLASH_FLAG_KEY: &str = "flash_flag";

pub(crate) const FLASH_MISSING_TOPIC: u16 = 1;
pub(crate) const FLASH_MISSING_KEYS: u16 = 2;
pub(crate) const FLASH_FALLBACK_IMAGE: u16 = 3;

#[derive(Clone, Debug)]
pub(crate) struct FlashMessage {
    pub(crate) text: &'static str,
    pub(crate) class: &'static str,
}

pub(crate) async fn set_flash(session: &Session, flag: u16) -> Result<(), MemeError> {
    session.insert(FLASH_FLAG_KEY, flag).await?;
    Ok(())
}

pub(crate) async fn take_flash_message(
    session: &Session,
) -> Result<Option<FlashMessage>, MemeError> {
    let flag = session
        .get::<u16>(FLASH_FLAG_KEY)
        .await?
        .filter(|flag| *flag != 0);
    if flag.is_some() {
        session.insert(FLASH_FLAG_KEY, 0u16).await?;
    }
    Ok(flag.and_then(message_for))
}

fn message_for(flag: u16) -> Option<FlashMessage> {
    match flag {
        FLASH_MISSING_TOPIC => Some(FlashMessage {
            text: "Please enter a topic first!",
            class: "warning",
        }),
        FLASH_MISSING_KEYS => Some(FlashMessage {
            text: "Enter both API keys to continue.",
            class: "warning",
        }),
        FLASH_FALLBACK_IMAGE => Some(FlashMessage {
            text: "Image service unavailable, so a generated gradient background was used instead.",
            class: "warning",
        }),
        _ => None,
    }
}
