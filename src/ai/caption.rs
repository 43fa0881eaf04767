//! Meme caption generation via Groq's chat completions API.
//!
//! The model is steered hard away from 2012-era meme clichés and asked
//! for strict JSON. Any failure along the way (network, non-2xx,
//! malformed output) degrades to a fixed fallback caption; this path
//! never surfaces an error to the caller.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::MemeError;

const GROQ_CHAT_COMPLETIONS_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const CAPTION_MODEL: &str = "llama-3.3-70b-versatile";

/// Overused phrases the model is told to never produce.
const FORBIDDEN_TROPES: &[&str] = &[
    "Said no one ever",
    "Keep Calm and...",
    "Be like [name]",
    "One does not simply",
    "The face you make when",
    "That awkward moment",
    "Am I a joke to you?",
    "Expectation vs Reality",
];

/// The humor styles a caption can be requested in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum HumorStyle {
    /// Savage, ironic, and mocking.
    Sarcastic,
    /// Universal experiences everyone has.
    Relatable,
    /// Random, nonsensical, surreal humor.
    Absurd,
    /// Positive twist, subverts with kindness.
    Wholesome,
    /// Existential comedy, self-deprecating.
    Dark,
}

impl HumorStyle {
    /// All styles, in menu order.
    pub const ALL: &[HumorStyle] = &[
        HumorStyle::Sarcastic,
        HumorStyle::Relatable,
        HumorStyle::Absurd,
        HumorStyle::Wholesome,
        HumorStyle::Dark,
    ];

    /// Parses a style label; unknown labels fall back to sarcastic.
    pub fn parse(label: &str) -> Self {
        match label.to_ascii_lowercase().as_str() {
            "relatable" => HumorStyle::Relatable,
            "absurd" => HumorStyle::Absurd,
            "wholesome" => HumorStyle::Wholesome,
            "dark" => HumorStyle::Dark,
            _ => HumorStyle::Sarcastic,
        }
    }

    /// Lowercase form-value / label for the style.
    pub fn label(self) -> &'static str {
        match self {
            HumorStyle::Sarcastic => "sarcastic",
            HumorStyle::Relatable => "relatable",
            HumorStyle::Absurd => "absurd",
            HumorStyle::Wholesome => "wholesome",
            HumorStyle::Dark => "dark",
        }
    }

    /// One-line description shown next to the style selector.
    pub fn description(self) -> &'static str {
        match self {
            HumorStyle::Sarcastic => "Savage, ironic, and mocking. Makes fun of the situation.",
            HumorStyle::Relatable => {
                "Universal experiences everyone has. 'OMG that's so me!'"
            }
            HumorStyle::Absurd => {
                "Random, nonsensical, surreal humor. Completely unexpected."
            }
            HumorStyle::Wholesome => {
                "Positive twist, heartwarming, subverts with kindness."
            }
            HumorStyle::Dark => {
                "Dark humor, existential comedy, self-deprecating about struggles."
            }
        }
    }

    fn style_prompt(self, topic: &str) -> String {
        match self {
            HumorStyle::Sarcastic => format!(
                r#"Create a SARCASTIC meme about "{topic}".
Avoid 2012-era clichés. Use modern, dry, or biting sarcasm.
Pattern: Mock the 'perfect' version of {topic} with a painful reality.
Example: "I love how [topic] allows me to maintain my dignity and definitely doesn't make me look like a crying mess" "#
            ),
            HumorStyle::Relatable => format!(
                r#"Create a RELATABLE meme about "{topic}".
Focus on the hyperspecific, weird thoughts people have about {topic}.
Do NOT use 'When you...' generic openers.
Example: "Calculated my finances and if I stop eating and breathing by Tuesday, I can afford [topic]" "#
            ),
            HumorStyle::Absurd => format!(
                r#"Create an ABSURD/BRAINROT meme about "{topic}".
Use surrealism, non-sequiturs, and modern 'brain rot' lingo if it fits.
The humor comes from the sheer confusion and scale of the topic.
Keywords: skibidi, aura, fanum tax, 1000 yard stare, existential crisis.
Example: "The [topic] demon watching me eat a single grape at 4am for sustenance" "#
            ),
            HumorStyle::Wholesome => format!(
                r#"Create a WHOLESOME meme about "{topic}".
Subvert the 'struggle' of {topic} with an unexpectedly kind or cozy twist.
Example: "[Topic] might be hard but my dog thinks I'm a billionaire and that's enough for today" "#
            ),
            HumorStyle::Dark => format!(
                r#"Create a DARK HUMOR meme about "{topic}".
Existential dread, self-deprecating nihilism.
Pattern: The topic is a minor inconvenience that you treat as a life-ending prophecy.
Example: "Added [topic] to the list of reasons why I'm moving to a cave in the woods and starting a new life as a moss enthusiast" "#
            ),
        }
    }
}

/// A generated caption: the two meme text blocks plus the prompt for
/// the reaction image.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Caption {
    /// Setup text for the top of the meme, already uppercased.
    pub top_text: String,
    /// Punchline text for the bottom of the meme, already uppercased.
    pub bottom_text: String,
    /// Scene description handed to the image generator.
    pub image_prompt: String,
}

const SYSTEM_PROMPT: &str = "You are a Gen-Z meme lord. You find traditional memes 'cringe'. \
    You only make memes that would go viral on modern Reddit or Twitter. You use irony, \
    self-deprecation, and specific situational humor. No clichés.";

fn user_prompt(topic: &str, style: HumorStyle) -> String {
    format!(
        r#"{style_prompt}

CRITICAL RULES:
1. NEVER use these overused phrases: {forbidden}.
2. Don't be generic. Be HYPERSPECIFIC. Specificity is where the humor lives.
3. Don't just describe the topic. Describe the EMOTIONAL DAMAGE or the WEIRD DETAIL.
4. Top text/Bottom text should feel like a cohesive thought, not two separate labels.

TOPIC: "{topic}"
STYLE: {style_upper}

Return ONLY valid JSON:
{{
    "top_text": "Setup text (max 8 words)",
    "bottom_text": "Punchline text (max 8 words)",
    "image_prompt": "Describe a funny, modern reaction image. A character with a very specific, weird expression or in a bizarre situation that perfectly captures the irony."
}}"#,
        style_prompt = style.style_prompt(topic),
        forbidden = FORBIDDEN_TROPES.join(", "),
        style_upper = style.label().to_uppercase(),
    )
}

// -----------------------------
// Chat completions API
// -----------------------------

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawCaption {
    #[serde(default)]
    top_text: String,
    #[serde(default)]
    bottom_text: String,
    #[serde(default)]
    image_prompt: String,
}

/// Strips a markdown code fence from a model reply, if present.
fn strip_code_fences(text: &str) -> &str {
    let fenced = if let Some((_, rest)) = text.split_once("```json") {
        rest
    } else if let Some((_, rest)) = text.split_once("```") {
        rest
    } else {
        return text.trim();
    };
    match fenced.split_once("```") {
        Some((inner, _)) => inner.trim(),
        None => fenced.trim(),
    }
}

/// Parses a model reply into a caption, normalizing the text blocks to
/// uppercase and substituting a stock image prompt when the model left
/// it out.
fn parse_caption_text(reply: &str, topic: &str) -> Option<Caption> {
    let raw: RawCaption = serde_json::from_str(strip_code_fences(reply)).ok()?;
    let image_prompt = if raw.image_prompt.is_empty() {
        format!("Highly expressive character with weird face about {topic}")
    } else {
        raw.image_prompt
    };
    Some(Caption {
        top_text: raw.top_text.to_uppercase(),
        bottom_text: raw.bottom_text.to_uppercase(),
        image_prompt,
    })
}

/// The caption used whenever generation fails.
fn fallback_caption(topic: &str) -> Caption {
    Caption {
        top_text: "ME TRYING TO BE NORMAL".to_string(),
        bottom_text: format!("WHILE {} ACTIVELY RUINS MY LIFE", topic.to_uppercase()),
        image_prompt: format!("A character with a thousand yard stare about {topic}"),
    }
}

async fn try_generate_caption(
    client: &reqwest::Client,
    topic: &str,
    style: HumorStyle,
    api_key: &str,
) -> Result<Caption, MemeError> {
    let prompt = user_prompt(topic, style);
    let request = ChatCompletionRequest {
        model: CAPTION_MODEL,
        messages: vec![
            ChatMessage {
                role: "system",
                content: SYSTEM_PROMPT,
            },
            ChatMessage {
                role: "user",
                content: &prompt,
            },
        ],
        temperature: 1.1,
        max_tokens: 300,
    };

    let response = client
        .post(GROQ_CHAT_COMPLETIONS_URL)
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await
        .map_err(|err| MemeError::InternalServerError(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(MemeError::InternalServerError(format!(
            "Groq API error {status}"
        )));
    }

    let parsed: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|err| MemeError::InternalServerError(err.to_string()))?;
    let reply = parsed
        .choices
        .first()
        .map(|choice| choice.message.content.trim())
        .ok_or_else(|| MemeError::InternalServerError("Groq reply had no choices".to_string()))?;

    parse_caption_text(reply, topic).ok_or_else(|| {
        MemeError::InternalServerError(format!("Groq reply was not caption JSON: {reply}"))
    })
}

/// Generates a meme caption for `topic` in the requested style.
///
/// Never fails: any error is logged and replaced by the fixed fallback
/// caption, so the meme pipeline always has text to work with.
pub async fn generate_caption(
    client: &reqwest::Client,
    topic: &str,
    style: HumorStyle,
    api_key: &str,
) -> Caption {
    match try_generate_caption(client, topic, style, api_key).await {
        Ok(caption) => caption,
        Err(err) => {
            warn!("Caption generation failed, using fallback: {err:?}");
            fallback_caption(topic)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_json_reply() {
        let reply = r#"{"top_text": "setup here", "bottom_text": "punchline", "image_prompt": "a cat"}"#;
        let caption = parse_caption_text(reply, "cats").expect("caption");
        assert_eq!(caption.top_text, "SETUP HERE");
        assert_eq!(caption.bottom_text, "PUNCHLINE");
        assert_eq!(caption.image_prompt, "a cat");
    }

    #[test]
    fn parses_fenced_json_reply() {
        let reply = "Here you go!\n```json\n{\"top_text\": \"a\", \"bottom_text\": \"b\", \"image_prompt\": \"c\"}\n```\nEnjoy!";
        let caption = parse_caption_text(reply, "x").expect("caption");
        assert_eq!(caption.top_text, "A");
        assert_eq!(caption.image_prompt, "c");

        let plain_fence = "```\n{\"top_text\": \"a\", \"bottom_text\": \"b\"}\n```";
        let caption = parse_caption_text(plain_fence, "deadlines").expect("caption");
        assert_eq!(caption.bottom_text, "B");
    }

    #[test]
    fn missing_image_prompt_gets_a_stock_one() {
        let reply = r#"{"top_text": "a", "bottom_text": "b"}"#;
        let caption = parse_caption_text(reply, "mondays").expect("caption");
        assert!(caption.image_prompt.contains("mondays"));
    }

    #[test]
    fn garbage_reply_is_rejected() {
        assert!(parse_caption_text("sorry, I can't do that", "x").is_none());
        assert!(parse_caption_text("", "x").is_none());
    }

    #[test]
    fn fallback_caption_mentions_the_topic() {
        let caption = fallback_caption("group chats");
        assert_eq!(caption.top_text, "ME TRYING TO BE NORMAL");
        assert!(caption.bottom_text.contains("GROUP CHATS"));
        assert!(caption.image_prompt.contains("group chats"));
    }

    #[test]
    fn unknown_style_labels_fall_back_to_sarcastic() {
        assert_eq!(HumorStyle::parse("DARK"), HumorStyle::Dark);
        assert_eq!(HumorStyle::parse("wholesome"), HumorStyle::Wholesome);
        assert_eq!(HumorStyle::parse("bogus"), HumorStyle::Sarcastic);
        assert_eq!(HumorStyle::parse(""), HumorStyle::Sarcastic);
    }

    #[test]
    fn prompts_carry_the_topic_and_the_forbidden_list() {
        let prompt = user_prompt("tax season", HumorStyle::Dark);
        assert!(prompt.contains("tax season"));
        assert!(prompt.contains("DARK"));
        assert!(prompt.contains("One does not simply"));
    }
}
