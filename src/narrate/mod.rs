//! Stylized instruction rewriting
//!
//! Sends the canonical step texts as one numbered list to a hosted
//! text-generation service and maps the reply back line-for-line. The
//! rewrite is strictly best-effort: any failure, and any reply whose line
//! count differs from the input, falls back to the original texts. A
//! degraded rewrite is never surfaced as an error.

use crate::config::NarrateConfig;
use crate::{Result, WayfinderError};
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

/// How aggressively instructions are rewritten.
///
/// The levels differ in how literally direction and distance must survive:
/// `Light` keeps them verbatim, `Classic` allows themed vocabulary for
/// them, `Cryptic` allows metaphor only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, serde::Serialize, serde::Deserialize)]
pub enum StyleLevel {
    /// Explicit directions with light flavor
    Light,

    /// Treasure-hunt clues, directions still plainly recognizable
    #[default]
    Classic,

    /// Riddles; directions survive only as nautical metaphor
    Cryptic,
}

impl StyleLevel {
    /// The system instruction sent with the rewrite request.
    pub fn system_prompt(&self) -> &'static str {
        match self {
            StyleLevel::Light => {
                "You are a pirate captain guiding yer crew across a university campus. \
                 Lightly flavor each navigation instruction with pirate speech. \
                 \n\nRules:\
                 \n- Keep every direction word (left, right, straight, up, down) and every \
                 distance exactly as written\
                 \n- Add at most a short pirate interjection around the original wording\
                 \n- Keep each line to 1 sentence\
                 \n- Return ONLY the numbered list, one line per instruction, same numbering as input\
                 \n- Do NOT add any extra text before or after the list"
            }
            StyleLevel::Classic => {
                "You are a pirate captain giving treasure hunt clues to yer crew on a \
                 university campus. Transform each navigation instruction into a short, fun \
                 pirate-themed riddle or clue. \
                 \n\nRules:\
                 \n- Keep each clue to 1-2 sentences maximum\
                 \n- The clue must still clearly convey the actual direction (left, right, \
                 forward, distance, etc.)\
                 \n- Use pirate language (ye, matey, starboard for right, port for left, paces \
                 for meters, etc.)\
                 \n- Make them playful and treasure-hunt-y\
                 \n- Return ONLY the numbered list, one clue per line, same numbering as input\
                 \n- Do NOT add any extra text before or after the list"
            }
            StyleLevel::Cryptic => {
                "You are an old pirate captain who speaks only in riddles, setting yer crew \
                 on a treasure hunt across a university campus. Rewrite each navigation \
                 instruction as a cryptic nautical riddle. \
                 \n\nRules:\
                 \n- Never name directions or distances outright; convey them through \
                 seafaring metaphor (the setting sun, the port rail, a cannon shot's reach)\
                 \n- Keep each riddle to 2 sentences maximum\
                 \n- A clever crew must still be able to work out the true direction\
                 \n- Return ONLY the numbered list, one riddle per line, same numbering as input\
                 \n- Do NOT add any extra text before or after the list"
            }
        }
    }
}

/// Render instructions as the numbered list the prompt contract expects.
pub fn render_numbered(texts: &[String]) -> String {
    texts
        .iter()
        .enumerate()
        .map(|(i, text)| format!("{}. {}", i + 1, text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a numbered-list reply: strip each line's leading `"<n>. "` token,
/// drop blank lines.
pub fn parse_numbered(content: &str) -> Vec<String> {
    content
        .lines()
        .map(strip_numbering)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Remove one leading `"<n>. "` numbering token, if present.
fn strip_numbering(line: &str) -> &str {
    let trimmed = line.trim_start();
    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return trimmed;
    }
    match trimmed[digits..].strip_prefix('.') {
        Some(rest) => rest.trim_start(),
        None => trimmed,
    }
}

/// Validate a reply against the inputs: the line counts must match exactly,
/// otherwise the originals win.
pub fn apply_response(texts: &[String], content: &str) -> Vec<String> {
    let lines = parse_numbered(content);
    if lines.len() != texts.len() {
        warn!(
            "transform returned {} lines for {} instructions, keeping originals",
            lines.len(),
            texts.len()
        );
        return texts.to_vec();
    }
    lines
}

/// Client for the hosted text transformation service.
pub struct StyleTransformer {
    client: reqwest::Client,
    config: NarrateConfig,
}

impl StyleTransformer {
    pub fn new(config: NarrateConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Rewrite instruction texts at the given style level.
    ///
    /// Infallible from the caller's perspective: every failure path returns
    /// the original texts unchanged.
    pub async fn transform(&self, texts: &[String], level: StyleLevel) -> Vec<String> {
        if texts.is_empty() {
            return Vec::new();
        }

        let request_id = Uuid::new_v4();
        debug!("transform request {} for {} instructions", request_id, texts.len());

        match self.request_completion(texts, level).await {
            Ok(content) => apply_response(texts, &content),
            Err(e) => {
                warn!("transform request {} failed: {}, keeping originals", request_id, e);
                texts.to_vec()
            }
        }
    }

    async fn request_completion(&self, texts: &[String], level: StyleLevel) -> Result<String> {
        let user_prompt = format!(
            "Transform these navigation instructions into pirate clues:\n\n{}",
            render_numbered(texts)
        );

        let body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "system", "content": level.system_prompt() },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens,
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| WayfinderError::TransformError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WayfinderError::TransformError(format!(
                "transformation API returned {}",
                response.status().as_u16()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| WayfinderError::TransformError(e.to_string()))?;

        Ok(body
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }
}
