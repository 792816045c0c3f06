//! Speech synthesis through the Gemini `generateContent` endpoint.
//!
//! The request asks for an `AUDIO` response with a prebuilt voice; the audio
//! comes back base64-encoded in the first part of the first candidate as raw
//! 24 kHz mono PCM16.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use narrate_core::{NarrationError, SpeechSynthesizer};
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;

/// Longest slice of an error body kept in the error message.
const MAX_ERROR_BODY: usize = 200;

// ── Wire types ─────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_modalities: [&'static str; 1],
    speech_config: SpeechConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig<'a> {
    voice_config: VoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig<'a> {
    prebuilt_voice_config: PrebuiltVoiceConfig<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig<'a> {
    voice_name: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct GenerateContentResponse {
    candidates: Vec<Candidate>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    data: Option<String>,
}

fn build_request<'a>(prompt: &'a str, voice: &'a str) -> GenerateContentRequest<'a> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![TextPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_modalities: ["AUDIO"],
            speech_config: SpeechConfig {
                voice_config: VoiceConfig {
                    prebuilt_voice_config: PrebuiltVoiceConfig { voice_name: voice },
                },
            },
        },
    }
}

/// Pull the audio bytes out of a response.
///
/// Only the first part of the first candidate is considered.
fn extract_audio(response: GenerateContentResponse) -> Result<Vec<u8>, NarrationError> {
    let inline = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.inline_data)
        .ok_or(NarrationError::EmptyAudio)?;

    let data = inline
        .data
        .filter(|data| !data.is_empty())
        .ok_or(NarrationError::EmptyAudio)?;

    tracing::trace!(mime_type = ?inline.mime_type, encoded_len = data.len(), "Received inline audio");

    STANDARD
        .decode(data.as_bytes())
        .map_err(|e| NarrationError::Decode(format!("invalid base64 audio payload: {e}")))
}

fn truncate(body: &str) -> &str {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((index, _)) => &body[..index],
        None => body,
    }
}

// ── Client ─────────────────────────────────────────────────────────

/// [`SpeechSynthesizer`] backed by the Gemini text-to-speech model.
pub struct GeminiSynthesizer {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiSynthesizer {
    pub fn new(config: GeminiConfig) -> Result<Self, NarrationError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| NarrationError::Synthesis(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl SpeechSynthesizer for GeminiSynthesizer {
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, NarrationError> {
        let prompt = format!("{}{text}", self.config.prompt_prefix);
        let body = build_request(&prompt, voice);

        tracing::debug!(model = %self.config.model, voice, text_len = text.len(), "Requesting speech");

        let response = self
            .client
            .post(self.config.endpoint())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NarrationError::Synthesis(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(NarrationError::Synthesis(format!(
                "service returned {status}: {}",
                truncate(detail.trim())
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| NarrationError::Synthesis(format!("malformed response: {e}")))?;

        extract_audio(parsed)
    }
}
