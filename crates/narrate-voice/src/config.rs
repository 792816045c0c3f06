//! Configuration for the speech service client and the narration driver.

use std::time::Duration;

use narrate_core::{SPEECH_CHANNELS, SPEECH_SAMPLE_RATE};

/// Default endpoint of the generative language API.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Speech model used for narration.
pub const DEFAULT_TTS_MODEL: &str = "gemini-2.5-flash-preview-tts";

/// Instruction prepended to every narrated text.
pub const DEFAULT_PROMPT_PREFIX: &str = "Read this aloud: ";

/// Configuration for [`GeminiSynthesizer`](crate::GeminiSynthesizer).
///
/// # Example
///
/// ```
/// use narrate_voice::GeminiConfig;
/// use std::time::Duration;
///
/// let config = GeminiConfig::new("api-key")
///     .with_timeout(Duration::from_secs(20))
///     .with_model("gemini-2.5-pro-preview-tts");
/// ```
#[derive(Clone)]
pub struct GeminiConfig {
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) model: String,
    pub(crate) prompt_prefix: String,
    /// No timeout unless set: a slow answer keeps the unit in Fetching.
    pub(crate) timeout: Option<Duration>,
    pub(crate) user_agent: String,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("prompt_prefix", &self.prompt_prefix)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiConfig {
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            model: DEFAULT_TTS_MODEL.to_string(),
            prompt_prefix: DEFAULT_PROMPT_PREFIX.to_string(),
            timeout: None,
            user_agent: concat!("narrate-voice/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the API base URL (no trailing slash needed).
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the text placed before every narrated item.
    ///
    /// Defaults to `"Read this aloud: "`.
    #[must_use]
    pub fn with_prompt_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prompt_prefix = prefix.into();
        self
    }

    /// Bound every synthesis request. Unbounded by default.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// URL of the `generateContent` endpoint for the configured model.
    pub(crate) fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

/// Configuration for the [`NarrationDriver`](crate::NarrationDriver).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Sample rate assumed for raw PCM from the synthesizer.
    pub sample_rate: u32,

    /// Channel count assumed for raw PCM from the synthesizer.
    pub channels: u16,

    /// Start reading as soon as a screen is loaded.
    pub autoplay: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            sample_rate: SPEECH_SAMPLE_RATE,
            channels: SPEECH_CHANNELS,
            autoplay: true,
        }
    }
}
