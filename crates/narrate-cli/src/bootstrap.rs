//! CLI bootstrap - the composition root.
//!
//! This is the only place where concrete adapters are wired together:
//! - Settings store seeded from flags and environment
//! - Speech synthesizer (Gemini) and PCM decoder
//! - Output device (speaker, or the silent simulated line)
//!
//! Handlers receive a running [`CliContext`] and never build adapters.

use std::sync::Arc;

use narrate_core::{
    AudioSettings, AudioSettingsUpdate, OutputDevice, SettingsStore, TTS_VOICES, find_voice,
};
use narrate_voice::{
    DriverConfig, DriverDeps, GeminiConfig, GeminiSynthesizer, NarrationDriver, NarrationEvent,
    NarrationHandle, PcmDecoder, SimulatedDevice,
};
use tokio::sync::mpsc;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// API key for the speech synthesis service.
    pub api_key: Option<String>,
    /// Base URL override for the speech synthesis service.
    pub api_base: Option<String>,
    /// Settings overrides from flags and environment.
    pub overrides: AudioSettingsUpdate,
    /// Narrate without opening the audio device.
    pub silent: bool,
}

impl CliConfig {
    /// Collect the bootstrap-relevant global flags.
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            api_key: cli.api_key.clone(),
            api_base: cli.api_base.clone(),
            overrides: AudioSettingsUpdate {
                voice: cli.voice.clone(),
                rate: cli.rate,
                volume: cli.volume,
                tts_enabled: None,
            },
            silent: cli.silent,
        }
    }

    /// Initial audio settings: defaults with the overrides applied.
    ///
    /// Voice names are matched against the catalog case-insensitively and
    /// normalized to the catalog spelling.
    pub fn settings(&self) -> Result<AudioSettings, CliError> {
        let mut overrides = self.overrides.clone();
        if let Some(requested) = overrides.voice.take() {
            let voice = find_voice(&requested).ok_or_else(|| {
                let known: Vec<&str> = TTS_VOICES.iter().map(|voice| voice.name).collect();
                CliError::Arguments(format!(
                    "Unknown voice '{requested}' (available: {})",
                    known.join(", ")
                ))
            })?;
            overrides.voice = Some(voice.name.to_string());
        }

        let mut settings = AudioSettings::default();
        settings.merge(&overrides);
        Ok(settings)
    }
}

/// A running narration session.
pub struct CliContext {
    /// Control surface of the driver.
    pub handle: NarrationHandle,
    /// Driver events, in order.
    pub events: mpsc::UnboundedReceiver<NarrationEvent>,
    /// Shared audio settings the driver follows.
    pub settings: SettingsStore,
}

impl CliContext {
    /// Spawn a driver over `deps`. Must be called inside a tokio runtime.
    #[must_use]
    pub fn start(config: DriverConfig, deps: DriverDeps) -> Self {
        let settings = deps.settings.clone();
        let (driver, events) = NarrationDriver::new(config, deps);
        Self {
            handle: driver.spawn(),
            events,
            settings,
        }
    }
}

/// Wire the concrete adapters and start a driver.
pub fn bootstrap(config: &CliConfig) -> Result<CliContext, CliError> {
    let settings = SettingsStore::new(config.settings()?)?;

    let api_key = config
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| {
            CliError::Config("No API key: pass --api-key or set GEMINI_API_KEY".to_string())
        })?;

    let mut gemini = GeminiConfig::new(api_key)
        .with_user_agent(concat!("narrate/", env!("CARGO_PKG_VERSION")));
    if let Some(ref base) = config.api_base {
        gemini = gemini.with_base_url(base.clone());
    }
    let synthesizer = GeminiSynthesizer::new(gemini)?;
    tracing::debug!(model = synthesizer.model(), "Speech synthesizer ready");

    let deps = DriverDeps {
        synthesizer: Arc::new(synthesizer),
        decoder: Arc::new(PcmDecoder),
        device: output_device(config.silent),
        settings,
    };

    Ok(CliContext::start(DriverConfig::default(), deps))
}

#[cfg(feature = "speaker")]
fn output_device(silent: bool) -> Arc<dyn OutputDevice> {
    if silent {
        Arc::new(SimulatedDevice)
    } else {
        Arc::new(narrate_voice::SpeakerDevice)
    }
}

#[cfg(not(feature = "speaker"))]
fn output_device(silent: bool) -> Arc<dyn OutputDevice> {
    if !silent {
        tracing::warn!("Built without the `speaker` feature; narrating silently");
    }
    Arc::new(SimulatedDevice)
}
