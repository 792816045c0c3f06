//! Audio settings, validation, and the shared settings store.
//!
//! Settings are held in a [`SettingsStore`] rather than global state. The
//! narration driver subscribes to the store and reacts to changes: a new voice
//! or a TTS toggle tears the session down, rate and volume are picked up when
//! the next clip starts.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Voice used when none is configured.
pub const DEFAULT_VOICE: &str = "Kore";

pub const MIN_RATE: f32 = 0.5;
pub const MAX_RATE: f32 = 2.0;

/// Gender hint shown next to a voice in pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoiceGender {
    Female,
    Male,
}

/// A prebuilt voice offered by the speech synthesis service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoiceInfo {
    pub name: &'static str,
    pub gender: VoiceGender,
}

/// Voices offered in the settings UI.
pub const TTS_VOICES: &[VoiceInfo] = &[
    VoiceInfo {
        name: "Kore",
        gender: VoiceGender::Female,
    },
    VoiceInfo {
        name: "Puck",
        gender: VoiceGender::Male,
    },
    VoiceInfo {
        name: "Charon",
        gender: VoiceGender::Male,
    },
    VoiceInfo {
        name: "Zephyr",
        gender: VoiceGender::Female,
    },
    VoiceInfo {
        name: "Fenrir",
        gender: VoiceGender::Male,
    },
];

/// Look up a catalog voice by name (case-insensitive).
#[must_use]
pub fn find_voice(name: &str) -> Option<&'static VoiceInfo> {
    TTS_VOICES
        .iter()
        .find(|voice| voice.name.eq_ignore_ascii_case(name))
}

/// User-facing narration settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioSettings {
    /// Prebuilt voice name passed to the synthesizer.
    pub voice: String,

    /// Playback rate multiplier (0.5-2.0).
    pub rate: f32,

    /// Output gain (0.0-1.0).
    pub volume: f32,

    /// Whether narration is enabled at all.
    pub tts_enabled: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            voice: DEFAULT_VOICE.to_string(),
            rate: 1.0,
            volume: 1.0,
            tts_enabled: true,
        }
    }
}

impl AudioSettings {
    /// Merge a partial update into these settings, only touching fields that are `Some`.
    pub fn merge(&mut self, update: &AudioSettingsUpdate) {
        if let Some(ref voice) = update.voice {
            self.voice.clone_from(voice);
        }
        if let Some(rate) = update.rate {
            self.rate = rate;
        }
        if let Some(volume) = update.volume {
            self.volume = volume;
        }
        if let Some(enabled) = update.tts_enabled {
            self.tts_enabled = enabled;
        }
    }

    /// Whether switching from `self` to `other` invalidates synthesized audio
    /// or the session itself.
    #[must_use]
    pub fn requires_rebuild(&self, other: &Self) -> bool {
        self.voice != other.voice || self.tts_enabled != other.tts_enabled
    }
}

/// Partial settings update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AudioSettingsUpdate {
    pub voice: Option<String>,
    pub rate: Option<f32>,
    pub volume: Option<f32>,
    pub tts_enabled: Option<bool>,
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("Playback rate must be between 0.5 and 2.0, got {0}")]
    InvalidRate(f32),

    #[error("Volume must be between 0.0 and 1.0, got {0}")]
    InvalidVolume(f32),

    #[error("Voice name cannot be empty")]
    EmptyVoice,
}

/// Validate settings values.
pub fn validate_audio_settings(settings: &AudioSettings) -> Result<(), SettingsError> {
    if !(MIN_RATE..=MAX_RATE).contains(&settings.rate) {
        return Err(SettingsError::InvalidRate(settings.rate));
    }

    if !(0.0..=1.0).contains(&settings.volume) {
        return Err(SettingsError::InvalidVolume(settings.volume));
    }

    if settings.voice.trim().is_empty() {
        return Err(SettingsError::EmptyVoice);
    }

    Ok(())
}

/// Shared, observable audio settings.
///
/// Cloning the store yields another handle to the same settings.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    tx: Arc<watch::Sender<AudioSettings>>,
}

impl SettingsStore {
    /// Create a store holding validated initial settings.
    pub fn new(initial: AudioSettings) -> Result<Self, SettingsError> {
        validate_audio_settings(&initial)?;
        let (tx, _rx) = watch::channel(initial);
        Ok(Self { tx: Arc::new(tx) })
    }

    /// Snapshot of the current settings.
    #[must_use]
    pub fn current(&self) -> AudioSettings {
        self.tx.borrow().clone()
    }

    /// Apply a partial update. Invalid results are rejected and leave the
    /// store unchanged; subscribers are only notified of real changes.
    pub fn update(&self, update: &AudioSettingsUpdate) -> Result<AudioSettings, SettingsError> {
        let mut next = self.current();
        next.merge(update);
        validate_audio_settings(&next)?;

        self.tx.send_if_modified(|settings| {
            if *settings == next {
                false
            } else {
                *settings = next.clone();
                true
            }
        });

        Ok(next)
    }

    /// Flip narration on or off. Returns the new value.
    pub fn toggle_tts(&self) -> bool {
        let mut enabled = false;
        self.tx.send_modify(|settings| {
            settings.tts_enabled = !settings.tts_enabled;
            enabled = settings.tts_enabled;
        });
        enabled
    }

    /// Receive every future change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AudioSettings> {
        self.tx.subscribe()
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(AudioSettings::default());
        Self { tx: Arc::new(tx) }
    }
}
