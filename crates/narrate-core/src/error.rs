//! Narration error types.

use crate::settings::SettingsError;

/// Errors that can occur while narrating a screen.
#[derive(Debug, thiserror::Error)]
pub enum NarrationError {
    /// The speech synthesis service returned an error (quota, network, service failure).
    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),

    /// The speech synthesis service answered without an audio payload.
    #[error("No audio data received from the speech synthesis service")]
    EmptyAudio,

    /// Encoded audio could not be turned into a playable clip.
    #[error("Audio decode failed: {0}")]
    Decode(String),

    /// Failed to open or drive the audio output.
    #[error("Failed to open audio output stream: {0}")]
    OutputStream(String),

    /// The dedicated audio thread exited.
    #[error("Audio thread is no longer running")]
    AudioThreadDied,

    /// The narration driver task has shut down.
    #[error("Narration driver is no longer running")]
    DriverStopped,

    /// Audio settings were rejected.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// IO error (input files, audio containers).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl NarrationError {
    /// Whether the driver recovers from this error by skipping the unit.
    ///
    /// Synthesis and decode failures only cost one unit its audio; everything
    /// else points at the environment rather than the unit.
    #[must_use]
    pub const fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::Synthesis(_) | Self::EmptyAudio | Self::Decode(_)
        )
    }
}
