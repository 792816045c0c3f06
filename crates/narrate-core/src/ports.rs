//! Port traits between the narration driver and the outside world.
//!
//! The driver only talks to speech, decoding and audio output through these
//! traits, so engines and devices can be swapped (or faked in tests) without
//! touching playback logic.
//!
//! ## Completion contract
//!
//! Every [`OutputHandle`] returned by [`OutputLine::play`] carries a
//! `oneshot` receiver that resolves exactly once: when the clip finishes or
//! when it is stopped. A dropped sender counts as completion too.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::audio::AudioClip;
use crate::error::NarrationError;

// ── Speech synthesis ────────────────────────────────────────────────

/// Remote or local text-to-speech engine.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` with the named prebuilt `voice`.
    ///
    /// Returns the encoded audio bytes. An answer without audio is
    /// [`NarrationError::EmptyAudio`]; any other failure is
    /// [`NarrationError::Synthesis`].
    async fn synthesize(&self, text: &str, voice: &str) -> Result<Vec<u8>, NarrationError>;
}

// ── Decoding ────────────────────────────────────────────────────────

/// Turns encoded bytes into a playable clip.
pub trait AudioDecoder: Send + Sync {
    /// Decode `bytes` assuming `sample_rate` / `channels` when the encoding
    /// does not carry its own format.
    fn decode(
        &self,
        bytes: &[u8],
        sample_rate: u32,
        channels: u16,
    ) -> Result<AudioClip, NarrationError>;
}

// ── Output ──────────────────────────────────────────────────────────

/// Identifies one clip started on an output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Parameters read from settings when a clip starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackParams {
    pub rate: f32,
    pub volume: f32,
}

impl Default for PlaybackParams {
    fn default() -> Self {
        Self {
            rate: 1.0,
            volume: 1.0,
        }
    }
}

/// A clip playing (or paused) on an output line.
#[derive(Debug)]
pub struct OutputHandle {
    pub id: HandleId,

    /// Resolves once when the clip finishes or is stopped.
    pub finished: oneshot::Receiver<()>,
}

/// Opens output lines.
pub trait OutputDevice: Send + Sync {
    fn open(&self) -> Result<Box<dyn OutputLine>, NarrationError>;
}

/// A single shared audio output: every clip of a session plays through it,
/// and suspending it pauses all of them.
pub trait OutputLine: Send {
    /// Start playing `clip` right away.
    fn play(
        &mut self,
        clip: Arc<AudioClip>,
        params: PlaybackParams,
    ) -> Result<OutputHandle, NarrationError>;

    /// Halt a clip. Unknown or finished ids are ignored.
    fn stop(&mut self, id: HandleId);

    /// Pause the whole line.
    fn suspend(&mut self);

    /// Resume the whole line.
    fn resume(&mut self);

    fn is_suspended(&self) -> bool;
}
