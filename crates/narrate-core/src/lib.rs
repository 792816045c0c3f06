//! Core domain types for narrating survey screens aloud.
//!
//! This crate holds everything that does not touch the network or an audio
//! device: narration units and queues, the queue builder and the survey
//! screens it reads, audio settings, the published playback state, and the
//! port traits that `narrate-voice` implements.

pub mod audio;
pub mod builder;
pub mod error;
pub mod ports;
pub mod screens;
pub mod settings;
pub mod state;
pub mod unit;

// Re-export commonly used types for convenience
pub use audio::{AudioClip, SPEECH_CHANNELS, SPEECH_SAMPLE_RATE};
pub use builder::{ItemKind, ScreenContent, ScreenItem, build_queue};
pub use error::NarrationError;
pub use ports::{
    AudioDecoder, HandleId, OutputDevice, OutputHandle, OutputLine, PlaybackParams,
    SpeechSynthesizer,
};
pub use screens::{
    GeneratedQuestion, QuestionCategory, QuestionType, SurveyType, question_screen, start_screen,
};
pub use settings::{
    AudioSettings, AudioSettingsUpdate, DEFAULT_VOICE, SettingsError, SettingsStore, TTS_VOICES,
    VoiceGender, VoiceInfo, find_voice, validate_audio_settings,
};
pub use state::{Affordance, PlaybackPhase, PlaybackState};
pub use unit::{NarrationQueue, NarrationUnit};
