//! Narration pipeline: fetch, decode, cache, and play survey narration.
//!
//! - [`NarrationDriver`] plays a screen's queue one unit at a time on a
//!   single shared output line and publishes a [`PlaybackState`](narrate_core::PlaybackState).
//! - [`ClipCache`] synthesizes and decodes units on demand, with one-ahead pre-fetch.
//! - [`GeminiSynthesizer`], [`PcmDecoder`] and the devices in [`output`] are
//!   the concrete adapters for the ports in `narrate-core`.

pub mod cache;
pub mod config;
pub mod decode;
pub mod driver;
pub mod output;
pub mod synthesis;

// Re-export key types for convenience
pub use cache::ClipCache;
pub use config::{DriverConfig, GeminiConfig};
pub use decode::PcmDecoder;
pub use driver::{DriverDeps, NarrationDriver, NarrationEvent, NarrationHandle};
pub use output::{SimulatedDevice, SimulatedLine};
#[cfg(feature = "speaker")]
pub use output::{SpeakerDevice, SpeakerLine};
pub use synthesis::GeminiSynthesizer;
