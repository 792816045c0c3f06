//! Speech synthesizer implementations.

pub mod gemini;

pub use gemini::GeminiSynthesizer;
