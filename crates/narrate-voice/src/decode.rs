//! Audio decoding: raw PCM16 from the speech service, or WAV containers.

use std::io::Cursor;

use hound::{SampleFormat, WavReader};
use narrate_core::{AudioClip, AudioDecoder, NarrationError};

/// Decodes little-endian PCM16, or a RIFF/WAV container when the bytes carry one.
#[derive(Debug, Clone, Copy, Default)]
pub struct PcmDecoder;

impl PcmDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl AudioDecoder for PcmDecoder {
    fn decode(
        &self,
        bytes: &[u8],
        sample_rate: u32,
        channels: u16,
    ) -> Result<AudioClip, NarrationError> {
        if bytes.is_empty() {
            return Err(NarrationError::Decode("no audio bytes".to_string()));
        }

        if bytes.starts_with(b"RIFF") {
            return decode_wav(bytes);
        }

        decode_pcm16(bytes, sample_rate, channels)
    }
}

/// Raw interleaved signed 16-bit little-endian samples.
fn decode_pcm16(bytes: &[u8], sample_rate: u32, channels: u16) -> Result<AudioClip, NarrationError> {
    if bytes.len() % 2 != 0 {
        return Err(NarrationError::Decode(format!(
            "PCM16 data has odd length {}",
            bytes.len()
        )));
    }
    if channels == 0 || sample_rate == 0 {
        return Err(NarrationError::Decode(format!(
            "invalid PCM format: {sample_rate} Hz, {channels} channels"
        )));
    }

    let samples = bytes
        .chunks_exact(2)
        .map(|pair| f32::from(i16::from_le_bytes([pair[0], pair[1]])) / 32768.0)
        .collect();

    Ok(AudioClip::new(samples, sample_rate, channels))
}

#[allow(clippy::cast_precision_loss)]
fn decode_wav(bytes: &[u8]) -> Result<AudioClip, NarrationError> {
    let reader = WavReader::new(Cursor::new(bytes))
        .map_err(|e| NarrationError::Decode(format!("invalid WAV container: {e}")))?;
    let spec = reader.spec();

    tracing::debug!(
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        bits = spec.bits_per_sample,
        "Decoding WAV audio"
    );

    let read_err = |e: hound::Error| NarrationError::Decode(format!("failed to read WAV sample: {e}"));

    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        (SampleFormat::Int, 8) => reader
            .into_samples::<i8>()
            .map(|s| s.map(|v| f32::from(v) / 128.0))
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        (SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| f32::from(v) / 32768.0))
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        (SampleFormat::Int, 24) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 8_388_608.0))
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        (SampleFormat::Int, 32) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| v as f32 / 2_147_483_648.0))
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        (format, bits) => {
            return Err(NarrationError::Decode(format!(
                "unsupported WAV format: {format:?} {bits}-bit"
            )));
        }
    };

    if samples.is_empty() {
        return Err(NarrationError::Decode("WAV contains no samples".to_string()));
    }

    Ok(AudioClip::new(samples, spec.sample_rate, spec.channels))
}
