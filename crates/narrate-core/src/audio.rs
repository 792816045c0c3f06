//! Decoded audio ready for an output line.

use std::time::Duration;

/// Sample rate of the speech service's PCM output.
pub const SPEECH_SAMPLE_RATE: u32 = 24_000;

/// Channel count of the speech service's PCM output.
pub const SPEECH_CHANNELS: u16 = 1;

/// Interleaved `f32` samples in `[-1.0, 1.0)` with their format.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioClip {
    #[must_use]
    pub const fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels,
        }
    }

    /// Number of frames (samples per channel).
    #[must_use]
    pub fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    /// Playback length at normal rate.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frames() as f64 / f64::from(self.sample_rate))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_of_one_second_mono() {
        let clip = AudioClip::new(vec![0.0; 24_000], SPEECH_SAMPLE_RATE, SPEECH_CHANNELS);
        assert_eq!(clip.duration(), Duration::from_secs(1));
    }

    #[test]
    fn duration_accounts_for_channels() {
        let clip = AudioClip::new(vec![0.0; 48_000], 24_000, 2);
        assert_eq!(clip.frames(), 24_000);
        assert_eq!(clip.duration(), Duration::from_secs(1));
    }

    #[test]
    fn zero_rate_has_no_duration() {
        let clip = AudioClip::new(vec![0.1; 10], 0, 1);
        assert_eq!(clip.duration(), Duration::ZERO);
    }
}
