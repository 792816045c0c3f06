//! Per-screen audio cache: unit id → decoded clip.
//!
//! The cache fetches on miss (synthesize, then decode) and can pre-fetch the
//! next unit in the background. It only ever holds clips that were both
//! synthesized and decoded successfully; failures are never memoized, so a
//! unit whose pre-fetch failed is fetched again when it reaches the head.
//!
//! Every [`clear`](ClipCache::clear) starts a new generation. A fetch that
//! began in an older generation still returns its clip to the caller, but
//! never inserts it, so a rebuilt screen cannot pick up stale audio.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use narrate_core::{AudioClip, AudioDecoder, NarrationError, NarrationUnit, SpeechSynthesizer};

#[derive(Debug, Default)]
struct CacheInner {
    generation: u64,
    voice: String,
    clips: HashMap<String, Arc<AudioClip>>,
}

/// Shared, cloneable audio cache.
#[derive(Clone)]
pub struct ClipCache {
    inner: Arc<Mutex<CacheInner>>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    decoder: Arc<dyn AudioDecoder>,
    sample_rate: u32,
    channels: u16,
}

impl ClipCache {
    pub fn new(
        synthesizer: Arc<dyn SpeechSynthesizer>,
        decoder: Arc<dyn AudioDecoder>,
        voice: impl Into<String>,
        sample_rate: u32,
        channels: u16,
    ) -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner {
                voice: voice.into(),
                ..CacheInner::default()
            })),
            synthesizer,
            decoder,
            sample_rate,
            channels,
        }
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Cached clip for `id`, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<AudioClip>> {
        self.lock().clips.get(id).cloned()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.lock().clips.contains_key(id)
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.lock().clips.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn generation(&self) -> u64 {
        self.lock().generation
    }

    #[cfg(test)]
    pub(crate) fn voice(&self) -> String {
        self.lock().voice.clone()
    }

    /// Drop every clip and start a new generation.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.clips.clear();
        inner.generation += 1;
    }

    /// Like [`clear`](Self::clear), also switching the voice used for new fetches.
    pub fn reset(&self, voice: impl Into<String>) {
        let mut inner = self.lock();
        inner.clips.clear();
        inner.generation += 1;
        inner.voice = voice.into();
    }

    /// Return the clip for `unit`, fetching and caching it on a miss.
    pub async fn ensure(&self, unit: &NarrationUnit) -> Result<Arc<AudioClip>, NarrationError> {
        let (generation, voice) = {
            let inner = self.lock();
            if let Some(clip) = inner.clips.get(&unit.id) {
                return Ok(Arc::clone(clip));
            }
            (inner.generation, inner.voice.clone())
        };

        tracing::debug!(unit_id = %unit.id, voice = %voice, "Fetching narration audio");

        let bytes = self.synthesizer.synthesize(&unit.text, &voice).await?;
        let clip = Arc::new(
            self.decoder
                .decode(&bytes, self.sample_rate, self.channels)?,
        );

        let mut inner = self.lock();
        if inner.generation == generation {
            inner
                .clips
                .entry(unit.id.clone())
                .or_insert_with(|| Arc::clone(&clip));
        } else {
            tracing::debug!(unit_id = %unit.id, "Discarding audio fetched for a previous screen");
        }

        Ok(clip)
    }

    /// Fetch `unit` in the background. Failures are logged and dropped.
    ///
    /// Must be called from within a tokio runtime.
    pub fn prefetch(&self, unit: NarrationUnit) {
        if self.contains(&unit.id) {
            return;
        }

        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.ensure(&unit).await {
                tracing::warn!(unit_id = %unit.id, error = %e, "Pre-fetch failed");
            }
        });
    }
}

impl std::fmt::Debug for ClipCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("ClipCache")
            .field("generation", &inner.generation)
            .field("voice", &inner.voice)
            .field("clips", &inner.clips.len())
            .finish_non_exhaustive()
    }
}
