//! Hardware-free output line.
//!
//! Each clip "plays" for its duration divided by the playback rate, measured
//! in tokio time, so tests can drive it with a paused clock. Suspending the
//! line freezes the remaining time of every clip.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use narrate_core::{
    AudioClip, HandleId, NarrationError, OutputDevice, OutputHandle, OutputLine, PlaybackParams,
};
use tokio::sync::{oneshot, watch};
use tokio::time::Instant;

/// Opens [`SimulatedLine`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedDevice;

impl OutputDevice for SimulatedDevice {
    fn open(&self) -> Result<Box<dyn OutputLine>, NarrationError> {
        tracing::debug!("Opening simulated output line");
        Ok(Box::new(SimulatedLine::new()))
    }
}

/// An output line that plays silence in real (tokio) time.
#[derive(Debug)]
pub struct SimulatedLine {
    next_id: u64,
    suspended: watch::Sender<bool>,
    stops: HashMap<HandleId, oneshot::Sender<()>>,
}

impl SimulatedLine {
    #[must_use]
    pub fn new() -> Self {
        let (suspended, _rx) = watch::channel(false);
        Self {
            next_id: 0,
            suspended,
            stops: HashMap::new(),
        }
    }
}

impl Default for SimulatedLine {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock length of `clip` at `rate`.
fn scaled_duration(clip: &AudioClip, rate: f32) -> Duration {
    let rate = if rate.is_finite() && rate > 0.0 { rate } else { 1.0 };
    clip.duration().div_f32(rate)
}

async fn run_clip(
    mut remaining: Duration,
    mut suspended: watch::Receiver<bool>,
    mut stop: oneshot::Receiver<()>,
    done: oneshot::Sender<()>,
) {
    loop {
        if *suspended.borrow_and_update() {
            tokio::select! {
                _ = &mut stop => break,
                changed = suspended.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
            continue;
        }

        let started = Instant::now();
        tokio::select! {
            _ = &mut stop => break,
            () = tokio::time::sleep(remaining) => break,
            changed = suspended.changed() => {
                remaining = remaining.saturating_sub(started.elapsed());
                if changed.is_err() {
                    break;
                }
            }
        }
    }

    let _ = done.send(());
}

impl OutputLine for SimulatedLine {
    fn play(
        &mut self,
        clip: Arc<AudioClip>,
        params: PlaybackParams,
    ) -> Result<OutputHandle, NarrationError> {
        self.stops.retain(|_, stop| !stop.is_closed());

        self.next_id += 1;
        let id = HandleId(self.next_id);
        let (stop_tx, stop_rx) = oneshot::channel();
        let (done_tx, done_rx) = oneshot::channel();

        let duration = scaled_duration(&clip, params.rate);
        tracing::trace!(handle = %id, duration_ms = duration.as_millis(), "Simulated clip started");

        tokio::spawn(run_clip(
            duration,
            self.suspended.subscribe(),
            stop_rx,
            done_tx,
        ));
        self.stops.insert(id, stop_tx);

        Ok(OutputHandle {
            id,
            finished: done_rx,
        })
    }

    fn stop(&mut self, id: HandleId) {
        if let Some(stop) = self.stops.remove(&id) {
            let _ = stop.send(());
        }
    }

    fn suspend(&mut self) {
        self.suspended.send_replace(true);
    }

    fn resume(&mut self) {
        self.suspended.send_replace(false);
    }

    fn is_suspended(&self) -> bool {
        *self.suspended.borrow()
    }
}
