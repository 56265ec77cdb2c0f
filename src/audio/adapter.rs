use super::{AudioBackend, AudioHandle, EngineEvent, PlayOutcome};
use crate::model::Track;
use std::time::Duration;

/// Owns the single live engine handle. Loading a track always detaches and
/// drops the previous handle before the backend opens the next one.
pub struct EngineAdapter {
    backend: Box<dyn AudioBackend>,
    handle: Option<Box<dyn AudioHandle>>,
    handles_opened: u64,
    load_error: Option<String>,
}

impl EngineAdapter {
    pub fn new(backend: Box<dyn AudioBackend>) -> Self {
        Self {
            backend,
            handle: None,
            handles_opened: 0,
            load_error: None,
        }
    }

    pub fn backend_name(&self) -> String {
        self.backend.name()
    }

    pub fn has_handle(&self) -> bool {
        self.handle.is_some()
    }

    pub fn handles_opened(&self) -> u64 {
        self.handles_opened
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Returns false when the track could not be opened; the reason is kept
    /// in [`EngineAdapter::load_error`].
    pub fn load(
        &mut self,
        track: &Track,
        volume: f32,
        muted: bool,
        resume_at: Option<f64>,
    ) -> bool {
        self.unload();

        let mut handle = match self.backend.open(track) {
            Ok(handle) => handle,
            Err(err) => {
                log::warn!("could not load {:?}: {err:#}", track.source);
                self.load_error = Some(format!("{err:#}"));
                return false;
            }
        };
        self.handles_opened += 1;
        self.load_error = None;

        handle.set_volume(volume);
        handle.set_muted(muted);
        if let Some(seconds) = resume_at.filter(|seconds| *seconds > 0.0) {
            let target = clamp_position(seconds, handle.duration());
            if let Err(err) = handle.seek(Duration::from_secs_f64(target)) {
                log::debug!("could not restore position {target:.1}s: {err:#}");
            }
        }

        log::debug!("loaded {:?} on {}", track.title, self.backend.name());
        self.handle = Some(handle);
        true
    }

    pub fn unload(&mut self) {
        if let Some(mut old) = self.handle.take() {
            old.detach();
        }
    }

    /// Records a failure reported by the live handle and releases it.
    pub fn fail(&mut self, reason: &str) {
        self.unload();
        self.load_error = Some(reason.to_string());
    }

    pub fn play(&mut self) -> PlayOutcome {
        match self.handle.as_mut() {
            Some(handle) => handle.play(),
            None => PlayOutcome::Blocked,
        }
    }

    pub fn pause(&mut self) {
        if let Some(handle) = self.handle.as_mut() {
            handle.pause();
        }
    }

    pub fn is_playing(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_paused())
    }

    /// Seeks the live handle and returns the clamped target in seconds.
    pub fn seek(&mut self, seconds: f64) -> Option<f64> {
        let handle = self.handle.as_mut()?;
        let target = clamp_position(seconds, handle.duration());
        if let Err(err) = handle.seek(Duration::from_secs_f64(target)) {
            log::debug!("seek to {target:.1}s failed: {err:#}");
        }
        Some(target)
    }

    pub fn set_volume(&mut self, volume: f32) {
        if let Some(handle) = self.handle.as_mut() {
            handle.set_volume(volume);
        }
    }

    pub fn set_muted(&mut self, muted: bool) {
        if let Some(handle) = self.handle.as_mut() {
            handle.set_muted(muted);
        }
    }

    pub fn position(&self) -> Option<f64> {
        self.handle
            .as_ref()
            .map(|handle| handle.position().as_secs_f64())
    }

    pub fn duration(&self) -> Option<f64> {
        self.handle
            .as_ref()
            .and_then(|handle| handle.duration())
            .map(|duration| duration.as_secs_f64())
    }

    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if let Some(handle) = self.handle.as_mut() {
            handle.poll_events(&mut events);
        }
        events
    }
}

fn clamp_position(seconds: f64, duration: Option<Duration>) -> f64 {
    let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
    match duration {
        Some(duration) => seconds.min(duration.as_secs_f64()),
        None => seconds,
    }
}
