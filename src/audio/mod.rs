mod adapter;

pub use adapter::EngineAdapter;

use crate::model::Track;
use anyhow::{Context, Result};
use rodio::Source;
use rodio::{Decoder, OutputStream, OutputStreamBuilder, Sink};
#[cfg(unix)]
use std::ffi::CString;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Started,
    /// The platform refused to start playback without a user gesture.
    Blocked,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Position(Duration),
    DurationKnown(Duration),
    Played,
    Paused,
    Ended,
    Failed(String),
}

/// One native audio-producing resource bound to a single track.
pub trait AudioHandle {
    fn play(&mut self) -> PlayOutcome;
    fn pause(&mut self);
    fn seek(&mut self, position: Duration) -> Result<()>;
    fn set_volume(&mut self, volume: f32);
    fn set_muted(&mut self, muted: bool);
    fn position(&self) -> Duration;
    fn duration(&self) -> Option<Duration>;
    fn is_paused(&self) -> bool;
    fn poll_events(&mut self, out: &mut Vec<EngineEvent>);
    /// Stops output and drops every pending and future event.
    fn detach(&mut self);
}

pub trait AudioBackend {
    fn open(&mut self, track: &Track) -> Result<Box<dyn AudioHandle>>;
    fn name(&self) -> String;
}

fn effective_volume(volume: f32, muted: bool) -> f32 {
    if muted { 0.0 } else { volume.clamp(0.0, 1.0) }
}

fn resolve_source(root: Option<&Path>, source: &str) -> PathBuf {
    let path = PathBuf::from(source.trim_start_matches('/'));
    match root {
        Some(root) if path.is_relative() => root.join(path),
        _ => PathBuf::from(source),
    }
}

pub struct RodioBackend {
    stream: OutputStream,
    media_root: Option<PathBuf>,
}

impl RodioBackend {
    pub fn new(media_root: Option<PathBuf>) -> Result<Self> {
        let mut stream = with_silenced_stderr(|| {
            OutputStreamBuilder::from_default_device()
                .context("failed to open default system output stream")
                .and_then(|builder| {
                    builder
                        .with_error_callback(|_| {})
                        .open_stream_or_fallback()
                        .context("failed to start default output stream")
                })
        })?;
        stream.log_on_drop(false);
        Ok(Self { stream, media_root })
    }
}

impl AudioBackend for RodioBackend {
    fn open(&mut self, track: &Track) -> Result<Box<dyn AudioHandle>> {
        let path = resolve_source(self.media_root.as_deref(), &track.source);
        let file =
            File::open(&path).with_context(|| format!("failed to open track {}", path.display()))?;
        let source = Decoder::try_from(file)
            .with_context(|| format!("failed to decode {}", path.display()))?;
        let duration = source.total_duration().filter(|duration| !duration.is_zero());

        let sink = Sink::connect_new(self.stream.mixer());
        sink.pause();
        sink.append(source);

        Ok(Box::new(RodioHandle {
            sink,
            duration,
            volume: 1.0,
            muted: false,
            pending: duration.map(EngineEvent::DurationKnown).into_iter().collect(),
            ended: false,
            detached: false,
        }))
    }

    fn name(&self) -> String {
        String::from("System default output (CPAL)")
    }
}

struct RodioHandle {
    sink: Sink,
    duration: Option<Duration>,
    volume: f32,
    muted: bool,
    pending: Vec<EngineEvent>,
    ended: bool,
    detached: bool,
}

impl RodioHandle {
    fn apply_volume(&self) {
        self.sink.set_volume(effective_volume(self.volume, self.muted));
    }
}

impl AudioHandle for RodioHandle {
    fn play(&mut self) -> PlayOutcome {
        if self.detached {
            return PlayOutcome::Blocked;
        }
        self.sink.play();
        self.ended = false;
        self.pending.push(EngineEvent::Played);
        PlayOutcome::Started
    }

    fn pause(&mut self) {
        if self.detached || self.sink.is_paused() {
            return;
        }
        self.sink.pause();
        self.pending.push(EngineEvent::Paused);
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.sink
            .try_seek(position)
            .map_err(|err| anyhow::anyhow!("failed to seek current track: {err:?}"))?;
        self.ended = false;
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        self.apply_volume();
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.apply_volume();
    }

    fn position(&self) -> Duration {
        self.sink.get_pos()
    }

    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn is_paused(&self) -> bool {
        self.detached || self.sink.is_paused()
    }

    fn poll_events(&mut self, out: &mut Vec<EngineEvent>) {
        if self.detached {
            return;
        }
        out.append(&mut self.pending);
        if self.sink.is_paused() || self.ended {
            return;
        }
        out.push(EngineEvent::Position(self.sink.get_pos()));
        if self.sink.empty() {
            self.ended = true;
            out.push(EngineEvent::Ended);
        }
    }

    fn detach(&mut self) {
        self.sink.stop();
        self.pending.clear();
        self.detached = true;
    }
}

#[cfg(unix)]
fn with_silenced_stderr<T>(operation: impl FnOnce() -> T) -> T {
    let saved = unsafe { libc::dup(libc::STDERR_FILENO) };
    if saved < 0 {
        return operation();
    }

    let devnull = CString::new("/dev/null")
        .ok()
        .map(|path| unsafe { libc::open(path.as_ptr(), libc::O_WRONLY) })
        .unwrap_or(-1);

    if devnull >= 0 {
        unsafe {
            libc::dup2(devnull, libc::STDERR_FILENO);
            libc::close(devnull);
        }
    }

    let result = operation();

    unsafe {
        libc::dup2(saved, libc::STDERR_FILENO);
        libc::close(saved);
    }

    result
}

#[cfg(not(unix))]
fn with_silenced_stderr<T>(operation: impl FnOnce() -> T) -> T {
    operation()
}

/// Wall-clock driven backend for hosts without an output device.
#[derive(Debug, Clone, Default)]
pub struct NullBackend {
    media_root: Option<PathBuf>,
    fallback_duration: Option<Duration>,
    blocked_plays: u32,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_media_root(mut self, root: Option<PathBuf>) -> Self {
        self.media_root = root;
        self
    }

    /// Duration reported when the source cannot be decoded.
    pub fn with_fallback_duration(mut self, duration: Duration) -> Self {
        self.fallback_duration = Some(duration);
        self
    }

    /// Every handle refuses its first `count` play requests, like a browser
    /// that wants a user gesture first.
    pub fn with_blocked_plays(mut self, count: u32) -> Self {
        self.blocked_plays = count;
        self
    }

    fn estimate_duration(file: File) -> Option<Duration> {
        let source = Decoder::try_from(file).ok()?;
        source
            .total_duration()
            .filter(|duration| !duration.is_zero())
    }
}

impl AudioBackend for NullBackend {
    fn open(&mut self, track: &Track) -> Result<Box<dyn AudioHandle>> {
        if track.source.trim().is_empty() {
            anyhow::bail!("track {:?} has no source", track.title);
        }
        let path = resolve_source(self.media_root.as_deref(), &track.source);
        let file = File::open(&path)
            .with_context(|| format!("failed to open audio file {}", path.display()))?;
        let duration = Self::estimate_duration(file).or(self.fallback_duration);
        Ok(Box::new(NullHandle::new(duration, self.blocked_plays)))
    }

    fn name(&self) -> String {
        String::from("Null audio engine")
    }
}

pub struct NullHandle {
    paused: bool,
    started_at: Option<Instant>,
    position_offset: Duration,
    track_duration: Option<Duration>,
    blocked_plays: u32,
    pending: Vec<EngineEvent>,
    ended: bool,
    detached: bool,
}

impl NullHandle {
    pub fn new(track_duration: Option<Duration>, blocked_plays: u32) -> Self {
        Self {
            paused: true,
            started_at: None,
            position_offset: Duration::ZERO,
            track_duration,
            blocked_plays,
            pending: track_duration
                .map(EngineEvent::DurationKnown)
                .into_iter()
                .collect(),
            ended: false,
            detached: false,
        }
    }

    fn current_position(&self) -> Duration {
        let mut position = self.position_offset;
        if !self.paused
            && let Some(started_at) = self.started_at
        {
            position = position.saturating_add(started_at.elapsed());
        }
        if let Some(duration) = self.track_duration {
            return position.min(duration);
        }
        position
    }

    fn is_finished(&self) -> bool {
        let Some(duration) = self.track_duration else {
            return false;
        };
        !self.paused && self.current_position() >= duration
    }
}

impl AudioHandle for NullHandle {
    fn play(&mut self) -> PlayOutcome {
        if self.detached {
            return PlayOutcome::Blocked;
        }
        if self.blocked_plays > 0 {
            self.blocked_plays -= 1;
            return PlayOutcome::Blocked;
        }
        if self.paused {
            self.started_at = Some(Instant::now());
            self.paused = false;
            self.ended = false;
            self.pending.push(EngineEvent::Played);
        }
        PlayOutcome::Started
    }

    fn pause(&mut self) {
        if self.paused || self.detached {
            return;
        }
        self.position_offset = self.current_position();
        self.started_at = None;
        self.paused = true;
        self.pending.push(EngineEvent::Paused);
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        self.position_offset = self
            .track_duration
            .map_or(position, |duration| position.min(duration));
        self.started_at = if self.paused {
            None
        } else {
            Some(Instant::now())
        };
        self.ended = false;
        Ok(())
    }

    fn set_volume(&mut self, _volume: f32) {}

    fn set_muted(&mut self, _muted: bool) {}

    fn position(&self) -> Duration {
        self.current_position()
    }

    fn duration(&self) -> Option<Duration> {
        self.track_duration
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn poll_events(&mut self, out: &mut Vec<EngineEvent>) {
        if self.detached {
            return;
        }
        out.append(&mut self.pending);
        if self.paused || self.ended {
            return;
        }
        out.push(EngineEvent::Position(self.current_position()));
        if self.is_finished() {
            self.ended = true;
            self.position_offset = self.current_position();
            self.started_at = None;
            self.paused = true;
            out.push(EngineEvent::Ended);
        }
    }

    fn detach(&mut self) {
        self.pending.clear();
        self.paused = true;
        self.started_at = None;
        self.detached = true;
    }
}

/// Empty media files under a fresh directory. They open but never decode, so
/// a `NullBackend` pointed at the directory falls back to its fixed duration.
#[cfg(test)]
pub(crate) fn media_fixture(sources: &[&str]) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for source in sources {
        std::fs::write(dir.path().join(source), b"").expect("media fixture should be written");
    }
    dir
}
