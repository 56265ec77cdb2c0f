//! The playback session: one long-lived owner of the engine handle, the
//! playlist cursor, consent/visibility, resume scheduling and persistence.
//!
//! The host creates exactly one session on first activation and keeps it for
//! the rest of the process. Widgets read [`PlaybackSession::view`] and send
//! intents; they never touch the shared state directly.

use std::time::{Duration, Instant};

use crate::audio::{AudioBackend, EngineAdapter, EngineEvent, PlayOutcome};
use crate::consent::{ConsentChange, ConsentGate};
use crate::error::PlayerResult;
use crate::model::{ConsentState, DEFAULT_VOLUME, PlaybackState, PlayerView, Track};
use crate::persistence::{DEFAULT_POSITION_SAVE_INTERVAL, PersistenceShim, SessionStore};
use crate::playlist::PlaylistCursor;
use crate::resume::{DEFAULT_RESUME_DELAYS_MS, NavigationEpoch, ResumeAttempt, ResumeScheduler};

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub default_volume: f32,
    pub resume_delays: Vec<Duration>,
    pub position_save_interval: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_volume: DEFAULT_VOLUME,
            resume_delays: DEFAULT_RESUME_DELAYS_MS
                .iter()
                .map(|ms| Duration::from_millis(*ms))
                .collect(),
            position_save_interval: DEFAULT_POSITION_SAVE_INTERVAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeResult {
    /// Scheduled under an older navigation epoch; nothing was touched.
    Stale,
    NotPermitted,
    AlreadyPlaying,
    Resumed,
    Blocked,
    /// The last scheduled attempt was blocked; playback stays paused.
    GaveUp,
}

pub struct PlaybackSession {
    playlist: PlaylistCursor,
    engine: EngineAdapter,
    gate: ConsentGate,
    resume: ResumeScheduler,
    shim: PersistenceShim,
    state: PlaybackState,
    last_audible_volume: f32,
}

impl PlaybackSession {
    pub fn new(
        settings: SessionSettings,
        tracks: Vec<Track>,
        backend: Box<dyn AudioBackend>,
        store: Box<dyn SessionStore>,
    ) -> PlayerResult<Self> {
        let mut playlist = PlaylistCursor::new(tracks)?;
        let mut shim = PersistenceShim::new(store, settings.position_save_interval);
        let snapshot = shim.rehydrate(playlist.len());
        playlist.select(snapshot.track_index)?;

        let mut state = PlaybackState::new(snapshot.track_index, settings.default_volume);
        if let Some(position) = snapshot.position {
            state.set_elapsed(position);
        }
        let last_audible_volume = if state.volume > 0.0 {
            state.volume
        } else {
            DEFAULT_VOLUME
        };

        let mut session = Self {
            playlist,
            engine: EngineAdapter::new(backend),
            gate: ConsentGate::new(snapshot.consent, snapshot.player_closed),
            resume: ResumeScheduler::new(settings.resume_delays),
            shim,
            state,
            last_audible_volume,
        };

        if session.gate.may_play() {
            session.load_current();
        }
        log::info!(
            "session activated: consent={:?} track={} position={:.1}s",
            session.gate.consent(),
            session.state.current_track_index,
            session.state.elapsed
        );
        Ok(session)
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn consent(&self) -> ConsentState {
        self.gate.consent()
    }

    pub fn epoch(&self) -> NavigationEpoch {
        self.resume.epoch()
    }

    pub fn has_active_handle(&self) -> bool {
        self.engine.has_handle()
    }

    pub fn handles_opened(&self) -> u64 {
        self.engine.handles_opened()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.engine.load_error()
    }

    pub fn resume_pending(&self) -> bool {
        self.resume.has_pending()
    }

    pub fn backend_name(&self) -> String {
        self.engine.backend_name()
    }

    pub fn tracks(&self) -> &[Track] {
        self.playlist.tracks()
    }

    pub fn persistence_degraded(&self) -> bool {
        self.shim.is_degraded()
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            track: self.playlist.current().clone(),
            track_index: self.playlist.index(),
            track_count: self.playlist.len(),
            current_time: self.state.elapsed,
            duration: self.state.duration,
            is_playing: self.state.is_playing,
            volume: self.state.volume,
            is_muted: self.state.is_muted,
            visible: self.gate.widget_visible(),
            dismissed: self.gate.visibility().user_dismissed,
            prompt_visible: self.gate.prompt_visible(),
            reopen_visible: self.gate.reopen_visible(),
            load_error: self.engine.load_error().map(ToOwned::to_owned),
        }
    }

    pub fn answer_consent(&mut self, accepted: bool) {
        match self.gate.answer(accepted) {
            ConsentChange::Granted => {
                log::info!("audio consent granted");
                self.shim.save_consent(ConsentState::Granted);
                self.shim.save_dismissed(false);
                self.load_current();
                self.start_playback();
            }
            ConsentChange::Denied => {
                log::info!("audio consent denied");
                self.shim.save_consent(ConsentState::Denied);
            }
            ConsentChange::Unchanged => {}
        }
    }

    pub fn toggle_play_pause(&mut self) {
        if !self.gate.may_play() {
            return;
        }
        self.resume.cancel_all();
        if self.state.is_playing {
            self.pause_playback();
        } else if self.start_playback() == PlayOutcome::Blocked {
            log::info!("play request was refused");
        }
    }

    pub fn seek_to(&mut self, seconds: f64) {
        if !self.gate.may_play() {
            return;
        }
        let target = self.engine.seek(seconds).unwrap_or(seconds);
        self.state.set_elapsed(target);
        self.shim
            .flush_position(self.state.current_track_index, self.state.elapsed);
    }

    /// `percent` is the widget's 0..=100 slider value.
    pub fn set_volume(&mut self, percent: f32) {
        let volume = if percent.is_finite() {
            (percent / 100.0).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.state.volume = volume;
        if volume == 0.0 {
            self.state.is_muted = true;
        } else {
            self.last_audible_volume = volume;
            self.state.is_muted = false;
        }
        self.engine.set_volume(self.state.volume);
        self.engine.set_muted(self.state.is_muted);
    }

    pub fn toggle_mute(&mut self) {
        if self.state.is_muted {
            self.state.is_muted = false;
            if self.state.volume == 0.0 {
                self.state.volume = self.last_audible_volume;
                self.engine.set_volume(self.state.volume);
            }
        } else {
            self.state.is_muted = true;
        }
        self.engine.set_muted(self.state.is_muted);
    }

    pub fn next_track(&mut self) {
        let keep_playing = self.state.is_playing;
        self.playlist.next();
        self.change_track(keep_playing);
    }

    pub fn prev_track(&mut self) {
        let keep_playing = self.state.is_playing;
        self.playlist.previous();
        self.change_track(keep_playing);
    }

    /// Direct selection; also the way to retry a track that failed to load.
    pub fn select_track(&mut self, index: usize) -> PlayerResult<()> {
        let keep_playing = self.state.is_playing;
        self.playlist.select(index)?;
        self.change_track(keep_playing);
        Ok(())
    }

    pub fn dismiss(&mut self) {
        if !self.gate.dismiss(self.playing_intent()) {
            return;
        }
        self.resume.cancel_all();
        self.pause_playback();
        self.shim.save_dismissed(true);
    }

    pub fn reopen(&mut self) {
        let Some(resume) = self.gate.reopen() else {
            return;
        };
        self.shim.save_dismissed(false);

        if !self.engine.has_handle() {
            self.load_current();
        } else if let Some(target) = self.engine.seek(self.state.elapsed) {
            self.state.set_elapsed(target);
        }
        if resume {
            self.start_playback();
        }
    }

    /// Route change in the host. Captures the playing intent and position
    /// before the transition and schedules the resume attempts.
    pub fn navigate(&mut self, now: Instant) -> NavigationEpoch {
        let was_playing = self.playing_intent();
        if self.engine.is_playing()
            && let Some(position) = self.engine.position()
        {
            self.state.set_elapsed(position);
        }

        let epoch =
            self.resume
                .on_navigate(now, was_playing, self.state.elapsed, self.gate.may_play());
        log::debug!(
            "navigation epoch {} (was_playing={was_playing}, position={:.1}s)",
            epoch.value(),
            self.state.elapsed
        );
        epoch
    }

    /// Drains engine events, then runs every resume attempt due at `now`.
    pub fn tick(&mut self, now: Instant) {
        for event in self.engine.drain_events() {
            self.handle_engine_event(now, event);
        }

        while let Some(attempt) = self.resume.next_due(now) {
            self.apply_resume_attempt(attempt);
        }
    }

    pub fn apply_resume_attempt(&mut self, attempt: ResumeAttempt) -> ResumeResult {
        if !self.resume.is_current(&attempt) {
            log::trace!(
                "dropping resume attempt from epoch {}",
                attempt.epoch.value()
            );
            return ResumeResult::Stale;
        }
        if !self.gate.may_play() {
            self.resume.settle(attempt.epoch);
            return ResumeResult::NotPermitted;
        }
        if self.engine.is_playing() {
            self.state.is_playing = true;
            self.resume.settle(attempt.epoch);
            return ResumeResult::AlreadyPlaying;
        }

        if !self.engine.has_handle() {
            self.load_current();
        }
        if let Some(target) = self.engine.seek(attempt.position) {
            self.state.set_elapsed(target);
        }

        match self.engine.play() {
            PlayOutcome::Started => {
                log::debug!(
                    "playback resumed on attempt {}/{}",
                    attempt.attempt + 1,
                    attempt.of
                );
                self.state.is_playing = true;
                self.resume.settle(attempt.epoch);
                ResumeResult::Resumed
            }
            PlayOutcome::Blocked if attempt.is_last() => {
                log::warn!(
                    "autoplay still blocked after {} attempts; waiting for the user",
                    attempt.of
                );
                self.state.is_playing = false;
                self.shim
                    .flush_position(self.state.current_track_index, self.state.elapsed);
                ResumeResult::GaveUp
            }
            PlayOutcome::Blocked => {
                self.state.is_playing = false;
                ResumeResult::Blocked
            }
        }
    }

    /// Final position flush; releases the engine handle.
    pub fn shutdown(&mut self) {
        self.resume.cancel_all();
        if let Some(position) = self.engine.position() {
            self.state.set_elapsed(position);
        }
        self.shim
            .flush_position(self.state.current_track_index, self.state.elapsed);
        self.engine.unload();
        self.state.is_playing = false;
    }

    fn handle_engine_event(&mut self, now: Instant, event: EngineEvent) {
        match event {
            EngineEvent::Position(position) => {
                self.state.set_elapsed(position.as_secs_f64());
                if self.state.is_playing {
                    self.shim.save_position(
                        now,
                        self.state.current_track_index,
                        self.state.elapsed,
                    );
                }
            }
            EngineEvent::DurationKnown(duration) => {
                self.state.set_duration(Some(duration.as_secs_f64()));
            }
            EngineEvent::Played => {
                if self.gate.may_play() {
                    self.state.is_playing = true;
                } else {
                    self.engine.pause();
                }
            }
            EngineEvent::Paused => {
                self.state.is_playing = false;
            }
            EngineEvent::Ended => self.on_track_ended(),
            EngineEvent::Failed(reason) => {
                log::warn!("playback failed: {reason}");
                self.engine.fail(&reason);
                self.state.is_playing = false;
            }
        }
    }

    fn on_track_ended(&mut self) {
        if !self.gate.may_play() {
            self.state.is_playing = false;
            return;
        }
        self.playlist.next();
        log::debug!("track ended, advancing to {}", self.playlist.index());
        self.change_track(true);
    }

    fn change_track(&mut self, keep_playing: bool) {
        self.resume.cancel_all();
        let index = self.playlist.index();
        self.shim.save_track_index(index);

        if !self.gate.may_play() {
            self.state.current_track_index = index;
            self.state.duration = None;
            self.state.set_elapsed(0.0);
            return;
        }

        if self.load_current() && keep_playing {
            self.start_playback();
        }
    }

    /// Playing, or about to be: a pending resume still carries the intent.
    fn playing_intent(&self) -> bool {
        self.state.is_playing || self.resume.has_pending()
    }

    fn load_current(&mut self) -> bool {
        let index = self.playlist.index();
        let resume_at = self.shim.saved_position_for(index);

        self.state.current_track_index = index;
        self.state.is_playing = false;
        self.state.duration = None;
        self.state.set_elapsed(resume_at.unwrap_or(0.0));

        let loaded = self.engine.load(
            self.playlist.current(),
            self.state.volume,
            self.state.is_muted,
            resume_at,
        );
        if loaded {
            self.state.set_duration(self.engine.duration());
            if let Some(position) = self.engine.position() {
                self.state.set_elapsed(position);
            }
        }
        loaded
    }

    fn start_playback(&mut self) -> PlayOutcome {
        if !self.gate.may_play() {
            return PlayOutcome::Blocked;
        }
        if !self.engine.has_handle() && !self.load_current() {
            return PlayOutcome::Blocked;
        }
        let outcome = self.engine.play();
        self.state.is_playing = outcome == PlayOutcome::Started;
        outcome
    }

    fn pause_playback(&mut self) {
        self.engine.pause();
        if let Some(position) = self.engine.position() {
            self.state.set_elapsed(position);
        }
        self.state.is_playing = false;
        self.shim
            .flush_position(self.state.current_track_index, self.state.elapsed);
    }
}

/// Lazily created home of the process-wide session.
#[derive(Default)]
pub struct SessionSlot {
    session: Option<PlaybackSession>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut PlaybackSession> {
        self.session.as_mut()
    }

    pub fn get_or_init(
        &mut self,
        init: impl FnOnce() -> PlayerResult<PlaybackSession>,
    ) -> PlayerResult<&mut PlaybackSession> {
        let session = match self.session.take() {
            Some(session) => session,
            None => init()?,
        };
        Ok(self.session.insert(session))
    }

    pub fn take(&mut self) -> Option<PlaybackSession> {
        self.session.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{NullBackend, media_fixture};
    use crate::error::PlayerError;
    use crate::persistence::{
        KEY_CONSENT, KEY_PLAYER_CLOSED, KEY_POSITION, KEY_TRACK_INDEX, MemoryStore,
    };
    use proptest::prop_assert;
    use tempfile::TempDir;

    fn tracks(count: usize) -> Vec<Track> {
        (0..count)
            .map(|n| Track::new(&format!("song {n}"), "studio", "", &format!("song_{n}.mp3")))
            .collect()
    }

    fn media() -> TempDir {
        media_fixture(&["song_0.mp3", "song_1.mp3", "song_2.mp3", "song_3.mp3"])
    }

    fn backend(media: &TempDir) -> NullBackend {
        NullBackend::new()
            .with_media_root(Some(media.path().to_path_buf()))
            .with_fallback_duration(Duration::from_secs(180))
    }

    fn session_with(media: &TempDir, store: &MemoryStore, count: usize) -> PlaybackSession {
        PlaybackSession::new(
            SessionSettings::default(),
            tracks(count),
            Box::new(backend(media)),
            Box::new(store.clone()),
        )
        .expect("session")
    }

    fn granted_store() -> MemoryStore {
        MemoryStore::with_entries(&[(KEY_CONSENT, "true")])
    }

    #[test]
    fn empty_playlist_refuses_to_construct() {
        let result = PlaybackSession::new(
            SessionSettings::default(),
            Vec::new(),
            Box::new(NullBackend::new()),
            Box::new(MemoryStore::new()),
        );
        assert_eq!(result.err(), Some(PlayerError::EmptyPlaylist));
    }

    #[test]
    fn fresh_profile_prompts_before_loading() {
        let media = media();
        let store = MemoryStore::new();
        let session = session_with(&media, &store, 3);
        let view = session.view();

        assert_eq!(session.consent(), ConsentState::Unset);
        assert!(view.prompt_visible);
        assert!(!view.visible);
        assert!(!session.has_active_handle());
    }

    #[test]
    fn accepting_consent_loads_and_plays_first_track() {
        let media = media();
        let store = MemoryStore::new();
        let mut session = session_with(&media, &store, 3);
        session.answer_consent(true);

        let view = session.view();
        assert!(view.visible);
        assert!(!view.prompt_visible);
        assert!(view.is_playing);
        assert_eq!(view.track_index, 0);
        assert!(view.current_time < 1.0);
        assert_eq!(store.value(KEY_CONSENT).as_deref(), Some("true"));
    }

    #[test]
    fn denying_consent_never_plays() {
        let media = media();
        let store = MemoryStore::new();
        let mut session = session_with(&media, &store, 3);
        session.answer_consent(false);

        session.toggle_play_pause();
        session.next_track();
        session.reopen();
        session.navigate(Instant::now());
        session.tick(Instant::now() + Duration::from_secs(2));

        assert!(!session.state().is_playing);
        assert!(!session.has_active_handle());
        assert!(!session.view().prompt_visible);
        assert_eq!(store.value(KEY_CONSENT).as_deref(), Some("false"));
    }

    #[test]
    fn stored_session_rehydrates_paused() {
        let media = media();
        let store = MemoryStore::with_entries(&[
            (KEY_CONSENT, "true"),
            (KEY_TRACK_INDEX, "2"),
            (KEY_POSITION, "47.3"),
        ]);
        let session = session_with(&media, &store, 3);

        assert!(session.has_active_handle());
        assert_eq!(session.state().current_track_index, 2);
        assert!((session.state().elapsed - 47.3).abs() < 0.01);
        assert!(!session.state().is_playing);
    }

    #[test]
    fn persisted_dismissal_shows_reopen_affordance() {
        let media = media();
        let store =
            MemoryStore::with_entries(&[(KEY_CONSENT, "true"), (KEY_PLAYER_CLOSED, "true")]);
        let mut session = session_with(&media, &store, 2);
        let view = session.view();
        assert!(!view.visible);
        assert!(view.reopen_visible);

        session.reopen();
        assert!(session.view().visible);
        assert!(!session.state().is_playing);
        assert_eq!(store.value(KEY_PLAYER_CLOSED), None);
    }

    #[test]
    fn dismiss_pauses_and_reopen_resumes() {
        let media = media();
        let store = granted_store();
        let mut session = session_with(&media, &store, 3);
        session.select_track(1).expect("select");
        session.toggle_play_pause();
        session.seek_to(80.0);

        session.dismiss();
        let view = session.view();
        assert!(!view.visible);
        assert!(view.dismissed);
        assert!(!view.is_playing);
        assert_eq!(store.value(KEY_PLAYER_CLOSED).as_deref(), Some("true"));

        session.reopen();
        let view = session.view();
        assert!(view.visible);
        assert!(view.is_playing);
        assert_eq!(view.track_index, 1);
        assert!((view.current_time - 80.0).abs() < 0.5);
    }

    #[test]
    fn zero_volume_mutes_and_unmute_restores_level() {
        let media = media();
        let store = granted_store();
        let mut session = session_with(&media, &store, 1);

        session.set_volume(40.0);
        assert!(!session.state().is_muted);
        session.set_volume(0.0);
        assert!(session.state().is_muted);

        session.toggle_mute();
        assert!(!session.state().is_muted);
        assert!((session.state().volume - 0.4).abs() < f32::EPSILON);

        session.toggle_mute();
        session.set_volume(65.0);
        assert!(!session.state().is_muted);
    }

    #[test]
    fn volume_is_clamped() {
        let media = media();
        let store = granted_store();
        let mut session = session_with(&media, &store, 1);
        session.set_volume(250.0);
        assert_eq!(session.state().volume, 1.0);
        session.set_volume(-5.0);
        assert_eq!(session.state().volume, 0.0);
        assert!(session.state().is_muted);
    }

    #[test]
    fn track_change_keeps_playing_and_resets_position() {
        let media = media();
        let store = granted_store();
        let mut session = session_with(&media, &store, 3);
        session.toggle_play_pause();
        session.seek_to(30.0);

        session.prev_track();
        assert_eq!(session.state().current_track_index, 2);
        assert!(session.state().is_playing);
        assert!(session.state().elapsed < 1.0);
        assert_eq!(store.value(KEY_TRACK_INDEX).as_deref(), Some("2"));
        assert_eq!(session.handles_opened(), 2);
    }

    #[test]
    fn failed_load_is_observable_and_retryable() {
        let media = media();
        let store = granted_store();
        let mut session = PlaybackSession::new(
            SessionSettings::default(),
            vec![
                Track::new("broken", "studio", "", ""),
                Track::new("fine", "studio", "", "song_1.mp3"),
            ],
            Box::new(backend(&media)),
            Box::new(store.clone()),
        )
        .expect("session");

        assert!(session.view().load_error.is_some());
        session.toggle_play_pause();
        assert!(!session.state().is_playing);

        session.next_track();
        assert!(session.view().load_error.is_none());
        assert!(session.has_active_handle());
    }

    #[test]
    fn missing_media_file_stays_paused_with_an_error() {
        let media = media();
        let store = granted_store();
        let mut session = PlaybackSession::new(
            SessionSettings::default(),
            vec![Track::new("ghost", "studio", "", "/definitely/not/here.mp3")],
            Box::new(backend(&media)),
            Box::new(store.clone()),
        )
        .expect("session");

        assert!(session.load_error().is_some());
        session.toggle_play_pause();
        assert!(session.load_error().is_some());
        assert!(!session.state().is_playing);
        assert!(!session.has_active_handle());
    }

    #[test]
    fn seeking_without_consent_is_ignored() {
        let media = media();
        let store = MemoryStore::new();
        let mut session = session_with(&media, &store, 2);

        session.seek_to(30.0);
        assert_eq!(session.state().elapsed, 0.0);
        assert_eq!(store.value(KEY_POSITION), None);

        session.answer_consent(false);
        session.seek_to(30.0);
        assert_eq!(session.state().elapsed, 0.0);
        assert_eq!(store.value(KEY_POSITION), None);
    }

    #[test]
    fn navigation_while_paused_schedules_nothing() {
        let media = media();
        let store = granted_store();
        let mut session = session_with(&media, &store, 2);
        let epoch = session.navigate(Instant::now());
        assert_eq!(epoch.value(), 1);
        assert!(!session.resume_pending());
    }

    #[test]
    fn stale_resume_attempt_is_ignored() {
        let media = media();
        let store = granted_store();
        let mut session = PlaybackSession::new(
            SessionSettings::default(),
            tracks(2),
            Box::new(backend(&media).with_blocked_plays(1)),
            Box::new(store.clone()),
        )
        .expect("session");
        session.toggle_play_pause();
        session.toggle_play_pause();
        assert!(session.state().is_playing);

        let start = Instant::now();
        let first = session.navigate(start);
        let stale = ResumeAttempt {
            epoch: first,
            attempt: 0,
            of: 4,
            position: 999.0,
        };
        session.navigate(start);

        let before = session.state().clone();
        assert_eq!(session.apply_resume_attempt(stale), ResumeResult::Stale);
        assert_eq!(session.state(), &before);
    }

    #[test]
    fn slot_initializes_once() {
        let media = media();
        let mut slot = SessionSlot::new();
        let store = granted_store();
        let mut calls = 0;
        for _ in 0..3 {
            slot.get_or_init(|| {
                calls += 1;
                Ok(session_with(&media, &store, 2))
            })
            .expect("session");
        }
        assert_eq!(calls, 1);
        assert!(slot.get().is_some());
    }

    #[test]
    fn slot_propagates_configuration_error() {
        let mut slot = SessionSlot::new();
        let result = slot.get_or_init(|| {
            PlaybackSession::new(
                SessionSettings::default(),
                Vec::new(),
                Box::new(NullBackend::new()),
                Box::new(MemoryStore::new()),
            )
        });
        assert!(result.is_err());
        assert!(slot.get().is_none());
    }

    proptest::proptest! {
        #[test]
        fn playback_never_starts_without_consent(
            deny in proptest::bool::ANY,
            ops in proptest::collection::vec(0u8..9, 1..120),
        ) {
            let media = media();
            let store = MemoryStore::new();
            let mut session = session_with(&media, &store, 4);
            if deny {
                session.answer_consent(false);
            }
            let mut now = Instant::now();

            for op in ops {
                match op {
                    0 => session.toggle_play_pause(),
                    1 => session.next_track(),
                    2 => session.prev_track(),
                    3 => session.seek_to(12.0),
                    4 => session.dismiss(),
                    5 => session.reopen(),
                    6 => {
                        session.navigate(now);
                    }
                    7 => session.set_volume(0.0),
                    _ => session.toggle_mute(),
                }
                now += Duration::from_millis(150);
                session.tick(now);

                prop_assert!(!session.state().is_playing);
                prop_assert!(session.state().current_track_index < 4);
                prop_assert!(!session.has_active_handle());
            }
        }
    }
}
