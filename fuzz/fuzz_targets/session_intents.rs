#![no_main]

use libfuzzer_sys::fuzz_target;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{Duration, Instant};
use studio_player::audio::NullBackend;
use studio_player::model::{ConsentState, Track};
use studio_player::persistence::MemoryStore;
use studio_player::session::{PlaybackSession, SessionSettings};

const MAX_TRACKS: usize = 8;

static MEDIA_ROOT: OnceLock<PathBuf> = OnceLock::new();

/// Empty files so every track opens; the null engine falls back to a fixed duration.
fn media_root() -> PathBuf {
    MEDIA_ROOT
        .get_or_init(|| {
            let root = std::env::temp_dir().join("studio-player-fuzz-media");
            std::fs::create_dir_all(&root).expect("media dir");
            for idx in 0..MAX_TRACKS {
                std::fs::write(root.join(format!("track_{idx}.mp3")), b"").expect("media file");
            }
            root
        })
        .clone()
}

fuzz_target!(|data: &[u8]| {
    let Some((first, rest)) = data.split_first() else {
        return;
    };
    let len = usize::from(*first) % MAX_TRACKS + 1;
    let tracks = (0..len)
        .map(|idx| Track::new(&format!("track {idx}"), "fuzz", "", &format!("track_{idx}.mp3")))
        .collect();
    let backend = NullBackend::new()
        .with_media_root(Some(media_root()))
        .with_fallback_duration(Duration::from_secs(2))
        .with_blocked_plays(u32::from(first % 3));
    let Ok(mut session) = PlaybackSession::new(
        SessionSettings::default(),
        tracks,
        Box::new(backend),
        Box::new(MemoryStore::new()),
    ) else {
        return;
    };

    let t0 = Instant::now();
    for (step, byte) in rest.iter().enumerate() {
        let now = t0 + Duration::from_millis(step as u64 * 50);
        match byte % 12 {
            0 => session.answer_consent(byte & 0x80 != 0),
            1 => session.toggle_play_pause(),
            2 => session.next_track(),
            3 => session.prev_track(),
            4 => {
                let _ = session.select_track(usize::from(*byte >> 4));
            }
            5 => session.seek_to(f64::from(*byte) - 40.0),
            6 => session.set_volume(f32::from(*byte) - 20.0),
            7 => session.toggle_mute(),
            8 => session.dismiss(),
            9 => session.reopen(),
            10 => {
                session.navigate(now);
            }
            _ => {}
        }
        session.tick(now);

        let state = session.state();
        assert!(state.current_track_index < len);
        assert!((0.0..=1.0).contains(&state.volume));
        if state.volume == 0.0 {
            assert!(state.is_muted);
        }
        if session.consent() != ConsentState::Granted {
            assert!(!state.is_playing);
            assert!(!session.has_active_handle());
        }
    }
    session.shutdown();
});
